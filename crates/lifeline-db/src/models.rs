/// Database row types — these map directly to SQLite rows.
/// Distinct from the lifeline-types API models to keep the DB layer
/// independent.

pub struct UserRow {
    pub id: String,
    pub username: String,
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
    pub created_at: String,
}

pub struct ContactRow {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub phone: String,
    pub relationship: String,
}

pub struct ZoneRow {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub radius: f64,
    pub description: Option<String>,
}

pub struct EmergencyRow {
    pub id: String,
    pub user_id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub location_name: String,
    pub status: String,
    pub description: String,
    pub created_at: String,
}

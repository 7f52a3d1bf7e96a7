use rusqlite::Connection;

use lifeline_types::models::EmergencyStatus;

use crate::models::{ContactRow, EmergencyRow, UserRow, ZoneRow};
use crate::{Database, StoreError};

type Result<T> = std::result::Result<T, StoreError>;

impl Database {
    // -- Users --

    pub fn create_user(
        &self,
        id: &str,
        username: &str,
        email: &str,
        password_hash: &str,
        phone: Option<&str>,
    ) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO users (id, username, email, password, phone) VALUES (?1, ?2, ?3, ?4, ?5)",
                rusqlite::params![id, username, email, password_hash, phone],
            )?;
            Ok(())
        })
    }

    pub fn get_user_by_username(&self, username: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user(conn, "username", username))
    }

    pub fn get_user_by_email(&self, email: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user(conn, "email", email))
    }

    pub fn get_user_by_id(&self, id: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user(conn, "id", id))
    }

    // -- Contacts --

    pub fn insert_contact(
        &self,
        id: &str,
        user_id: &str,
        name: &str,
        phone: &str,
        relationship: &str,
    ) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO contacts (id, user_id, name, phone, relationship) VALUES (?1, ?2, ?3, ?4, ?5)",
                rusqlite::params![id, user_id, name, phone, relationship],
            )?;
            Ok(())
        })
    }

    /// All contacts owned by `user_id`, in insertion order.
    pub fn list_contacts(&self, user_id: &str) -> Result<Vec<ContactRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, user_id, name, phone, relationship
                 FROM contacts WHERE user_id = ?1 ORDER BY rowid",
            )?;
            let rows = stmt
                .query_map([user_id], |row| {
                    Ok(ContactRow {
                        id: row.get(0)?,
                        user_id: row.get(1)?,
                        name: row.get(2)?,
                        phone: row.get(3)?,
                        relationship: row.get(4)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// Contact scoped to its owner — a miss and an ownership mismatch are
    /// indistinguishable here, both read as "not found".
    pub fn get_contact(&self, id: &str, user_id: &str) -> Result<Option<ContactRow>> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT id, user_id, name, phone, relationship
                 FROM contacts WHERE id = ?1 AND user_id = ?2",
                [id, user_id],
                |row| {
                    Ok(ContactRow {
                        id: row.get(0)?,
                        user_id: row.get(1)?,
                        name: row.get(2)?,
                        phone: row.get(3)?,
                        relationship: row.get(4)?,
                    })
                },
            )
            .optional()
        })
    }

    pub fn update_contact(&self, contact: &ContactRow) -> Result<()> {
        self.with_conn(|conn| {
            let n = conn.execute(
                "UPDATE contacts SET name = ?1, phone = ?2, relationship = ?3
                 WHERE id = ?4 AND user_id = ?5",
                rusqlite::params![
                    contact.name,
                    contact.phone,
                    contact.relationship,
                    contact.id,
                    contact.user_id
                ],
            )?;
            if n == 0 {
                return Err(StoreError::NotFound);
            }
            Ok(())
        })
    }

    pub fn delete_contact(&self, id: &str, user_id: &str) -> Result<()> {
        self.with_conn(|conn| {
            let n = conn.execute(
                "DELETE FROM contacts WHERE id = ?1 AND user_id = ?2",
                [id, user_id],
            )?;
            if n == 0 {
                return Err(StoreError::NotFound);
            }
            Ok(())
        })
    }

    // -- Safety zones --

    pub fn insert_zone(&self, zone: &ZoneRow) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO safety_zones (id, user_id, name, latitude, longitude, radius, description)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                rusqlite::params![
                    zone.id,
                    zone.user_id,
                    zone.name,
                    zone.latitude,
                    zone.longitude,
                    zone.radius,
                    zone.description
                ],
            )?;
            Ok(())
        })
    }

    pub fn list_zones(&self, user_id: &str) -> Result<Vec<ZoneRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, user_id, name, latitude, longitude, radius, description
                 FROM safety_zones WHERE user_id = ?1 ORDER BY rowid",
            )?;
            let rows = stmt
                .query_map([user_id], map_zone_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// Unscoped lookup — the handler compares the owner to the caller so it
    /// can distinguish 404 from 403, matching the zone endpoints' contract.
    pub fn get_zone(&self, id: &str) -> Result<Option<ZoneRow>> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT id, user_id, name, latitude, longitude, radius, description
                 FROM safety_zones WHERE id = ?1",
                [id],
                map_zone_row,
            )
            .optional()
        })
    }

    pub fn update_zone(&self, zone: &ZoneRow) -> Result<()> {
        self.with_conn(|conn| {
            let n = conn.execute(
                "UPDATE safety_zones SET name = ?1, latitude = ?2, longitude = ?3,
                        radius = ?4, description = ?5
                 WHERE id = ?6",
                rusqlite::params![
                    zone.name,
                    zone.latitude,
                    zone.longitude,
                    zone.radius,
                    zone.description,
                    zone.id
                ],
            )?;
            if n == 0 {
                return Err(StoreError::NotFound);
            }
            Ok(())
        })
    }

    pub fn delete_zone(&self, id: &str) -> Result<()> {
        self.with_conn(|conn| {
            let n = conn.execute("DELETE FROM safety_zones WHERE id = ?1", [id])?;
            if n == 0 {
                return Err(StoreError::NotFound);
            }
            Ok(())
        })
    }

    // -- Emergency history --

    pub fn insert_emergency(
        &self,
        id: &str,
        user_id: &str,
        latitude: f64,
        longitude: f64,
        location_name: &str,
        description: &str,
    ) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO emergency_history
                     (id, user_id, latitude, longitude, location_name, status, description)
                 VALUES (?1, ?2, ?3, ?4, ?5, 'active', ?6)",
                rusqlite::params![id, user_id, latitude, longitude, location_name, description],
            )?;
            Ok(())
        })
    }

    /// Most recent first — ordering is a user-facing requirement. `rowid`
    /// breaks ties within the same second.
    pub fn list_emergencies(&self, user_id: &str) -> Result<Vec<EmergencyRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, user_id, latitude, longitude, location_name, status, description, created_at
                 FROM emergency_history WHERE user_id = ?1
                 ORDER BY created_at DESC, rowid DESC",
            )?;
            let rows = stmt
                .query_map([user_id], map_emergency_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn get_emergency(&self, id: &str) -> Result<Option<EmergencyRow>> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT id, user_id, latitude, longitude, location_name, status, description, created_at
                 FROM emergency_history WHERE id = ?1",
                [id],
                map_emergency_row,
            )
            .optional()
        })
    }

    /// Flip an emergency's status. Only the owning user may do this; the
    /// previous status is not retained.
    pub fn update_emergency_status(
        &self,
        id: &str,
        caller_id: &str,
        status: EmergencyStatus,
    ) -> Result<()> {
        self.with_conn(|conn| {
            let owner: Option<String> = conn
                .query_row(
                    "SELECT user_id FROM emergency_history WHERE id = ?1",
                    [id],
                    |row| row.get(0),
                )
                .optional()?;

            let owner = owner.ok_or(StoreError::NotFound)?;
            if owner != caller_id {
                return Err(StoreError::NotOwner);
            }

            conn.execute(
                "UPDATE emergency_history SET status = ?1 WHERE id = ?2",
                [status.as_str(), id],
            )?;
            Ok(())
        })
    }

    // -- Locations --

    pub fn insert_location(
        &self,
        id: &str,
        user_id: &str,
        latitude: f64,
        longitude: f64,
        address: &str,
    ) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO locations (id, user_id, latitude, longitude, address)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                rusqlite::params![id, user_id, latitude, longitude, address],
            )?;
            Ok(())
        })
    }
}

fn query_user(conn: &Connection, column: &str, value: &str) -> Result<Option<UserRow>> {
    // `column` is always a compile-time literal from this module.
    let sql = format!(
        "SELECT id, username, email, password, phone, created_at FROM users WHERE {} = ?1",
        column
    );
    conn.query_row(&sql, [value], |row| {
        Ok(UserRow {
            id: row.get(0)?,
            username: row.get(1)?,
            email: row.get(2)?,
            password: row.get(3)?,
            phone: row.get(4)?,
            created_at: row.get(5)?,
        })
    })
    .optional()
}

fn map_zone_row(row: &rusqlite::Row<'_>) -> std::result::Result<ZoneRow, rusqlite::Error> {
    Ok(ZoneRow {
        id: row.get(0)?,
        user_id: row.get(1)?,
        name: row.get(2)?,
        latitude: row.get(3)?,
        longitude: row.get(4)?,
        radius: row.get(5)?,
        description: row.get(6)?,
    })
}

fn map_emergency_row(row: &rusqlite::Row<'_>) -> std::result::Result<EmergencyRow, rusqlite::Error> {
    Ok(EmergencyRow {
        id: row.get(0)?,
        user_id: row.get(1)?,
        latitude: row.get(2)?,
        longitude: row.get(3)?,
        location_name: row.get(4)?,
        status: row.get(5)?,
        description: row.get(6)?,
        created_at: row.get(7)?,
    })
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> (Database, String) {
        let db = Database::open_in_memory().unwrap();
        let user_id = "11111111-1111-1111-1111-111111111111".to_string();
        db.create_user(&user_id, "asha", "asha@example.com", "hash", Some("+911234567890"))
            .unwrap();
        (db, user_id)
    }

    #[test]
    fn contacts_keep_insertion_order() {
        let (db, uid) = seeded();
        db.insert_contact("c1", &uid, "Maya", "9876543210", "Sister").unwrap();
        db.insert_contact("c2", &uid, "Ravi", "+919998887776", "Friend").unwrap();
        db.insert_contact("c3", &uid, "Amma", "911", "Mother").unwrap();

        let contacts = db.list_contacts(&uid).unwrap();
        let names: Vec<&str> = contacts.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Maya", "Ravi", "Amma"]);
    }

    #[test]
    fn emergencies_list_newest_first() {
        let (db, uid) = seeded();
        db.insert_emergency("e1", &uid, 12.97, 77.59, "MG Road", "SOS").unwrap();
        db.insert_emergency("e2", &uid, 12.98, 77.60, "Cubbon Park", "SOS").unwrap();
        db.insert_emergency("e3", &uid, 12.99, 77.61, "Unknown Location", "SOS").unwrap();

        let history = db.list_emergencies(&uid).unwrap();
        let ids: Vec<&str> = history.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["e3", "e2", "e1"]);
        assert!(history.iter().all(|e| e.status == "active"));
    }

    #[test]
    fn status_update_requires_ownership() {
        let (db, uid) = seeded();
        db.create_user("intruder", "kiran", "kiran@example.com", "hash", None)
            .unwrap();
        db.insert_emergency("e1", &uid, 0.0, 0.0, "Unknown Location", "SOS").unwrap();

        let err = db
            .update_emergency_status("e1", "intruder", EmergencyStatus::Resolved)
            .unwrap_err();
        assert!(matches!(err, StoreError::NotOwner));
        // Status must be untouched after the rejected update.
        assert_eq!(db.get_emergency("e1").unwrap().unwrap().status, "active");

        db.update_emergency_status("e1", &uid, EmergencyStatus::Resolved).unwrap();
        assert_eq!(db.get_emergency("e1").unwrap().unwrap().status, "resolved");
    }

    #[test]
    fn status_update_missing_record() {
        let (db, uid) = seeded();
        let err = db
            .update_emergency_status("nope", &uid, EmergencyStatus::Active)
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound));
    }

    #[test]
    fn contact_crud_scoped_to_owner() {
        let (db, uid) = seeded();
        db.create_user("u2", "kiran", "kiran@example.com", "hash", None).unwrap();
        db.insert_contact("c1", &uid, "Maya", "9876543210", "Sister").unwrap();

        // Another user cannot see or delete the contact.
        assert!(db.get_contact("c1", "u2").unwrap().is_none());
        assert!(matches!(db.delete_contact("c1", "u2").unwrap_err(), StoreError::NotFound));

        db.delete_contact("c1", &uid).unwrap();
        assert!(db.list_contacts(&uid).unwrap().is_empty());
    }

    #[test]
    fn duplicate_username_rejected() {
        let (db, _) = seeded();
        let err = db.create_user("u2", "asha", "other@example.com", "hash", None);
        assert!(err.is_err());
    }
}

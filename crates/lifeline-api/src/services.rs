use axum::{Json, response::IntoResponse};

use lifeline_types::api::EmergencyService;

/// National emergency-service directory. Static data: these numbers do not
/// depend on the caller.
const SERVICES: &[EmergencyService] = &[
    EmergencyService {
        name: "Police",
        number: "100",
        description: "For crime, violence, or immediate threats",
    },
    EmergencyService {
        name: "Women Helpline",
        number: "1091",
        description: "National helpline for women in distress",
    },
    EmergencyService {
        name: "Ambulance",
        number: "108",
        description: "Medical emergencies and ambulance services",
    },
    EmergencyService {
        name: "Fire Emergency",
        number: "101",
        description: "For fire incidents and rescue operations",
    },
    EmergencyService {
        name: "Disaster Management",
        number: "1070",
        description: "For natural disasters and emergency situations",
    },
    EmergencyService {
        name: "Tourist Helpline",
        number: "1363",
        description: "For tourists facing emergency situations",
    },
];

pub async fn list_services() -> impl IntoResponse {
    Json(SERVICES)
}

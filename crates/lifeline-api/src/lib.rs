pub mod auth;
pub mod contacts;
pub mod emergency;
pub mod error;
pub mod middleware;
pub mod services;
pub mod sos;
pub mod zones;

use std::sync::Arc;

use lifeline_alerts::ProviderDispatcher;
use lifeline_db::Database;
use lifeline_geo::geocode::Geocoder;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub jwt_secret: String,
    /// Canonical international phone prefix for contact normalization.
    pub country_code: String,
    pub geocoder: Geocoder,
    pub alerts: ProviderDispatcher,
}

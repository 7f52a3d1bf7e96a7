use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    Router, middleware,
    routing::{delete, get, post, put},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use lifeline_alerts::{AlertDispatcher, PushbulletClient, TwilioClient};
use lifeline_api::middleware::require_auth;
use lifeline_api::{AppState, AppStateInner, auth, contacts, emergency, services, sos, zones};
use lifeline_geo::geocode::{DEFAULT_GEOCODER_URL, Geocoder};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lifeline=debug,tower_http=debug".into()),
        )
        .init();

    // Config
    let jwt_secret =
        std::env::var("LIFELINE_JWT_SECRET").unwrap_or_else(|_| "dev-secret-change-me".into());
    let db_path = std::env::var("LIFELINE_DB_PATH").unwrap_or_else(|_| "lifeline.db".into());
    let host = std::env::var("LIFELINE_HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let port: u16 = std::env::var("LIFELINE_PORT")
        .unwrap_or_else(|_| "3000".into())
        .parse()?;
    let country_code =
        std::env::var("LIFELINE_COUNTRY_CODE").unwrap_or_else(|_| "+91".into());
    let geocoder_url =
        std::env::var("LIFELINE_GEOCODER_URL").unwrap_or_else(|_| DEFAULT_GEOCODER_URL.into());

    // Notification channels are optional: a channel with missing credentials
    // is simply not configured.
    let pushbullet = match (
        std::env::var("PUSHBULLET_API_KEY"),
        std::env::var("PUSHBULLET_DEVICE_IDEN"),
    ) {
        (Ok(key), Ok(device)) => Some(PushbulletClient::new(key, device)),
        _ => {
            warn!("Pushbullet channel not configured (PUSHBULLET_API_KEY / PUSHBULLET_DEVICE_IDEN)");
            None
        }
    };
    let twilio = match (
        std::env::var("TWILIO_ACCOUNT_SID"),
        std::env::var("TWILIO_AUTH_TOKEN"),
        std::env::var("TWILIO_FROM_NUMBER"),
    ) {
        (Ok(sid), Ok(token), Ok(from)) => Some(TwilioClient::new(sid, token, from)),
        _ => {
            warn!("Twilio channel not configured (TWILIO_ACCOUNT_SID / TWILIO_AUTH_TOKEN / TWILIO_FROM_NUMBER)");
            None
        }
    };

    // Init database
    let db = lifeline_db::Database::open(&PathBuf::from(&db_path))?;

    // Shared state
    let state: AppState = Arc::new(AppStateInner {
        db,
        jwt_secret,
        country_code,
        geocoder: Geocoder::new(geocoder_url),
        alerts: AlertDispatcher::new(pushbullet, twilio),
    });

    // Routes
    let public_routes = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .with_state(state.clone());

    let protected_routes = Router::new()
        .route("/sos", post(sos::trigger_sos))
        .route("/share-location", post(sos::share_location))
        .route("/api/contacts", get(contacts::list_contacts))
        .route("/api/contacts", post(contacts::create_contact))
        .route("/api/contacts/{contact_id}", put(contacts::update_contact))
        .route("/api/contacts/{contact_id}", delete(contacts::delete_contact))
        .route("/api/safety-zones", get(zones::list_zones))
        .route("/api/safety-zones", post(zones::create_zone))
        .route("/api/safety-zones/{zone_id}", put(zones::update_zone))
        .route("/api/safety-zones/{zone_id}", delete(zones::delete_zone))
        .route("/api/emergency-history", get(emergency::list_history))
        .route("/emergency-status/{emergency_id}", post(emergency::update_status))
        .route("/api/emergency-services", get(services::list_services))
        .layer(middleware::from_fn(require_auth))
        .with_state(state);

    let app = Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Lifeline server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

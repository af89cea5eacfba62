use actix_cors::Cors;
use actix_web::{web, App, HttpServer, HttpResponse, middleware, error, http::StatusCode};
use estate_match::config::{LogFormat, LoggingSettings, Settings};
use estate_match::core::{FixedJitter, Jitter, Matcher, RandomJitter};
use estate_match::models::ScoringWeights;
use estate_match::routes::{self, AppState};
use estate_match::services::{AppwriteClient, AppwriteCollections, Session, SessionEvent};
use std::sync::Arc;
use tracing::{info, error, warn};
use tracing_subscriber::EnvFilter;

/// JSON error response for JSON payload errors
#[derive(Debug, serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub message: String,
    #[serde(rename = "statusCode")]
    pub status_code: u16,
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for JsonError {}

impl error::ResponseError for JsonError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST))
            .json(self)
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &actix_web::HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code: 400,
    }
    .into()
}

/// Handle path parameter errors
pub fn handle_path_error(err: error::PathError, _req: &actix_web::HttpRequest) -> actix_web::Error {
    JsonError {
        error: "invalid_path".to_string(),
        message: format!("Invalid path: {}", err),
        status_code: 400,
    }
    .into()
}

fn init_tracing(logging: &LoggingSettings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    match logging.format {
        LogFormat::Json => subscriber.json().init(),
        LogFormat::Pretty => subscriber.pretty().init(),
        LogFormat::Text => subscriber.init(),
    }
}

/// Log every session change; lagging only loses log lines
fn spawn_event_logger(session: &Session) {
    let mut events = session.subscribe();

    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(SessionEvent::SnapshotReplaced { sequence, listing_count }) => {
                    info!("Listing snapshot #{} now serving {} listings", sequence, listing_count);
                }
                Ok(SessionEvent::ProfileUpdated { buyer_id }) => {
                    info!("Preference profile updated for buyer {}", buyer_id);
                }
                Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!("Session event logger skipped {} events", skipped);
                }
                Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
            }
        }
    });
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = Settings::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, format!("Configuration error: {}", e))
    })?;

    init_tracing(&settings.logging);

    info!("Starting Estate Match listing service...");

    let collections = AppwriteCollections {
        listings: settings.collection.listings.clone(),
        preferences: settings.collection.preferences.clone(),
    };

    let appwrite = AppwriteClient::new(
        settings.appwrite.endpoint.clone(),
        settings.appwrite.api_key.clone(),
        settings.appwrite.project_id.clone(),
        settings.appwrite.database_id.clone(),
        collections,
    )
    .map_err(|e| {
        error!("Failed to create Appwrite client: {}", e);
        std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
    })?;

    info!("Appwrite client initialized");

    let session = Arc::new(Session::new(Arc::new(appwrite), settings.matching.page_size));
    spawn_event_logger(&session);

    if settings.matching.refresh_on_start {
        // A failed first fetch leaves an empty snapshot; POST /listings/refresh retries
        if let Err(e) = session.refresh_listings().await {
            error!("Initial listing fetch failed, serving an empty snapshot: {}", e);
        }
    }

    let weights = ScoringWeights {
        city: settings.scoring.weights.city,
        property_type: settings.scoring.weights.property_type,
    };

    let jitter: Arc<dyn Jitter> = if settings.scoring.jitter {
        Arc::new(RandomJitter)
    } else {
        Arc::new(FixedJitter(0.0))
    };

    let matcher = Matcher::new(weights, settings.matching.recommended_limit, jitter);

    info!(
        "Matcher initialized with weights: {:?}, recommending top {}",
        weights,
        settings.matching.recommended_limit
    );

    let app_state = AppState { session, matcher };

    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::PathConfig::default().error_handler(handle_path_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}

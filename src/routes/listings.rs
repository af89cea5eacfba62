use actix_web::{web, HttpResponse, Responder};
use validator::Validate;
use crate::core::{summarize_facets, Matcher};
use crate::models::{
    ErrorResponse, FilterConstraints, HealthResponse, ListingsResponse, RecommendRequest,
    RefreshResponse, SearchListingsRequest, SortMode,
};
use crate::services::Session;
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub session: Arc<Session>,
    pub matcher: Matcher,
}

/// Configure all listing-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/listings/search", web::post().to(search_listings))
        .route("/listings/recommended", web::post().to(recommended_listings))
        .route("/listings/refresh", web::post().to(refresh_listings))
        .route("/listings/facets", web::get().to(listing_facets));
}

pub(crate) fn bad_request(error: &str, message: String) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse {
        error: error.to_string(),
        message,
        status_code: 400,
    })
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let snapshot = state.session.snapshot();

    // Serving an empty, never-loaded snapshot is degraded but not down
    let status = if snapshot.fetched_at.is_some() { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
        snapshot_sequence: snapshot.sequence,
        listing_count: snapshot.len(),
    })
}

/// Search endpoint
///
/// POST /api/v1/listings/search
///
/// Request body:
/// ```json
/// {
///   "filters": {
///     "minPrice": 1000000,
///     "maxPrice": 50000000,
///     "propertyTypes": ["Flat / Apartment"],
///     "bedrooms": "4+",
///     "amenities": ["parking"],
///     "query": "Lekki"
///   },
///   "sort": "recommended|priceAsc|priceDesc|newest",
///   "buyerId": "string"
/// }
/// ```
async fn search_listings(
    state: web::Data<AppState>,
    req: web::Json<SearchListingsRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for search request: {:?}", errors);
        return bad_request("Validation failed", errors.to_string());
    }

    let req = req.into_inner();
    let sort = req.sort;

    let constraints = match FilterConstraints::try_from(req.filters) {
        Ok(c) => c,
        Err(e) => return bad_request("Invalid filters", e.to_string()),
    };

    // A profile only matters for the recommended order; it is re-read on every search
    let profile = match (&req.buyer_id, sort) {
        (Some(buyer_id), SortMode::Recommended) => match state.session.load_profile(buyer_id).await {
            Ok(profile) => Some(profile),
            Err(e) => {
                tracing::warn!("Searching without preferences for {}: {}", buyer_id, e);
                None
            }
        },
        _ => None,
    };

    let snapshot = state.session.snapshot();
    let result = state
        .matcher
        .project(&snapshot.listings, &constraints, sort, profile.as_ref());

    tracing::debug!(
        "Search matched {} of {} listings (snapshot #{})",
        result.total_matched,
        result.total_candidates,
        snapshot.sequence
    );

    HttpResponse::Ok().json(ListingsResponse {
        listings: result.listings,
        total_candidates: result.total_candidates,
        total_matched: result.total_matched,
        snapshot_sequence: snapshot.sequence,
    })
}

/// Recommended listings endpoint
///
/// POST /api/v1/listings/recommended
///
/// Request body:
/// ```json
/// {
///   "buyerId": "string",
///   "filters": { ... }
/// }
/// ```
async fn recommended_listings(
    state: web::Data<AppState>,
    req: web::Json<RecommendRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return bad_request("Validation failed", errors.to_string());
    }

    let req = req.into_inner();

    let constraints = match FilterConstraints::try_from(req.filters) {
        Ok(c) => c,
        Err(e) => return bad_request("Invalid filters", e.to_string()),
    };

    // Dashboard load always re-reads the profile
    let profile = match state.session.load_profile(&req.buyer_id).await {
        Ok(profile) => profile,
        Err(e) => {
            return HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to fetch preferences".to_string(),
                message: e.to_string(),
                status_code: 500,
            });
        }
    };

    let snapshot = state.session.snapshot();
    let result = state.matcher.recommend(&snapshot.listings, &constraints, &profile);

    tracing::info!(
        "Returning {} recommendations for buyer {} (from {} matching listings)",
        result.listings.len(),
        req.buyer_id,
        result.total_matched
    );

    HttpResponse::Ok().json(ListingsResponse {
        listings: result.listings,
        total_candidates: result.total_candidates,
        total_matched: result.total_matched,
        snapshot_sequence: snapshot.sequence,
    })
}

/// Re-fetch the listing snapshot
///
/// POST /api/v1/listings/refresh
async fn refresh_listings(state: web::Data<AppState>) -> impl Responder {
    match state.session.refresh_listings().await {
        Ok(outcome) => HttpResponse::Ok().json(RefreshResponse {
            applied: outcome.applied,
            snapshot_sequence: outcome.snapshot.sequence,
            listing_count: outcome.snapshot.len(),
        }),
        Err(e) => HttpResponse::BadGateway().json(ErrorResponse {
            error: "Failed to refresh listings".to_string(),
            message: e.to_string(),
            status_code: 502,
        }),
    }
}

/// Distinct filter values in the current snapshot
///
/// GET /api/v1/listings/facets
async fn listing_facets(state: web::Data<AppState>) -> impl Responder {
    let snapshot = state.session.snapshot();
    HttpResponse::Ok().json(summarize_facets(&snapshot.listings))
}

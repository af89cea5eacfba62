use actix_web::{web, HttpResponse, Responder};
use validator::Validate;
use crate::models::{ErrorResponse, UpdatePreferencesRequest};
use crate::routes::listings::{bad_request, AppState};
use crate::services::AppwriteError;

/// Configure preference profile routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/preferences/{buyer_id}", web::get().to(get_preferences))
        .route("/preferences/{buyer_id}", web::put().to(update_preferences));
}

fn store_error(context: &str, err: AppwriteError) -> HttpResponse {
    match err {
        AppwriteError::NotFound(message) => HttpResponse::NotFound().json(ErrorResponse {
            error: context.to_string(),
            message,
            status_code: 404,
        }),
        other => HttpResponse::InternalServerError().json(ErrorResponse {
            error: context.to_string(),
            message: other.to_string(),
            status_code: 500,
        }),
    }
}

/// GET /api/v1/preferences/{buyerId}
async fn get_preferences(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> impl Responder {
    let buyer_id = path.into_inner();

    match state.session.load_profile(&buyer_id).await {
        Ok(profile) => HttpResponse::Ok().json(profile),
        Err(e) => store_error("Failed to fetch preferences", e),
    }
}

/// Explicit settings save
///
/// PUT /api/v1/preferences/{buyerId}
///
/// Request body:
/// ```json
/// {
///   "preferredCity": "Lagos",
///   "preferredPropertyType": "Apartment",
///   "budget": 50000000,
///   "bedroomPreference": "3"
/// }
/// ```
async fn update_preferences(
    state: web::Data<AppState>,
    path: web::Path<String>,
    req: web::Json<UpdatePreferencesRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return bad_request("Validation failed", errors.to_string());
    }
    if let Err(e) = req.check_bedrooms() {
        return bad_request("Invalid bedroom preference", e.to_string());
    }

    let buyer_id = path.into_inner();

    match state.session.save_profile(&buyer_id, &req).await {
        Ok(profile) => {
            tracing::info!("Updated preferences for buyer {}", buyer_id);
            HttpResponse::Ok().json(profile)
        }
        Err(e) => {
            tracing::error!("Failed to save preferences for {}: {}", buyer_id, e);
            store_error("Failed to save preferences", e)
        }
    }
}

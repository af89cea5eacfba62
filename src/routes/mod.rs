// Route exports
pub mod listings;
pub mod preferences;

use actix_web::web;

pub use listings::AppState;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(listings::configure)
            .configure(preferences::configure),
    );
}

pub mod health;
pub mod ical_import;

use axum::Router;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// All routes with CORS and request tracing applied.
pub fn router(state: AppState) -> Router {
    // Browsers refuse `*` on credentialed requests, so every origin, method
    // and header is echoed back instead.
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true);

    Router::new()
        .merge(ical_import::router())
        .merge(health::router())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

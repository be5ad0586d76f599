//! PaddockPal relay server
//!
//! Holds the provider credential, constrains every question with the F1
//! domain prompt and streams the answer back as text frames.

pub mod config;
pub mod logging;
pub mod prompt;
pub mod routes;
pub mod state;

use axum::handler::HandlerWithoutStateExt;
use axum::routing::post;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

pub use config::RelayConfig;
pub use state::AppState;

pub fn build_router(state: AppState) -> Router {
    let static_files =
        ServeDir::new(&state.config.static_dir).not_found_service(routes::not_found.into_service());

    Router::new()
        .route("/api/generate", post(routes::generate::generate))
        .fallback_service(static_files)
        .layer(CorsLayer::permissive())
        .with_state(state)
}

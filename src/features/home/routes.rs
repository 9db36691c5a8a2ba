use axum::{routing::get, Router};

use crate::features::home::handlers::{self, HomeState};

/// Create routes for the landing page
pub fn routes(state: HomeState) -> Router {
    Router::new()
        .route("/", get(handlers::home))
        .with_state(state)
}

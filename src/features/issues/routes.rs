use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::issues::handlers;
use crate::features::issues::services::IssueService;

/// Create routes for the issues feature
pub fn routes(service: Arc<IssueService>) -> Router {
    Router::new()
        .route(
            "/api/issues",
            get(handlers::list_issues).post(handlers::create_issue),
        )
        .with_state(service)
}

use std::sync::Arc;

use axum::{extract::State, response::Html};
use minijinja::context;

use crate::core::error::{AppError, Result};
use crate::shared::geo::GeoPoint;
use crate::shared::templates::TemplateEngine;

const HOME_TEMPLATE: &str = "index.html";

/// State for the landing page
#[derive(Clone)]
pub struct HomeState {
    pub templates: Arc<TemplateEngine>,
    pub map_center: GeoPoint,
    pub default_radius_km: f64,
}

/// Landing page with the issue map and report form
pub async fn home(State(state): State<HomeState>) -> Result<Html<String>> {
    let page = state
        .templates
        .render(
            HOME_TEMPLATE,
            context! {
                map_center => state.map_center,
                default_radius_km => state.default_radius_km,
            },
        )
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(Html(page))
}

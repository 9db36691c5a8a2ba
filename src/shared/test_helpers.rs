use std::sync::Arc;

use async_trait::async_trait;
use axum_test::TestServer;

use crate::core::config::{
    AppConfig, Config, IssueConfig, LandingConfig, StoreConfig, SwaggerConfig,
};
use crate::core::error::{AppError, Result};
use crate::core::router::build_router;
use crate::features::home::HomeState;
use crate::features::issues::models::{Issue, NearbyQuery, NewIssue};
use crate::features::issues::{IssueService, IssueStore, ReferenceIssueStore};
use crate::shared::geo::GeoPoint;
use crate::shared::templates::TemplateEngine;

const TEST_INDEX_TEMPLATE: &str = r#"<div id="map" data-lat="{{ map_center.latitude }}" data-lng="{{ map_center.longitude }}" data-radius="{{ default_radius_km }}"></div>"#;

pub fn test_config() -> Config {
    Config {
        app: AppConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors_allowed_origins: vec!["*".to_string()],
            max_request_body_size: 64 * 1024,
        },
        store: StoreConfig::Memory,
        issues: IssueConfig {
            seed_sample_data: false,
            ..IssueConfig::default()
        },
        landing: LandingConfig {
            template_dir: "templates".to_string(),
            static_dir: "static".to_string(),
            map_center: GeoPoint::new(77.5946, 12.9716),
        },
        swagger: SwaggerConfig {
            title: "CivicTrack API".to_string(),
            version: "test".to_string(),
            description: "test".to_string(),
        },
    }
}

pub fn test_server(config: Config) -> TestServer {
    test_server_with_store(config, Arc::new(ReferenceIssueStore::new()))
}

pub fn test_server_with_store(config: Config, store: Arc<dyn IssueStore>) -> TestServer {
    let issue_service = Arc::new(IssueService::new(store, config.issues.clone()));
    let home = HomeState {
        templates: Arc::new(TemplateEngine::from_sources(&[(
            "index.html",
            TEST_INDEX_TEMPLATE,
        )])),
        map_center: config.landing.map_center,
        default_radius_km: config.issues.default_radius_km,
    };

    TestServer::new(build_router(&config, issue_service, home)).expect("test server should start")
}

/// Store whose every call fails like an unreachable database
pub struct FailingIssueStore;

#[async_trait]
impl IssueStore for FailingIssueStore {
    async fn ensure_schema(&self) -> Result<()> {
        Err(AppError::Database(sqlx::Error::PoolTimedOut))
    }

    async fn find_near(&self, _query: &NearbyQuery) -> Result<Vec<Issue>> {
        Err(AppError::Database(sqlx::Error::PoolTimedOut))
    }

    async fn create(&self, _issue: &NewIssue) -> Result<Issue> {
        Err(AppError::Database(sqlx::Error::PoolTimedOut))
    }

    async fn seed_if_empty(&self, _issue: &NewIssue) -> Result<Option<Issue>> {
        Err(AppError::Database(sqlx::Error::PoolTimedOut))
    }

    async fn count(&self) -> Result<i64> {
        Err(AppError::Database(sqlx::Error::PoolTimedOut))
    }
}

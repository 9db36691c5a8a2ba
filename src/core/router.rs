use std::sync::Arc;

use axum::{extract::DefaultBodyLimit, handler::HandlerWithoutStateExt, Router};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::services::ServeDir;
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::core::config::Config;
use crate::core::middleware;
use crate::core::openapi::{ApiDoc, SwaggerInfoModifier};
use crate::features::home::{routes as home_routes, HomeState};
use crate::features::issues::{routes as issues_routes, IssueService};

/// Simple health check endpoint
async fn health_check() -> axum::http::StatusCode {
    axum::http::StatusCode::OK
}

/// Assemble the application router with every route and layer
pub fn build_router(config: &Config, issue_service: Arc<IssueService>, home: HomeState) -> Router {
    let swagger_modifier = SwaggerInfoModifier {
        title: config.swagger.title.clone(),
        version: config.swagger.version.clone(),
        description: config.swagger.description.clone(),
    };

    let mut openapi = ApiDoc::openapi();
    swagger_modifier.modify(&mut openapi);

    let swagger =
        Router::new().merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi));

    let static_files = ServeDir::new(&config.landing.static_dir)
        .fallback(middleware::not_found.into_service());

    Router::new()
        .merge(swagger)
        .merge(issues_routes::routes(issue_service))
        .merge(home_routes::routes(home))
        .route("/health", axum::routing::get(health_check))
        .nest_service("/static", static_files)
        .fallback(middleware::not_found)
        .layer(DefaultBodyLimit::max(config.app.max_request_body_size))
        .layer(CatchPanicLayer::custom(middleware::handle_panic))
        .layer(middleware::cors_layer(
            config.app.cors_allowed_origins.clone(),
        ))
        // Propagate X-Request-Id to response headers
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(middleware::MakeSpanWithRequestId)
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Generate X-Request-Id using UUID v7 (or use client-provided one)
        .layer(SetRequestIdLayer::x_request_id(middleware::MakeRequestUuid))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use fake::faker::lorem::en::{Sentence, Word};
    use fake::Fake;
    use serde_json::{json, Value};

    use crate::core::config::MissingLocationPolicy;
    use crate::features::issues::{IssueStore, ReferenceIssueStore};
    use crate::shared::test_helpers::{test_config, test_server, test_server_with_store};

    #[tokio::test]
    async fn test_create_then_list_nearby() {
        let server = test_server(test_config());

        let created = server
            .post("/api/issues")
            .json(&json!({
                "title": "Pothole",
                "description": "Large pothole",
                "category": "roads",
                "latitude": 12.9716,
                "longitude": 77.5946
            }))
            .await;

        assert_eq!(created.status_code(), StatusCode::CREATED);
        let body: Value = created.json();
        assert!(body["id"].as_i64().unwrap() > 0);
        assert_eq!(body["message"], "Issue created successfully");

        let listed = server
            .get("/api/issues")
            .add_query_param("lat", "12.9716")
            .add_query_param("lng", "77.5946")
            .add_query_param("radius", "1")
            .await;

        assert_eq!(listed.status_code(), StatusCode::OK);
        let issues: Vec<Value> = listed.json();
        assert_eq!(issues.len(), 1);
        let issue = &issues[0];
        assert_eq!(issue["id"], body["id"]);
        assert_eq!(issue["title"], "Pothole");
        assert_eq!(issue["description"], "Large pothole");
        assert_eq!(issue["category"], "roads");
        assert_eq!(issue["status"], "reported");
        assert!((issue["latitude"].as_f64().unwrap() - 12.9716).abs() < 1e-9);
        assert!((issue["longitude"].as_f64().unwrap() - 77.5946).abs() < 1e-9);
        assert!(issue["created_at"].is_string());
        assert!(issue["updated_at"].is_string());
    }

    #[tokio::test]
    async fn test_list_requires_latitude() {
        let server = test_server(test_config());

        let response = server
            .get("/api/issues")
            .add_query_param("lng", "77.5946")
            .await;

        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.json::<Value>(),
            json!({ "error": "Latitude and longitude are required" })
        );
    }

    #[tokio::test]
    async fn test_list_non_numeric_longitude() {
        let server = test_server(test_config());

        let response = server
            .get("/api/issues")
            .add_query_param("lat", "12.9716")
            .add_query_param("lng", "east")
            .await;

        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.json::<Value>()["error"],
            "Latitude and longitude are required"
        );
    }

    #[tokio::test]
    async fn test_list_repeated_key_uses_first_value() {
        let server = test_server(test_config());

        server
            .post("/api/issues")
            .json(&json!({
                "title": "Pothole",
                "description": "Large pothole",
                "category": "roads",
                "latitude": 12.9716,
                "longitude": 77.5946
            }))
            .await
            .assert_status(StatusCode::CREATED);

        let response = server
            .get("/api/issues?lat=12.9716&lat=2&lng=77.5946&radius=1&radius=abc")
            .await;

        assert_eq!(response.status_code(), StatusCode::OK);
        let issues: Vec<Value> = response.json();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0]["title"], "Pothole");
    }

    #[tokio::test]
    async fn test_list_empty_store() {
        let server = test_server(test_config());

        let response = server
            .get("/api/issues")
            .add_query_param("lat", "0")
            .add_query_param("lng", "0")
            .add_query_param("radius", "5")
            .await;

        assert_eq!(response.status_code(), StatusCode::OK);
        assert_eq!(response.json::<Value>(), json!([]));
    }

    #[tokio::test]
    async fn test_list_filters_by_status_and_category() {
        let server = test_server(test_config());

        for category in ["roads", "water", "roads"] {
            let title: String = Sentence(2..4).fake();
            server
                .post("/api/issues")
                .json(&json!({
                    "title": title,
                    "description": "Reported from the field",
                    "category": category,
                    "latitude": 12.9716,
                    "longitude": 77.5946
                }))
                .await
                .assert_status(StatusCode::CREATED);
        }

        let roads: Vec<Value> = server
            .get("/api/issues")
            .add_query_param("lat", "12.9716")
            .add_query_param("lng", "77.5946")
            .add_query_param("category", "roads")
            .await
            .json();
        assert_eq!(roads.len(), 2);
        assert!(roads.iter().all(|i| i["category"] == "roads"));

        let resolved: Vec<Value> = server
            .get("/api/issues")
            .add_query_param("lat", "12.9716")
            .add_query_param("lng", "77.5946")
            .add_query_param("status", "resolved")
            .await
            .json();
        assert!(resolved.is_empty());

        let unfiltered: Vec<Value> = server
            .get("/api/issues")
            .add_query_param("lat", "12.9716")
            .add_query_param("lng", "77.5946")
            .add_query_param("status", "")
            .add_query_param("category", "")
            .await
            .json();
        assert_eq!(unfiltered.len(), 3);
    }

    #[tokio::test]
    async fn test_list_excludes_issues_outside_radius() {
        let server = test_server(test_config());

        // Mysuru is ~128km from Bengaluru
        server
            .post("/api/issues")
            .json(&json!({
                "title": "Flooded underpass",
                "description": "Water up to the knees",
                "category": "water",
                "latitude": 12.2958,
                "longitude": 76.6394
            }))
            .await
            .assert_status(StatusCode::CREATED);

        let near_bengaluru: Vec<Value> = server
            .get("/api/issues")
            .add_query_param("lat", "12.9716")
            .add_query_param("lng", "77.5946")
            .add_query_param("radius", "100")
            .await
            .json();
        assert!(near_bengaluru.is_empty());

        let wider: Vec<Value> = server
            .get("/api/issues")
            .add_query_param("lat", "12.9716")
            .add_query_param("lng", "77.5946")
            .add_query_param("radius", "150")
            .await
            .json();
        assert_eq!(wider.len(), 1);
    }

    #[tokio::test]
    async fn test_create_missing_fields() {
        let store = std::sync::Arc::new(ReferenceIssueStore::new());
        let server = test_server_with_store(test_config(), store.clone());

        for body in [
            json!({ "description": "Large pothole", "category": "roads" }),
            json!({ "title": "Pothole", "category": "roads" }),
            json!({ "title": "Pothole", "description": "Large pothole" }),
            json!({}),
        ] {
            let response = server.post("/api/issues").json(&body).await;
            assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
            assert_eq!(
                response.json::<Value>(),
                json!({ "error": "Missing required fields" })
            );
        }

        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_create_blank_title() {
        let store = std::sync::Arc::new(ReferenceIssueStore::new());
        let server = test_server_with_store(test_config(), store.clone());

        let response = server
            .post("/api/issues")
            .json(&json!({
                "title": "   ",
                "description": "Large pothole",
                "category": Word().fake::<String>()
            }))
            .await;

        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.json::<Value>(),
            json!({ "error": "Title and description cannot be empty" })
        );
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_create_ids_are_unique() {
        let server = test_server(test_config());

        let mut ids = Vec::new();
        for _ in 0..3 {
            let title: String = Sentence(1..3).fake();
            let response = server
                .post("/api/issues")
                .json(&json!({
                    "title": title,
                    "description": "Something is broken",
                    "category": "roads"
                }))
                .await;
            response.assert_status(StatusCode::CREATED);
            ids.push(response.json::<Value>()["id"].as_i64().unwrap());
        }

        let mut deduped = ids.clone();
        deduped.dedup();
        assert_eq!(ids, deduped);
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }

    #[tokio::test]
    async fn test_create_without_coordinates_defaults_to_origin() {
        let server = test_server(test_config());

        server
            .post("/api/issues")
            .json(&json!({
                "title": "Graffiti",
                "description": "On the bridge",
                "category": "vandalism"
            }))
            .await
            .assert_status(StatusCode::CREATED);

        let at_origin: Vec<Value> = server
            .get("/api/issues")
            .add_query_param("lat", "0")
            .add_query_param("lng", "0")
            .await
            .json();
        assert_eq!(at_origin.len(), 1);
        assert_eq!(at_origin[0]["latitude"], 0.0);
        assert_eq!(at_origin[0]["longitude"], 0.0);
    }

    #[tokio::test]
    async fn test_create_without_coordinates_rejected_by_policy() {
        let mut config = test_config();
        config.issues.missing_location = MissingLocationPolicy::Reject;
        let server = test_server(config);

        let response = server
            .post("/api/issues")
            .json(&json!({
                "title": "Graffiti",
                "description": "On the bridge",
                "category": "vandalism"
            }))
            .await;

        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.json::<Value>()["error"],
            "Latitude and longitude are required"
        );
    }

    #[tokio::test]
    async fn test_create_malformed_json() {
        let server = test_server(test_config());

        let response = server
            .post("/api/issues")
            .bytes(axum::body::Bytes::from_static(b"{\"title\": "))
            .content_type("application/json")
            .await;

        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<Value>()["error"], "Invalid JSON syntax");
    }

    #[tokio::test]
    async fn test_unmatched_route() {
        let server = test_server(test_config());

        let response = server.get("/api/does-not-exist").await;

        assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(response.json::<Value>(), json!({ "error": "Not found" }));
    }

    #[tokio::test]
    async fn test_store_failure_is_opaque() {
        let server = test_server_with_store(
            test_config(),
            std::sync::Arc::new(crate::shared::test_helpers::FailingIssueStore),
        );

        let listed = server
            .get("/api/issues")
            .add_query_param("lat", "0")
            .add_query_param("lng", "0")
            .await;
        assert_eq!(listed.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            listed.json::<Value>(),
            json!({ "error": "Internal server error" })
        );

        let created = server
            .post("/api/issues")
            .json(&json!({
                "title": "Pothole",
                "description": "Large pothole",
                "category": "roads"
            }))
            .await;
        assert_eq!(created.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            created.json::<Value>(),
            json!({ "error": "Internal server error" })
        );
    }

    #[tokio::test]
    async fn test_home_page_renders() {
        let server = test_server(test_config());

        let response = server.get("/").await;

        assert_eq!(response.status_code(), StatusCode::OK);
        assert!(response.text().contains("12.9716"));
    }

    #[tokio::test]
    async fn test_health_and_openapi() {
        let server = test_server(test_config());

        server.get("/health").await.assert_status_ok();

        let doc: Value = server.get("/api-docs/openapi.json").await.json();
        assert!(doc["paths"]["/api/issues"]["get"].is_object());
        assert!(doc["paths"]["/api/issues"]["post"].is_object());
    }

    #[tokio::test]
    async fn test_static_assets() {
        let server = test_server(test_config());

        server.get("/static/css/style.css").await.assert_status_ok();

        let missing = server.get("/static/css/missing.css").await;
        assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(missing.json::<Value>(), json!({ "error": "Not found" }));
    }

    #[tokio::test]
    async fn test_request_id_is_propagated() {
        let server = test_server(test_config());

        let response = server.get("/health").await;

        assert!(response.headers().contains_key("x-request-id"));
    }
}

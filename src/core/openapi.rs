use utoipa::{Modify, OpenApi};

use crate::features::issues::{dtos as issues_dtos, handlers as issues_handlers};
use crate::shared::geo::GeoPoint;
use crate::shared::types::ErrorResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        issues_handlers::issue_handler::list_issues,
        issues_handlers::issue_handler::create_issue,
    ),
    components(
        schemas(
            // Shared
            ErrorResponse,
            GeoPoint,
            // Issues
            issues_dtos::CreateIssueDto,
            issues_dtos::CreateIssueResponseDto,
            issues_dtos::IssueResponseDto,
        )
    ),
    tags(
        (name = "issues", description = "Location-tagged civic issues"),
    ),
    info(
        title = "CivicTrack API",
        version = "0.1.0",
        description = "Report and browse civic issues near a location",
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}

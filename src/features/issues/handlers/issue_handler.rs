use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};

use crate::core::error::Result;
use crate::core::extractor::{AppJson, AppQuery};
use crate::features::issues::dtos::{
    CreateIssueDto, CreateIssueResponseDto, IssueResponseDto, ListIssuesQuery,
};
use crate::features::issues::services::IssueService;
use crate::shared::constants::MSG_ISSUE_CREATED;
use crate::shared::types::ErrorResponse;

/// List issues near a point
///
/// Returns every issue within `radius` kilometers of (`lat`, `lng`),
/// optionally narrowed to an exact `status` and/or `category`. When a key is
/// repeated the first value wins.
#[utoipa::path(
    get,
    path = "/api/issues",
    params(ListIssuesQuery),
    responses(
        (status = 200, description = "Issues within the radius", body = Vec<IssueResponseDto>),
        (status = 400, description = "Latitude and longitude are required", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "issues"
)]
pub async fn list_issues(
    State(service): State<Arc<IssueService>>,
    AppQuery(pairs): AppQuery<Vec<(String, String)>>,
) -> Result<Json<Vec<IssueResponseDto>>> {
    let issues = service
        .find_near(ListIssuesQuery::from_pairs(pairs))
        .await?;
    Ok(Json(issues.into_iter().map(IssueResponseDto::from).collect()))
}

/// Report a new issue
#[utoipa::path(
    post,
    path = "/api/issues",
    request_body = CreateIssueDto,
    responses(
        (status = 201, description = "Issue created", body = CreateIssueResponseDto),
        (status = 400, description = "Missing or empty fields", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "issues"
)]
pub async fn create_issue(
    State(service): State<Arc<IssueService>>,
    AppJson(dto): AppJson<CreateIssueDto>,
) -> Result<(StatusCode, Json<CreateIssueResponseDto>)> {
    let issue = service.create(dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(CreateIssueResponseDto {
            id: issue.id,
            message: MSG_ISSUE_CREATED.to_string(),
        }),
    ))
}

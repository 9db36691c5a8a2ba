use std::sync::Arc;

use validator::Validate;

use crate::core::config::{IssueConfig, MissingLocationPolicy};
use crate::core::error::{AppError, Result};
use crate::features::issues::dtos::{CreateIssueDto, ListIssuesQuery};
use crate::features::issues::models::{Issue, NearbyQuery, NewIssue};
use crate::features::issues::stores::IssueStore;
use crate::shared::constants::{
    DEFAULT_ISSUE_STATUS, MSG_COORDINATES_REQUIRED, MSG_EMPTY_CATEGORY,
    MSG_EMPTY_TITLE_OR_DESCRIPTION, MSG_MISSING_FIELDS,
};
use crate::shared::geo::{is_valid_latitude, is_valid_longitude, km_to_meters, GeoPoint};
use crate::shared::validation::first_message;

const MSG_LATITUDE_RANGE: &str = "Latitude must be between -90 and 90";
const MSG_LONGITUDE_RANGE: &str = "Longitude must be between -180 and 180";
const MSG_NEGATIVE_RADIUS: &str = "Radius must not be negative";
const MSG_PARTIAL_COORDINATES: &str = "Latitude and longitude must be provided together";

/// Service for reporting and finding issues
pub struct IssueService {
    store: Arc<dyn IssueStore>,
    config: IssueConfig,
}

impl IssueService {
    pub fn new(store: Arc<dyn IssueStore>, config: IssueConfig) -> Self {
        Self { store, config }
    }

    pub fn default_radius_km(&self) -> f64 {
        self.config.default_radius_km
    }

    /// List issues around a point. Validation happens before the store is touched.
    pub async fn find_near(&self, params: ListIssuesQuery) -> Result<Vec<Issue>> {
        let query = parse_nearby_query(params, self.config.default_radius_km)?;

        let issues = self.store.find_near(&query).await?;

        tracing::debug!(
            "Found {} issues within {}m of ({}, {})",
            issues.len(),
            query.radius_meters,
            query.center.latitude,
            query.center.longitude
        );

        Ok(issues)
    }

    /// Report a new issue
    pub async fn create(&self, dto: CreateIssueDto) -> Result<Issue> {
        let new_issue = prepare_new_issue(dto, self.config.missing_location)?;

        let issue = self.store.create(&new_issue).await?;

        tracing::info!(
            "Issue created: id={}, category={}, located={}",
            issue.id,
            issue.category,
            issue.location().is_some()
        );

        Ok(issue)
    }
}

/// Parse a query-string value as a finite float; anything else counts as absent
fn parse_float(raw: Option<&str>) -> Option<f64> {
    raw.and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

/// Empty filter values mean "no filter"
fn non_empty(raw: Option<String>) -> Option<String> {
    raw.filter(|s| !s.is_empty())
}

fn validate_point(point: &GeoPoint) -> Result<()> {
    if !is_valid_latitude(point.latitude) {
        return Err(AppError::Validation(MSG_LATITUDE_RANGE.to_string()));
    }
    if !is_valid_longitude(point.longitude) {
        return Err(AppError::Validation(MSG_LONGITUDE_RANGE.to_string()));
    }
    Ok(())
}

pub(crate) fn parse_nearby_query(
    params: ListIssuesQuery,
    default_radius_km: f64,
) -> Result<NearbyQuery> {
    let (Some(latitude), Some(longitude)) = (
        parse_float(params.lat.as_deref()),
        parse_float(params.lng.as_deref()),
    ) else {
        return Err(AppError::Validation(MSG_COORDINATES_REQUIRED.to_string()));
    };

    let center = GeoPoint::new(longitude, latitude);
    validate_point(&center)?;

    let radius_km = parse_float(params.radius.as_deref()).unwrap_or(default_radius_km);
    if radius_km < 0.0 {
        return Err(AppError::Validation(MSG_NEGATIVE_RADIUS.to_string()));
    }

    Ok(NearbyQuery {
        center,
        radius_meters: km_to_meters(radius_km),
        status: non_empty(params.status),
        category: non_empty(params.category),
    })
}

fn resolve_location(
    latitude: Option<f64>,
    longitude: Option<f64>,
    policy: MissingLocationPolicy,
) -> Result<Option<GeoPoint>> {
    let location = match (latitude, longitude, policy) {
        (Some(lat), Some(lng), _) => Some(GeoPoint::new(lng, lat)),
        (lat, lng, MissingLocationPolicy::Origin) => {
            let origin = GeoPoint::origin();
            Some(GeoPoint::new(
                lng.unwrap_or(origin.longitude),
                lat.unwrap_or(origin.latitude),
            ))
        }
        (None, None, MissingLocationPolicy::Null) => None,
        (_, _, MissingLocationPolicy::Null) => {
            return Err(AppError::Validation(MSG_PARTIAL_COORDINATES.to_string()));
        }
        (_, _, MissingLocationPolicy::Reject) => {
            return Err(AppError::Validation(MSG_COORDINATES_REQUIRED.to_string()));
        }
    };

    if let Some(point) = &location {
        validate_point(point)?;
    }

    Ok(location)
}

pub(crate) fn prepare_new_issue(
    dto: CreateIssueDto,
    policy: MissingLocationPolicy,
) -> Result<NewIssue> {
    let (Some(title), Some(description), Some(category)) =
        (dto.title, dto.description, dto.category)
    else {
        return Err(AppError::Validation(MSG_MISSING_FIELDS.to_string()));
    };

    let title = title.trim();
    let description = description.trim();
    let category = category.trim();

    if title.is_empty() || description.is_empty() {
        return Err(AppError::Validation(MSG_EMPTY_TITLE_OR_DESCRIPTION.to_string()));
    }
    if category.is_empty() {
        return Err(AppError::Validation(MSG_EMPTY_CATEGORY.to_string()));
    }

    let mut new_issue = NewIssue {
        title: title.to_string(),
        description: description.to_string(),
        category: category.to_string(),
        location: None,
        status: DEFAULT_ISSUE_STATUS.to_string(),
    };

    // Length limits are reported before anything about the coordinates
    new_issue
        .validate()
        .map_err(|e| AppError::Validation(first_message(&e)))?;

    new_issue.location = resolve_location(dto.latitude, dto.longitude, policy)?;

    Ok(new_issue)
}

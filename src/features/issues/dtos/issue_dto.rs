use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::features::issues::models::Issue;

/// Query params for the nearby search
///
/// Values are kept as raw strings: a non-numeric `lat`/`lng` must surface as
/// "missing" and a non-numeric `radius` falls back to the default, neither of
/// which should fail extraction.
#[derive(Debug, Clone, Default, PartialEq, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListIssuesQuery {
    /// Latitude of the search centre (required)
    #[param(value_type = Option<f64>, example = 12.9716)]
    pub lat: Option<String>,

    /// Longitude of the search centre (required)
    #[param(value_type = Option<f64>, example = 77.5946)]
    pub lng: Option<String>,

    /// Search radius in kilometers (default: 5)
    #[param(value_type = Option<f64>, example = 5)]
    pub radius: Option<String>,

    /// Only return issues with exactly this status
    pub status: Option<String>,

    /// Only return issues with exactly this category
    pub category: Option<String>,
}

impl ListIssuesQuery {
    /// Collect the known keys from raw query pairs. A repeated key keeps its
    /// first value, unknown keys are ignored.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut query = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "lat" => &mut query.lat,
                "lng" => &mut query.lng,
                "radius" => &mut query.radius,
                "status" => &mut query.status,
                "category" => &mut query.category,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        query
    }
}

/// Request DTO for reporting an issue
///
/// Every field is optional at the serde level so a missing field is reported
/// as a validation error rather than a JSON rejection.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct CreateIssueDto {
    #[schema(example = "Pothole")]
    pub title: Option<String>,

    #[schema(example = "Large pothole")]
    pub description: Option<String>,

    #[schema(example = "roads")]
    pub category: Option<String>,

    #[schema(example = 12.9716)]
    pub latitude: Option<f64>,

    #[schema(example = 77.5946)]
    pub longitude: Option<f64>,
}

/// Response DTO for issue
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct IssueResponseDto {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub category: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Issue> for IssueResponseDto {
    fn from(i: Issue) -> Self {
        Self {
            id: i.id,
            title: i.title,
            description: i.description,
            category: i.category,
            latitude: i.latitude,
            longitude: i.longitude,
            status: i.status,
            created_at: i.created_at,
            updated_at: i.updated_at,
        }
    }
}

/// Response DTO returned after an issue is created
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateIssueResponseDto {
    pub id: i64,
    #[schema(example = "Issue created successfully")]
    pub message: String,
}

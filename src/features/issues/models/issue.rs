use chrono::{DateTime, Utc};
use sqlx::FromRow;
use validator::Validate;

use crate::shared::geo::GeoPoint;

/// Database model for issue
///
/// `latitude`/`longitude` are read back from the geography column and are
/// both `None` when the issue was stored without a location.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Issue {
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

impl Issue {
    pub fn location(&self) -> Option<GeoPoint> {
        match (self.longitude, self.latitude) {
            (Some(longitude), Some(latitude)) => Some(GeoPoint::new(longitude, latitude)),
            _ => None,
        }
    }
}

/// Data for creating a new issue, already trimmed
#[derive(Debug, Clone, Validate)]
pub struct NewIssue {
    #[validate(length(max = 200, message = "Title must not exceed 200 characters"))]
    pub title: String,
    pub description: String,
    #[validate(length(max = 50, message = "Category must not exceed 50 characters"))]
    pub category: String,
    pub location: Option<GeoPoint>,
    #[validate(length(max = 20, message = "Status must not exceed 20 characters"))]
    pub status: String,
}

/// Parameters of a within-radius search
#[derive(Debug, Clone, PartialEq)]
pub struct NearbyQuery {
    pub center: GeoPoint,
    pub radius_meters: f64,
    pub status: Option<String>,
    pub category: Option<String>,
}

impl NearbyQuery {
    /// Exact-match filters only; the distance check is left to the store
    pub fn matches_filters(&self, issue: &Issue) -> bool {
        self.status.as_deref().map_or(true, |s| issue.status == s)
            && self.category.as_deref().map_or(true, |c| issue.category == c)
    }
}

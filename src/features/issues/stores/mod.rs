//! Persistence for issues.
//!
//! `IssueStore` is the seam between the service and the database. The
//! Postgres store answers radius queries with PostGIS geography functions,
//! the reference store keeps everything in memory and computes haversine
//! distances itself.

mod postgres;
mod reference;

use async_trait::async_trait;

use crate::core::error::Result;
use crate::features::issues::models::{Issue, NearbyQuery, NewIssue};

pub use postgres::PgIssueStore;
pub use reference::ReferenceIssueStore;

#[async_trait]
pub trait IssueStore: Send + Sync {
    /// Create the issues table and its indexes when they are missing
    async fn ensure_schema(&self) -> Result<()>;

    /// Issues within `query.radius_meters` of `query.center` that match the filters
    async fn find_near(&self, query: &NearbyQuery) -> Result<Vec<Issue>>;

    /// Persist a new issue, assigning its id and timestamps
    async fn create(&self, issue: &NewIssue) -> Result<Issue>;

    /// Insert `issue` only when the store holds no issues at all
    async fn seed_if_empty(&self, issue: &NewIssue) -> Result<Option<Issue>>;

    /// Number of stored issues
    async fn count(&self) -> Result<i64>;
}

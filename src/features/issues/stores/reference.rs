use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use crate::core::error::Result;
use crate::features::issues::models::{Issue, NearbyQuery, NewIssue};

use super::IssueStore;

/// In-memory issue store
///
/// Distances use the haversine formula on a sphere, so results can differ
/// from PostGIS (which measures on the spheroid) by up to about 0.6% right at
/// the edge of the radius.
#[derive(Default)]
pub struct ReferenceIssueStore {
    state: Mutex<ReferenceState>,
}

#[derive(Default)]
struct ReferenceState {
    issues: BTreeMap<i64, Issue>,
    last_id: i64,
}

impl ReferenceState {
    fn insert(&mut self, issue: &NewIssue) -> Issue {
        self.last_id += 1;
        let now = Utc::now();

        let created = Issue {
            id: self.last_id,
            title: issue.title.clone(),
            description: issue.description.clone(),
            category: issue.category.clone(),
            latitude: issue.location.map(|p| p.latitude),
            longitude: issue.location.map(|p| p.longitude),
            status: issue.status.clone(),
            created_at: now,
            updated_at: now,
        };

        self.issues.insert(created.id, created.clone());
        created
    }
}

impl ReferenceIssueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl IssueStore for ReferenceIssueStore {
    async fn ensure_schema(&self) -> Result<()> {
        Ok(())
    }

    async fn find_near(&self, query: &NearbyQuery) -> Result<Vec<Issue>> {
        let state = self.state.lock().await;
        Ok(state
            .issues
            .values()
            .filter(|issue| {
                issue
                    .location()
                    .is_some_and(|p| p.is_within(&query.center, query.radius_meters))
            })
            .filter(|issue| query.matches_filters(issue))
            .cloned()
            .collect())
    }

    async fn create(&self, issue: &NewIssue) -> Result<Issue> {
        let mut state = self.state.lock().await;
        Ok(state.insert(issue))
    }

    async fn seed_if_empty(&self, issue: &NewIssue) -> Result<Option<Issue>> {
        let mut state = self.state.lock().await;
        if state.issues.is_empty() {
            Ok(Some(state.insert(issue)))
        } else {
            Ok(None)
        }
    }

    async fn count(&self) -> Result<i64> {
        let state = self.state.lock().await;
        Ok(state.issues.len() as i64)
    }
}

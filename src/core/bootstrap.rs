//! One-time startup work that must finish before the listener is bound.

use crate::core::error::Result;
use crate::features::issues::models::{Issue, NewIssue};
use crate::features::issues::IssueStore;
use crate::shared::constants::DEFAULT_ISSUE_STATUS;
use crate::shared::geo::GeoPoint;

/// The record inserted into an empty store
pub fn sample_issue() -> NewIssue {
    NewIssue {
        title: "Sample Issue".to_string(),
        description: "This is a sample issue".to_string(),
        category: "roads".to_string(),
        location: Some(GeoPoint::new(77.5946, 12.9716)),
        status: DEFAULT_ISSUE_STATUS.to_string(),
    }
}

/// Make sure the issue schema exists and, when `seed` is set, that an empty
/// store gets the sample issue. Returns the seeded issue if one was inserted.
pub async fn ensure_schema_and_seed(store: &dyn IssueStore, seed: bool) -> Result<Option<Issue>> {
    tracing::info!("Ensuring issue schema...");
    store.ensure_schema().await?;
    tracing::info!("Issue schema ready");

    if !seed {
        tracing::info!("Sample data seeding disabled");
        return Ok(None);
    }

    let seeded = store.seed_if_empty(&sample_issue()).await?;
    match &seeded {
        Some(issue) => tracing::info!("Store was empty, seeded sample issue id={}", issue.id),
        None => tracing::info!(
            "Store already holds {} issues, skipping seed",
            store.count().await?
        ),
    }

    Ok(seeded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::issues::ReferenceIssueStore;

    #[tokio::test]
    async fn test_seeds_empty_store_once() {
        let store = ReferenceIssueStore::new();

        let first = ensure_schema_and_seed(&store, true).await.unwrap();
        let second = ensure_schema_and_seed(&store, true).await.unwrap();

        let seeded = first.expect("empty store should be seeded");
        assert_eq!(seeded.title, "Sample Issue");
        assert_eq!(seeded.category, "roads");
        assert_eq!(seeded.status, "reported");
        assert_eq!(seeded.location(), Some(GeoPoint::new(77.5946, 12.9716)));
        assert!(second.is_none());
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_does_not_seed_non_empty_store() {
        let store = ReferenceIssueStore::new();
        let mut existing = sample_issue();
        existing.title = "Broken streetlight".to_string();
        store.create(&existing).await.unwrap();

        let seeded = ensure_schema_and_seed(&store, true).await.unwrap();

        assert!(seeded.is_none());
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_seed_disabled() {
        let store = ReferenceIssueStore::new();

        let seeded = ensure_schema_and_seed(&store, false).await.unwrap();

        assert!(seeded.is_none());
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_store_failure_aborts_bootstrap() {
        let store = crate::shared::test_helpers::FailingIssueStore;

        let result = ensure_schema_and_seed(&store, true).await;

        assert!(result.is_err());
    }
}

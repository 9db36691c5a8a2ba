use async_trait::async_trait;
use sqlx::PgPool;

use crate::core::error::{AppError, Result};
use crate::features::issues::models::{Issue, NearbyQuery, NewIssue};

use super::IssueStore;

/// Key for the advisory lock serialising the seed check across instances
const SEED_LOCK_KEY: i64 = 0x6369_7669_6373_6564;

/// Issue store backed by Postgres + PostGIS
pub struct PgIssueStore {
    pool: PgPool,
}

impl PgIssueStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl IssueStore for PgIssueStore {
    async fn ensure_schema(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to apply issue schema migrations: {:?}", e);
                AppError::Migration(e)
            })
    }

    async fn find_near(&self, query: &NearbyQuery) -> Result<Vec<Issue>> {
        sqlx::query_as::<_, Issue>(
            r#"
            SELECT
                id, title, description, category,
                ST_Y(location::geometry) AS latitude,
                ST_X(location::geometry) AS longitude,
                status, created_at, updated_at
            FROM issues
            WHERE location IS NOT NULL
              AND ST_DWithin(
                    location,
                    ST_SetSRID(ST_MakePoint($1, $2), 4326)::geography,
                    $3
                  )
              AND ($4::text IS NULL OR status = $4)
              AND ($5::text IS NULL OR category = $5)
            ORDER BY id
            "#,
        )
        .bind(query.center.longitude)
        .bind(query.center.latitude)
        .bind(query.radius_meters)
        .bind(query.status.as_deref())
        .bind(query.category.as_deref())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to find nearby issues: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn create(&self, issue: &NewIssue) -> Result<Issue> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            tracing::error!("Failed to begin transaction: {:?}", e);
            AppError::Database(e)
        })?;

        let created = sqlx::query_as::<_, Issue>(
            r#"
            INSERT INTO issues (title, description, category, location, status)
            VALUES (
                $1, $2, $3,
                CASE
                    WHEN $4::float8 IS NULL OR $5::float8 IS NULL THEN NULL
                    ELSE ST_SetSRID(ST_MakePoint($4, $5), 4326)::geography
                END,
                $6
            )
            RETURNING
                id, title, description, category,
                ST_Y(location::geometry) AS latitude,
                ST_X(location::geometry) AS longitude,
                status, created_at, updated_at
            "#,
        )
        .bind(&issue.title)
        .bind(&issue.description)
        .bind(&issue.category)
        .bind(issue.location.map(|p| p.longitude))
        .bind(issue.location.map(|p| p.latitude))
        .bind(&issue.status)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            // Dropping `tx` without commit rolls the insert back
            tracing::error!("Failed to create issue: {:?}", e);
            AppError::Database(e)
        })?;

        tx.commit().await.map_err(|e| {
            tracing::error!("Failed to commit issue: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(created)
    }

    async fn seed_if_empty(&self, issue: &NewIssue) -> Result<Option<Issue>> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(SEED_LOCK_KEY)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                tracing::error!("Failed to acquire seed lock: {:?}", e);
                AppError::Database(e)
            })?;

        let seeded = sqlx::query_as::<_, Issue>(
            r#"
            INSERT INTO issues (title, description, category, location, status)
            SELECT
                $1, $2, $3,
                CASE
                    WHEN $4::float8 IS NULL OR $5::float8 IS NULL THEN NULL
                    ELSE ST_SetSRID(ST_MakePoint($4, $5), 4326)::geography
                END,
                $6
            WHERE NOT EXISTS (SELECT 1 FROM issues)
            RETURNING
                id, title, description, category,
                ST_Y(location::geometry) AS latitude,
                ST_X(location::geometry) AS longitude,
                status, created_at, updated_at
            "#,
        )
        .bind(&issue.title)
        .bind(&issue.description)
        .bind(&issue.category)
        .bind(issue.location.map(|p| p.longitude))
        .bind(issue.location.map(|p| p.latitude))
        .bind(&issue.status)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to seed issues: {:?}", e);
            AppError::Database(e)
        })?;

        tx.commit().await.map_err(AppError::Database)?;

        Ok(seeded)
    }

    async fn count(&self) -> Result<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM issues")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to count issues: {:?}", e);
                AppError::Database(e)
            })
    }
}

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::Result;
use crate::models::job::{Job, JobChanges, NewJob};
use crate::models::job_filter::JobFilter;

/// Persistence for the `jobs` table.
///
/// Every method touches at most one row; implementations only need
/// single-row atomicity.
#[async_trait]
pub trait JobStore: Send + Sync {
    async fn list(&self, filter: &JobFilter) -> Result<Vec<Job>>;

    async fn get(&self, id: Uuid) -> Result<Option<Job>>;

    /// Inserts a new row with `created_at = updated_at = now`.
    async fn insert(&self, id: Uuid, job: NewJob, now: DateTime<Utc>) -> Result<Job>;

    /// Returns `None` when no row has this id.
    async fn update(&self, id: Uuid, changes: JobChanges, now: DateTime<Utc>) -> Result<Option<Job>>;

    /// Returns `false` when no row has this id.
    async fn delete(&self, id: Uuid) -> Result<bool>;
}

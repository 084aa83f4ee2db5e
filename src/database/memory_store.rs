use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::database::job_store::JobStore;
use crate::error::{Error, Result};
use crate::models::job::{Job, JobChanges, NewJob};
use crate::models::job_filter::JobFilter;

/// Process-local store with the same semantics as the Postgres one.
/// Used by tests and `STORE_BACKEND=memory`.
#[derive(Default)]
pub struct MemoryJobStore {
    jobs: RwLock<HashMap<Uuid, Job>>,
}

impl MemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(_: T) -> Error {
    Error::Internal("job store lock poisoned".to_string())
}

#[async_trait]
impl JobStore for MemoryJobStore {
    async fn list(&self, filter: &JobFilter) -> Result<Vec<Job>> {
        let jobs = self.jobs.read().map_err(poisoned)?;
        Ok(filter.apply(jobs.values()))
    }

    async fn get(&self, id: Uuid) -> Result<Option<Job>> {
        let jobs = self.jobs.read().map_err(poisoned)?;
        Ok(jobs.get(&id).cloned())
    }

    async fn insert(&self, id: Uuid, job: NewJob, now: DateTime<Utc>) -> Result<Job> {
        let record = Job {
            id,
            company: job.company,
            role: job.role,
            status: job.status,
            location: job.location,
            url: job.url,
            salary: job.salary,
            notes: job.notes,
            next_action: job.next_action,
            next_action_at: job.next_action_at,
            created_at: now,
            updated_at: now,
        };
        let mut jobs = self.jobs.write().map_err(poisoned)?;
        if jobs.contains_key(&id) {
            return Err(Error::Internal(format!("duplicate job id {}", id)));
        }
        jobs.insert(id, record.clone());
        Ok(record)
    }

    async fn update(&self, id: Uuid, changes: JobChanges, now: DateTime<Utc>) -> Result<Option<Job>> {
        let mut jobs = self.jobs.write().map_err(poisoned)?;
        let Some(job) = jobs.get_mut(&id) else {
            return Ok(None);
        };
        let stamp = now.max(job.updated_at);
        changes.apply(job, stamp);
        Ok(Some(job.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let mut jobs = self.jobs.write().map_err(poisoned)?;
        Ok(jobs.remove(&id).is_some())
    }
}

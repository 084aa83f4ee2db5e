use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use crate::database::JobStore;
use crate::dto::job_dto::{
    CreateJobPayload, UpdateJobPayload, MAX_NAME_LEN, MAX_NEXT_ACTION_LEN, MAX_NOTES_LEN,
    MAX_URL_LEN,
};
use crate::dto::patch::Patch;
use crate::error::{Error, Result};
use crate::models::job::{Job, JobChanges, JobStatus, NewJob};
use crate::models::job_filter::JobFilter;
use crate::utils::time::{now, parse_flexible};
use crate::utils::validation::{field_error, FieldChecks};

#[derive(Clone)]
pub struct JobService {
    store: Arc<dyn JobStore>,
}

impl JobService {
    pub fn new(store: Arc<dyn JobStore>) -> Self {
        Self { store }
    }

    pub async fn list(&self, filter: JobFilter) -> Result<Vec<Job>> {
        let jobs = self.store.list(&filter).await?;
        tracing::debug!(
            q = filter.q.as_deref().unwrap_or(""),
            status = filter.status.map(|s| s.as_str()).unwrap_or("all"),
            sort = %filter.sort,
            count = jobs.len(),
            "Listed jobs"
        );
        Ok(jobs)
    }

    pub async fn get(&self, id: Uuid) -> Result<Job> {
        self.store.get(id).await?.ok_or_else(|| not_found(id))
    }

    pub async fn create(&self, payload: CreateJobPayload) -> Result<Job> {
        let payload = payload.normalized();
        payload.validate()?;

        let status = payload
            .status
            .as_deref()
            .and_then(|s| s.parse::<JobStatus>().ok())
            .unwrap_or_default();
        let next_action_at = match payload.next_action_at.as_deref() {
            Some(raw) => Some(parse_next_action_at(raw)?),
            None => None,
        };

        let new_job = NewJob {
            company: payload.company,
            role: payload.role,
            status,
            location: payload.location,
            url: payload.url,
            salary: payload.salary,
            notes: payload.notes,
            next_action: payload.next_action,
            next_action_at,
        };

        let job = self.store.insert(Uuid::new_v4(), new_job, now()).await?;
        tracing::info!(job_id = %job.id, company = %job.company, status = %job.status, "Job created");
        Ok(job)
    }

    pub async fn update(&self, id: Uuid, payload: UpdateJobPayload) -> Result<Job> {
        let changes = resolve_changes(id, payload)?;
        let job = self
            .store
            .update(id, changes, now())
            .await?
            .ok_or_else(|| not_found(id))?;
        tracing::info!(job_id = %job.id, status = %job.status, "Job updated");
        Ok(job)
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        if !self.store.delete(id).await? {
            return Err(not_found(id));
        }
        tracing::info!(job_id = %id, "Job deleted");
        Ok(())
    }
}

fn not_found(id: Uuid) -> Error {
    Error::NotFound(format!("Job {} not found", id))
}

fn parse_next_action_at(raw: &str) -> Result<DateTime<Utc>> {
    parse_flexible(raw).map_err(|e| {
        let mut errors = ValidationErrors::new();
        errors.add("nextActionAt", field_error("datetime", e.to_string()));
        Error::Validation(errors)
    })
}

/// Turns a tri-state body into typed column changes, rejecting updates
/// that would blank a required field.
fn resolve_changes(id: Uuid, payload: UpdateJobPayload) -> Result<JobChanges> {
    let mut checks = FieldChecks::new();

    let company = required_change("company", payload.company.trimmed(), &mut checks);
    let role = required_change("role", payload.role.trimmed(), &mut checks);

    let status = match payload.status.trimmed() {
        Patch::Value(raw) => match raw.parse::<JobStatus>() {
            Ok(status) => Some(status),
            Err(_) => {
                tracing::warn!(job_id = %id, status = %raw, "Ignoring unrecognized status on update");
                None
            }
        },
        Patch::Null => {
            tracing::warn!(job_id = %id, "Ignoring null status on update");
            None
        }
        Patch::Absent => None,
    };

    let location = payload.location.trimmed();
    let url = payload.url.trimmed();
    let salary = payload.salary.trimmed();
    let notes = payload.notes.trimmed();
    let next_action = payload.next_action.trimmed();

    checks.max_len("company", company.as_deref(), MAX_NAME_LEN);
    checks.max_len("role", role.as_deref(), MAX_NAME_LEN);
    checks.max_len("location", patch_str(&location), MAX_NAME_LEN);
    checks.max_len("url", patch_str(&url), MAX_URL_LEN);
    checks.max_len("salary", patch_str(&salary), MAX_NAME_LEN);
    checks.max_len("notes", patch_str(&notes), MAX_NOTES_LEN);
    checks.max_len("nextAction", patch_str(&next_action), MAX_NEXT_ACTION_LEN);

    let next_action_at = match payload.next_action_at.trimmed() {
        Patch::Value(raw) => match parse_flexible(&raw) {
            Ok(dt) => Patch::Value(dt),
            Err(e) => {
                checks.add("nextActionAt", field_error("datetime", e.to_string()));
                Patch::Absent
            }
        },
        Patch::Null => Patch::Null,
        Patch::Absent => Patch::Absent,
    };

    checks.finish()?;

    Ok(JobChanges {
        company,
        role,
        status,
        location: location.into_change(),
        url: url.into_change(),
        salary: salary.into_change(),
        notes: notes.into_change(),
        next_action: next_action.into_change(),
        next_action_at: next_action_at.into_change(),
    })
}

fn required_change(
    field: &'static str,
    value: Patch<String>,
    checks: &mut FieldChecks,
) -> Option<String> {
    match value {
        Patch::Value(v) => Some(v),
        Patch::Null => {
            checks.add(field, field_error("required", format!("{} cannot be empty", field)));
            None
        }
        Patch::Absent => None,
    }
}

fn patch_str(value: &Patch<String>) -> Option<&str> {
    match value {
        Patch::Value(v) => Some(v.as_str()),
        _ => None,
    }
}

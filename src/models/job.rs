use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Pipeline stage of a job application. Each variant is one board column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum JobStatus {
    #[default]
    Saved,
    Applied,
    Interview,
    Offer,
    Rejected,
}

impl JobStatus {
    /// Board order, left to right.
    pub const ALL: [JobStatus; 5] = [
        JobStatus::Saved,
        JobStatus::Applied,
        JobStatus::Interview,
        JobStatus::Offer,
        JobStatus::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Saved => "SAVED",
            JobStatus::Applied => "APPLIED",
            JobStatus::Interview => "INTERVIEW",
            JobStatus::Offer => "OFFER",
            JobStatus::Rejected => "REJECTED",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            JobStatus::Saved => "Saved",
            JobStatus::Applied => "Applied",
            JobStatus::Interview => "Interview",
            JobStatus::Offer => "Offer",
            JobStatus::Rejected => "Rejected",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown job status '{0}'")]
pub struct UnknownStatus(pub String);

/// Exact wire form only (`"OFFER"`, not `"offer"`).
impl FromStr for JobStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        JobStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == wanted)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

impl JobStatus {
    /// Case-insensitive match, as accepted by the list filter.
    pub fn parse_loose(s: &str) -> Option<Self> {
        s.trim().to_ascii_uppercase().parse().ok()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: Uuid,
    pub company: String,
    pub role: String,
    pub status: JobStatus,
    pub location: Option<String>,
    pub url: Option<String>,
    pub salary: Option<String>,
    pub notes: Option<String>,
    pub next_action: Option<String>,
    pub next_action_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Raw `jobs` row as stored; `status` is kept as text in the table.
#[derive(Debug, Clone, FromRow)]
pub struct JobRow {
    pub id: Uuid,
    pub company: String,
    pub role: String,
    pub status: String,
    pub location: Option<String>,
    pub url: Option<String>,
    pub salary: Option<String>,
    pub notes: Option<String>,
    pub next_action: Option<String>,
    pub next_action_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<JobRow> for Job {
    type Error = UnknownStatus;

    fn try_from(row: JobRow) -> Result<Self, Self::Error> {
        Ok(Self {
            status: row.status.parse()?,
            id: row.id,
            company: row.company,
            role: row.role,
            location: row.location,
            url: row.url,
            salary: row.salary,
            notes: row.notes,
            next_action: row.next_action,
            next_action_at: row.next_action_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Validated, normalized input for inserting a job.
#[derive(Debug, Clone, PartialEq)]
pub struct NewJob {
    pub company: String,
    pub role: String,
    pub status: JobStatus,
    pub location: Option<String>,
    pub url: Option<String>,
    pub salary: Option<String>,
    pub notes: Option<String>,
    pub next_action: Option<String>,
    pub next_action_at: Option<DateTime<Utc>>,
}

/// Validated partial update. Outer `None` means "leave untouched";
/// `Some(None)` clears a nullable column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobChanges {
    pub company: Option<String>,
    pub role: Option<String>,
    pub status: Option<JobStatus>,
    pub location: Option<Option<String>>,
    pub url: Option<Option<String>>,
    pub salary: Option<Option<String>>,
    pub notes: Option<Option<String>>,
    pub next_action: Option<Option<String>>,
    pub next_action_at: Option<Option<DateTime<Utc>>>,
}

impl JobChanges {
    /// Applies the changes to an in-memory record and stamps `updated_at`.
    pub fn apply(self, job: &mut Job, updated_at: DateTime<Utc>) {
        if let Some(company) = self.company {
            job.company = company;
        }
        if let Some(role) = self.role {
            job.role = role;
        }
        if let Some(status) = self.status {
            job.status = status;
        }
        if let Some(location) = self.location {
            job.location = location;
        }
        if let Some(url) = self.url {
            job.url = url;
        }
        if let Some(salary) = self.salary {
            job.salary = salary;
        }
        if let Some(notes) = self.notes {
            job.notes = notes;
        }
        if let Some(next_action) = self.next_action {
            job.next_action = next_action;
        }
        if let Some(next_action_at) = self.next_action_at {
            job.next_action_at = next_action_at;
        }
        job.updated_at = updated_at;
    }
}

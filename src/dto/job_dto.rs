use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value as JsonValue;
use validator::Validate;

use crate::dto::patch::Patch;
use crate::models::job::{Job, JobStatus};
use crate::models::job_filter::{JobFilter, SortKey};
use crate::utils::validation::normalize_text;

pub const MAX_NAME_LEN: usize = 200;
pub const MAX_URL_LEN: usize = 2048;
pub const MAX_NEXT_ACTION_LEN: usize = 500;
pub const MAX_NOTES_LEN: usize = 10_000;

/// A `status` of the wrong JSON type is kept as text so the service can
/// treat it like any other unrecognized stage instead of failing the body.
fn status_text(value: JsonValue) -> String {
    match value {
        JsonValue::String(s) => s,
        other => other.to_string(),
    }
}

fn lenient_status<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<JsonValue>::deserialize(deserializer)?.map(status_text))
}

fn lenient_status_patch<'de, D>(deserializer: D) -> Result<Patch<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<JsonValue>::deserialize(deserializer)? {
        Some(value) => Patch::Value(status_text(value)),
        None => Patch::Null,
    })
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateJobPayload {
    #[serde(default)]
    #[validate(length(min = 1, max = 200, message = "company is required (max 200 characters)"))]
    pub company: String,
    #[serde(default)]
    #[validate(length(min = 1, max = 200, message = "role is required (max 200 characters)"))]
    pub role: String,
    #[serde(
        default,
        deserialize_with = "lenient_status",
        skip_serializing_if = "Option::is_none"
    )]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 200))]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 2048))]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 200))]
    pub salary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 10000))]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 500))]
    pub next_action: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_action_at: Option<String>,
}

impl CreateJobPayload {
    pub fn new(company: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            company: company.into(),
            role: role.into(),
            ..Default::default()
        }
    }

    /// Trims every text field and turns blank optionals into `None`.
    pub fn normalized(self) -> Self {
        Self {
            company: self.company.trim().to_string(),
            role: self.role.trim().to_string(),
            status: normalize_text(self.status),
            location: normalize_text(self.location),
            url: normalize_text(self.url),
            salary: normalize_text(self.salary),
            notes: normalize_text(self.notes),
            next_action: normalize_text(self.next_action),
            next_action_at: normalize_text(self.next_action_at),
        }
    }
}

/// Partial update body. Keys left out of the JSON stay [`Patch::Absent`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateJobPayload {
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub company: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub role: Patch<String>,
    #[serde(
        default,
        deserialize_with = "lenient_status_patch",
        skip_serializing_if = "Patch::is_absent"
    )]
    pub status: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub location: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub url: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub salary: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub notes: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub next_action: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub next_action_at: Patch<String>,
}

impl UpdateJobPayload {
    /// A payload that only moves the job to another stage.
    pub fn stage(status: JobStatus) -> Self {
        Self {
            status: Patch::Value(status.as_str().to_string()),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobListQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
}

impl From<JobListQuery> for JobFilter {
    fn from(query: JobListQuery) -> Self {
        Self {
            q: normalize_text(query.q),
            // "all" and anything unrecognized both mean no stage restriction
            status: query.status.as_deref().and_then(JobStatus::parse_loose),
            sort: SortKey::parse_or_default(query.sort.as_deref()),
        }
    }
}

impl From<&JobFilter> for JobListQuery {
    fn from(filter: &JobFilter) -> Self {
        Self {
            q: filter.q.clone(),
            status: Some(
                filter
                    .status
                    .map(|s| s.as_str().to_string())
                    .unwrap_or_else(|| "all".to_string()),
            ),
            sort: Some(filter.sort.to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobEnvelope {
    pub job: Job,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobListResponse {
    pub jobs: Vec<Job>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteJobResponse {
    pub ok: bool,
}

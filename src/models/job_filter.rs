use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use super::job::{Job, JobStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    UpdatedAt,
    CreatedAt,
    Company,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

/// Ordering of the job list. Serialized as `<field>_<direction>`,
/// e.g. `updatedAt_desc`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortKey {
    pub const UPDATED_DESC: SortKey = SortKey::new(SortField::UpdatedAt, SortDirection::Desc);
    pub const UPDATED_ASC: SortKey = SortKey::new(SortField::UpdatedAt, SortDirection::Asc);
    pub const CREATED_DESC: SortKey = SortKey::new(SortField::CreatedAt, SortDirection::Desc);
    pub const CREATED_ASC: SortKey = SortKey::new(SortField::CreatedAt, SortDirection::Asc);
    pub const COMPANY_ASC: SortKey = SortKey::new(SortField::Company, SortDirection::Asc);
    pub const COMPANY_DESC: SortKey = SortKey::new(SortField::Company, SortDirection::Desc);

    pub const fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    /// Lenient parse used for query strings: anything unknown falls back to
    /// the default ordering.
    pub fn parse_or_default(raw: Option<&str>) -> Self {
        raw.and_then(|s| s.parse().ok()).unwrap_or_default()
    }

    /// Column expression used in `ORDER BY`. Only ever one of a fixed set.
    pub fn sql(&self) -> &'static str {
        match (self.field, self.direction) {
            (SortField::UpdatedAt, SortDirection::Desc) => "updated_at DESC, id ASC",
            (SortField::UpdatedAt, SortDirection::Asc) => "updated_at ASC, id ASC",
            (SortField::CreatedAt, SortDirection::Desc) => "created_at DESC, id ASC",
            (SortField::CreatedAt, SortDirection::Asc) => "created_at ASC, id ASC",
            (SortField::Company, SortDirection::Asc) => "lower(company) ASC, id ASC",
            (SortField::Company, SortDirection::Desc) => "lower(company) DESC, id ASC",
        }
    }

    /// Same ordering as [`SortKey::sql`], for in-memory lists.
    pub fn compare(&self, a: &Job, b: &Job) -> Ordering {
        let primary = match self.field {
            SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
            SortField::CreatedAt => a.created_at.cmp(&b.created_at),
            SortField::Company => a.company.to_lowercase().cmp(&b.company.to_lowercase()),
        };
        let primary = match self.direction {
            SortDirection::Asc => primary,
            SortDirection::Desc => primary.reverse(),
        };
        primary.then_with(|| a.id.cmp(&b.id))
    }
}

impl Default for SortKey {
    fn default() -> Self {
        SortKey::UPDATED_DESC
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let field = match self.field {
            SortField::UpdatedAt => "updatedAt",
            SortField::CreatedAt => "createdAt",
            SortField::Company => "company",
        };
        let direction = match self.direction {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        };
        write!(f, "{}_{}", field, direction)
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (field, direction) = s
            .trim()
            .split_once('_')
            .ok_or_else(|| format!("invalid sort key '{}'", s))?;
        let field = match field {
            "updatedAt" => SortField::UpdatedAt,
            "createdAt" => SortField::CreatedAt,
            "company" => SortField::Company,
            _ => return Err(format!("invalid sort field '{}'", field)),
        };
        let direction = match direction.to_ascii_lowercase().as_str() {
            "asc" => SortDirection::Asc,
            "desc" => SortDirection::Desc,
            _ => return Err(format!("invalid sort direction '{}'", direction)),
        };
        Ok(SortKey::new(field, direction))
    }
}

/// Resolved list criteria. `status: None` means every stage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobFilter {
    pub q: Option<String>,
    pub status: Option<JobStatus>,
    pub sort: SortKey,
}

impl JobFilter {
    pub fn matches(&self, job: &Job) -> bool {
        if let Some(status) = self.status {
            if job.status != status {
                return false;
            }
        }
        match &self.q {
            None => true,
            Some(q) => {
                let needle = q.to_lowercase();
                [
                    Some(job.company.as_str()),
                    Some(job.role.as_str()),
                    job.notes.as_deref(),
                    job.next_action.as_deref(),
                ]
                .into_iter()
                .flatten()
                .any(|haystack| haystack.to_lowercase().contains(&needle))
            }
        }
    }

    /// Filters and orders an in-memory list.
    pub fn apply<'a, I>(&self, jobs: I) -> Vec<Job>
    where
        I: IntoIterator<Item = &'a Job>,
    {
        let mut out: Vec<Job> = jobs.into_iter().filter(|j| self.matches(j)).cloned().collect();
        out.sort_by(|a, b| self.sort.compare(a, b));
        out
    }
}

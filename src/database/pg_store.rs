use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::database::job_store::JobStore;
use crate::error::{Error, Result};
use crate::models::job::{Job, JobChanges, JobRow, NewJob};
use crate::models::job_filter::JobFilter;

const JOB_COLUMNS: &str = "id, company, role, status, location, url, salary, notes, next_action, next_action_at, created_at, updated_at";

#[derive(Clone)]
pub struct PgJobStore {
    pool: PgPool,
}

impl PgJobStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn into_job(row: JobRow) -> Result<Job> {
    let id = row.id;
    Job::try_from(row).map_err(|e| Error::Internal(format!("job {}: {}", id, e)))
}

#[async_trait]
impl JobStore for PgJobStore {
    async fn list(&self, filter: &JobFilter) -> Result<Vec<Job>> {
        let mut filters = Vec::new();
        let mut args: Vec<String> = Vec::new();

        if let Some(q) = &filter.q {
            args.push(q.clone());
            let n = args.len();
            filters.push(format!(
                "(strpos(lower(company), lower(${n})) > 0 \
                 OR strpos(lower(role), lower(${n})) > 0 \
                 OR strpos(lower(COALESCE(notes, '')), lower(${n})) > 0 \
                 OR strpos(lower(COALESCE(next_action, '')), lower(${n})) > 0)"
            ));
        }
        if let Some(status) = filter.status {
            args.push(status.as_str().to_string());
            filters.push(format!("status = ${}", args.len()));
        }

        let where_clause = if filters.is_empty() {
            "".to_string()
        } else {
            format!("WHERE {}", filters.join(" AND "))
        };

        let items_query = format!(
            "SELECT {} FROM jobs {} ORDER BY {}",
            JOB_COLUMNS,
            where_clause,
            filter.sort.sql()
        );

        let mut statement = sqlx::query_as::<_, JobRow>(&items_query);
        for value in &args {
            statement = statement.bind(value);
        }
        let rows = statement.fetch_all(&self.pool).await?;

        rows.into_iter().map(into_job).collect()
    }

    async fn get(&self, id: Uuid) -> Result<Option<Job>> {
        let query = format!("SELECT {} FROM jobs WHERE id = $1", JOB_COLUMNS);
        let row = sqlx::query_as::<_, JobRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(into_job).transpose()
    }

    async fn insert(&self, id: Uuid, job: NewJob, now: DateTime<Utc>) -> Result<Job> {
        let query = format!(
            r#"
            INSERT INTO jobs (
                id, company, role, status, location, url, salary,
                notes, next_action, next_action_at, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $11)
            RETURNING {}
            "#,
            JOB_COLUMNS
        );
        let row = sqlx::query_as::<_, JobRow>(&query)
            .bind(id)
            .bind(job.company)
            .bind(job.role)
            .bind(job.status.as_str())
            .bind(job.location)
            .bind(job.url)
            .bind(job.salary)
            .bind(job.notes)
            .bind(job.next_action)
            .bind(job.next_action_at)
            .bind(now)
            .fetch_one(&self.pool)
            .await?;
        into_job(row)
    }

    async fn update(&self, id: Uuid, changes: JobChanges, now: DateTime<Utc>) -> Result<Option<Job>> {
        let mut qb = QueryBuilder::<Postgres>::new("UPDATE jobs SET ");
        {
            let mut set = qb.separated(", ");
            if let Some(company) = changes.company {
                set.push("company = ").push_bind_unseparated(company);
            }
            if let Some(role) = changes.role {
                set.push("role = ").push_bind_unseparated(role);
            }
            if let Some(status) = changes.status {
                set.push("status = ").push_bind_unseparated(status.as_str());
            }
            if let Some(location) = changes.location {
                set.push("location = ").push_bind_unseparated(location);
            }
            if let Some(url) = changes.url {
                set.push("url = ").push_bind_unseparated(url);
            }
            if let Some(salary) = changes.salary {
                set.push("salary = ").push_bind_unseparated(salary);
            }
            if let Some(notes) = changes.notes {
                set.push("notes = ").push_bind_unseparated(notes);
            }
            if let Some(next_action) = changes.next_action {
                set.push("next_action = ").push_bind_unseparated(next_action);
            }
            if let Some(next_action_at) = changes.next_action_at {
                set.push("next_action_at = ").push_bind_unseparated(next_action_at);
            }
            set.push("updated_at = GREATEST(updated_at, ")
                .push_bind_unseparated(now)
                .push_unseparated(")");
        }
        qb.push(" WHERE id = ")
            .push_bind(id)
            .push(" RETURNING ")
            .push(JOB_COLUMNS);

        let row = qb
            .build_query_as::<JobRow>()
            .fetch_optional(&self.pool)
            .await?;
        row.map(into_job).transpose()
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let res = sqlx::query("DELETE FROM jobs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }
}

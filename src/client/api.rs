use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use url::Url;
use uuid::Uuid;

use crate::client::error::ClientError;
use crate::dto::job_dto::{
    CreateJobPayload, DeleteJobResponse, JobEnvelope, JobListQuery, JobListResponse,
    UpdateJobPayload,
};
use crate::models::job::Job;

/// The four calls the board makes against the jobs API.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait JobsApi: Send + Sync {
    async fn list(&self, query: &JobListQuery) -> Result<Vec<Job>, ClientError>;

    async fn create(&self, payload: &CreateJobPayload) -> Result<Job, ClientError>;

    async fn update(&self, id: Uuid, payload: &UpdateJobPayload) -> Result<Job, ClientError>;

    async fn delete(&self, id: Uuid) -> Result<(), ClientError>;
}

#[derive(Clone)]
pub struct HttpJobsApi {
    client: Client,
    base: Url,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

impl HttpJobsApi {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let client = Client::builder().timeout(Duration::from_secs(15)).build()?;
        Self::with_client(base_url, client)
    }

    pub fn with_client(base_url: &str, client: Client) -> Result<Self, ClientError> {
        let mut base = Url::parse(base_url)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self { client, base })
    }

    fn jobs_url(&self) -> Result<Url, ClientError> {
        Ok(self.base.join("api/jobs")?)
    }

    fn job_url(&self, id: Uuid) -> Result<Url, ClientError> {
        Ok(self.base.join(&format!("api/jobs/{}", id))?)
    }
}

async fn read_json<T: DeserializeOwned>(resp: Response) -> Result<T, ClientError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp.json::<T>().await?);
    }
    let message = match resp.json::<ErrorBody>().await {
        Ok(body) => body.error,
        Err(_) => status
            .canonical_reason()
            .unwrap_or("Request failed")
            .to_string(),
    };
    tracing::debug!(status = status.as_u16(), %message, "Jobs API returned an error");
    Err(ClientError::Api {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl JobsApi for HttpJobsApi {
    async fn list(&self, query: &JobListQuery) -> Result<Vec<Job>, ClientError> {
        let resp = self
            .client
            .get(self.jobs_url()?)
            .query(query)
            .send()
            .await?;
        let body: JobListResponse = read_json(resp).await?;
        Ok(body.jobs)
    }

    async fn create(&self, payload: &CreateJobPayload) -> Result<Job, ClientError> {
        let resp = self
            .client
            .post(self.jobs_url()?)
            .json(payload)
            .send()
            .await?;
        let body: JobEnvelope = read_json(resp).await?;
        Ok(body.job)
    }

    async fn update(&self, id: Uuid, payload: &UpdateJobPayload) -> Result<Job, ClientError> {
        let resp = self
            .client
            .patch(self.job_url(id)?)
            .json(payload)
            .send()
            .await?;
        let body: JobEnvelope = read_json(resp).await?;
        Ok(body.job)
    }

    async fn delete(&self, id: Uuid) -> Result<(), ClientError> {
        let resp = self.client.delete(self.job_url(id)?).send().await?;
        let _: DeleteJobResponse = read_json(resp).await?;
        Ok(())
    }
}

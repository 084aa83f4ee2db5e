pub mod client;
pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use std::sync::Arc;

use crate::database::{JobStore, MemoryJobStore, PgJobStore};
use crate::services::job_service::JobService;
use sqlx::PgPool;

#[derive(Clone)]
pub struct AppState {
    pub job_service: JobService,
}

impl AppState {
    pub fn new(store: Arc<dyn JobStore>) -> Self {
        Self {
            job_service: JobService::new(store),
        }
    }

    pub fn with_pool(pool: PgPool) -> Self {
        Self::new(Arc::new(PgJobStore::new(pool)))
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryJobStore::new()))
    }
}

pub mod job_store;
pub mod memory_store;
pub mod pg_store;
pub mod pool;

pub use job_store::JobStore;
pub use memory_store::MemoryJobStore;
pub use pg_store::PgJobStore;

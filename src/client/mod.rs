//! Board-side state controller and the HTTP adapter it talks through.

pub mod api;
pub mod controller;
pub mod error;
pub mod state;
pub mod stats;

pub use api::{HttpJobsApi, JobsApi};
pub use controller::{BoardController, Intent, RELOAD_DEBOUNCE};
pub use error::ClientError;
pub use state::{BoardState, DragState, Toast, ToastKind};
pub use stats::BoardStats;

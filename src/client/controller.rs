use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::time::{sleep_until, Instant};
use uuid::Uuid;

use crate::client::api::JobsApi;
use crate::client::state::{BoardState, ToastKind};
use crate::dto::job_dto::{CreateJobPayload, JobListQuery, UpdateJobPayload};
use crate::models::job::{Job, JobStatus};
use crate::models::job_filter::SortKey;
use crate::utils::validation::normalize_text;

/// Quiet period after the last search/filter/sort change before reloading.
pub const RELOAD_DEBOUNCE: Duration = Duration::from_millis(250);

/// User intents coming from the presentation layer.
#[derive(Debug, Clone)]
pub enum Intent {
    SetQuery(String),
    SetStatusFilter(Option<JobStatus>),
    SetSort(SortKey),
    Reload,
    DragStart(Uuid),
    DragOver(JobStatus),
    DragLeave(JobStatus),
    DropOn(JobStatus),
    MoveJob { id: Uuid, to: JobStatus },
    CreateJob(CreateJobPayload),
    UpdateJob { id: Uuid, payload: UpdateJobPayload },
    DeleteJob(Uuid),
    DismissToast(u64),
}

/// Owns the board state and is the only thing that mutates it.
///
/// Every change is published on a `watch` channel. Calls to the API are
/// awaited inline, so reloads never overlap and a slow response can't
/// overwrite a newer one.
pub struct BoardController<A> {
    api: A,
    state: BoardState,
    view: watch::Sender<BoardState>,
    reload_due: Option<Instant>,
}

impl<A: JobsApi> BoardController<A> {
    pub fn new(api: A) -> (Self, watch::Receiver<BoardState>) {
        let (view, rx) = watch::channel(BoardState::default());
        let controller = Self {
            api,
            state: BoardState::default(),
            view,
            reload_due: None,
        };
        (controller, rx)
    }

    pub fn state(&self) -> &BoardState {
        &self.state
    }

    pub fn reload_pending(&self) -> bool {
        self.reload_due.is_some()
    }

    fn publish(&self) {
        self.view.send_replace(self.state.clone());
    }

    fn toast(&mut self, kind: ToastKind, message: impl Into<String>) {
        self.state.push_toast(kind, message, Instant::now());
    }

    fn schedule_reload(&mut self) {
        self.reload_due = Some(Instant::now() + RELOAD_DEBOUNCE);
    }

    /// Fetches the list for the current filter. On failure the previous
    /// list stays on screen.
    pub async fn reload(&mut self) -> bool {
        self.reload_due = None;
        self.state.loading = true;
        self.publish();

        let query = JobListQuery::from(&self.state.filter);
        let ok = match self.api.list(&query).await {
            Ok(jobs) => {
                self.state.replace_jobs(jobs);
                true
            }
            Err(err) => {
                tracing::warn!(error = %err, "Failed to load jobs");
                self.toast(ToastKind::Error, format!("Could not load jobs: {}", err.user_message()));
                false
            }
        };

        self.state.loading = false;
        self.publish();
        ok
    }

    pub fn set_query(&mut self, q: impl Into<String>) {
        let q = normalize_text(Some(q.into()));
        if self.state.filter.q != q {
            self.state.filter.q = q;
            self.schedule_reload();
            self.publish();
        }
    }

    pub fn set_status_filter(&mut self, status: Option<JobStatus>) {
        if self.state.filter.status != status {
            self.state.filter.status = status;
            self.schedule_reload();
            self.publish();
        }
    }

    pub fn set_sort(&mut self, sort: SortKey) {
        if self.state.filter.sort != sort {
            self.state.filter.sort = sort;
            self.schedule_reload();
            self.publish();
        }
    }

    /// Optimistic stage change: the board shows the new stage before the
    /// server answers and snaps back if the server refuses.
    pub async fn move_job(&mut self, id: Uuid, to: JobStatus) -> bool {
        let Some(pending) = self.state.begin_move(id, to) else {
            return false;
        };
        self.publish();

        let result = self.api.update(id, &UpdateJobPayload::stage(to)).await;
        let ok = match result {
            Ok(confirmed) => {
                let message = format!("Moved {} to {}", pending.company, to.label());
                self.state.commit_move(pending, confirmed);
                self.toast(ToastKind::Success, message);
                true
            }
            Err(err) => {
                tracing::warn!(job_id = %id, from = %pending.from, to = %to, error = %err, "Stage move rejected");
                let message = format!(
                    "Could not move {} to {}: {}",
                    pending.company,
                    to.label(),
                    err.user_message()
                );
                self.state.rollback_move(pending);
                self.toast(ToastKind::Error, message);
                false
            }
        };
        self.publish();
        ok
    }

    /// Completes a drag onto `status`.
    pub async fn drop_on(&mut self, status: JobStatus) -> bool {
        let dragged = self.state.finish_drag();
        self.publish();
        match dragged {
            Some(id) => self.move_job(id, status).await,
            None => false,
        }
    }

    pub async fn create_job(&mut self, payload: CreateJobPayload) -> Option<Job> {
        self.state.busy = true;
        self.publish();

        let created = match self.api.create(&payload).await {
            Ok(job) => {
                self.toast(ToastKind::Success, format!("Added {}", job.company));
                self.reload().await;
                Some(job)
            }
            Err(err) => {
                self.toast(ToastKind::Error, format!("Could not add job: {}", err.user_message()));
                None
            }
        };

        self.state.busy = false;
        self.publish();
        created
    }

    pub async fn update_job(&mut self, id: Uuid, payload: UpdateJobPayload) -> Option<Job> {
        self.state.busy = true;
        self.publish();

        let updated = match self.api.update(id, &payload).await {
            Ok(job) => {
                self.toast(ToastKind::Success, format!("Saved {}", job.company));
                self.reload().await;
                Some(job)
            }
            Err(err) => {
                self.toast(ToastKind::Error, format!("Could not save job: {}", err.user_message()));
                None
            }
        };

        self.state.busy = false;
        self.publish();
        updated
    }

    pub async fn delete_job(&mut self, id: Uuid) -> bool {
        self.state.busy = true;
        self.publish();

        let ok = match self.api.delete(id).await {
            Ok(()) => {
                self.toast(ToastKind::Info, "Job deleted");
                self.reload().await;
                true
            }
            Err(err) => {
                self.toast(ToastKind::Error, format!("Could not delete job: {}", err.user_message()));
                false
            }
        };

        self.state.busy = false;
        self.publish();
        ok
    }

    pub async fn dispatch(&mut self, intent: Intent) {
        match intent {
            Intent::SetQuery(q) => self.set_query(q),
            Intent::SetStatusFilter(status) => self.set_status_filter(status),
            Intent::SetSort(sort) => self.set_sort(sort),
            Intent::Reload => {
                self.reload().await;
            }
            Intent::DragStart(id) => {
                self.state.drag_start(id);
                self.publish();
            }
            Intent::DragOver(status) => {
                self.state.drag_over(status);
                self.publish();
            }
            Intent::DragLeave(status) => {
                self.state.drag_leave(status);
                self.publish();
            }
            Intent::DropOn(status) => {
                self.drop_on(status).await;
            }
            Intent::MoveJob { id, to } => {
                self.move_job(id, to).await;
            }
            Intent::CreateJob(payload) => {
                self.create_job(payload).await;
            }
            Intent::UpdateJob { id, payload } => {
                self.update_job(id, payload).await;
            }
            Intent::DeleteJob(id) => {
                self.delete_job(id).await;
            }
            Intent::DismissToast(id) => {
                self.state.dismiss_toast(id);
                self.publish();
            }
        }
    }

    /// Event loop: one immediate load, then intents, debounced reloads and
    /// toast expiry until the intent channel closes.
    pub async fn run(mut self, mut intents: mpsc::Receiver<Intent>) {
        self.reload().await;

        loop {
            let reload_at = self.reload_due;
            let toast_at = self.state.next_toast_expiry();

            tokio::select! {
                intent = intents.recv() => match intent {
                    Some(intent) => self.dispatch(intent).await,
                    None => break,
                },
                _ = sleep_until(reload_at.unwrap_or_else(Instant::now)), if reload_at.is_some() => {
                    self.reload().await;
                }
                _ = sleep_until(toast_at.unwrap_or_else(Instant::now)), if toast_at.is_some() => {
                    if self.state.prune_toasts(Instant::now()) {
                        self.publish();
                    }
                }
            }
        }

        tracing::debug!("Board controller stopped");
    }
}

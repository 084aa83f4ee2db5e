use std::time::Duration;

use tokio::time::Instant;
use uuid::Uuid;

use crate::client::stats::BoardStats;
use crate::models::job::{Job, JobStatus};
use crate::models::job_filter::JobFilter;

pub const TOAST_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: u64,
    pub kind: ToastKind,
    pub message: String,
    pub expires_at: Instant,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DragState {
    pub dragging: Option<Uuid>,
    /// Column currently highlighted as a drop target.
    pub over: Option<JobStatus>,
}

/// An optimistic stage move waiting for the server's answer.
#[derive(Debug, Clone)]
pub struct PendingMove {
    pub id: Uuid,
    pub from: JobStatus,
    pub to: JobStatus,
    pub company: String,
    snapshot: Vec<Job>,
}

/// Everything the board renders from.
#[derive(Debug, Clone, Default)]
pub struct BoardState {
    pub jobs: Vec<Job>,
    pub filter: JobFilter,
    pub busy: bool,
    pub loading: bool,
    pub toasts: Vec<Toast>,
    pub drag: DragState,
    next_toast_id: u64,
}

impl BoardState {
    pub fn stats(&self) -> BoardStats {
        BoardStats::from_jobs(&self.jobs)
    }

    pub fn job(&self, id: Uuid) -> Option<&Job> {
        self.jobs.iter().find(|j| j.id == id)
    }

    /// Jobs in one column, in list order.
    pub fn column(&self, status: JobStatus) -> impl Iterator<Item = &Job> {
        self.jobs.iter().filter(move |j| j.status == status)
    }

    pub fn replace_jobs(&mut self, jobs: Vec<Job>) {
        self.jobs = jobs;
    }

    /// Snapshots the list and moves the job locally. `None` when the job
    /// is unknown or already in `to`.
    pub fn begin_move(&mut self, id: Uuid, to: JobStatus) -> Option<PendingMove> {
        let snapshot = self.jobs.clone();
        let job = self.jobs.iter_mut().find(|j| j.id == id)?;
        if job.status == to {
            return None;
        }
        let pending = PendingMove {
            id,
            from: job.status,
            to,
            company: job.company.clone(),
            snapshot,
        };
        job.status = to;
        Some(pending)
    }

    /// Keeps the move and adopts the server's copy of the record.
    pub fn commit_move(&mut self, pending: PendingMove, confirmed: Job) {
        if let Some(job) = self.jobs.iter_mut().find(|j| j.id == pending.id) {
            *job = confirmed;
        }
    }

    /// Restores the list exactly as it was before the move.
    pub fn rollback_move(&mut self, pending: PendingMove) {
        self.jobs = pending.snapshot;
    }

    pub fn push_toast(&mut self, kind: ToastKind, message: impl Into<String>, now: Instant) -> u64 {
        self.next_toast_id += 1;
        let id = self.next_toast_id;
        self.toasts.push(Toast {
            id,
            kind,
            message: message.into(),
            expires_at: now + TOAST_TTL,
        });
        id
    }

    pub fn dismiss_toast(&mut self, id: u64) {
        self.toasts.retain(|t| t.id != id);
    }

    /// Drops expired toasts; returns whether anything changed.
    pub fn prune_toasts(&mut self, now: Instant) -> bool {
        let before = self.toasts.len();
        self.toasts.retain(|t| t.expires_at > now);
        before != self.toasts.len()
    }

    pub fn next_toast_expiry(&self) -> Option<Instant> {
        self.toasts.iter().map(|t| t.expires_at).min()
    }

    pub fn drag_start(&mut self, id: Uuid) {
        self.drag = DragState {
            dragging: Some(id),
            over: None,
        };
    }

    pub fn drag_over(&mut self, status: JobStatus) {
        if self.drag.dragging.is_some() {
            self.drag.over = Some(status);
        }
    }

    pub fn drag_leave(&mut self, status: JobStatus) {
        if self.drag.over == Some(status) {
            self.drag.over = None;
        }
    }

    /// Ends the drag. Returns the dragged job id, if any.
    pub fn finish_drag(&mut self) -> Option<Uuid> {
        std::mem::take(&mut self.drag).dragging
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn job(company: &str, status: JobStatus) -> Job {
        let now = Utc::now();
        Job {
            id: Uuid::new_v4(),
            company: company.into(),
            role: "Engineer".into(),
            status,
            location: None,
            url: None,
            salary: None,
            notes: None,
            next_action: None,
            next_action_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn move_then_rollback_restores_snapshot() {
        let a = job("Acme", JobStatus::Saved);
        let b = job("Globex", JobStatus::Offer);
        let mut state = BoardState::default();
        state.replace_jobs(vec![a.clone(), b.clone()]);

        let pending = state.begin_move(a.id, JobStatus::Applied).unwrap();
        assert_eq!(pending.from, JobStatus::Saved);
        assert_eq!(state.job(a.id).unwrap().status, JobStatus::Applied);
        assert_eq!(state.column(JobStatus::Applied).count(), 1);

        state.rollback_move(pending);
        assert_eq!(state.jobs, vec![a, b]);
    }

    #[test]
    fn move_to_same_stage_is_noop() {
        let a = job("Acme", JobStatus::Saved);
        let mut state = BoardState::default();
        state.replace_jobs(vec![a.clone()]);
        assert!(state.begin_move(a.id, JobStatus::Saved).is_none());
        assert!(state.begin_move(Uuid::new_v4(), JobStatus::Offer).is_none());
    }

    #[test]
    fn commit_adopts_server_copy() {
        let a = job("Acme", JobStatus::Saved);
        let mut state = BoardState::default();
        state.replace_jobs(vec![a.clone()]);
        let pending = state.begin_move(a.id, JobStatus::Interview).unwrap();

        let mut confirmed = a.clone();
        confirmed.status = JobStatus::Interview;
        confirmed.updated_at = Utc::now() + chrono::Duration::seconds(1);
        state.commit_move(pending, confirmed.clone());
        assert_eq!(state.job(a.id), Some(&confirmed));
    }

    #[test]
    fn toasts_expire_and_dismiss() {
        let mut state = BoardState::default();
        let start = Instant::now();
        let first = state.push_toast(ToastKind::Success, "saved", start);
        let second = state.push_toast(ToastKind::Error, "failed", start + Duration::from_secs(1));
        assert_ne!(first, second);
        assert_eq!(state.next_toast_expiry(), Some(start + TOAST_TTL));

        assert!(state.prune_toasts(start + TOAST_TTL));
        assert_eq!(state.toasts.len(), 1);
        state.dismiss_toast(second);
        assert!(state.toasts.is_empty());
    }

    #[test]
    fn drag_tracks_target_column() {
        let id = Uuid::new_v4();
        let mut state = BoardState::default();
        state.drag_over(JobStatus::Offer);
        assert_eq!(state.drag.over, None);

        state.drag_start(id);
        state.drag_over(JobStatus::Offer);
        assert_eq!(state.drag.over, Some(JobStatus::Offer));
        state.drag_leave(JobStatus::Applied);
        assert_eq!(state.drag.over, Some(JobStatus::Offer));
        state.drag_leave(JobStatus::Offer);
        assert_eq!(state.drag.over, None);

        assert_eq!(state.finish_drag(), Some(id));
        assert_eq!(state.drag, DragState::default());
    }
}

use crate::models::job::{Job, JobStatus};

/// Per-stage counters shown above the board. Always derived from the
/// currently loaded list, never stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BoardStats {
    counts: [usize; 5],
    pub total: usize,
    /// Percentage of applied jobs that reached an interview.
    pub interview_rate: u32,
}

fn slot(status: JobStatus) -> usize {
    match status {
        JobStatus::Saved => 0,
        JobStatus::Applied => 1,
        JobStatus::Interview => 2,
        JobStatus::Offer => 3,
        JobStatus::Rejected => 4,
    }
}

impl BoardStats {
    pub fn from_jobs(jobs: &[Job]) -> Self {
        let mut counts = [0usize; 5];
        for job in jobs {
            counts[slot(job.status)] += 1;
        }
        Self {
            counts,
            total: jobs.len(),
            interview_rate: interview_rate(
                counts[slot(JobStatus::Interview)],
                counts[slot(JobStatus::Applied)],
            ),
        }
    }

    pub fn count(&self, status: JobStatus) -> usize {
        self.counts[slot(status)]
    }
}

pub fn interview_rate(interviews: usize, applied: usize) -> u32 {
    if applied == 0 {
        return 0;
    }
    (interviews as f64 / applied as f64 * 100.0).round() as u32
}

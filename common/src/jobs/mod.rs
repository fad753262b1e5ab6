use serde::{Deserialize, Serialize};
use std::fmt;

/// Review progress of a CSV job.
///
/// The status is never chosen by a caller. It is always recomputed from the
/// number of flagged rows and the number of rows in the job, see [`JobStatus::derive`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// No row has been flagged yet.
    #[default]
    Pending,
    /// Some, but not all, rows are flagged.
    InProgress,
    /// Every row carries a flag.
    Completed,
}

impl JobStatus {
    /// Classifies a job from its flagged and total row counts.
    ///
    /// An empty job is `Pending`; it can never be `Completed`.
    pub fn derive(flagged_rows: usize, total_rows: usize) -> Self {
        if flagged_rows == 0 {
            JobStatus::Pending
        } else if total_rows > 0 && flagged_rows >= total_rows {
            JobStatus::Completed
        } else {
            JobStatus::InProgress
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            JobStatus::Pending => "Pending",
            JobStatus::InProgress => "In Progress",
            JobStatus::Completed => "Completed",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

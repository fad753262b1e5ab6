use crate::jobs::JobStatus;
use crate::model::flag::Flag;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Placeholder shown for a cell a short row does not have.
pub const MISSING_CELL: &str = "-";

/// One uploaded CSV file together with its review configuration and progress.
///
/// `total_rows`, `flagged_rows` and `status` are derived from `data` and `flags`.
/// The store recomputes them on every read and write through [`CsvJob::refresh_counters`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CsvJob {
    pub id: String,
    pub name: String,
    /// RFC 3339 timestamp of the upload.
    pub upload_date: String,
    pub status: JobStatus,
    pub headers: Vec<String>,
    pub data: Vec<Vec<String>>,
    /// Columns released to interns, in header order. Empty means not released.
    pub visible_columns: Vec<String>,
    /// Zero-based row index to flag. A missing key means the row is unreviewed.
    pub flags: BTreeMap<usize, Flag>,
    pub total_rows: usize,
    pub flagged_rows: usize,
}

impl CsvJob {
    /// Builds a freshly uploaded job with every column visible and no flags.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        upload_date: impl Into<String>,
        headers: Vec<String>,
        data: Vec<Vec<String>>,
    ) -> Self {
        let mut job = CsvJob {
            id: id.into(),
            name: name.into(),
            upload_date: upload_date.into(),
            status: JobStatus::Pending,
            visible_columns: headers.clone(),
            headers,
            data,
            flags: BTreeMap::new(),
            total_rows: 0,
            flagged_rows: 0,
        };
        job.refresh_counters();
        job
    }

    /// Recomputes the derived counters and the status from `data` and `flags`.
    pub fn refresh_counters(&mut self) {
        self.total_rows = self.data.len();
        self.flagged_rows = self.flags.len();
        self.status = JobStatus::derive(self.flagged_rows, self.total_rows);
    }

    /// Whether an admin has released at least one column to interns.
    pub fn is_released(&self) -> bool {
        !self.visible_columns.is_empty()
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == column)
    }

    /// Value of `column` in row `row`, or [`MISSING_CELL`] when the row is too short.
    pub fn cell(&self, row: usize, column: &str) -> &str {
        self.column_index(column)
            .and_then(|idx| self.data.get(row).and_then(|r| r.get(idx)))
            .map(String::as_str)
            .filter(|v| !v.is_empty())
            .unwrap_or(MISSING_CELL)
    }

    pub fn metadata(&self) -> JobMetadata {
        JobMetadata {
            id: self.id.clone(),
            name: self.name.clone(),
            upload_date: self.upload_date.clone(),
            status: self.status,
            total_rows: self.total_rows,
        }
    }

    pub fn columns(&self) -> JobColumns {
        JobColumns {
            headers: self.headers.clone(),
            visible_columns: self.visible_columns.clone(),
        }
    }
}

/// A job without its rows, as listed on the dashboards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSummary {
    pub id: String,
    pub name: String,
    pub upload_date: String,
    pub status: JobStatus,
    pub column_count: usize,
    pub visible_columns: Vec<String>,
    pub total_rows: usize,
    pub flagged_rows: usize,
}

impl From<&CsvJob> for JobSummary {
    fn from(job: &CsvJob) -> Self {
        JobSummary {
            id: job.id.clone(),
            name: job.name.clone(),
            upload_date: job.upload_date.clone(),
            status: job.status,
            column_count: job.headers.len(),
            visible_columns: job.visible_columns.clone(),
            total_rows: job.total_rows,
            flagged_rows: job.flagged_rows,
        }
    }
}

/// Persisted `metadata.json` fragment of a job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobMetadata {
    pub id: String,
    pub name: String,
    pub upload_date: String,
    pub status: JobStatus,
    pub total_rows: usize,
}

/// Persisted `columns.json` fragment of a job.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobColumns {
    pub headers: Vec<String>,
    pub visible_columns: Vec<String>,
}

//! Intern-facing view of a job: pages of rows projected onto the released
//! columns, plus progress figures for the dashboards.

use common::jobs::JobStatus;
use common::model::flag::Flag;
use common::model::job::CsvJob;
use serde::Serialize;

pub const ROWS_PER_PAGE: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRow {
    /// Zero-based row index, the key used in the job's flags.
    pub index: usize,
    /// Cells of the visible columns, in column order.
    pub cells: Vec<String>,
    pub flag: Option<Flag>,
    /// Display name of the flag, e.g. `Very Bad`.
    pub flag_label: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewPage {
    pub job_id: String,
    pub page: usize,
    pub total_pages: usize,
    pub total_rows: usize,
    pub flagged_rows: usize,
    pub progress: u8,
    pub columns: Vec<String>,
    pub rows: Vec<ReviewRow>,
}

/// Number of pages; a job without rows still has one (empty) page.
pub fn total_pages(total_rows: usize) -> usize {
    total_rows.div_ceil(ROWS_PER_PAGE).max(1)
}

/// Share of flagged rows as a rounded percentage.
pub fn progress(job: &CsvJob) -> u8 {
    if job.total_rows == 0 {
        return 0;
    }
    let percent = (job.flagged_rows as f64 / job.total_rows as f64 * 100.0).round();
    percent.min(100.0) as u8
}

/// Rows of page `page` (zero-based). Pages past the end clamp to the last one.
pub fn review_page(job: &CsvJob, page: usize) -> ReviewPage {
    let total_pages = total_pages(job.total_rows);
    let page = page.min(total_pages - 1);
    let start = page * ROWS_PER_PAGE;
    let end = (start + ROWS_PER_PAGE).min(job.data.len());

    let rows = (start..end)
        .map(|index| {
            let flag = job.flags.get(&index).copied();
            ReviewRow {
                index,
                cells: job
                    .visible_columns
                    .iter()
                    .map(|column| job.cell(index, column).to_string())
                    .collect(),
                flag,
                flag_label: flag.map(Flag::label),
            }
        })
        .collect();

    ReviewPage {
        job_id: job.id.clone(),
        page,
        total_pages,
        total_rows: job.total_rows,
        flagged_rows: job.flagged_rows,
        progress: progress(job),
        columns: job.visible_columns.clone(),
        rows,
    }
}

/// Per-status job counts shown on the dashboards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCounts {
    pub total: usize,
    pub pending: usize,
    pub in_progress: usize,
    pub completed: usize,
}

impl StatusCounts {
    pub fn tally(jobs: &[CsvJob]) -> Self {
        jobs.iter().fold(StatusCounts::default(), |mut counts, job| {
            counts.total += 1;
            match job.status {
                JobStatus::Pending => counts.pending += 1,
                JobStatus::InProgress => counts.in_progress += 1,
                JobStatus::Completed => counts.completed += 1,
            }
            counts
        })
    }
}

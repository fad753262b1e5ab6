//! Manages CSV review jobs: upload, listing, column release, flagging and export.
//!
//! The provided routes are:
//! - `GET /api/jobs`: summaries of every job. Interns only see jobs with at least
//!   one released column.
//! - `GET /api/jobs/stats`: job counts per status, with the same visibility rule.
//! - `POST /api/jobs/upload`: multipart/form-data with one or more `file` fields.
//!   Each file becomes its own job; the response lists one `UploadOutcome` per file.
//! - `GET /api/jobs/{job_id}`: the full job for admins, its summary for interns.
//! - `DELETE /api/jobs/{job_id}`: removes the job and all of its stored files.
//! - `PUT /api/jobs/{job_id}/columns`: replaces the columns released to interns.
//! - `PUT /api/jobs/{job_id}/flags`: replaces the row flags.
//! - `GET /api/jobs/{job_id}/rows?page=N`: one page of rows on the released columns.
//! - `GET /api/jobs/{job_id}/export`: the flag-annotated CSV as a download.

use actix_web::web::{delete, get, post, put, scope};
use actix_web::Scope;

mod list;
mod rows;
mod update;
mod upload;

const API_PATH: &str = "/api/jobs";

/// Configures and returns the Actix scope for job routes.
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", get().to(list::list_jobs))
        .route("/stats", get().to(list::job_stats))
        .route("/upload", post().to(upload::process))
        .route("/{job_id}", get().to(list::get_job))
        .route("/{job_id}", delete().to(update::delete_job))
        .route("/{job_id}/columns", put().to(update::set_columns))
        .route("/{job_id}/flags", put().to(update::set_flags))
        .route("/{job_id}/rows", get().to(rows::review_rows))
        .route("/{job_id}/export", get().to(rows::export_csv))
}

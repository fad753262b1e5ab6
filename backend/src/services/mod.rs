//! HTTP API of the review tool.
//!
//! - `/api/auth`: login, logout and the current session.
//! - `/api/jobs`: upload, listing, column release, flagging and CSV export.
//! - `/api/backup`: full JSON export and import plus the storage viewer.

pub mod auth;
pub mod backup;
pub mod jobs;

mod guard;

use actix_web::web;

/// Registers every API scope on the application.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(auth::configure_routes())
        .service(jobs::configure_routes())
        .service(backup::configure_routes());
}

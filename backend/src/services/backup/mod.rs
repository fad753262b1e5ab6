//! # Backup Service Module
//!
//! Admin-only endpoints under `/api/backup` for moving the whole store in and
//! out as one JSON document, and for inspecting the raw storage layout.
//!
//! ## Sub-modules:
//! - `transfer`: export and import of the backup document.
//! - `inspect`: the list of storage keys and the raw content of one fragment.

mod inspect;
mod transfer;

use actix_web::web::{get, post, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/backup";

/// Configures and returns the Actix `Scope` for backup routes.
///
/// *   **`GET /export`**: the backup document as a `csv-review-backup-<date>.json` download.
/// *   **`POST /import`**: replaces the store with the posted document. A document
///     without `users.json` or `jobs/index.json` is rejected with `400` and
///     nothing is changed.
/// *   **`GET /keys`**: every storage key of the store, sorted.
/// *   **`GET /raw?path=...`**: the stored text of one key, as `text/plain`.
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/export", get().to(transfer::export))
        .route("/import", post().to(transfer::import))
        .route("/keys", get().to(inspect::keys))
        .route("/raw", get().to(inspect::raw))
}

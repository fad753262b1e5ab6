//! # Auth Service Module
//!
//! Session endpoints under `/api/auth`. There is at most one session per store:
//! logging in replaces it, logging out clears it.

mod session;

use actix_web::web::{get, post, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/auth";

/// Configures and returns the Actix scope for session routes.
///
/// *   **`POST /login`**: `LoginRequest` body; `200` with the `SessionUser` or `401`.
/// *   **`POST /logout`**: always `204`.
/// *   **`GET /me`**: `200` with the `SessionUser` or `401`.
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/login", post().to(session::login))
        .route("/logout", post().to(session::logout))
        .route("/me", get().to(session::me))
}

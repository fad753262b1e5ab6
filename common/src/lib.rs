//! Shared models for the CSV review service.
//!
//! Everything in here is plain serde data: the backend persists these shapes as
//! JSON fragments and exchanges them with clients over the HTTP API.

pub mod jobs;
pub mod model;
pub mod requests;

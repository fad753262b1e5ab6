//! Simulated file tree of the job store.
//!
//! ```text
//! <ns>/users.json
//! <ns>/auth.json
//! <ns>/jobs/index.json
//! <ns>/jobs/<id>/metadata.json
//! <ns>/jobs/<id>/columns.json
//! <ns>/jobs/<id>/flags.json
//! <ns>/jobs/<id>/original.csv
//! <ns>/jobs/<id>/updated.csv
//! ```
//!
//! Paths below are relative to the namespace; [`Namespace`] turns them into
//! storage keys and back.

use crate::error::StoreError;
use regex::Regex;

pub const USERS_FILE: &str = "users.json";
pub const AUTH_FILE: &str = "auth.json";
pub const JOB_INDEX_FILE: &str = "jobs/index.json";

pub const METADATA_FILE: &str = "metadata.json";
pub const COLUMNS_FILE: &str = "columns.json";
pub const FLAGS_FILE: &str = "flags.json";
pub const ORIGINAL_CSV_FILE: &str = "original.csv";
pub const UPDATED_CSV_FILE: &str = "updated.csv";

const JOBS_DIR: &str = "jobs/";

pub fn job_dir(id: &str) -> String {
    format!("{JOBS_DIR}{id}/")
}

pub fn job_file(id: &str, file: &str) -> String {
    format!("{JOBS_DIR}{id}/{file}")
}

/// Splits `jobs/<id>/<file>` into its id and file name.
pub fn split_job_file(path: &str) -> Option<(&str, &str)> {
    let (id, file) = path.strip_prefix(JOBS_DIR)?.split_once('/')?;
    if id.is_empty() || file.is_empty() || file.contains('/') {
        return None;
    }
    Some((id, file))
}

/// Pattern every job id must match: `job_` followed by digits.
pub fn job_id_pattern() -> Result<Regex, StoreError> {
    Regex::new(r"^job_[0-9]+$").map_err(|e| StoreError::Validation(format!("Regex error: {}", e)))
}

pub fn format_job_id(number: usize) -> String {
    format!("job_{number:03}")
}

/// Key prefix isolating one store inside a shared key-value substrate.
#[derive(Debug, Clone)]
pub struct Namespace {
    prefix: String,
}

impl Namespace {
    pub fn new(name: &str) -> Self {
        Namespace {
            prefix: format!("{}/", name.trim_end_matches('/')),
        }
    }

    pub fn key(&self, path: &str) -> String {
        format!("{}{}", self.prefix, path)
    }

    /// Path of `key` relative to this namespace, or `None` for foreign keys.
    pub fn relative<'a>(&self, key: &'a str) -> Option<&'a str> {
        key.strip_prefix(self.prefix.as_str())
    }
}

//! The JSON backup document: one snapshot of every fragment in a store
//! namespace, keyed by the fragment's path relative to the namespace.
//!
//! ```json
//! {
//!   "users.json": [ ... ],
//!   "auth.json": { ... },
//!   "jobs/index.json": ["job_001"],
//!   "jobs": {
//!     "job_001": {
//!       "metadata.json": { ... },
//!       "columns.json": { ... },
//!       "flags.json": { "0": 2 },
//!       "original.csv": "...",
//!       "updated.csv": "..."
//!     }
//!   }
//! }
//! ```

use crate::error::StoreError;
use crate::store::paths;
use common::model::user::User;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BackupDocument {
    #[serde(rename = "users.json", default, skip_serializing_if = "Option::is_none")]
    pub users: Option<Vec<User>>,

    /// The logged-in user at export time, if any.
    #[serde(rename = "auth.json", default, skip_serializing_if = "Option::is_none")]
    pub session: Option<User>,

    #[serde(rename = "jobs/index.json", default, skip_serializing_if = "Option::is_none")]
    pub job_index: Option<Vec<String>>,

    #[serde(default)]
    pub jobs: BTreeMap<String, JobFiles>,
}

/// Files stored under `jobs/<id>/`. JSON files are kept as untyped values so a
/// backup round-trips them verbatim.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobFiles {
    #[serde(rename = "metadata.json", default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,

    #[serde(rename = "columns.json", default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<Value>,

    #[serde(rename = "flags.json", default, skip_serializing_if = "Option::is_none")]
    pub flags: Option<Value>,

    #[serde(rename = "original.csv", default, skip_serializing_if = "Option::is_none")]
    pub original_csv: Option<String>,

    #[serde(rename = "updated.csv", default, skip_serializing_if = "Option::is_none")]
    pub updated_csv: Option<String>,
}

impl JobFiles {
    pub fn is_empty(&self) -> bool {
        self.metadata.is_none()
            && self.columns.is_none()
            && self.flags.is_none()
            && self.original_csv.is_none()
            && self.updated_csv.is_none()
    }

    /// Stores `content` read from `file` into the matching slot.
    ///
    /// Returns `false` for file names that are not part of a job.
    pub(crate) fn insert(&mut self, file: &str, content: String) -> Result<bool, StoreError> {
        match file {
            paths::METADATA_FILE => self.metadata = Some(serde_json::from_str(&content)?),
            paths::COLUMNS_FILE => self.columns = Some(serde_json::from_str(&content)?),
            paths::FLAGS_FILE => self.flags = Some(serde_json::from_str(&content)?),
            paths::ORIGINAL_CSV_FILE => self.original_csv = Some(content),
            paths::UPDATED_CSV_FILE => self.updated_csv = Some(content),
            _ => return Ok(false),
        }
        Ok(true)
    }

    /// Renders each present file as the text stored under its key.
    pub(crate) fn to_fragments(&self) -> Result<Vec<(&'static str, String)>, StoreError> {
        let mut out = Vec::new();
        if let Some(v) = &self.metadata {
            out.push((paths::METADATA_FILE, serde_json::to_string_pretty(v)?));
        }
        if let Some(v) = &self.columns {
            out.push((paths::COLUMNS_FILE, serde_json::to_string_pretty(v)?));
        }
        if let Some(v) = &self.flags {
            out.push((paths::FLAGS_FILE, serde_json::to_string_pretty(v)?));
        }
        if let Some(text) = &self.original_csv {
            out.push((paths::ORIGINAL_CSV_FILE, text.clone()));
        }
        if let Some(text) = &self.updated_csv {
            out.push((paths::UPDATED_CSV_FILE, text.clone()));
        }
        Ok(out)
    }
}

impl BackupDocument {
    pub fn from_json(text: &str) -> Result<Self, StoreError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, StoreError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Checks the document before an import touches the store.
    ///
    /// The user list and the job index are required, and every job id must be
    /// a valid `job_<n>` id so it can be turned back into storage keys.
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.users.is_none() {
            return Err(StoreError::Validation(format!(
                "backup is missing {}",
                paths::USERS_FILE
            )));
        }
        let index = self.job_index.as_ref().ok_or_else(|| {
            StoreError::Validation(format!("backup is missing {}", paths::JOB_INDEX_FILE))
        })?;

        let pattern = paths::job_id_pattern()?;
        for id in index.iter().chain(self.jobs.keys()) {
            if !pattern.is_match(id) {
                return Err(StoreError::Validation(format!("invalid job id '{id}' in backup")));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::model::user::default_users;

    #[test]
    fn missing_index_fails_validation() {
        let doc = BackupDocument::from_json(r#"{ "users.json": [] }"#).unwrap();
        let err = doc.validate().unwrap_err();
        assert!(matches!(err, StoreError::Validation(msg) if msg.contains("jobs/index.json")));
    }

    #[test]
    fn missing_users_fails_validation() {
        let doc = BackupDocument::from_json(r#"{ "jobs/index.json": [] }"#).unwrap();
        assert!(matches!(doc.validate(), Err(StoreError::Validation(_))));
    }

    #[test]
    fn rejects_path_like_job_ids() {
        let doc = BackupDocument {
            users: Some(default_users()),
            job_index: Some(vec!["../users.json".to_string()]),
            ..Default::default()
        };
        assert!(matches!(doc.validate(), Err(StoreError::Validation(_))));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(
            BackupDocument::from_json("{ not json"),
            Err(StoreError::JsonParse(_))
        ));
    }

    #[test]
    fn job_files_keep_their_names() {
        let mut files = JobFiles::default();
        assert!(files.insert(paths::FLAGS_FILE, r#"{"0": 1}"#.to_string()).unwrap());
        assert!(files.insert(paths::ORIGINAL_CSV_FILE, "\"a\"".to_string()).unwrap());
        assert!(!files.insert("notes.txt", String::new()).unwrap());

        let json = serde_json::to_value(&files).unwrap();
        assert_eq!(json["flags.json"]["0"], 1);
        assert_eq!(json["original.csv"], "\"a\"");
        assert!(json.get("metadata.json").is_none());
    }
}

use crate::model::flag::Flag;
use crate::model::user::{Role, User};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Credentials posted to `/api/auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Columns an admin releases to interns for one job.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateColumnsRequest {
    pub visible_columns: Vec<String>,
}

/// Full replacement of a job's flags, keyed by zero-based row index.
///
/// Rows missing from the map are unreviewed, so removing a key unflags the row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateFlagsRequest {
    pub flags: BTreeMap<usize, Flag>,
}

/// Query string of `/api/jobs/{id}/rows`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageQuery {
    #[serde(default)]
    pub page: usize,
}

/// Query string of `/api/backup/raw`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawFileQuery {
    pub path: String,
}

/// The logged-in user as returned to clients, without the password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub username: String,
    pub role: Role,
}

impl From<&User> for SessionUser {
    fn from(user: &User) -> Self {
        SessionUser {
            username: user.username.clone(),
            role: user.role,
        }
    }
}

/// Result of one file of a multi-file upload.
///
/// Files are processed independently; a failing file does not stop the others.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadOutcome {
    pub file_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rows: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

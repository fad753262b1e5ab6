use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Uploads CSV files, releases columns and exports results.
    Admin,
    /// Reviews released jobs row by row.
    Intern,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => f.write_str("admin"),
            Role::Intern => f.write_str("intern"),
        }
    }
}

/// An account of the review tool.
///
/// Passwords are kept in plain text. The tool is a local demo and the user list
/// is not a security boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    pub password: String,
    pub role: Role,
}

impl User {
    pub fn new(username: &str, password: &str, role: Role) -> Self {
        User {
            username: username.to_string(),
            password: password.to_string(),
            role,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Accounts seeded into an empty user list on first start.
pub fn default_users() -> Vec<User> {
    vec![
        User::new("admin", "admin123", Role::Admin),
        User::new("intern1", "intern123", Role::Intern),
        User::new("intern2", "intern123", Role::Intern),
    ]
}

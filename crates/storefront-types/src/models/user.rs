//! Authentication models.

use serde::{Deserialize, Serialize};

/// The authenticated user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    /// Grants access to the admin back-office.
    #[serde(default)]
    pub is_admin: bool,
}

/// Login credentials. Never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

//! Store settings.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Store-wide settings edited from the admin back-office.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StoreSettings {
    pub store_name: String,
    pub contact_email: String,
    /// ISO 4217 code, e.g. `EUR`.
    pub currency: String,
    /// Free-form extras the backend passes through untouched.
    #[serde(default)]
    pub extras: HashMap<String, String>,
}

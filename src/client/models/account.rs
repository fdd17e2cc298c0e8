//! Team Services account models

use serde::{Deserialize, Serialize};

/// Account (collection) returned by account creation.
///
/// A missing `id` means the service declined to create the account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    /// Account id, absent when creation failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Account name
    #[serde(default)]
    pub name: String,
}

impl Collection {
    pub fn new(id: Option<&str>, name: &str) -> Self {
        Self {
            id: id.map(str::to_string),
            name: name.to_string(),
        }
    }
}

/// Wire shape of the account name availability check
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct NameAvailability {
    #[serde(default)]
    pub name: Option<String>,
    pub is_available: bool,
}

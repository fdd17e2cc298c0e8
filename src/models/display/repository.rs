//! Repository classification display model

use serde::Serialize;
use tabled::Tabled;

use crate::classify::RepositoryDescriptor;

/// Classified repository for table/JSON output.
///
/// Provider properties are left out; they may carry an access token.
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct RepositoryDisplay {
    #[tabled(rename = "PROVIDER")]
    pub provider: String,

    /// Numeric repository type sent to the service
    #[tabled(rename = "TYPE")]
    pub code: u8,

    #[tabled(rename = "IDENTIFIER")]
    pub identifier: String,

    #[tabled(rename = "ACCOUNT")]
    pub account: String,

    #[tabled(rename = "PROJECT")]
    pub project: String,
}

impl From<&RepositoryDescriptor> for RepositoryDisplay {
    fn from(descriptor: &RepositoryDescriptor) -> Self {
        Self {
            provider: descriptor.provider.label().to_string(),
            code: descriptor.provider.code(),
            identifier: descriptor.identifier.clone(),
            account: descriptor.account_name.clone().unwrap_or_else(|| "--".to_string()),
            project: descriptor.project_name.clone().unwrap_or_else(|| "--".to_string()),
        }
    }
}

//! Provisioning result display model

use serde::Serialize;
use tabled::Tabled;

use crate::provision::ProvisioningResult;

/// Field/value row of a provisioning result for table output.
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct SummaryRow {
    #[tabled(rename = "FIELD")]
    pub field: &'static str,

    #[tabled(rename = "VALUE")]
    pub value: String,
}

impl SummaryRow {
    fn new(field: &'static str, value: impl Into<String>) -> Self {
        Self {
            field,
            value: value.into(),
        }
    }

    pub fn from_result(result: &ProvisioningResult) -> Vec<Self> {
        let mut rows = vec![
            Self::new("Status", result.status.as_str()),
            Self::new("Account", result.account_url.as_str()),
            Self::new(
                "Account created",
                if result.account_created { "yes" } else { "no" },
            ),
            Self::new("Resource group", result.azure_resource_group.as_str()),
            Self::new("Web app", result.azure_website_name.as_str()),
            Self::new("Deployment status", result.azure_continuous_delivery_url.as_str()),
        ];
        if let Some(url) = &result.build_definition_url {
            rows.push(Self::new("Build definition", url.as_str()));
        }
        if let Some(url) = &result.release_definition_url {
            rows.push(Self::new("Release definition", url.as_str()));
        }
        rows
    }
}

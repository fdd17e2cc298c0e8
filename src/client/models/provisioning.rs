//! Provisioning operation models

use std::fmt;

use serde::{Deserialize, Serialize};

/// State of a remote provisioning operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ProvisioningStatus {
    Queued,
    InProgress,
    Succeeded,
    Failed,
    /// Any status string the service returns that we don't recognise
    Unknown(String),
}

impl ProvisioningStatus {
    /// Whether the operation is still waiting or running
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Queued | Self::InProgress)
    }

    /// Position in the forward-only lifecycle, `None` for unknown states
    pub fn rank(&self) -> Option<u8> {
        match self {
            Self::Queued => Some(0),
            Self::InProgress => Some(1),
            Self::Succeeded | Self::Failed => Some(2),
            Self::Unknown(_) => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Queued => "queued",
            Self::InProgress => "inProgress",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
            Self::Unknown(raw) => raw,
        }
    }
}

impl From<String> for ProvisioningStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "queued" => Self::Queued,
            "inProgress" => Self::InProgress,
            "succeeded" => Self::Succeeded,
            "failed" => Self::Failed,
            _ => Self::Unknown(raw),
        }
    }
}

impl From<ProvisioningStatus> for String {
    fn from(status: ProvisioningStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for ProvisioningStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Name/value pair used throughout the provisioning payloads
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    pub name: String,
    #[serde(default)]
    pub value: String,
}

impl Property {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A resource created by the pipeline setup (project, build or release definition)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CiArtifact {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
}

impl CiArtifact {
    pub fn new(id: &str, name: &str, uri: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            uri: Some(uri.to_string()),
        }
    }
}

/// Artifacts reported for a provisioning operation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CiArtifacts {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<CiArtifact>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_definition: Option<CiArtifact>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_definition: Option<CiArtifact>,
}

/// Snapshot of a remote provisioning operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvisioningOperation {
    /// Remote-assigned operation id
    pub id: String,

    /// Current status
    pub status: ProvisioningStatus,

    /// Message accompanying the status (the failure reason on `failed`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_message: Option<String>,

    /// Named outputs of the deployment steps (e.g. `AccountCreated`)
    #[serde(default)]
    pub step_outputs: Vec<Property>,

    /// Resources created so far
    #[serde(default)]
    pub artifacts: CiArtifacts,
}

impl ProvisioningOperation {
    pub fn new(id: &str, status: ProvisioningStatus) -> Self {
        Self {
            id: id.to_string(),
            status,
            result_message: None,
            step_outputs: Vec::new(),
            artifacts: CiArtifacts::default(),
        }
    }

    pub fn with_message(mut self, message: &str) -> Self {
        self.result_message = Some(message.to_string());
        self
    }

    pub fn with_step_output(mut self, name: &str, value: &str) -> Self {
        self.step_outputs.push(Property::new(name, value));
        self
    }

    pub fn with_artifacts(mut self, artifacts: CiArtifacts) -> Self {
        self.artifacts = artifacts;
        self
    }
}

/// Wire shape of a provisioning configuration returned by the CD service
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ProvisioningConfigurationResponse {
    pub id: String,
    #[serde(default)]
    pub ci_configuration: Option<CiConfiguration>,
    #[serde(default)]
    pub deployment_step_ids: Vec<Property>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CiConfiguration {
    #[serde(default)]
    pub project: Option<CiArtifact>,
    #[serde(default)]
    pub build_definition: Option<CiArtifact>,
    #[serde(default)]
    pub release_definition: Option<CiArtifact>,
    pub result: CiResult,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CiResult {
    pub status: ProvisioningStatus,
    #[serde(default)]
    pub status_message: Option<String>,
}

impl From<ProvisioningConfigurationResponse> for ProvisioningOperation {
    fn from(response: ProvisioningConfigurationResponse) -> Self {
        let (status, result_message, artifacts) = match response.ci_configuration {
            Some(ci) => (
                ci.result.status,
                ci.result.status_message.filter(|m| !m.is_empty()),
                CiArtifacts {
                    project: ci.project,
                    build_definition: ci.build_definition,
                    release_definition: ci.release_definition,
                },
            ),
            None => (
                ProvisioningStatus::Unknown(String::new()),
                None,
                CiArtifacts::default(),
            ),
        };

        Self {
            id: response.id,
            status,
            result_message,
            step_outputs: response.deployment_step_ids,
            artifacts,
        }
    }
}

//! Repository lookup models

use serde::{Deserialize, Serialize};

/// Authoritative information about a Team Services hosted Git repository.
///
/// Flattened from the `vsts/info` payload, which nests the repository inside
/// its collection and team project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryInfoResponse {
    /// Stable repository id (GUID)
    pub repository_id: String,

    /// Repository name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository_name: Option<String>,

    /// Team project id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,

    /// Team project name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,

    /// Account (collection) name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_name: Option<String>,
}

/// Wire shape of `GET <repo>/vsts/info`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct VstsInfo {
    #[serde(default)]
    pub collection: Option<CollectionInfo>,
    pub repository: RepositoryDetails,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct CollectionInfo {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RepositoryDetails {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub project: Option<TeamProjectInfo>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct TeamProjectInfo {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

impl From<VstsInfo> for RepositoryInfoResponse {
    fn from(info: VstsInfo) -> Self {
        let (project_id, project_name) = match info.repository.project {
            Some(project) => (project.id, project.name),
            None => (None, None),
        };

        Self {
            repository_id: info.repository.id,
            repository_name: info.repository.name,
            project_id,
            project_name,
            account_name: info.collection.and_then(|c| c.name),
        }
    }
}

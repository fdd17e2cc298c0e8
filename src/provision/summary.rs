//! Provisioning result and the links shown to the user

use std::collections::BTreeMap;

use serde::Serialize;
use urlencoding::encode;

use super::request::AzureTargetInfo;
use crate::client::models::ProvisioningOperation;

/// Status reported for every successful run
pub const STATUS_SUCCESS: &str = "SUCCESS";

/// Step output the service uses to say whether it created the account
const ACCOUNT_CREATED_OUTPUT: &str = "AccountCreated";

pub fn account_url(account: &str) -> String {
    format!("https://{}.visualstudio.com", encode(account))
}

/// Continuous delivery blade of the web app in the Azure portal
pub fn portal_url(subscription_id: &str, resource_group: &str, site_name: &str) -> String {
    format!(
        "https://portal.azure.com/#resource/subscriptions/{}/resourceGroups/{}/providers/Microsoft.Web/sites/{}/vstscd",
        encode(subscription_id),
        encode(resource_group),
        encode(site_name)
    )
}

pub fn build_definition_url(account_url: &str, project_id: &str, build_id: &str) -> String {
    format!(
        "{}/{}/_build?_a=simple-process&definitionId={}",
        account_url,
        encode(project_id),
        encode(build_id)
    )
}

pub fn release_definition_url(account_url: &str, project_id: &str, release_id: &str) -> String {
    format!(
        "{}/{}/_apps/hub/ms.vss-releaseManagement-web.hub-explorer?definitionId={}&_a=releases",
        account_url,
        encode(project_id),
        encode(release_id)
    )
}

/// Outcome of a successful provisioning run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProvisioningResult {
    pub status: String,
    pub status_message: String,
    pub azure_resource_group: String,
    pub azure_subscription_id: String,
    pub azure_website_name: String,
    pub azure_continuous_delivery_url: String,
    pub account_created: bool,
    pub account_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_definition_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_definition_url: Option<String>,
    pub step_outputs: BTreeMap<String, String>,
}

impl ProvisioningResult {
    /// Summarize a succeeded operation.
    ///
    /// `account_created` is the outcome of the local account step; the
    /// service's own `AccountCreated` output takes precedence when present.
    pub fn from_operation(
        target: &AzureTargetInfo,
        account: &str,
        account_created: bool,
        operation: &ProvisioningOperation,
    ) -> Self {
        let step_outputs: BTreeMap<String, String> = operation
            .step_outputs
            .iter()
            .map(|p| (p.name.clone(), p.value.clone()))
            .collect();

        let account_created = step_outputs
            .get(ACCOUNT_CREATED_OUTPUT)
            .map(|value| value == "1" || value.eq_ignore_ascii_case("true"))
            .unwrap_or(account_created);

        let account_url = account_url(account);
        let portal_url = portal_url(
            &target.subscription_id,
            &target.resource_group,
            &target.site_name,
        );

        let artifacts = &operation.artifacts;
        let project_id = artifacts.project.as_ref().map(|p| p.id.as_str());
        let build_definition_url = project_id
            .zip(artifacts.build_definition.as_ref())
            .map(|(project, build)| build_definition_url(&account_url, project, &build.id));
        let release_definition_url = project_id
            .zip(artifacts.release_definition.as_ref())
            .map(|(project, release)| release_definition_url(&account_url, project, &release.id));

        let status_message = format!(
            "The Team Services account '{}' was {} to handle the continuous delivery.\n\
             You can check on the status of the Azure web site deployment here:\n{}",
            account_url,
            if account_created { "created" } else { "updated" },
            portal_url
        );

        Self {
            status: STATUS_SUCCESS.to_string(),
            status_message,
            azure_resource_group: target.resource_group.clone(),
            azure_subscription_id: target.subscription_id.clone(),
            azure_website_name: target.site_name.clone(),
            azure_continuous_delivery_url: portal_url,
            account_created,
            account_url,
            build_definition_url,
            release_definition_url,
            step_outputs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::models::{CiArtifact, CiArtifacts, Credential, ProvisioningStatus};

    fn target() -> AzureTargetInfo {
        AzureTargetInfo {
            resource_group: "group1".to_string(),
            site_name: "web1".to_string(),
            credential: Credential::from_bearer("fakeCreds"),
            subscription_id: "sub1".to_string(),
            subscription_name: "subname1".to_string(),
            tenant_id: "tenant1".to_string(),
            location: "South Central US".to_string(),
        }
    }

    fn artifacts() -> CiArtifacts {
        CiArtifacts {
            project: Some(CiArtifact::new("333", "project1", "http://project-uri")),
            build_definition: Some(CiArtifact::new("123", "build1", "http://build-uri")),
            release_definition: Some(CiArtifact::new("321", "release1", "http://release-uri")),
        }
    }

    #[test]
    fn test_portal_url() {
        assert_eq!(
            portal_url("sub1", "group1", "web1"),
            "https://portal.azure.com/#resource/subscriptions/sub1/resourceGroups/group1/providers/Microsoft.Web/sites/web1/vstscd"
        );
    }

    #[test]
    fn test_urls_are_encoded() {
        assert_eq!(account_url("my account"), "https://my%20account.visualstudio.com");
        assert!(portal_url("sub1", "my group", "web1").contains("/resourceGroups/my%20group/"));
    }

    #[test]
    fn test_definition_urls() {
        let account = account_url("account1");
        assert_eq!(
            build_definition_url(&account, "333", "123"),
            "https://account1.visualstudio.com/333/_build?_a=simple-process&definitionId=123"
        );
        assert_eq!(
            release_definition_url(&account, "333", "321"),
            "https://account1.visualstudio.com/333/_apps/hub/ms.vss-releaseManagement-web.hub-explorer?definitionId=321&_a=releases"
        );
    }

    #[test]
    fn test_result_from_operation() {
        let operation = ProvisioningOperation::new("abcd", ProvisioningStatus::Succeeded)
            .with_artifacts(artifacts());

        let result = ProvisioningResult::from_operation(&target(), "account1", true, &operation);

        assert_eq!(result.status, "SUCCESS");
        assert!(result.account_created);
        assert_eq!(result.account_url, "https://account1.visualstudio.com");
        assert_eq!(result.azure_website_name, "web1");
        assert!(result.status_message.starts_with(
            "The Team Services account 'https://account1.visualstudio.com' was created"
        ));
        assert!(result.status_message.ends_with("/sites/web1/vstscd"));
        assert!(result.build_definition_url.unwrap().ends_with("definitionId=123"));
        assert!(result.release_definition_url.unwrap().contains("definitionId=321"));
    }

    #[test]
    fn test_account_created_output_wins() {
        let operation = ProvisioningOperation::new("abcd", ProvisioningStatus::Succeeded)
            .with_step_output("AccountCreated", "0");

        let result = ProvisioningResult::from_operation(&target(), "account1", true, &operation);

        assert!(!result.account_created);
        assert!(result.status_message.contains("was updated"));
        assert_eq!(result.step_outputs["AccountCreated"], "0");
    }

    #[test]
    fn test_definition_urls_need_a_project() {
        let operation =
            ProvisioningOperation::new("abcd", ProvisioningStatus::Succeeded).with_artifacts(
                CiArtifacts {
                    project: None,
                    ..artifacts()
                },
            );

        let result = ProvisioningResult::from_operation(&target(), "account1", false, &operation);

        assert!(result.build_definition_url.is_none());
        assert!(result.release_definition_url.is_none());
    }
}

//! Provisioning request payload
//!
//! Combines the Azure target, the classified repository and the validated
//! build configuration into the JSON document submitted to the continuous
//! delivery service.

use std::fmt;

use serde::Serialize;

use crate::build_config::BuildConfiguration;
use crate::classify::RepositoryDescriptor;
use crate::client::models::{Credential, Property};

/// Branch used when the caller names none
pub const DEFAULT_BRANCH: &str = "refs/heads/master";

/// Region for newly created accounts (Central US)
pub const DEFAULT_ACCOUNT_REGION: &str = "CUS";

/// The Azure web app that receives deployments
#[derive(Debug, Clone)]
pub struct AzureTargetInfo {
    pub resource_group: String,
    pub site_name: String,
    pub credential: Credential,
    pub subscription_id: String,
    pub subscription_name: String,
    pub tenant_id: String,
    pub location: String,
}

/// Source repository as given by the caller
#[derive(Debug, Clone, Default)]
pub struct RepositoryInfo {
    pub url: String,
    pub branch: Option<String>,
    pub access_token: Option<String>,
}

impl RepositoryInfo {
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            ..Self::default()
        }
    }

    /// The configured branch, or `refs/heads/master`
    pub fn branch_or_default(&self) -> &str {
        self.branch
            .as_deref()
            .filter(|b| !b.trim().is_empty())
            .unwrap_or(DEFAULT_BRANCH)
    }
}

/// Account or project to create or reuse
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceConfiguration {
    pub name: String,
    pub create: bool,
    pub properties: Vec<Property>,
}

/// Where the pipeline builds from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceConfiguration {
    pub repository: RepositoryDescriptor,
    pub branch: String,
    pub build_configuration: BuildConfiguration,
}

/// Slot to deploy to before swapping into production
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotSwapConfiguration {
    pub slot_name: String,
}

/// Header-based authorization the service uses to reach Azure
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct AuthorizationInfo {
    pub scheme: String,
    pub parameters: AuthorizationParameters,
}

#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct AuthorizationParameters {
    #[serde(rename = "Authorization")]
    pub authorization: String,
}

impl AuthorizationInfo {
    pub fn bearer(token: &str) -> Self {
        Self {
            scheme: "Headers".to_string(),
            parameters: AuthorizationParameters {
                authorization: format!("Bearer {}", token),
            },
        }
    }
}

impl fmt::Debug for AuthorizationInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthorizationInfo")
            .field("scheme", &self.scheme)
            .field("parameters", &"<redacted>")
            .finish()
    }
}

/// An Azure deployment target of the release pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvisioningTarget {
    pub provider: String,
    #[serde(rename = "type")]
    pub target_type: String,
    pub environment_type: String,
    pub friendly_name: String,
    pub subscription_id: String,
    pub subscription_name: String,
    pub tenant_id: String,
    pub resource_identifier: String,
    pub resource_group_name: String,
    pub location: String,
    pub authorization_info: AuthorizationInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slot_swap_configuration: Option<SlotSwapConfiguration>,
}

/// Complete provisioning request, submitted once per run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvisioningRequest {
    pub account_configuration: ResourceConfiguration,
    pub project_configuration: ResourceConfiguration,
    pub source: SourceConfiguration,
    pub targets: Vec<ProvisioningTarget>,
}

impl ProvisioningRequest {
    pub fn builder<'a>(
        target: &'a AzureTargetInfo,
        repository: RepositoryDescriptor,
        build: BuildConfiguration,
    ) -> ProvisioningRequestBuilder<'a> {
        ProvisioningRequestBuilder {
            target,
            repository,
            build,
            branch: DEFAULT_BRANCH.to_string(),
            account_name: String::new(),
            create_account: false,
            region: DEFAULT_ACCOUNT_REGION.to_string(),
            project_name: None,
            deployment_slot: None,
            test_webapp: None,
            auth_token: String::new(),
        }
    }
}

/// Assembles a [`ProvisioningRequest`]
pub struct ProvisioningRequestBuilder<'a> {
    target: &'a AzureTargetInfo,
    repository: RepositoryDescriptor,
    build: BuildConfiguration,
    branch: String,
    account_name: String,
    create_account: bool,
    region: String,
    project_name: Option<String>,
    deployment_slot: Option<String>,
    test_webapp: Option<String>,
    auth_token: String,
}

impl<'a> ProvisioningRequestBuilder<'a> {
    pub fn branch(mut self, branch: &str) -> Self {
        self.branch = branch.to_string();
        self
    }

    pub fn account(mut self, name: &str, create: bool, region: &str) -> Self {
        self.account_name = name.to_string();
        self.create_account = create;
        self.region = region.to_string();
        self
    }

    /// Team project to create; defaults to the site name
    pub fn project(mut self, name: Option<&str>) -> Self {
        self.project_name = name.map(str::to_string);
        self
    }

    pub fn deployment_slot(mut self, slot: Option<&str>) -> Self {
        self.deployment_slot = slot.filter(|s| !s.is_empty()).map(str::to_string);
        self
    }

    /// Web app for the load-test environment; adds a second target
    pub fn test_webapp(mut self, name: Option<&str>) -> Self {
        self.test_webapp = name.filter(|s| !s.is_empty()).map(str::to_string);
        self
    }

    pub fn auth_token(mut self, token: &str) -> Self {
        self.auth_token = token.to_string();
        self
    }

    fn deployment_target(
        &self,
        environment_type: &str,
        friendly_name: &str,
        resource_identifier: &str,
        slot: Option<&str>,
    ) -> ProvisioningTarget {
        ProvisioningTarget {
            provider: "azure".to_string(),
            target_type: "windowsAppService".to_string(),
            environment_type: environment_type.to_string(),
            friendly_name: friendly_name.to_string(),
            subscription_id: self.target.subscription_id.clone(),
            subscription_name: self.target.subscription_name.clone(),
            tenant_id: self.target.tenant_id.clone(),
            resource_identifier: resource_identifier.to_string(),
            resource_group_name: self.target.resource_group.clone(),
            location: self.target.location.clone(),
            authorization_info: AuthorizationInfo::bearer(&self.auth_token),
            slot_swap_configuration: slot.map(|slot_name| SlotSwapConfiguration {
                slot_name: slot_name.to_string(),
            }),
        }
    }

    pub fn build(self) -> ProvisioningRequest {
        let mut targets = vec![self.deployment_target(
            "production",
            "Production",
            &self.target.site_name,
            self.deployment_slot.as_deref(),
        )];
        if let Some(test_webapp) = self.test_webapp.as_deref() {
            targets.push(self.deployment_target("test", "Load Test", test_webapp, None));
        }

        let project_name = self
            .project_name
            .unwrap_or_else(|| self.target.site_name.clone());

        ProvisioningRequest {
            account_configuration: ResourceConfiguration {
                name: self.account_name,
                create: self.create_account,
                properties: vec![
                    Property::new("region", self.region),
                    Property::new("PortalExtensionUsesNewAcquisitionFlows", "false"),
                ],
            },
            project_configuration: ResourceConfiguration {
                name: project_name,
                create: true,
                properties: Vec::new(),
            },
            source: SourceConfiguration {
                repository: self.repository,
                branch: self.branch,
                build_configuration: self.build,
            },
            targets,
        }
    }
}

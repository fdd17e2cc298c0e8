//! Team Services clients
//!
//! The provisioning workflow talks to three remote services through the
//! traits in [`api`]. [`VstsClient`] implements all of them over HTTP; tests
//! use the scripted [`mock::MockProvisioningClient`].

pub mod api;
#[cfg(test)]
pub mod mock;
pub mod models;
pub mod vsts;

pub use api::{AccountManagement, ProvisioningService, RepositoryInfoLookup};
#[cfg(test)]
pub use mock::MockProvisioningClient;
pub use vsts::{Endpoints, VstsClient};

/// Application id of Team Services, used as the resource when requesting
/// Azure AD tokens for it.
pub const VSTS_APP_ID: &str = "499b84ac-1321-427f-aa17-267ca6975798";

/// Combined collaborator surface for a single backend
pub trait TeamServicesApi: RepositoryInfoLookup + AccountManagement + ProvisioningService {}

impl<T> TeamServicesApi for T where T: RepositoryInfoLookup + AccountManagement + ProvisioningService {}

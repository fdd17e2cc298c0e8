//! Collaborator traits split by responsibility
//!
//! - [`RepositoryInfoLookup`] - managed repository id lookup
//! - [`AccountManagement`] - account existence and creation
//! - [`ProvisioningService`] - pipeline submission and polling
//!
//! [`TeamServicesApi`](super::TeamServicesApi) combines all three.

mod account;
mod provisioning;
mod repository;

pub use account::AccountManagement;
pub use provisioning::ProvisioningService;
pub use repository::RepositoryInfoLookup;

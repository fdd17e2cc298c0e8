//! Team Services data models
//!
//! Types exchanged with the repository lookup, account and continuous
//! delivery services. Wire-only shapes stay `pub(crate)` and are converted
//! into the public types at the client boundary.

mod account;
mod auth;
mod provisioning;
mod repo;

pub use account::Collection;
pub(crate) use account::NameAvailability;
pub use auth::Credential;
pub(crate) use provisioning::ProvisioningConfigurationResponse;
pub use provisioning::{
    CiArtifact, CiArtifacts, Property, ProvisioningOperation, ProvisioningStatus,
};
pub(crate) use repo::VstsInfo;
pub use repo::RepositoryInfoResponse;

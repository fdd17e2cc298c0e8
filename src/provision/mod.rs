//! Continuous delivery provisioning workflow
//!
//! - [`request`] - the provisioning request payload and its builder
//! - [`orchestrator`] - the end-to-end setup run
//! - [`poll`] - poll policy, progress estimate and cancellation
//! - [`summary`] - the result shown to the user

pub mod orchestrator;
pub mod poll;
pub mod request;
pub mod summary;

pub use orchestrator::{Orchestrator, SetupRequest};
pub use poll::{CancelHandle, CancelToken, PollPolicy, cancellation};
pub use request::{AzureTargetInfo, ProvisioningRequest, RepositoryInfo};
pub use summary::ProvisioningResult;

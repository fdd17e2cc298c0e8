//! Continuous delivery provisioning trait

use async_trait::async_trait;

use crate::client::models::ProvisioningOperation;
use crate::error::Result;
use crate::provision::ProvisioningRequest;

/// Submission and status polling of provisioning operations
#[async_trait]
pub trait ProvisioningService: Send + Sync {
    /// Submit a provisioning request to the service for `account`.
    ///
    /// Returns the accepted operation, usually `queued` or `inProgress`.
    async fn submit(
        &self,
        account: &str,
        request: &ProvisioningRequest,
    ) -> Result<ProvisioningOperation>;

    /// Fetch the current state of a previously submitted operation
    async fn get_status(&self, account: &str, operation_id: &str) -> Result<ProvisioningOperation>;
}

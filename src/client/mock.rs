//! Mock Team Services client for testing
//!
//! Provides a scripted implementation of the collaborator traits for unit
//! testing the provisioning workflow without making real API calls.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::api::{AccountManagement, ProvisioningService, RepositoryInfoLookup};
use super::models::{Collection, Credential, ProvisioningOperation, RepositoryInfoResponse};
use crate::error::{ApiError, Result};
use crate::provision::ProvisioningRequest;

/// Mock client for testing.
///
/// Configure expected responses via builder methods, then use in tests.
///
/// # Example
/// ```ignore
/// let mock = MockProvisioningClient::new()
///     .with_submission(ProvisioningOperation::new("abcd", ProvisioningStatus::Queued))
///     .await
///     .with_statuses(vec![ProvisioningOperation::new("abcd", ProvisioningStatus::Succeeded)])
///     .await;
/// ```
pub struct MockProvisioningClient {
    /// Repository info returned by the lookup (NotFound when unset)
    repo_info: Arc<Mutex<Option<RepositoryInfoResponse>>>,
    /// Answer for account_exists
    account_exists: Arc<Mutex<bool>>,
    /// Collection returned by create_account
    created_collection: Arc<Mutex<Collection>>,
    /// Operation returned by submit
    submission: Arc<Mutex<Option<ProvisioningOperation>>>,
    /// Operations returned by get_status in order; the last one repeats
    statuses: Arc<Mutex<VecDeque<ProvisioningOperation>>>,
    /// Error to return from the next call (if any) - consumed on first use
    error: Arc<Mutex<Option<ApiError>>>,
    /// Track number of calls for verification
    call_count: Arc<Mutex<CallCounts>>,
    /// Requests passed to submit
    submitted: Arc<Mutex<Vec<ProvisioningRequest>>>,
}

impl Default for MockProvisioningClient {
    fn default() -> Self {
        Self {
            repo_info: Arc::new(Mutex::new(None)),
            account_exists: Arc::new(Mutex::new(false)),
            created_collection: Arc::new(Mutex::new(Collection::new(None, ""))),
            submission: Arc::new(Mutex::new(None)),
            statuses: Arc::new(Mutex::new(VecDeque::new())),
            error: Arc::new(Mutex::new(None)),
            call_count: Arc::new(Mutex::new(CallCounts::default())),
            submitted: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

/// Tracks API call counts for test verification
#[derive(Default, Debug, Clone)]
pub struct CallCounts {
    pub get_repository_info: usize,
    pub account_exists: usize,
    pub create_account: usize,
    pub submit: usize,
    pub get_status: usize,
}

impl CallCounts {
    /// Get total number of API calls made.
    pub fn total(&self) -> usize {
        self.get_repository_info
            + self.account_exists
            + self.create_account
            + self.submit
            + self.get_status
    }
}

impl MockProvisioningClient {
    /// Create a new mock client with default (empty) responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the repository lookup response.
    pub async fn with_repo_info(self, info: RepositoryInfoResponse) -> Self {
        *self.repo_info.lock().await = Some(info);
        self
    }

    /// Configure whether the account already exists.
    pub async fn with_account_exists(self, exists: bool) -> Self {
        *self.account_exists.lock().await = exists;
        self
    }

    /// Configure the collection returned by account creation.
    pub async fn with_created_collection(self, collection: Collection) -> Self {
        *self.created_collection.lock().await = collection;
        self
    }

    /// Configure the operation returned by submit.
    pub async fn with_submission(self, operation: ProvisioningOperation) -> Self {
        *self.submission.lock().await = Some(operation);
        self
    }

    /// Configure the sequence of operations returned by get_status.
    pub async fn with_statuses(self, operations: Vec<ProvisioningOperation>) -> Self {
        *self.statuses.lock().await = operations.into();
        self
    }

    /// Configure an error to return on the next call.
    pub async fn with_error(self, error: ApiError) -> Self {
        *self.error.lock().await = Some(error);
        self
    }

    /// Get call counts for verification.
    pub async fn call_counts(&self) -> CallCounts {
        self.call_count.lock().await.clone()
    }

    /// Get the requests passed to submit.
    pub async fn submitted_requests(&self) -> Vec<ProvisioningRequest> {
        self.submitted.lock().await.clone()
    }

    async fn check_error(&self) -> Result<()> {
        if let Some(err) = self.error.lock().await.take() {
            return Err(err.into());
        }
        Ok(())
    }
}

#[async_trait]
impl RepositoryInfoLookup for MockProvisioningClient {
    async fn get_repository_info(
        &self,
        url: &str,
        _credential: &Credential,
    ) -> Result<RepositoryInfoResponse> {
        self.call_count.lock().await.get_repository_info += 1;
        self.check_error().await?;
        self.repo_info
            .lock()
            .await
            .clone()
            .ok_or_else(|| ApiError::NotFound(format!("Repository {}", url)).into())
    }
}

#[async_trait]
impl AccountManagement for MockProvisioningClient {
    async fn account_exists(&self, _name: &str, _credential: &Credential) -> Result<bool> {
        self.call_count.lock().await.account_exists += 1;
        self.check_error().await?;
        Ok(*self.account_exists.lock().await)
    }

    async fn create_account(
        &self,
        _name: &str,
        _region: &str,
        _credential: &Credential,
    ) -> Result<Collection> {
        self.call_count.lock().await.create_account += 1;
        self.check_error().await?;
        Ok(self.created_collection.lock().await.clone())
    }
}

#[async_trait]
impl ProvisioningService for MockProvisioningClient {
    async fn submit(
        &self,
        _account: &str,
        request: &ProvisioningRequest,
    ) -> Result<ProvisioningOperation> {
        self.call_count.lock().await.submit += 1;
        self.check_error().await?;
        self.submitted.lock().await.push(request.clone());
        self.submission
            .lock()
            .await
            .clone()
            .ok_or_else(|| ApiError::InvalidResponse("No submission configured".into()).into())
    }

    async fn get_status(&self, _account: &str, operation_id: &str) -> Result<ProvisioningOperation> {
        self.call_count.lock().await.get_status += 1;
        self.check_error().await?;

        let mut statuses = self.statuses.lock().await;
        let next = if statuses.len() > 1 {
            statuses.pop_front()
        } else {
            statuses.front().cloned()
        };

        next.ok_or_else(|| ApiError::NotFound(format!("Operation {}", operation_id)).into())
    }
}

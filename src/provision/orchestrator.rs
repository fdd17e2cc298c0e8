//! End-to-end continuous delivery setup
//!
//! An [`Orchestrator`] is built per run from explicit collaborators. It
//! classifies the repository, validates the build configuration, makes sure
//! the account exists, submits the provisioning request and then polls the
//! operation until it reaches a terminal state.

use std::sync::Arc;

use log::{debug, info, warn};

use super::poll::{self, CancelToken, PROGRESS_MAX, PollPolicy, ProgressEstimate};
use super::request::{AzureTargetInfo, DEFAULT_ACCOUNT_REGION, ProvisioningRequest, RepositoryInfo};
use super::summary::ProvisioningResult;
use crate::build_config::{self, AppTypeDetails};
use crate::classify::{RepositoryClassifier, normalize_account_name, require_account_name};
use crate::client::models::{Credential, ProvisioningOperation, ProvisioningStatus};
use crate::client::{AccountManagement, ProvisioningService, RepositoryInfoLookup, TeamServicesApi};
use crate::error::{ConfigError, RemoteError, Result};
use crate::progress::ProgressReporter;

const PROGRESS_MESSAGE: &str = "Setting up continuous delivery";

/// Everything a single setup run needs
#[derive(Debug, Clone)]
pub struct SetupRequest {
    pub target: AzureTargetInfo,
    pub repository: RepositoryInfo,
    pub app_type: AppTypeDetails,
    /// Account name or URL; required unless the repository is managed
    pub account_name: Option<String>,
    pub create_account: bool,
    pub account_region: String,
    /// Azure AD token the service uses to deploy to the web app
    pub auth_token: String,
    pub deployment_slot: Option<String>,
    pub test_webapp: Option<String>,
}

impl SetupRequest {
    pub fn new(target: AzureTargetInfo, repository: RepositoryInfo, app_type: AppTypeDetails) -> Self {
        Self {
            target,
            repository,
            app_type,
            account_name: None,
            create_account: false,
            account_region: DEFAULT_ACCOUNT_REGION.to_string(),
            auth_token: String::new(),
            deployment_slot: None,
            test_webapp: None,
        }
    }
}

/// Drives a provisioning run against the remote services
pub struct Orchestrator {
    lookup: Arc<dyn RepositoryInfoLookup>,
    accounts: Arc<dyn AccountManagement>,
    provisioning: Arc<dyn ProvisioningService>,
    policy: PollPolicy,
    progress: Option<Arc<dyn ProgressReporter>>,
    cancel: Option<CancelToken>,
}

impl Orchestrator {
    /// Use one backend for every collaborator
    pub fn new<T>(api: Arc<T>) -> Self
    where
        T: TeamServicesApi + 'static,
    {
        Self::from_parts(api.clone(), api.clone(), api)
    }

    pub fn from_parts(
        lookup: Arc<dyn RepositoryInfoLookup>,
        accounts: Arc<dyn AccountManagement>,
        provisioning: Arc<dyn ProvisioningService>,
    ) -> Self {
        Self {
            lookup,
            accounts,
            provisioning,
            policy: PollPolicy::default(),
            progress: None,
            cancel: None,
        }
    }

    pub fn with_poll_policy(mut self, policy: PollPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_progress(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.progress = Some(reporter);
        self
    }

    pub fn with_cancellation(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    fn report(&self, count: u32, message: &str) {
        if let Some(reporter) = &self.progress {
            reporter.report(count, PROGRESS_MAX, message);
        }
    }

    /// Set up continuous delivery for the web app in `request`
    pub async fn run(&self, request: &SetupRequest) -> Result<ProvisioningResult> {
        let credential = &request.target.credential;
        let branch = request.repository.branch_or_default();

        let descriptor = RepositoryClassifier::new(self.lookup.as_ref())
            .classify(
                &request.repository.url,
                request.repository.access_token.as_deref(),
                credential,
            )
            .await?;
        require_account_name(&descriptor, request.account_name.as_deref())?;

        let account = request
            .account_name
            .as_deref()
            .map(normalize_account_name)
            .filter(|name| !name.is_empty())
            .or_else(|| descriptor.account_name.clone())
            .ok_or(ConfigError::MissingAccountName)?;

        let build = build_config::build(&request.app_type)?;

        let account_created = self
            .ensure_account(&account, request.create_account, &request.account_region, credential)
            .await?;

        let project_name = descriptor.project_name.clone();
        let provisioning_request =
            ProvisioningRequest::builder(&request.target, descriptor, build)
                .branch(branch)
                .account(&account, request.create_account, &request.account_region)
                .project(project_name.as_deref())
                .deployment_slot(request.deployment_slot.as_deref())
                .test_webapp(request.test_webapp.as_deref())
                .auth_token(&request.auth_token)
                .build();

        info!(
            "Submitting provisioning request for site {} to account {}",
            request.target.site_name, account
        );
        let submitted = self.provisioning.submit(&account, &provisioning_request).await?;
        debug!("Operation {} accepted as {}", submitted.id, submitted.status);

        let operation = match submitted.status.clone() {
            ProvisioningStatus::Failed => {
                return Err(RemoteError::ProvisioningFailed(failure_message(&submitted)).into());
            }
            ProvisioningStatus::Succeeded => {
                self.report(PROGRESS_MAX, &format!("{} (SUCCEEDED)", PROGRESS_MESSAGE));
                submitted
            }
            ProvisioningStatus::Queued | ProvisioningStatus::InProgress => {
                self.wait_for_completion(&account, &submitted.id).await?
            }
            ProvisioningStatus::Unknown(raw) => {
                return Err(RemoteError::UnknownStatus(raw).into());
            }
        };

        Ok(ProvisioningResult::from_operation(
            &request.target,
            &account,
            account_created,
            &operation,
        ))
    }

    /// Returns whether the account was created by this run
    async fn ensure_account(
        &self,
        account: &str,
        create: bool,
        region: &str,
        credential: &Credential,
    ) -> Result<bool> {
        let exists = self.accounts.account_exists(account, credential).await?;

        if exists {
            debug!("Reusing existing account {}", account);
            return Ok(false);
        }
        if !create {
            return Err(RemoteError::AccountNotFound(account.to_string()).into());
        }

        info!("Creating account {} in region {}", account, region);
        let collection = self.accounts.create_account(account, region, credential).await?;
        if collection.id.as_deref().is_none_or(str::is_empty) {
            return Err(RemoteError::AccountCreationFailed(account.to_string()).into());
        }
        Ok(true)
    }

    async fn wait_for_completion(
        &self,
        account: &str,
        operation_id: &str,
    ) -> Result<ProvisioningOperation> {
        let mut progress = ProgressEstimate::new();
        self.report(progress.current(), PROGRESS_MESSAGE);

        let mut current = self.provisioning.get_status(account, operation_id).await?;
        let mut attempts: u32 = 1;

        while current.status.is_pending() {
            if self.policy.exhausted(attempts) {
                warn!("Giving up on operation {} after {} checks", operation_id, attempts);
                return Err(RemoteError::Timeout {
                    operation_id: operation_id.to_string(),
                    attempts,
                }
                .into());
            }

            let step = progress.advance();
            self.report(step, &format!("{} ({})", PROGRESS_MESSAGE, current.status));

            if !poll::wait(self.policy.interval, self.cancel.as_ref()).await {
                return Err(RemoteError::Cancelled(operation_id.to_string()).into());
            }

            let next = self.provisioning.get_status(account, operation_id).await?;
            attempts += 1;

            // Status only moves forward; an older state is a stale read
            if next.status.rank() < current.status.rank() && next.status.rank().is_some() {
                warn!(
                    "Ignoring status {} for operation {} after {}",
                    next.status, operation_id, current.status
                );
                continue;
            }
            current = next;
        }

        match &current.status {
            ProvisioningStatus::Succeeded => {
                self.report(PROGRESS_MAX, &format!("{} (SUCCEEDED)", PROGRESS_MESSAGE));
                Ok(current)
            }
            ProvisioningStatus::Failed => {
                self.report(PROGRESS_MAX, &format!("{} (FAILED)", PROGRESS_MESSAGE));
                Err(RemoteError::ProvisioningFailed(failure_message(&current)).into())
            }
            status => Err(RemoteError::UnknownStatus(status.to_string()).into()),
        }
    }
}

fn failure_message(operation: &ProvisioningOperation) -> String {
    operation
        .result_message
        .clone()
        .unwrap_or_else(|| format!("Provisioning operation {} failed", operation.id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::time::Duration;

    use crate::client::MockProvisioningClient;
    use crate::client::models::{CiArtifact, CiArtifacts, Collection, RepositoryInfoResponse};
    use crate::error::{ApiError, Error};
    use crate::provision::poll::cancellation;

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

    fn setup_request(url: &str) -> SetupRequest {
        let mut request = SetupRequest::new(
            target(),
            RepositoryInfo::new(url),
            AppTypeDetails::new("AspNetWap"),
        );
        request.account_name = Some("https://account1.visualstudio.com".to_string());
        request.auth_token = "authInfo".to_string();
        request
    }

    fn fast_policy(max_attempts: Option<u32>) -> PollPolicy {
        PollPolicy {
            interval: Duration::ZERO,
            max_attempts,
        }
    }

    fn op(status: ProvisioningStatus) -> ProvisioningOperation {
        ProvisioningOperation::new("abcd", status)
    }

    type Reports = Arc<Mutex<Vec<(u32, u32, String)>>>;

    fn recorder() -> (Arc<dyn ProgressReporter>, Reports) {
        let reports: Reports = Arc::new(Mutex::new(Vec::new()));
        let sink = reports.clone();
        let reporter = move |count: u32, total: u32, message: &str| {
            sink.lock().unwrap().push((count, total, message.to_string()));
        };
        (Arc::new(reporter), reports)
    }

    async fn succeeding_client() -> MockProvisioningClient {
        MockProvisioningClient::new()
            .with_account_exists(true)
            .await
            .with_submission(op(ProvisioningStatus::Queued))
            .await
            .with_statuses(vec![
                op(ProvisioningStatus::InProgress),
                op(ProvisioningStatus::Succeeded),
            ])
            .await
    }

    #[tokio::test]
    async fn test_setup_succeeds() {
        let mock = Arc::new(succeeding_client().await);
        let (reporter, reports) = recorder();
        let orchestrator = Orchestrator::new(mock.clone())
            .with_poll_policy(fast_policy(None))
            .with_progress(reporter);

        let result = orchestrator
            .run(&setup_request("https://github.com/owner/repo"))
            .await
            .unwrap();

        assert_eq!(result.status, "SUCCESS");
        assert!(result.status_message.contains("https://account1.visualstudio.com"));
        assert!(!result.account_created);

        let counts = mock.call_counts().await;
        assert_eq!(counts.get_repository_info, 0);
        assert_eq!(counts.create_account, 0);
        assert_eq!(counts.submit, 1);
        assert_eq!(counts.get_status, 2);

        let submitted = mock.submitted_requests().await;
        assert_eq!(submitted[0].account_configuration.name, "account1");
        assert_eq!(submitted[0].source.branch, "refs/heads/master");
        assert_eq!(submitted[0].project_configuration.name, "web1");

        let reports = reports.lock().unwrap();
        assert_eq!(reports.first().unwrap().0, 5);
        assert_eq!(reports[1], (10, 100, "Setting up continuous delivery (inProgress)".to_string()));
        assert_eq!(
            reports.last().unwrap(),
            &(100, 100, "Setting up continuous delivery (SUCCEEDED)".to_string())
        );
        assert!(reports.windows(2).all(|w| w[0].0 <= w[1].0));
    }

    #[tokio::test]
    async fn test_setup_creates_account_and_links_definitions() {
        let artifacts = CiArtifacts {
            project: Some(CiArtifact::new("333", "project1", "http://project-uri")),
            build_definition: Some(CiArtifact::new("123", "build1", "http://build-uri")),
            release_definition: Some(CiArtifact::new("321", "release1", "http://release-uri")),
        };
        let mock = Arc::new(
            MockProvisioningClient::new()
                .with_account_exists(false)
                .await
                .with_created_collection(Collection::new(Some("111"), "account1"))
                .await
                .with_submission(op(ProvisioningStatus::InProgress))
                .await
                .with_statuses(vec![op(ProvisioningStatus::Succeeded).with_artifacts(artifacts)])
                .await,
        );
        let orchestrator = Orchestrator::new(mock.clone()).with_poll_policy(fast_policy(None));

        let mut request = setup_request("https://github.com/owner/repo");
        request.create_account = true;
        let result = orchestrator.run(&request).await.unwrap();

        assert!(result.account_created);
        assert!(result.status_message.contains("was created"));
        assert_eq!(
            result.build_definition_url.as_deref(),
            Some("https://account1.visualstudio.com/333/_build?_a=simple-process&definitionId=123")
        );
        assert_eq!(
            result.release_definition_url.as_deref(),
            Some("https://account1.visualstudio.com/333/_apps/hub/ms.vss-releaseManagement-web.hub-explorer?definitionId=321&_a=releases")
        );
        assert_eq!(mock.call_counts().await.create_account, 1);
    }

    #[tokio::test]
    async fn test_managed_repository_uses_lookup() {
        let mock = Arc::new(
            succeeding_client()
                .await
                .with_repo_info(RepositoryInfoResponse {
                    repository_id: "222".to_string(),
                    repository_name: Some("repo".to_string()),
                    project_id: Some("333".to_string()),
                    project_name: Some("project1".to_string()),
                    account_name: Some("acct".to_string()),
                })
                .await,
        );
        let orchestrator = Orchestrator::new(mock.clone()).with_poll_policy(fast_policy(None));

        let mut request = setup_request("https://acct.visualstudio.com/proj/_git/repo");
        request.account_name = None;
        let result = orchestrator.run(&request).await.unwrap();

        assert_eq!(result.account_url, "https://acct.visualstudio.com");
        let submitted = mock.submitted_requests().await;
        assert_eq!(submitted[0].source.repository.identifier, "222");
        assert_eq!(submitted[0].project_configuration.name, "project1");
    }

    #[tokio::test]
    async fn test_account_creation_without_id_fails() {
        let mock = Arc::new(
            MockProvisioningClient::new()
                .with_account_exists(false)
                .await
                .with_created_collection(Collection::new(None, "account1"))
                .await,
        );
        let orchestrator = Orchestrator::new(mock.clone());

        let mut request = setup_request("https://github.com/owner/repo");
        request.create_account = true;
        let err = orchestrator.run(&request).await.unwrap_err();

        assert!(matches!(err, Error::Remote(RemoteError::AccountCreationFailed(_))));
        assert!(err.to_string().contains("Account creation failed"));
        assert_eq!(mock.call_counts().await.submit, 0);
    }

    #[tokio::test]
    async fn test_missing_account_without_create_fails() {
        let mock = Arc::new(MockProvisioningClient::new().with_account_exists(false).await);
        let orchestrator = Orchestrator::new(mock.clone());

        let err = orchestrator
            .run(&setup_request("https://github.com/owner/repo"))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Remote(RemoteError::AccountNotFound(ref name)) if name == "account1"));
        assert_eq!(mock.call_counts().await.create_account, 0);
    }

    #[tokio::test]
    async fn test_missing_account_name_for_external_repo() {
        let mock = Arc::new(MockProvisioningClient::new());
        let orchestrator = Orchestrator::new(mock.clone());

        let mut request = setup_request("https://github.com/owner/repo");
        request.account_name = None;
        let err = orchestrator.run(&request).await.unwrap_err();

        assert!(matches!(err, Error::Config(ConfigError::MissingAccountName)));
        assert_eq!(mock.call_counts().await.total(), 0);
    }

    #[tokio::test]
    async fn test_invalid_app_type_fails_before_remote_calls() {
        let mock = Arc::new(MockProvisioningClient::new());
        let orchestrator = Orchestrator::new(mock.clone());

        let mut request = setup_request("https://github.com/owner/repo");
        request.app_type = AppTypeDetails::new("Cobol");

        assert!(orchestrator.run(&request).await.is_err());
        assert_eq!(mock.call_counts().await.total(), 0);
    }

    #[tokio::test]
    async fn test_submission_failure_is_reported() {
        let mock = Arc::new(
            MockProvisioningClient::new()
                .with_account_exists(true)
                .await
                .with_submission(op(ProvisioningStatus::Failed).with_message("quota exceeded"))
                .await,
        );
        let orchestrator = Orchestrator::new(mock.clone());

        let err = orchestrator
            .run(&setup_request("https://github.com/owner/repo"))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "quota exceeded");
        assert_eq!(mock.call_counts().await.get_status, 0);
    }

    #[tokio::test]
    async fn test_unknown_submission_status() {
        let mock = Arc::new(
            MockProvisioningClient::new()
                .with_account_exists(true)
                .await
                .with_submission(op(ProvisioningStatus::Unknown("paused".to_string())))
                .await,
        );
        let orchestrator = Orchestrator::new(mock);

        let err = orchestrator
            .run(&setup_request("https://github.com/owner/repo"))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Remote(RemoteError::UnknownStatus(ref s)) if s == "paused"));
    }

    #[tokio::test]
    async fn test_immediate_success_reports_completion_without_polling() {
        let mock = Arc::new(
            MockProvisioningClient::new()
                .with_account_exists(true)
                .await
                .with_submission(op(ProvisioningStatus::Succeeded))
                .await,
        );
        let (reporter, reports) = recorder();
        let orchestrator = Orchestrator::new(mock.clone()).with_progress(reporter);

        let result = orchestrator
            .run(&setup_request("https://github.com/owner/repo"))
            .await
            .unwrap();

        assert_eq!(result.status, "SUCCESS");
        assert_eq!(mock.call_counts().await.get_status, 0);
        assert_eq!(
            *reports.lock().unwrap(),
            vec![(100, 100, "Setting up continuous delivery (SUCCEEDED)".to_string())]
        );
    }

    #[tokio::test]
    async fn test_terminal_failure_reports_completion() {
        let mock = Arc::new(
            MockProvisioningClient::new()
                .with_account_exists(true)
                .await
                .with_submission(op(ProvisioningStatus::Queued))
                .await
                .with_statuses(vec![
                    op(ProvisioningStatus::Queued),
                    op(ProvisioningStatus::Failed).with_message("release definition failed"),
                ])
                .await,
        );
        let (reporter, reports) = recorder();
        let orchestrator = Orchestrator::new(mock)
            .with_poll_policy(fast_policy(None))
            .with_progress(reporter);

        let err = orchestrator
            .run(&setup_request("https://github.com/owner/repo"))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "release definition failed");
        assert_eq!(
            reports.lock().unwrap().last().unwrap(),
            &(100, 100, "Setting up continuous delivery (FAILED)".to_string())
        );
    }

    #[tokio::test]
    async fn test_polling_times_out() {
        let mock = Arc::new(
            MockProvisioningClient::new()
                .with_account_exists(true)
                .await
                .with_submission(op(ProvisioningStatus::Queued))
                .await
                .with_statuses(vec![op(ProvisioningStatus::InProgress)])
                .await,
        );
        let orchestrator = Orchestrator::new(mock.clone()).with_poll_policy(fast_policy(Some(3)));

        let err = orchestrator
            .run(&setup_request("https://github.com/owner/repo"))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            Error::Remote(RemoteError::Timeout { attempts: 3, .. })
        ));
        assert_eq!(mock.call_counts().await.get_status, 3);
    }

    #[tokio::test]
    async fn test_polling_is_cancellable() {
        let mock = Arc::new(
            MockProvisioningClient::new()
                .with_account_exists(true)
                .await
                .with_submission(op(ProvisioningStatus::Queued))
                .await
                .with_statuses(vec![op(ProvisioningStatus::Queued)])
                .await,
        );
        let (handle, token) = cancellation();
        handle.cancel();
        let orchestrator = Orchestrator::new(mock)
            .with_poll_policy(PollPolicy {
                interval: Duration::from_secs(3600),
                max_attempts: None,
            })
            .with_cancellation(token);

        let err = orchestrator
            .run(&setup_request("https://github.com/owner/repo"))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Remote(RemoteError::Cancelled(_))));
    }

    #[tokio::test]
    async fn test_backwards_status_is_ignored() {
        let mock = Arc::new(
            MockProvisioningClient::new()
                .with_account_exists(true)
                .await
                .with_submission(op(ProvisioningStatus::Queued))
                .await
                .with_statuses(vec![
                    op(ProvisioningStatus::InProgress),
                    op(ProvisioningStatus::Queued),
                    op(ProvisioningStatus::Succeeded),
                ])
                .await,
        );
        let (reporter, reports) = recorder();
        let orchestrator = Orchestrator::new(mock)
            .with_poll_policy(fast_policy(None))
            .with_progress(reporter);

        orchestrator
            .run(&setup_request("https://github.com/owner/repo"))
            .await
            .unwrap();

        let reports = reports.lock().unwrap();
        assert!(!reports.iter().skip(1).any(|(_, _, m)| m.ends_with("(queued)")));
    }

    #[tokio::test]
    async fn test_runs_without_reporter() {
        let mock = Arc::new(succeeding_client().await);
        let orchestrator = Orchestrator::new(mock).with_poll_policy(fast_policy(None));

        let result = orchestrator
            .run(&setup_request("https://github.com/owner/repo"))
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_transport_error_propagates() {
        let mock = Arc::new(
            MockProvisioningClient::new()
                .with_error(ApiError::Unauthorized)
                .await,
        );
        let orchestrator = Orchestrator::new(mock);

        let err = orchestrator
            .run(&setup_request("https://github.com/owner/repo"))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Api(ApiError::Unauthorized)));
    }
}

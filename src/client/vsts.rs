//! Team Services HTTP client implementation

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use log::debug;
use reqwest::{Client as HttpClient, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;

use super::api::{AccountManagement, ProvisioningService, RepositoryInfoLookup};
use super::models::{
    Collection, Credential, NameAvailability, ProvisioningConfigurationResponse,
    ProvisioningOperation, RepositoryInfoResponse, VstsInfo,
};
use crate::error::{ApiError, Result};
use crate::provision::ProvisioningRequest;

/// Host of the account acquisition service
pub const DEFAULT_ACCOUNTS_HOST: &str = "https://app.vsaex.visualstudio.com";

/// Host template of the continuous delivery service, `{account}` is substituted
pub const DEFAULT_CD_HOST: &str = "https://{account}.portalext.visualstudio.com";

const CD_API_VERSION: &str = "3.2-preview.1";
const ACCOUNTS_API_VERSION: &str = "4.0-preview.1";
const REPO_INFO_API_VERSION: &str = "3.2-preview";

/// Client-side rate limit: 6 requests per second
const RATE_LIMIT_PER_SECOND: NonZeroU32 = NonZeroU32::new(6).unwrap();

/// Service locations, overridable for testing and sovereign clouds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    /// Base URL of the account acquisition service
    pub accounts_host: String,

    /// Base URL template of the CD service; `{account}` is replaced with the
    /// account name, a template without the placeholder is used as is
    pub cd_host: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            accounts_host: DEFAULT_ACCOUNTS_HOST.to_string(),
            cd_host: DEFAULT_CD_HOST.to_string(),
        }
    }
}

impl Endpoints {
    fn cd_base(&self, account: &str) -> String {
        let encoded = urlencoding::encode(account);
        self.cd_host
            .replace("{account}", &encoded)
            .trim_end_matches('/')
            .to_string()
    }

    fn accounts_base(&self) -> &str {
        self.accounts_host.trim_end_matches('/')
    }
}

/// HTTP implementation of the repository, account and provisioning services
pub struct VstsClient {
    http: HttpClient,
    endpoints: Endpoints,
    credential: Credential,
    rate_limiter: Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
}

impl VstsClient {
    /// Create a client that authenticates provisioning calls with `credential`
    pub fn new(credential: Credential, endpoints: Endpoints) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let rate_limiter = Arc::new(RateLimiter::direct(Quota::per_second(
            RATE_LIMIT_PER_SECOND,
        )));

        Ok(Self {
            http,
            endpoints,
            credential,
            rate_limiter,
        })
    }

    /// Send an authenticated request and decode the JSON body
    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        credential: &Credential,
    ) -> Result<T> {
        self.rate_limiter.until_ready().await;

        let response = request
            .header("Authorization", credential.authorization_header())
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(ApiError::from)?;

        let status = response.status();
        match status {
            status if status.is_success() => {
                let data = response.json::<T>().await.map_err(|e| {
                    ApiError::InvalidResponse(format!("Failed to parse response: {}", e))
                })?;
                Ok(data)
            }
            StatusCode::UNAUTHORIZED => Err(ApiError::Unauthorized.into()),
            StatusCode::FORBIDDEN => Err(ApiError::Forbidden.into()),
            StatusCode::NOT_FOUND => {
                let error_msg = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Resource not found".to_string());
                Err(ApiError::NotFound(error_msg).into())
            }
            StatusCode::TOO_MANY_REQUESTS => {
                let retry_after = response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse::<u64>().ok())
                    .unwrap_or(60);
                Err(ApiError::RateLimit(Duration::from_secs(retry_after)).into())
            }
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                let error_msg = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Bad request".to_string());
                Err(ApiError::BadRequest(error_msg).into())
            }
            status if status.is_server_error() => {
                let error_msg = response
                    .text()
                    .await
                    .unwrap_or_else(|_| format!("Server error: {}", status));
                Err(ApiError::ServerError(error_msg).into())
            }
            _ => {
                let error_msg = format!("Unexpected status code: {}", status);
                Err(ApiError::InvalidResponse(error_msg).into())
            }
        }
    }
}

#[async_trait]
impl RepositoryInfoLookup for VstsClient {
    async fn get_repository_info(
        &self,
        url: &str,
        credential: &Credential,
    ) -> Result<RepositoryInfoResponse> {
        let info_url = format!("{}/vsts/info", url.trim_end_matches('/'));
        debug!("Looking up repository info at {}", info_url);

        let request = self
            .http
            .get(&info_url)
            .query(&[("api-version", REPO_INFO_API_VERSION)]);
        let info: VstsInfo = self.send(request, credential).await?;

        Ok(info.into())
    }
}

#[async_trait]
impl AccountManagement for VstsClient {
    async fn account_exists(&self, name: &str, credential: &Credential) -> Result<bool> {
        let url = format!(
            "{}/_apis/HostAcquisition/NameAvailability/{}",
            self.endpoints.accounts_base(),
            urlencoding::encode(name)
        );

        let request = self
            .http
            .get(&url)
            .query(&[("api-version", ACCOUNTS_API_VERSION)]);
        let availability: NameAvailability = self.send(request, credential).await?;

        debug!(
            "Account name {} available: {}",
            availability.name.as_deref().unwrap_or(name),
            availability.is_available
        );
        Ok(!availability.is_available)
    }

    async fn create_account(
        &self,
        name: &str,
        region: &str,
        credential: &Credential,
    ) -> Result<Collection> {
        let url = format!(
            "{}/_apis/HostAcquisition/collections",
            self.endpoints.accounts_base()
        );

        let body = serde_json::json!({
            "VisualStudio.Services.HostResolution.UseCodexDomainForHostCreation": "true"
        });

        let request = self
            .http
            .post(&url)
            .query(&[
                ("collectionName", name),
                ("preferredRegion", region),
                ("api-version", ACCOUNTS_API_VERSION),
            ])
            .json(&body);

        self.send(request, credential).await
    }
}

#[async_trait]
impl ProvisioningService for VstsClient {
    async fn submit(
        &self,
        account: &str,
        request: &ProvisioningRequest,
    ) -> Result<ProvisioningOperation> {
        let url = format!(
            "{}/_apis/ContinuousDelivery/ProvisioningConfigurations",
            self.endpoints.cd_base(account)
        );
        debug!("Submitting provisioning configuration to {}", url);

        let http_request = self
            .http
            .post(&url)
            .query(&[("api-version", CD_API_VERSION)])
            .json(request);
        let response: ProvisioningConfigurationResponse =
            self.send(http_request, &self.credential).await?;

        Ok(response.into())
    }

    async fn get_status(&self, account: &str, operation_id: &str) -> Result<ProvisioningOperation> {
        let url = format!(
            "{}/_apis/ContinuousDelivery/ProvisioningConfigurations/{}",
            self.endpoints.cd_base(account),
            urlencoding::encode(operation_id)
        );

        let request = self
            .http
            .get(&url)
            .query(&[("api-version", CD_API_VERSION)]);
        let response: ProvisioningConfigurationResponse =
            self.send(request, &self.credential).await?;

        Ok(response.into())
    }
}

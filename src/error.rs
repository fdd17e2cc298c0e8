//! Error types for cdprov

use std::time::Duration;
use thiserror::Error;

/// Result type alias for cdprov operations
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for the crate
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Interactive prompt error: {0}")]
    Dialoguer(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<dialoguer::Error> for Error {
    fn from(err: dialoguer::Error) -> Self {
        Error::Dialoguer(err.to_string())
    }
}

/// Transport errors raised by the HTTP collaborators
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Authentication failed. Check the personal access token or credential.")]
    Unauthorized,

    #[error("Access denied. You don't have permission to access this resource.")]
    Forbidden,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Rate limit exceeded. Retry after {0:?}")]
    RateLimit(Duration),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid API response: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Network("Request timed out".to_string())
        } else if err.is_connect() {
            ApiError::Network("Failed to connect to API".to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

/// Missing or malformed setup input
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(
        "Account name required for non-managed repositories. Provide --account since the repository is not hosted in Team Services."
    )]
    MissingAccountName,

    #[error("An app type is required to generate a build configuration.")]
    MissingAppType,

    #[error("Missing required setting: {0}")]
    MissingField(&'static str),

    #[error("Configuration file not found: {0}")]
    NotFound(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to save configuration: {0}")]
    SaveError(String),
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

/// App type details outside the supported whitelist
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("The app type '{value}' was not understood. Accepted values: {accepted}.")]
    UnsupportedAppType { value: String, accepted: String },

    #[error("The Node.js task runner '{value}' was not understood. Accepted values: {accepted}.")]
    UnsupportedTaskRunner { value: String, accepted: String },

    #[error("The Python framework '{value}' was not understood. Accepted values: {accepted}.")]
    UnsupportedFramework { value: String, accepted: String },

    #[error("The Python version '{value}' was not understood. Accepted values: {accepted}.")]
    UnsupportedRuntimeVersion { value: String, accepted: String },
}

/// Failures reported by, or while waiting on, the remote services
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("Account creation failed for '{0}'. The service did not return an account id.")]
    AccountCreationFailed(String),

    #[error("The Team Services account '{0}' does not exist. Use --create-account to create it.")]
    AccountNotFound(String),

    #[error("Unknown status returned from the provisioning service: {0}")]
    UnknownStatus(String),

    #[error("{0}")]
    ProvisioningFailed(String),

    #[error("Provisioning operation {operation_id} did not finish after {attempts} status checks")]
    Timeout { operation_id: String, attempts: u32 },

    #[error("Waiting for provisioning operation {0} was cancelled")]
    Cancelled(String),
}

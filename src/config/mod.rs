//! Configuration management for cdprov
//!
//! Non-secret setup defaults live in `~/.cdprov/config.yaml`. Credentials and
//! tokens are never written here; they come from flags, `CDPROV_*`
//! environment variables or an interactive prompt.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::build_config::AppTypeDetails;
use crate::client::Endpoints;
use crate::client::vsts::{DEFAULT_ACCOUNTS_HOST, DEFAULT_CD_HOST};
use crate::error::{ConfigError, Result};
use crate::provision::PollPolicy;
use crate::provision::poll::{DEFAULT_MAX_ATTEMPTS, DEFAULT_POLL_INTERVAL};
use crate::provision::request::DEFAULT_ACCOUNT_REGION;

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Target web app
    #[serde(default)]
    pub azure: AzureSection,

    /// Source repository
    #[serde(default)]
    pub repository: RepositorySection,

    /// Team Services account
    #[serde(default)]
    pub account: AccountSection,

    /// App type details for the build definition
    #[serde(default)]
    pub app: AppTypeDetails,

    #[serde(default)]
    pub polling: PollingSection,

    #[serde(default)]
    pub endpoints: EndpointsSection,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AzureSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_group: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscription_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscription_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositorySection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSection {
    /// Account name or URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default = "default_region")]
    pub region: String,

    /// Create the account when it does not exist
    #[serde(default)]
    pub create: bool,
}

fn default_region() -> String {
    DEFAULT_ACCOUNT_REGION.to_string()
}

impl Default for AccountSection {
    fn default() -> Self {
        Self {
            name: None,
            region: default_region(),
            create: false,
        }
    }
}

/// Poll settings for the provisioning operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollingSection {
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,

    /// `0` polls until the operation finishes
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

fn default_interval_secs() -> u64 {
    DEFAULT_POLL_INTERVAL.as_secs()
}

fn default_max_attempts() -> u32 {
    DEFAULT_MAX_ATTEMPTS
}

impl Default for PollingSection {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            max_attempts: default_max_attempts(),
        }
    }
}

impl PollingSection {
    pub fn policy(&self) -> PollPolicy {
        PollPolicy {
            interval: Duration::from_secs(self.interval_secs),
            max_attempts: (self.max_attempts > 0).then_some(self.max_attempts),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointsSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accounts_host: Option<String>,

    /// May contain an `{account}` placeholder
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cd_host: Option<String>,
}

impl EndpointsSection {
    pub fn resolve(&self) -> Endpoints {
        Endpoints {
            accounts_host: self
                .accounts_host
                .clone()
                .unwrap_or_else(|| DEFAULT_ACCOUNTS_HOST.to_string()),
            cd_host: self
                .cd_host
                .clone()
                .unwrap_or_else(|| DEFAULT_CD_HOST.to_string()),
        }
    }
}

impl Config {
    /// Get the default config file path
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or(ConfigError::Invalid(
            "Could not determine home directory".to_string(),
        ))?;

        Ok(home.join(".cdprov").join("config.yaml"))
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()).into());
        }

        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents).map_err(ConfigError::from)?;

        Ok(config)
    }

    /// Load from `path` (or the default path), falling back to defaults
    /// when no file exists
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => Self::default_path()?,
        };

        match Self::load_from(&path) {
            Err(crate::error::Error::Config(ConfigError::NotFound(_))) => {
                log::debug!("No configuration at {}, using defaults", path.display());
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// Save configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents =
            serde_yaml::to_string(self).map_err(|e| ConfigError::SaveError(e.to_string()))?;

        std::fs::write(path, contents)?;

        // The file names tenants and subscriptions, keep it private
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = std::fs::metadata(path)?.permissions();
            perms.set_mode(0o600);
            std::fs::set_permissions(path, perms)?;
        }

        Ok(())
    }
}

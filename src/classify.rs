//! Repository URL classification
//!
//! A repository URL is matched against an ordered rule table, first match
//! wins. Only Team Services Git URLs need a remote lookup to learn the
//! repository id; every other provider is resolved from the URL alone.

use std::sync::LazyLock;

use log::debug;
use regex::{Captures, Regex};
use serde::Serialize;

use crate::client::RepositoryInfoLookup;
use crate::client::models::{Credential, Property};
use crate::error::{ConfigError, Result};

/// Source control provider, serialized as the service's numeric code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(into = "u8")]
pub enum RepositoryProvider {
    /// Git repository hosted in Team Services
    VstsGit,
    /// GitHub repository
    GitHub,
    /// TFVC project hosted in Team Services
    Tfvc,
    /// Any other Git remote
    ExternalGit,
}

impl RepositoryProvider {
    pub fn code(self) -> u8 {
        match self {
            Self::VstsGit => 1,
            Self::GitHub => 2,
            Self::Tfvc => 3,
            Self::ExternalGit => 4,
        }
    }

    /// Whether the repository lives in a Team Services account
    pub fn is_managed(self) -> bool {
        matches!(self, Self::VstsGit | Self::Tfvc)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::VstsGit => "Team Services Git",
            Self::GitHub => "GitHub",
            Self::Tfvc => "Team Services TFVC",
            Self::ExternalGit => "External Git",
        }
    }
}

impl From<RepositoryProvider> for u8 {
    fn from(provider: RepositoryProvider) -> Self {
        provider.code()
    }
}

/// Normalized description of a source repository.
///
/// Serializes to the `sourceRepository` shape of a provisioning request;
/// the account and project names are local only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryDescriptor {
    #[serde(rename = "repositoryType")]
    pub provider: RepositoryProvider,

    /// Repository id, GitHub `owner/repo` path, TFVC project path or raw URL
    pub identifier: String,

    /// Provider specific properties, e.g. the GitHub access token
    pub properties: Vec<Property>,

    #[serde(skip)]
    pub account_name: Option<String>,

    #[serde(skip)]
    pub project_name: Option<String>,
}

/// Outcome of matching a URL against the rule table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleMatch {
    pub provider: RepositoryProvider,
    pub identifier: String,
    pub account_name: Option<String>,
}

type Extractor = fn(&Captures<'_>, &str) -> RuleMatch;

/// Ordered rules. The `_git` patterns must precede the TFVC pattern since
/// both match `<account>.visualstudio.com` URLs, and the `dev.azure.com`
/// pattern must precede the generic `_git` one whose account is the first
/// host label.
const RULES: &[(&str, Extractor)] = &[
    (
        r"(?i)^https?://(?:[^@/]+@)?dev\.azure\.com/([^/]+)/(?:.*/)?_git/[^/?#]+",
        managed_git,
    ),
    (
        r"(?i)^https?://(?:[^@/]+@)?([^./@:]+)\.[^/]+/(?:.*/)?_git/[^/?#]+",
        managed_git,
    ),
    (r"(?i)^https?://github\.com/([^/]+/[^/].*?)/?$", github),
    (
        r"(?i)^https?://(?:[^@/]+@)?([^./@]+)\.visualstudio\.com/(.+)",
        tfvc,
    ),
];

static COMPILED_RULES: LazyLock<Vec<(Regex, Extractor)>> = LazyLock::new(|| {
    RULES
        .iter()
        .map(|(pattern, extract)| (Regex::new(pattern).expect("valid regex"), *extract))
        .collect()
});

fn managed_git(caps: &Captures<'_>, url: &str) -> RuleMatch {
    RuleMatch {
        provider: RepositoryProvider::VstsGit,
        // Replaced by the looked-up repository id
        identifier: url.to_string(),
        account_name: Some(caps[1].to_string()),
    }
}

fn github(caps: &Captures<'_>, _url: &str) -> RuleMatch {
    RuleMatch {
        provider: RepositoryProvider::GitHub,
        identifier: caps[1].to_string(),
        account_name: None,
    }
}

fn tfvc(caps: &Captures<'_>, _url: &str) -> RuleMatch {
    RuleMatch {
        provider: RepositoryProvider::Tfvc,
        identifier: caps[2].to_string(),
        account_name: Some(caps[1].to_string()),
    }
}

/// Match a URL against the rule table without any I/O.
///
/// Unmatched URLs are external Git remotes identified by the URL itself.
pub fn match_rule(url: &str) -> RuleMatch {
    COMPILED_RULES
        .iter()
        .find_map(|(re, extract)| re.captures(url).map(|caps| extract(&caps, url)))
        .unwrap_or_else(|| RuleMatch {
            provider: RepositoryProvider::ExternalGit,
            identifier: url.to_string(),
            account_name: None,
        })
}

/// Resolves repository URLs into [`RepositoryDescriptor`]s
pub struct RepositoryClassifier<'a> {
    lookup: &'a dyn RepositoryInfoLookup,
}

impl<'a> RepositoryClassifier<'a> {
    pub fn new(lookup: &'a dyn RepositoryInfoLookup) -> Self {
        Self { lookup }
    }

    /// Classify `url`, looking up the repository id for Team Services Git
    /// URLs. A failed lookup fails the classification.
    pub async fn classify(
        &self,
        url: &str,
        access_token: Option<&str>,
        credential: &Credential,
    ) -> Result<RepositoryDescriptor> {
        let rule = match_rule(url);
        debug!("Repository {} matched {}", url, rule.provider.label());

        let descriptor = match rule.provider {
            RepositoryProvider::VstsGit => {
                let info = self.lookup.get_repository_info(url, credential).await?;
                RepositoryDescriptor {
                    provider: rule.provider,
                    identifier: info.repository_id,
                    properties: Vec::new(),
                    account_name: info.account_name.or(rule.account_name),
                    project_name: info.project_name,
                }
            }
            RepositoryProvider::GitHub => RepositoryDescriptor {
                provider: rule.provider,
                identifier: rule.identifier,
                properties: vec![Property::new("accessToken", access_token.unwrap_or_default())],
                account_name: None,
                project_name: None,
            },
            RepositoryProvider::Tfvc | RepositoryProvider::ExternalGit => RepositoryDescriptor {
                provider: rule.provider,
                identifier: rule.identifier,
                properties: Vec::new(),
                account_name: rule.account_name,
                project_name: None,
            },
        };

        Ok(descriptor)
    }
}

/// Non-managed repositories carry no account, so the caller must name one.
pub fn require_account_name(
    descriptor: &RepositoryDescriptor,
    account_name: Option<&str>,
) -> Result<()> {
    let missing = account_name.is_none_or(|name| name.trim().is_empty());
    if !descriptor.provider.is_managed() && missing {
        return Err(ConfigError::MissingAccountName.into());
    }
    Ok(())
}

static ACCOUNT_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^https?://(?:([^./]+)\.visualstudio\.com|dev\.azure\.com/([^/]+))")
        .expect("valid regex")
});

/// Accept either a bare account name or the account URL.
///
/// `https://account1.visualstudio.com` and `https://dev.azure.com/account1`
/// both become `account1`.
pub fn normalize_account_name(raw: &str) -> String {
    let raw = raw.trim();
    ACCOUNT_URL
        .captures(raw)
        .and_then(|caps| caps.get(1).or_else(|| caps.get(2)))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| raw.to_string())
}

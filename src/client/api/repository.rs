//! Repository lookup trait

use async_trait::async_trait;

use crate::client::models::{Credential, RepositoryInfoResponse};
use crate::error::Result;

/// Resolves a Team Services Git URL to its authoritative ids
///
/// Only managed-repository URLs are looked up; other providers are
/// classified from the URL alone.
#[async_trait]
pub trait RepositoryInfoLookup: Send + Sync {
    /// Fetch the repository id, team project and account behind `url`
    async fn get_repository_info(
        &self,
        url: &str,
        credential: &Credential,
    ) -> Result<RepositoryInfoResponse>;
}

//! Account management trait

use async_trait::async_trait;

use crate::client::models::{Collection, Credential};
use crate::error::Result;

/// Team Services account (collection) operations
#[async_trait]
pub trait AccountManagement: Send + Sync {
    /// Whether an account with this name already exists
    async fn account_exists(&self, name: &str, credential: &Credential) -> Result<bool>;

    /// Create an account in the given region.
    ///
    /// The service signals failure with a collection that has no id rather
    /// than an error status, so callers must check `Collection::id`.
    async fn create_account(
        &self,
        name: &str,
        region: &str,
        credential: &Credential,
    ) -> Result<Collection>;
}

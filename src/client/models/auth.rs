//! Authentication models

use std::fmt;

use base64::{Engine as _, engine::general_purpose};

/// Opaque credential used to reach Team Services on the caller's behalf.
///
/// The value is a personal access token or an Azure AD bearer token; it is
/// never validated locally and never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    kind: CredentialKind,
    secret: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CredentialKind {
    PersonalAccessToken,
    Bearer,
}

impl Credential {
    /// Wrap a personal access token (sent as basic auth with an empty user)
    pub fn from_pat(pat: impl Into<String>) -> Self {
        Self {
            kind: CredentialKind::PersonalAccessToken,
            secret: pat.into(),
        }
    }

    /// Wrap an Azure AD access token (sent as a bearer token)
    pub fn from_bearer(token: impl Into<String>) -> Self {
        Self {
            kind: CredentialKind::Bearer,
            secret: token.into(),
        }
    }

    /// Value for the `Authorization` header
    pub fn authorization_header(&self) -> String {
        match self.kind {
            CredentialKind::PersonalAccessToken => {
                let encoded = general_purpose::STANDARD.encode(format!(":{}", self.secret));
                format!("Basic {}", encoded)
            }
            CredentialKind::Bearer => format!("Bearer {}", self.secret),
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("kind", &self.kind)
            .field("secret", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pat_uses_basic_auth_with_empty_user() {
        let cred = Credential::from_pat("abc");
        // base64(":abc")
        assert_eq!(cred.authorization_header(), "Basic OmFiYw==");
    }

    #[test]
    fn test_bearer_header() {
        let cred = Credential::from_bearer("token-1");
        assert_eq!(cred.authorization_header(), "Bearer token-1");
    }

    #[test]
    fn test_debug_redacts_secret() {
        let cred = Credential::from_pat("super-secret");
        let debug = format!("{:?}", cred);
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("redacted"));
    }
}

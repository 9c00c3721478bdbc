//! Authentication state shared with the HTTP layer.

use std::sync::Arc;

use crate::basic::{BasicCredentials, basic_challenge};
use crate::error::AuthError;
use crate::manager::{AuthenticationManager, Principal};
use crate::password::PasswordEncoding;
use crate::policy::SecurityPolicy;
use crate::users::UsersService;

/// Default realm sent in `WWW-Authenticate` challenges.
pub const DEFAULT_REALM: &str = "medlab";

/// State required for Basic authentication and access checks.
///
/// Include it in the application state and hand it to the security
/// middleware. When `enabled` is false every request is let through without
/// reading credentials.
#[derive(Debug, Clone)]
pub struct AuthState {
    pub enabled: bool,
    pub realm: String,
    pub manager: AuthenticationManager,
    pub policy: Arc<SecurityPolicy>,
}

impl AuthState {
    /// Builds the clinic security setup: the single-account user store with
    /// passwords written by `encoding`, and the clinic access rules.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::PasswordHash` if the account password cannot be
    /// encoded.
    pub fn clinic(encoding: PasswordEncoding) -> Result<Self, AuthError> {
        let users = UsersService::new(&*encoding.encoder())?;
        Ok(Self {
            enabled: true,
            realm: DEFAULT_REALM.to_string(),
            manager: AuthenticationManager::new(Arc::new(users)),
            policy: Arc::new(SecurityPolicy::clinic()),
        })
    }

    /// Sets whether access rules are enforced.
    #[must_use]
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Sets the realm announced in challenges.
    #[must_use]
    pub fn with_realm(mut self, realm: impl Into<String>) -> Self {
        self.realm = realm.into();
        self
    }

    /// Value of the `WWW-Authenticate` header for this realm.
    pub fn challenge(&self) -> String {
        basic_challenge(&self.realm)
    }

    /// Authenticates decoded Basic credentials.
    pub async fn authenticate(&self, credentials: &BasicCredentials) -> Result<Principal, AuthError> {
        self.manager
            .authenticate(&credentials.username, &credentials.password)
            .await
    }
}

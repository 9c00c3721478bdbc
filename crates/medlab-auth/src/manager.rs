//! Username/password authentication.

use std::sync::Arc;

use crate::error::AuthError;
use crate::password::verify_encoded;
use crate::users::UserDetailsService;

/// An authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub username: String,
    pub authorities: Vec<String>,
}

impl Principal {
    pub fn has_authority(&self, authority: &str) -> bool {
        self.authorities.iter().any(|a| a == authority)
    }
}

/// Checks username/password pairs against a [`UserDetailsService`].
#[derive(Clone)]
pub struct AuthenticationManager {
    users: Arc<dyn UserDetailsService>,
}

impl AuthenticationManager {
    pub fn new(users: Arc<dyn UserDetailsService>) -> Self {
        Self { users }
    }

    /// Authenticates `username` with `password`.
    ///
    /// # Errors
    ///
    /// - `AuthError::UnknownUser` if the user does not exist
    /// - `AuthError::WrongPassword` if the password does not match
    /// - `AuthError::PasswordHash` if the stored password cannot be checked
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<Principal, AuthError> {
        let user = self.users.load_user_by_username(username).await?;

        if !verify_encoded(password, &user.password)? {
            tracing::debug!(username, "Password mismatch");
            return Err(AuthError::wrong_password(username));
        }

        Ok(Principal {
            username: user.username,
            authorities: user.authorities,
        })
    }
}

impl std::fmt::Debug for AuthenticationManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthenticationManager").finish_non_exhaustive()
    }
}

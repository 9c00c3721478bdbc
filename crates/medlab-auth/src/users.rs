//! User lookup.

use async_trait::async_trait;

use crate::error::AuthError;
use crate::password::PasswordEncoder;

/// The single account known to [`UsersService`].
pub const ADMIN_USERNAME: &str = "admin";

/// Authority granted to the admin account.
pub const DOCTOR_AUTHORITY: &str = "DOCTOR";

const ADMIN_PASSWORD: &str = "pippo";

/// Credential record of one account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserDetails {
    pub username: String,
    /// Encoded password, see [`crate::password`].
    pub password: String,
    pub authorities: Vec<String>,
}

impl UserDetails {
    pub fn has_authority(&self, authority: &str) -> bool {
        self.authorities.iter().any(|a| a == authority)
    }
}

/// Looks up credential records by username.
#[async_trait]
pub trait UserDetailsService: Send + Sync {
    /// Returns the record for `username`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UnknownUser` if no such account exists.
    async fn load_user_by_username(&self, username: &str) -> Result<UserDetails, AuthError>;
}

/// Fixed single-account user store.
///
/// Knows only `admin`, with the `DOCTOR` authority. The password is encoded
/// once, at construction.
#[derive(Debug, Clone)]
pub struct UsersService {
    admin: UserDetails,
}

impl UsersService {
    /// Builds the store, encoding the admin password with `encoder`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::PasswordHash` if encoding fails.
    pub fn new(encoder: &dyn PasswordEncoder) -> Result<Self, AuthError> {
        Ok(Self {
            admin: UserDetails {
                username: ADMIN_USERNAME.to_string(),
                password: encoder.encode(ADMIN_PASSWORD)?,
                authorities: vec![DOCTOR_AUTHORITY.to_string()],
            },
        })
    }
}

#[async_trait]
impl UserDetailsService for UsersService {
    async fn load_user_by_username(&self, username: &str) -> Result<UserDetails, AuthError> {
        if username == self.admin.username {
            Ok(self.admin.clone())
        } else {
            tracing::debug!(username, "User not found");
            Err(AuthError::unknown_user(username))
        }
    }
}

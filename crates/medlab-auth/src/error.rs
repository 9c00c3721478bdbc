//! Authentication and authorization error types.

/// Errors that can occur during authentication and authorization.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No account exists for the given username.
    #[error("User not found: {username}")]
    UnknownUser {
        /// The username that was looked up.
        username: String,
    },

    /// The account exists but the password does not match.
    #[error("Bad credentials for user {username}")]
    WrongPassword {
        /// The username that failed to authenticate.
        username: String,
    },

    /// The request lacks valid authentication credentials.
    #[error("Unauthorized: {message}")]
    Unauthorized {
        /// Description of why the request is unauthorized.
        message: String,
    },

    /// The authenticated user does not have permission to perform the action.
    #[error("Forbidden: {message}")]
    Forbidden {
        /// Description of why access is forbidden.
        message: String,
    },

    /// Hashing or verifying a password failed.
    #[error("Password hashing error: {message}")]
    PasswordHash {
        /// Description of the hashing failure.
        message: String,
    },

    /// The Authorization header is malformed.
    #[error("Invalid Authorization header: {message}")]
    InvalidHeader {
        /// Description of the problem.
        message: String,
    },
}

impl AuthError {
    /// Creates a new `UnknownUser` error.
    #[must_use]
    pub fn unknown_user(username: impl Into<String>) -> Self {
        Self::UnknownUser {
            username: username.into(),
        }
    }

    /// Creates a new `WrongPassword` error.
    #[must_use]
    pub fn wrong_password(username: impl Into<String>) -> Self {
        Self::WrongPassword {
            username: username.into(),
        }
    }

    /// Creates a new `Unauthorized` error.
    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    /// Creates a new `Forbidden` error.
    #[must_use]
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }

    /// Creates a new `InvalidHeader` error.
    #[must_use]
    pub fn invalid_header(message: impl Into<String>) -> Self {
        Self::InvalidHeader {
            message: message.into(),
        }
    }

    /// Returns `true` if the error means the caller failed to authenticate.
    ///
    /// Unknown users and wrong passwords are both reported to clients as
    /// plain bad credentials.
    #[must_use]
    pub fn is_bad_credentials(&self) -> bool {
        matches!(
            self,
            Self::UnknownUser { .. }
                | Self::WrongPassword { .. }
                | Self::Unauthorized { .. }
                | Self::InvalidHeader { .. }
        )
    }
}

impl From<argon2::password_hash::Error> for AuthError {
    fn from(err: argon2::password_hash::Error) -> Self {
        Self::PasswordHash {
            message: err.to_string(),
        }
    }
}

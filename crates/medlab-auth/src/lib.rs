//! Authentication and authorization for the MedLab server.
//!
//! - [`basic`]: HTTP Basic header parsing
//! - [`users`]: the single-account user store
//! - [`manager`]: username/password authentication
//! - [`password`]: Argon2 and plain-text password encoders
//! - [`policy`]: per-route access rules
//! - [`state`]: the bundle handed to the HTTP middleware

pub mod basic;
pub mod error;
pub mod manager;
pub mod password;
pub mod policy;
pub mod state;
pub mod users;

pub use basic::{BasicCredentials, basic_challenge, parse_basic_auth};
pub use error::AuthError;
pub use manager::{AuthenticationManager, Principal};
pub use password::{
    Argon2PasswordEncoder, NoopPasswordEncoder, PasswordEncoder, PasswordEncoding, verify_encoded,
};
pub use policy::{AccessDecision, Requirement, SecurityPolicy};
pub use state::{AuthState, DEFAULT_REALM};
pub use users::{DOCTOR_AUTHORITY, UserDetails, UserDetailsService, UsersService};

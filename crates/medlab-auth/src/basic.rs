//! HTTP Basic credentials.

use base64::{Engine, engine::general_purpose::STANDARD};

use crate::error::AuthError;

/// Username and password decoded from an `Authorization: Basic` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicCredentials {
    pub username: String,
    pub password: String,
}

/// Parse Basic Auth header.
///
/// Extracts credentials from "Basic <base64>" format. The scheme name is
/// matched case-insensitively.
pub fn parse_basic_auth(header: &str) -> Result<BasicCredentials, AuthError> {
    let (scheme, credentials) = header
        .trim()
        .split_once(' ')
        .ok_or_else(|| AuthError::invalid_header("Authorization header must start with 'Basic '"))?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return Err(AuthError::invalid_header(
            "Authorization header must start with 'Basic '",
        ));
    }

    let decoded = STANDARD
        .decode(credentials.trim())
        .map_err(|_| AuthError::invalid_header("Invalid base64 encoding in Authorization header"))?;

    let credentials_str = String::from_utf8(decoded)
        .map_err(|_| AuthError::invalid_header("Invalid UTF-8 in decoded credentials"))?;

    let (username, password) = credentials_str
        .split_once(':')
        .ok_or_else(|| AuthError::invalid_header("Credentials must be in format 'username:password'"))?;

    Ok(BasicCredentials {
        username: username.to_string(),
        password: password.to_string(),
    })
}

/// Value of the `WWW-Authenticate` challenge for `realm`.
pub fn basic_challenge(realm: &str) -> String {
    format!("Basic realm=\"{realm}\"")
}

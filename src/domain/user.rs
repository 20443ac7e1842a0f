//! Authenticated identities and login validation.

use std::fmt;

use crate::errors::AuthError;

/// An identity resolved by the user directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    login: String,
}

impl User {
    pub fn new(login: impl Into<String>) -> Result<Self, AuthError> {
        let login = login.into();
        validate_login(&login)?;
        Ok(Self { login })
    }

    pub fn login(&self) -> &str {
        &self.login
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.login)
    }
}

/// Checks that `login` is non-blank and safe to embed in a storage record name.
pub fn validate_login(login: &str) -> Result<(), AuthError> {
    if login.trim().is_empty() {
        return Err(AuthError::BlankLogin);
    }
    if login.contains('/') || login.contains('\\') || login.contains("..") {
        return Err(AuthError::InvalidLogin(login.to_string()));
    }
    Ok(())
}

//! Bearer credential handed to the gateway at construction.

use std::fmt;

use crate::error::SessionError;

/// Opaque bearer token. Never printed by `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Result<Self, SessionError> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(SessionError::MissingCredential);
        }
        Ok(Self(token.trim().to_string()))
    }

    /// Build from an optional source (flag or environment variable).
    pub fn from_optional(token: Option<String>) -> Result<Self, SessionError> {
        token
            .ok_or(SessionError::MissingCredential)
            .and_then(Self::new)
    }

    pub(crate) fn token(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_or_absent_token_is_missing_credential() {
        assert_eq!(Credential::new("  "), Err(SessionError::MissingCredential));
        assert_eq!(
            Credential::from_optional(None),
            Err(SessionError::MissingCredential)
        );
    }

    #[test]
    fn debug_hides_token() {
        let credential = Credential::new("secret-token").expect("credential");
        assert_eq!(credential.token(), "secret-token");
        assert_eq!(format!("{credential:?}"), "Credential(***)");
    }
}

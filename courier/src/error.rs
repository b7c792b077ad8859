//! Failure taxonomy surfaced by [`RouteSession`](crate::session::RouteSession).

use thiserror::Error;

use crate::exit_codes;

/// Why a session operation did not take effect.
///
/// Every variant except [`SessionError::Network`] is detected locally, before
/// any remote call, and never touches the snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// No bearer credential was supplied.
    #[error("missing bearer credential")]
    MissingCredential,

    /// Input rejected client-side (e.g. an empty address).
    #[error("invalid input: {0}")]
    Validation(String),

    /// Mutation attempted against a route that no longer accepts it.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Referenced stop is absent from the current snapshot.
    #[error("not found: {0}")]
    NotFound(String),

    /// No snapshot has been loaded yet.
    #[error("route not loaded")]
    NotLoaded,

    /// Remote call failed, returned an error status, or returned unusable data.
    #[error("network failure: {0}")]
    Network(String),
}

impl SessionError {
    pub(crate) fn network(err: anyhow::Error) -> Self {
        SessionError::Network(format!("{err:#}"))
    }

    /// True when the failure was detected without contacting the remote.
    pub fn is_local(&self) -> bool {
        !matches!(self, SessionError::Network(_))
    }

    /// Stable CLI exit code for this failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            SessionError::MissingCredential => exit_codes::MISSING_CREDENTIAL,
            SessionError::Validation(_)
            | SessionError::Conflict(_)
            | SessionError::NotFound(_)
            | SessionError::NotLoaded => exit_codes::REJECTED,
            SessionError::Network(_) => exit_codes::NETWORK,
        }
    }
}

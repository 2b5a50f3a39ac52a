//! Error taxonomy shared across the workspace.
//!
//! Each failure kind is its own typed error; [`LightError`] aggregates the
//! ones the core can return and converts via `#[from]`.

use std::time::Duration;

use crate::light::LightState;

/// Top-level error returned by the reconciliation core.
#[derive(Debug, thiserror::Error)]
pub enum LightError {
    #[error("malformed request")]
    Decode(#[from] DecodeError),

    #[error("write conflict")]
    Conflict(#[from] ConflictError),

    #[error("state store unavailable")]
    StoreUnavailable(#[from] StoreUnavailableError),

    /// The runtime stopped before the write could run.
    #[error("shutting down")]
    Shutdown,
}

impl LightError {
    /// The state that won the race, when this is a conflict.
    #[must_use]
    pub fn current(&self) -> Option<&LightState> {
        match self {
            Self::Conflict(err) => Some(&err.current),
            _ => None,
        }
    }
}

/// An inbound payload could not be turned into a change request.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("missing field `{0}`")]
    MissingField(&'static str),

    #[error("invalid JSON payload")]
    InvalidJson(#[source] serde_json::Error),

    #[error("field `{field}` must be a {expected}")]
    InvalidParam {
        field: &'static str,
        expected: &'static str,
    },

    #[error("unknown scene `{0}`")]
    UnknownScene(String),
}

/// A conditional write observed a revision that is no longer current.
#[derive(Debug, thiserror::Error)]
#[error("expected a different revision, store is at {current}")]
pub struct ConflictError {
    pub current: LightState,
}

/// Exclusive write access could not be acquired in time.
///
/// With a single writer at a time this points at a stuck write, not at load.
#[derive(Debug, thiserror::Error)]
#[error("write access not acquired within {waited:?}")]
pub struct StoreUnavailableError {
    pub waited: Duration,
}

/// Failure reported by an external collaborator (cloud agent, light driver).
#[derive(Debug, thiserror::Error)]
#[error("{port} failed")]
pub struct PortError {
    pub port: &'static str,
    #[source]
    pub source: Box<dyn std::error::Error + Send + Sync>,
}

impl PortError {
    /// Wrap any error raised by the named port.
    pub fn new(
        port: &'static str,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self {
            port,
            source: source.into(),
        }
    }
}

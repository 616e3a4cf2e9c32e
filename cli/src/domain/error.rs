//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `std::fs`, `std::process`, or `std::net`.
//! Lifecycle operations return `LifecycleError` directly so callers can tell its
//! kinds apart; the other enums convert to `anyhow::Error` via the `?` operator.

use btsctl_common::ParseStatusError;
use thiserror::Error;

// ── Lifecycle errors ──────────────────────────────────────────────────────────

/// Errors raised while addressing or driving a managed resource.
///
/// Every kind propagates to the caller unmodified; nothing in the lifecycle
/// layer retries or substitutes a default state.
#[derive(Debug, Error)]
pub enum LifecycleError {
    /// A named resource is absent from its collection.
    #[error("{kind} '{name}' cannot be found in BizTalk Server Group [{group}].")]
    NotFound {
        kind: &'static str,
        name: String,
        group: String,
    },

    /// A handle was requested for something that is not a managed resource.
    #[error("{0}")]
    InvalidArgument(String),

    /// The remote object could not be fetched, or a call could not reach or parse a response.
    #[error("Management backend unavailable: {0}")]
    BackendUnavailable(String),

    /// The backend reported a status outside the known enumeration.
    #[error("Backend reported an {0}.")]
    UnrecognizedState(#[from] ParseStatusError),

    /// The backend rejected a primitive call from what was believed to be a valid state.
    #[error(
        "{resource} rejected '{verb}': {reason}\n\nThe resource may have been changed concurrently; re-query its status and retry."
    )]
    InvalidTransition {
        resource: String,
        verb: &'static str,
        reason: String,
    },
}

impl LifecycleError {
    /// Stable machine-readable code, used by `--json` error output.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
            Self::InvalidArgument(_) => "invalid_argument",
            Self::BackendUnavailable(_) => "backend_unavailable",
            Self::UnrecognizedState(_) => "unrecognized_state",
            Self::InvalidTransition { .. } => "invalid_transition",
        }
    }

    /// `true` for the only kind a caller may act on by re-querying and retrying.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::InvalidTransition { .. })
    }
}

// ── Installation errors ───────────────────────────────────────────────────────

/// Errors raised when a discovered installation value is needed but missing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InstallationError {
    #[error("BizTalk Server is not installed.")]
    NotInstalled,

    #[error("BizTalk Server installation is incomplete; {value} could not be determined.")]
    Incomplete { value: &'static str },
}

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors related to configuration key/value validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unknown setting: {key}\n\nValid settings: {valid}")]
    UnknownKey { key: String, valid: String },

    #[error("Invalid value for {key}: {value}\n\n{hint}")]
    InvalidValue {
        key: String,
        value: String,
        hint: String,
    },
}

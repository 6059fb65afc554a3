//! Lookup failure taxonomy.

use thiserror::Error;

/// Shown when the service rejects a lookup without a usable `detail`.
pub const NOT_FOUND_MESSAGE: &str = "Weather data not found";

/// Why a submission ended in the failed phase.
///
/// `Display` is the exact text shown to the user. All variants are terminal
/// for the submission that produced them; nothing is retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// The identifier was empty after trimming. Never reaches the network.
    #[error("Please enter a weather request ID")]
    EmptyIdentifier,

    /// The service answered with an error status.
    #[error("{message}")]
    Rejected { status: u16, message: String },

    /// The identifier cannot be placed in a request path (`.` or `..`).
    #[error("Weather request ID '{0}' cannot be looked up")]
    Unaddressable(String),

    /// The request could not complete or the success body was unreadable.
    /// `cause` is kept for logs, not for display.
    #[error("Network error: Could not connect to the server")]
    Transport { cause: String },
}

impl LookupError {
    pub fn transport(cause: impl std::fmt::Display) -> Self {
        Self::Transport { cause: cause.to_string() }
    }
}

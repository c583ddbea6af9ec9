//! Error types for algoviz-core.

use thiserror::Error;

/// Result type for algoviz-core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Why a run was abandoned at a checkpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Cancelled {
    /// The user stopped the run.
    #[error("run stopped")]
    Stopped,

    /// A newer run was started; this one is stale.
    #[error("run superseded by a newer run")]
    Superseded,
}

/// Errors that can occur while driving a run.
#[derive(Debug, Error)]
pub enum Error {
    /// The run observed cancellation at a checkpoint.
    ///
    /// Not a fault: drivers swallow it and abandon the run.
    #[error("cancelled: {0}")]
    Cancelled(#[from] Cancelled),

    /// Input rejected before the run started.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// Build an [`Error::InvalidInput`].
    pub fn invalid(msg: impl Into<String>) -> Self {
        Error::InvalidInput(msg.into())
    }

    /// True if this is a cancellation rather than a real failure.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Error::Cancelled(_))
    }
}

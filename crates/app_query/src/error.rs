//! Query layer error types

use thiserror::Error;

/// Failures surfaced by the query coordination layer.
///
/// Transport failures mean the command itself could not be run; they are
/// always raised and never stored in the cache. Command failures are the
/// backend's own structured errors and are cached like values so that the
/// presentation layer can render a degraded state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("transport failure: {0}")]
    Transport(String),

    #[error("{0}")]
    Command(String),

    #[error("resource loader is shut down")]
    LoaderClosed,
}

impl QueryError {
    /// Did the command fail to run at all?
    pub fn is_transport(&self) -> bool {
        matches!(self, QueryError::Transport(_) | QueryError::LoaderClosed)
    }

    /// Did the command run and report a structured error?
    pub fn is_command(&self) -> bool {
        matches!(self, QueryError::Command(_))
    }
}

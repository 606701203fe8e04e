//! Command gateway result shapes
//!
//! Every backend command resolves to a uniform discriminated result: the
//! command either produced data or reported a structured error. Call sites
//! that treat a command failure as exceptional unwrap it with
//! [`resolve_command`]; call sites that branch on it keep the
//! [`CommandResult`] as-is.

use crate::QueryError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A structured error reported by a backend command that ran to completion.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("{message}")]
pub struct CommandError {
    pub message: String,
}

impl CommandError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<CommandError> for QueryError {
    fn from(err: CommandError) -> Self {
        QueryError::Command(err.message)
    }
}

/// Uniform result of a backend command invocation.
pub type CommandResult<T> = Result<T, CommandError>;

/// Convert a backend-reported error into a raised [`QueryError`], keeping
/// the original error payload as the label.
pub fn resolve_command<T>(result: CommandResult<T>) -> Result<T, QueryError> {
    result.map_err(QueryError::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_passes_data_through() {
        let result: CommandResult<u32> = Ok(7);
        assert_eq!(resolve_command(result).unwrap(), 7);
    }

    #[test]
    fn resolve_raises_command_errors() {
        let result: CommandResult<u32> = Err(CommandError::new("Can't read the folder!"));
        let err = resolve_command(result).unwrap_err();
        assert_eq!(err, QueryError::Command("Can't read the folder!".into()));
        assert!(err.is_command());
        assert!(!err.is_transport());
    }
}

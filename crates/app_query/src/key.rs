//! Cache key derivation
//!
//! A key is the command name plus a canonical serialization of the
//! arguments. Two calls with structurally equal arguments collide to the
//! same key no matter where they come from; different commands never
//! collide because the command name prefixes the key.

use crate::QueryError;
use serde::Serialize;
use std::fmt;

/// Canonical identity of a command invocation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    command: &'static str,
    args: String,
}

impl QueryKey {
    /// Derive the key for `command` called with `args`.
    ///
    /// Serialization failure is a transport failure: the call could not
    /// even be identified, let alone made.
    pub fn new<A: Serialize + ?Sized>(command: &'static str, args: &A) -> Result<Self, QueryError> {
        let args = serde_json::to_string(args)
            .map_err(|err| QueryError::Transport(format!("can't serialize query arguments: {err}")))?;

        Ok(Self { command, args })
    }

    pub fn command(&self) -> &str {
        self.command
    }

    pub fn args_json(&self) -> &str {
        &self.args
    }

    pub fn matches_command(&self, command: &str) -> bool {
        self.command == command
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.command, self.args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_args_collide() {
        let a = QueryKey::new("get_fs_info", "/photos").unwrap();
        let b = QueryKey::new("get_fs_info", &String::from("/photos")).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn different_args_diverge() {
        let a = QueryKey::new("get_fs_info", "/photos").unwrap();
        let b = QueryKey::new("get_fs_info", "/videos").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn different_commands_never_collide() {
        let a = QueryKey::new("get_fs_info", "/photos").unwrap();
        let b = QueryKey::new("get_fs_children_infos", "/photos").unwrap();
        assert_ne!(a, b);
        assert!(a.matches_command("get_fs_info"));
        assert!(!a.matches_command("get_fs_children_infos"));
    }

    #[test]
    fn structural_identity_for_sequences() {
        let a = QueryKey::new("convert_pathvec_to_path", &["a", "b"]).unwrap();
        let b = QueryKey::new(
            "convert_pathvec_to_path",
            &vec!["a".to_string(), "b".to_string()],
        )
        .unwrap();
        let c = QueryKey::new("convert_pathvec_to_path", &["a", "c"]).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}

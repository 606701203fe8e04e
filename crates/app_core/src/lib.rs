//! almanac Browsing Core
//!
//! This crate wires the query coordination layer to the filesystem
//! backend commands:
//! - Gateway trait over the backend commands
//! - Canonical cache key constructors
//! - Browsing session (cache, resource loader, retry policy)
//! - Invalidation coordination for mutating commands
//! - Asset resolution seam
//! - Configuration

pub mod asset;
pub mod backend;
pub mod config;
pub mod keys;
pub mod session;

pub use asset::{AssetResolver, FileUrlResolver};
pub use backend::{FsBackend, LocalFsBackend};
pub use config::AppConfig;
pub use session::{QueryOptions, Session, ThumbnailOptions};

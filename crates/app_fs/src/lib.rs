//! almanac File System Backend Commands
//!
//! Implements the browsing commands behind the query layer:
//! - Path ↔ pathvec conversion
//! - File/folder info, detail and children listings
//! - Filesystem identity hashing
//! - View-count store
//! - Thumbnail generation
//! - Opening paths with the system handler

mod browse;
mod id;
mod info;
mod launch;
mod pathvec;
mod thumbnail;
mod views;

pub use browse::{fs_children_infos, fs_detail, fs_info};
pub use id::fs_id;
pub use info::{
    mime_of, FileDetail, FileInfo, FolderDetail, FolderInfo, FsDetail, FsId, FsInfo,
};
pub use launch::open_path;
pub use pathvec::{normalize, path_to_pathvec, pathvec_to_path};
pub use thumbnail::{is_thumbnail_supported, thumbnail_path};
pub use views::ViewStore;

use thiserror::Error;

/// File system errors
#[derive(Error, Debug)]
pub enum FsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("The path doesn't exist: {0}")]
    NotFound(String),

    #[error("The path must be a file: {0}")]
    NotAFile(String),

    #[error("Unsupported file type: {0}")]
    Unsupported(String),

    #[error("Image error: {0}")]
    Image(String),

    #[error("Store error: {0}")]
    Store(String),
}

pub type Result<T> = std::result::Result<T, FsError>;

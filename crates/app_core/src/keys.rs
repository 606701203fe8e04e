//! Canonical cache key constructors
//!
//! One constructor per backend command, so every call site - read
//! queries and the invalidation coordinator alike - derives the exact
//! same key shape. An invalidation that builds its key any other way
//! silently fails to match.

use app_query::{QueryError, QueryKey};

/// Backend command names; unique within the system.
pub mod command {
    pub const CONVERT_PATH_TO_PATHVEC: &str = "convert_path_to_pathvec";
    pub const CONVERT_PATHVEC_TO_PATH: &str = "convert_pathvec_to_path";
    pub const GET_FS_INFO: &str = "get_fs_info";
    pub const GET_FS_CHILDREN_INFOS: &str = "get_fs_children_infos";
    pub const GET_FS_DETAIL: &str = "get_fs_detail";
    pub const GET_THUMBNAIL_PATH: &str = "get_thumbnail_path";
    pub const OPEN_PATH: &str = "open_path";
}

pub fn path_as_pathvec(path: &str) -> Result<QueryKey, QueryError> {
    QueryKey::new(command::CONVERT_PATH_TO_PATHVEC, path)
}

pub fn pathvec_as_path(pathvec: &[String]) -> Result<QueryKey, QueryError> {
    QueryKey::new(command::CONVERT_PATHVEC_TO_PATH, pathvec)
}

pub fn fs_info(path: &str) -> Result<QueryKey, QueryError> {
    QueryKey::new(command::GET_FS_INFO, path)
}

/// Key for a folder's children listing. Shared by the read query and by
/// the invalidation coordinator after a mutation.
pub fn fs_children(path: &str) -> Result<QueryKey, QueryError> {
    QueryKey::new(command::GET_FS_CHILDREN_INFOS, path)
}

pub fn fs_detail(path: &str) -> Result<QueryKey, QueryError> {
    QueryKey::new(command::GET_FS_DETAIL, path)
}

pub fn thumbnail(path: &str) -> Result<QueryKey, QueryError> {
    QueryKey::new(command::GET_THUMBNAIL_PATH, path)
}

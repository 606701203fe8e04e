//! Gateway to the backend browsing commands
//!
//! Every command returns `Result<CommandResult<T>, QueryError>`: the
//! outer layer is delivery (a transport failure means the command never
//! ran to completion), the inner layer is the command's own verdict.
//! The split matters to the cache, which stores command errors but
//! never transport ones.

use app_fs::{FsDetail, FsInfo, ViewStore};
use app_query::{CommandError, CommandResult, QueryError};
use async_trait::async_trait;
use std::path::PathBuf;

#[async_trait]
pub trait FsBackend: Send + Sync {
    /// Split a display path into its components. Pure conversion, never
    /// touches the disk.
    async fn convert_path_to_pathvec(&self, path: &str) -> Result<Vec<String>, QueryError>;

    /// Join components back into a display path. Pure conversion.
    async fn convert_pathvec_to_path(&self, pathvec: &[String]) -> Result<String, QueryError>;

    async fn get_fs_info(&self, path: &str) -> Result<CommandResult<FsInfo>, QueryError>;

    async fn get_fs_children_infos(&self, path: &str)
        -> Result<CommandResult<Vec<FsInfo>>, QueryError>;

    async fn get_fs_detail(&self, path: &str) -> Result<CommandResult<FsDetail>, QueryError>;

    /// Produce (or reuse) a thumbnail for the entry and return its local
    /// path. Expensive; callers route this through the resource loader.
    async fn get_thumbnail_path(&self, path: &str) -> Result<CommandResult<PathBuf>, QueryError>;

    /// Open the entry with the system handler. Mutating.
    async fn open_path(&self, path: &str) -> Result<CommandResult<()>, QueryError>;
}

/// Backend over the local disk.
pub struct LocalFsBackend {
    views: ViewStore,
    thumbnail_cache_dir: PathBuf,
}

impl LocalFsBackend {
    pub fn new(views: ViewStore, thumbnail_cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            views,
            thumbnail_cache_dir: thumbnail_cache_dir.into(),
        }
    }
}

fn to_command_result<T>(result: app_fs::Result<T>) -> CommandResult<T> {
    result.map_err(|err| CommandError::new(err.to_string()))
}

#[async_trait]
impl FsBackend for LocalFsBackend {
    async fn convert_path_to_pathvec(&self, path: &str) -> Result<Vec<String>, QueryError> {
        Ok(app_fs::path_to_pathvec(path))
    }

    async fn convert_pathvec_to_path(&self, pathvec: &[String]) -> Result<String, QueryError> {
        Ok(app_fs::pathvec_to_path(pathvec))
    }

    async fn get_fs_info(&self, path: &str) -> Result<CommandResult<FsInfo>, QueryError> {
        Ok(to_command_result(app_fs::fs_info(path, &self.views)))
    }

    async fn get_fs_children_infos(
        &self,
        path: &str,
    ) -> Result<CommandResult<Vec<FsInfo>>, QueryError> {
        Ok(to_command_result(app_fs::fs_children_infos(
            path,
            &self.views,
        )))
    }

    async fn get_fs_detail(&self, path: &str) -> Result<CommandResult<FsDetail>, QueryError> {
        Ok(to_command_result(app_fs::fs_detail(path)))
    }

    async fn get_thumbnail_path(&self, path: &str) -> Result<CommandResult<PathBuf>, QueryError> {
        // Image decoding blocks; keep it off the async runtime.
        let path = path.to_owned();
        let cache_dir = self.thumbnail_cache_dir.clone();
        let result = tokio::task::spawn_blocking(move || app_fs::thumbnail_path(&path, &cache_dir))
            .await
            .map_err(|err| QueryError::Transport(format!("thumbnail task failed: {err}")))?;
        Ok(to_command_result(result))
    }

    async fn open_path(&self, path: &str) -> Result<CommandResult<()>, QueryError> {
        Ok(to_command_result(app_fs::open_path(path, &self.views)))
    }
}

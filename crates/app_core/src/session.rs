//! Browsing session
//!
//! One `Session` owns the query cache, the thumbnail loader and the
//! display retry policy, and exposes the read queries and mutations the
//! presentation layer works with. Construction is explicit; nothing in
//! here lives in a global.

use crate::asset::{AssetResolver, FileUrlResolver};
use crate::backend::FsBackend;
use crate::keys;
use app_fs::{FsDetail, FsInfo};
use app_query::{
    resolve_command, DisplayRetryPolicy, QueryCache, QueryError, ResourceLoader, RetryDecision,
};
use std::path::PathBuf;
use std::sync::Arc;

/// Per-call options for gated queries.
#[derive(Debug, Clone, Copy)]
pub struct QueryOptions {
    /// When false the query is tracked but never fetched.
    pub enabled: bool,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self { enabled: true }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ThumbnailOptions {
    /// Visual-importance hint forwarded to the resource loader.
    pub priority: i64,
    pub enabled: bool,
}

impl Default for ThumbnailOptions {
    fn default() -> Self {
        Self {
            priority: 0,
            enabled: true,
        }
    }
}

pub struct Session {
    backend: Arc<dyn FsBackend>,
    assets: Arc<dyn AssetResolver>,
    cache: QueryCache,
    thumbnails: ResourceLoader<PathBuf>,
    retry: DisplayRetryPolicy,
}

impl Session {
    /// Must be called from within a runtime; the thumbnail loader spawns
    /// its worker immediately.
    pub fn new(backend: Arc<dyn FsBackend>, assets: Arc<dyn AssetResolver>) -> Self {
        Self {
            backend,
            assets,
            cache: QueryCache::new(),
            thumbnails: ResourceLoader::new(),
            retry: DisplayRetryPolicy::new(),
        }
    }

    pub fn with_file_urls(backend: Arc<dyn FsBackend>) -> Self {
        Self::new(backend, Arc::new(FileUrlResolver))
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    pub async fn path_as_pathvec(&self, path: &str) -> Result<Arc<Vec<String>>, QueryError> {
        let key = keys::path_as_pathvec(path)?;
        let backend = self.backend.clone();
        let path = path.to_owned();
        self.cache
            .fetch(key, move || {
                let backend = backend.clone();
                let path = path.clone();
                async move { backend.convert_path_to_pathvec(&path).await }
            })
            .await
    }

    pub async fn pathvec_as_path(&self, pathvec: &[String]) -> Result<Arc<String>, QueryError> {
        let key = keys::pathvec_as_path(pathvec)?;
        let backend = self.backend.clone();
        let pathvec = pathvec.to_vec();
        self.cache
            .fetch(key, move || {
                let backend = backend.clone();
                let pathvec = pathvec.clone();
                async move { backend.convert_pathvec_to_path(&pathvec).await }
            })
            .await
    }

    pub async fn fs_info(&self, path: &str) -> Result<Arc<FsInfo>, QueryError> {
        let key = keys::fs_info(path)?;
        let backend = self.backend.clone();
        let path = path.to_owned();
        self.cache
            .fetch(key, move || {
                let backend = backend.clone();
                let path = path.clone();
                async move { resolve_command(backend.get_fs_info(&path).await?) }
            })
            .await
    }

    /// Children listing of a folder. Disabled calls register the query
    /// without fetching and return `None`; the eventual enabled call
    /// performs the single fetch.
    pub async fn fs_children_infos(
        &self,
        path: &str,
        options: QueryOptions,
    ) -> Result<Option<Arc<Vec<FsInfo>>>, QueryError> {
        let key = keys::fs_children(path)?;
        let backend = self.backend.clone();
        let path = path.to_owned();
        let fetcher = move || {
            let backend = backend.clone();
            let path = path.clone();
            async move { resolve_command(backend.get_fs_children_infos(&path).await?) }
        };

        if !options.enabled {
            self.cache.register(key, fetcher);
            return Ok(None);
        }
        self.cache.fetch(key, fetcher).await.map(Some)
    }

    pub async fn fs_detail(
        &self,
        path: &str,
        options: QueryOptions,
    ) -> Result<Option<Arc<FsDetail>>, QueryError> {
        let key = keys::fs_detail(path)?;
        let backend = self.backend.clone();
        let path = path.to_owned();
        let fetcher = move || {
            let backend = backend.clone();
            let path = path.clone();
            async move { resolve_command(backend.get_fs_detail(&path).await?) }
        };

        if !options.enabled {
            self.cache.register(key, fetcher);
            return Ok(None);
        }
        self.cache.fetch(key, fetcher).await.map(Some)
    }

    /// Displayable thumbnail reference for `path`.
    ///
    /// The fetch runs through the bounded resource loader, the local
    /// result goes through the asset resolver, and the returned
    /// reference carries the current display attempt so repeated
    /// renders of the same source are distinguishable.
    pub async fn thumbnail_src(
        &self,
        path: &str,
        options: ThumbnailOptions,
    ) -> Result<Option<String>, QueryError> {
        let key = keys::thumbnail(path)?;
        let backend = self.backend.clone();
        let loader = self.thumbnails.clone();
        let assets = self.assets.clone();
        let path = path.to_owned();
        let identity = key.clone();
        let priority = options.priority;
        let fetcher = move || {
            let backend = backend.clone();
            let loader = loader.clone();
            let assets = assets.clone();
            let path = path.clone();
            let identity = identity.clone();
            async move {
                let local = loader
                    .submit(identity, priority, async move {
                        resolve_command(backend.get_thumbnail_path(&path).await?)
                    })
                    .await?;
                Ok(assets.resolve(&local))
            }
        };

        if !options.enabled {
            self.cache.register(key, fetcher);
            return Ok(None);
        }
        let src = self.cache.fetch(key.clone(), fetcher).await?;
        Ok(Some(self.retry.tag_reference(&key, &src)))
    }

    /// The presentation layer failed to render a thumbnail it was
    /// handed. Within the retry budget the resource is re-fetched and a
    /// fresh reference returned; past it, `None`.
    pub async fn report_display_failure(&self, path: &str) -> Result<Option<String>, QueryError> {
        let key = keys::thumbnail(path)?;
        match self.retry.on_display_failure(&key) {
            RetryDecision::Exhausted => {
                tracing::warn!(key = %key, "thumbnail display retries exhausted");
                Ok(None)
            }
            RetryDecision::Retry { attempt } => {
                tracing::debug!(key = %key, attempt, "retrying thumbnail after display failure");
                self.cache.invalidate(&key);
                self.thumbnail_src(path, ThumbnailOptions::default()).await
            }
        }
    }

    /// The thumbnail rendered; forget its failure history.
    pub fn report_display_success(&self, path: &str) -> Result<(), QueryError> {
        let key = keys::thumbnail(path)?;
        self.retry.reset(&key);
        Ok(())
    }

    /// Open an entry with the system handler. On success the parent
    /// folder's children listing is invalidated so the next observation
    /// sees fresh data (view counters change on open). A failed open
    /// invalidates nothing.
    pub async fn open_path(&self, path: &str) -> Result<(), QueryError> {
        resolve_command(self.backend.open_path(path).await?)?;
        self.invalidate_parent_listing(path).await
    }

    async fn invalidate_parent_listing(&self, path: &str) -> Result<(), QueryError> {
        let pathvec = self.backend.convert_path_to_pathvec(path).await?;
        let parent_len = pathvec.len().saturating_sub(1);
        let parent = self
            .backend
            .convert_pathvec_to_path(&pathvec[..parent_len])
            .await?;
        self.cache.invalidate(&keys::fs_children(&parent)?);
        tracing::debug!(parent = %parent, "invalidated children listing after open");
        Ok(())
    }
}

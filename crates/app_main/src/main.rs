//! almanac - cached filesystem browsing
//!
//! Small driver around the browsing session: resolve the requested
//! path, list a folder's children with details, or show a single file
//! with its thumbnail reference.

use anyhow::{Context, Result};
use app_core::{AppConfig, LocalFsBackend, QueryOptions, Session, ThumbnailOptions};
use app_fs::ViewStore;
use app_query::QueryError;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    app_log::init().context("Failed to initialize logging")?;
    if let Err(err) = app_log::cleanup_old_logs(7) {
        tracing::warn!("Failed to cleanup old logs: {}", err);
    }

    let config = AppConfig::load().unwrap_or_else(|err| {
        tracing::warn!("Failed to load config, using defaults: {:#}", err);
        AppConfig::default()
    });

    let path = std::env::args().nth(1).unwrap_or_else(|| ".".to_owned());
    tracing::info!(path = %path, "starting browse");

    let views = ViewStore::open(config.view_store_path());
    let backend = LocalFsBackend::new(views, config.thumbnail_cache_dir());
    let session = Session::with_file_urls(Arc::new(backend));

    browse(&session, &path).await
}

async fn browse(session: &Session, path: &str) -> Result<()> {
    let pathvec = session.path_as_pathvec(path).await?;
    let info = session.fs_info(path).await?;
    println!("{}  [{}]", info.path(), pathvec.join(" > "));

    let children = session
        .fs_children_infos(
            path,
            QueryOptions {
                enabled: info.is_folder(),
            },
        )
        .await?;

    match children {
        Some(children) => {
            for (index, child) in children.iter().enumerate() {
                print_entry(session, child, index as i64).await;
            }
            println!("{} entries", children.len());
        }
        None => print_entry(session, &info, 0).await,
    }
    Ok(())
}

async fn print_entry(session: &Session, info: &app_fs::FsInfo, priority: i64) {
    let kind = if info.is_folder() { "dir " } else { "file" };
    let mut line = format!("{kind}  {}", info.name());

    match session
        .fs_detail(info.path(), QueryOptions::default())
        .await
    {
        Ok(Some(detail)) => match detail.as_ref() {
            app_fs::FsDetail::File(file) => {
                if let Some(mime) = &file.mime {
                    line.push_str(&format!("  {mime}"));
                }
            }
            app_fs::FsDetail::Folder(folder) => {
                if let Some(total) = folder.total_items {
                    line.push_str(&format!("  {total} items"));
                }
            }
        },
        Ok(None) => {}
        Err(err) => tracing::debug!(path = %info.path(), "detail unavailable: {}", err),
    }

    if info.is_file() {
        match session
            .thumbnail_src(
                info.path(),
                ThumbnailOptions {
                    priority,
                    enabled: true,
                },
            )
            .await
        {
            Ok(Some(src)) => line.push_str(&format!("  {src}")),
            Ok(None) => {}
            // Unsupported formats are a command verdict, not a failure.
            Err(QueryError::Command(_)) => {}
            Err(err) => tracing::warn!(path = %info.path(), "thumbnail failed: {}", err),
        }
    }

    println!("{line}");
}

//! Opening paths with the system handler

use crate::id::fs_id;
use crate::views::ViewStore;
use crate::{FsError, Result};
use std::path::Path;

/// Open a path with the platform's default handler and bump its view
/// counter. Mutating: callers are expected to invalidate the parent
/// listing afterwards.
pub fn open_path(path: &str, views: &ViewStore) -> Result<()> {
    let location = Path::new(path);
    if !location.try_exists()? {
        return Err(FsError::NotFound(path.to_owned()));
    }

    ::open::that_detached(path)?;
    views.increase_total_views(&fs_id(location))?;

    tracing::info!(path = %path, "opened path");
    Ok(())
}

//! Thumbnail generation
//!
//! Renders a bounded thumbnail for supported images into the cache
//! directory, keyed by the file's identity so edits invalidate the
//! rendered file while renames reuse it.

use crate::id::fs_id;
use crate::info::mime_of;
use crate::{FsError, Result};
use std::path::{Path, PathBuf};

/// Bounding box for generated thumbnails.
pub const THUMBNAIL_MAX_WIDTH: u32 = 930;
pub const THUMBNAIL_MAX_HEIGHT: u32 = 480;

/// Can a thumbnail be generated for this path?
pub fn is_thumbnail_supported(path: &Path) -> bool {
    matches!(
        mime_of(path).as_deref(),
        Some("image/jpeg" | "image/png" | "image/webp" | "image/bmp" | "image/gif")
    )
}

/// Return the local path of the entry's thumbnail, generating it if it
/// does not exist yet.
pub fn thumbnail_path(path: &str, cache_dir: &Path) -> Result<PathBuf> {
    let location = Path::new(path);
    if !location.try_exists()? {
        return Err(FsError::NotFound(path.to_owned()));
    }
    if !location.is_file() {
        return Err(FsError::NotAFile(path.to_owned()));
    }
    if !is_thumbnail_supported(location) {
        return Err(FsError::Unsupported(path.to_owned()));
    }

    let id = fs_id(location);
    let target = cache_dir.join(format!("{}.png", id));
    if target.try_exists().unwrap_or(false) {
        return Ok(target);
    }

    std::fs::create_dir_all(cache_dir)?;

    tracing::debug!(path = %path, target = %target.display(), "generating thumbnail");
    let decoded = image::open(location).map_err(|err| FsError::Image(err.to_string()))?;
    let thumbnail = decoded.thumbnail(THUMBNAIL_MAX_WIDTH, THUMBNAIL_MAX_HEIGHT);
    thumbnail
        .save(&target)
        .map_err(|err| FsError::Image(err.to_string()))?;

    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;

    fn write_test_image(path: &Path, width: u32, height: u32) {
        RgbaImage::new(width, height).save(path).unwrap();
    }

    #[test]
    fn generates_and_reuses_a_thumbnail() {
        let dir = tempfile::tempdir().unwrap();
        let cache = dir.path().join("cache");
        let source = dir.path().join("photo.png");
        write_test_image(&source, 1600, 1200);

        let first = thumbnail_path(&source.to_string_lossy(), &cache).unwrap();
        assert!(first.exists());

        let modified = std::fs::metadata(&first).unwrap().modified().unwrap();
        let second = thumbnail_path(&source.to_string_lossy(), &cache).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            std::fs::metadata(&second).unwrap().modified().unwrap(),
            modified
        );
    }

    #[test]
    fn thumbnail_fits_the_bounding_box() {
        let dir = tempfile::tempdir().unwrap();
        let cache = dir.path().join("cache");
        let source = dir.path().join("wide.png");
        write_test_image(&source, 4000, 1000);

        let path = thumbnail_path(&source.to_string_lossy(), &cache).unwrap();
        let thumbnail = image::open(path).unwrap();

        assert!(thumbnail.width() <= THUMBNAIL_MAX_WIDTH);
        assert!(thumbnail.height() <= THUMBNAIL_MAX_HEIGHT);
    }

    #[test]
    fn unsupported_files_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let cache = dir.path().join("cache");
        let source = dir.path().join("notes.txt");
        std::fs::write(&source, b"text").unwrap();

        let err = thumbnail_path(&source.to_string_lossy(), &cache).unwrap_err();
        assert!(matches!(err, FsError::Unsupported(_)));
    }

    #[test]
    fn folders_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let cache = dir.path().join("cache");

        let err = thumbnail_path(&dir.path().to_string_lossy(), &cache).unwrap_err();
        assert!(matches!(err, FsError::NotAFile(_)));
    }
}

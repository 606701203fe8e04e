//! Directory browsing commands - info, detail and children listings

use crate::id::fs_id;
use crate::info::{
    mime_of, FileDetail, FileInfo, FolderDetail, FolderInfo, FsDetail, FsInfo,
};
use crate::views::ViewStore;
use crate::{FsError, Result};
use std::fs::Metadata;
use std::path::Path;

/// Describe a single filesystem entry.
pub fn fs_info(path: &str, views: &ViewStore) -> Result<FsInfo> {
    let location = Path::new(path);
    if !location.try_exists()? {
        return Err(FsError::NotFound(path.to_owned()));
    }

    let id = fs_id(location);

    if location.is_file() {
        let metadata = location.metadata().ok();
        let name = entry_name(location).ok_or_else(|| FsError::NotFound(path.to_owned()))?;

        Ok(FsInfo::File(FileInfo {
            total_views: views.total_views(&id),
            id,
            name,
            path: path.to_owned(),
            size: metadata.as_ref().and_then(size_of),
            modified_time: metadata.as_ref().and_then(|meta| meta.modified().ok()),
        }))
    } else {
        let name = entry_name(location).unwrap_or_else(|| path.to_owned());

        Ok(FsInfo::Folder(FolderInfo {
            id,
            name,
            path: path.to_owned(),
        }))
    }
}

/// Describe every child of a folder. Children that disappear or can't be
/// read mid-listing are skipped; only a failed enumeration is an error.
pub fn fs_children_infos(path: &str, views: &ViewStore) -> Result<Vec<FsInfo>> {
    let location = Path::new(path);
    let entries = std::fs::read_dir(location)?;

    let mut infos = Vec::new();
    for entry in entries {
        let Ok(entry) = entry else {
            continue;
        };

        let child_path = entry.path().to_string_lossy().into_owned();
        match fs_info(&child_path, views) {
            Ok(info) => infos.push(info),
            Err(err) => {
                tracing::debug!(path = %child_path, error = %err, "skipping unreadable child");
            }
        }
    }

    Ok(infos)
}

/// Expensive-to-compute detail for an entry: mime type for files, item
/// count for folders (nullable when the folder can't be enumerated).
pub fn fs_detail(path: &str) -> Result<FsDetail> {
    let location = Path::new(path);
    if !location.try_exists()? {
        return Err(FsError::NotFound(path.to_owned()));
    }

    if location.is_file() {
        Ok(FsDetail::File(FileDetail {
            mime: mime_of(location),
        }))
    } else {
        let total_items = std::fs::read_dir(location)
            .ok()
            .map(|entries| entries.count() as i64);

        Ok(FsDetail::Folder(FolderDetail { total_items }))
    }
}

fn entry_name(path: &Path) -> Option<String> {
    path.file_name().map(|name| name.to_string_lossy().into_owned())
}

fn size_of(metadata: &Metadata) -> Option<i64> {
    metadata.len().try_into().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(dir: &Path) -> ViewStore {
        ViewStore::open(dir.join("views.json"))
    }

    #[test]
    fn file_info_carries_size_and_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, b"hello").unwrap();
        let views = store(dir.path());

        let info = fs_info(&path.to_string_lossy(), &views).unwrap();
        let FsInfo::File(file) = info else {
            panic!("expected a file");
        };

        assert_eq!(file.name, "notes.txt");
        assert_eq!(file.size, Some(5));
        assert!(file.modified_time.is_some());
        assert_eq!(file.total_views, None);
    }

    #[test]
    fn folder_info_discriminates() {
        let dir = tempfile::tempdir().unwrap();
        let views = store(dir.path());

        let info = fs_info(&dir.path().to_string_lossy(), &views).unwrap();
        assert!(info.is_folder());
    }

    #[test]
    fn missing_path_is_a_domain_error() {
        let dir = tempfile::tempdir().unwrap();
        let views = store(dir.path());
        let missing = dir.path().join("nope.txt");

        let err = fs_info(&missing.to_string_lossy(), &views).unwrap_err();
        assert!(matches!(err, FsError::NotFound(_)));
    }

    #[test]
    fn children_lists_files_and_folders() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), b"a").unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        let views = store(dir.path());

        let mut children = fs_children_infos(&dir.path().to_string_lossy(), &views).unwrap();
        children.sort_by(|a, b| a.name().cmp(b.name()));

        let names: Vec<_> = children.iter().map(FsInfo::name).collect();
        assert!(names.contains(&"a.txt"));
        assert!(names.contains(&"sub"));
    }

    #[test]
    fn detail_counts_folder_items() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), b"a").unwrap();
        std::fs::write(dir.path().join("b.txt"), b"b").unwrap();

        let detail = fs_detail(&dir.path().to_string_lossy()).unwrap();
        assert_eq!(
            detail,
            FsDetail::Folder(FolderDetail {
                total_items: Some(2)
            })
        );
    }

    #[test]
    fn detail_guesses_file_mime() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("photo.png");
        std::fs::write(&path, b"not really a png").unwrap();

        let detail = fs_detail(&path.to_string_lossy()).unwrap();
        assert_eq!(
            detail,
            FsDetail::File(FileDetail {
                mime: Some("image/png".into())
            })
        );
    }
}

//! Filesystem identity hashing
//!
//! An entry's identity changes when its content does, so thumbnails and
//! view counters keyed by it survive renames but not edits. Cheap
//! metadata (size, mime, mtime) identifies a file when complete; the
//! content is hashed otherwise; folders and unreadable paths fall back to
//! the path bytes.

use crate::info::{mime_of, FsId};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::time::UNIX_EPOCH;
use xxhash_rust::xxh3::{xxh3_64, Xxh3};

pub fn fs_id(path: &Path) -> FsId {
    if path.is_file() {
        if let Some(id) = metadata_id(path) {
            return id;
        }
        if let Some(id) = content_id(path) {
            return id;
        }
    }

    FsId::new(format!(
        "{:016x}",
        xxh3_64(path.as_os_str().as_encoded_bytes())
    ))
}

fn metadata_id(path: &Path) -> Option<FsId> {
    let metadata = path.metadata().ok()?;
    let size: i64 = metadata.len().try_into().ok()?;
    let mime = mime_of(path)?;
    let modified = metadata.modified().ok()?.duration_since(UNIX_EPOCH).ok()?;

    let mut hasher = Xxh3::new();
    hasher.update(&size.to_be_bytes());
    hasher.update(mime.as_bytes());
    hasher.update(&modified.as_secs().to_be_bytes());
    hasher.update(&modified.subsec_nanos().to_be_bytes());

    Some(FsId::new(format!("{:016x}", hasher.digest())))
}

fn content_id(path: &Path) -> Option<FsId> {
    let file = File::open(path).ok()?;
    let mut reader = BufReader::new(file);
    let mut hasher = Xxh3::new();
    let mut buffer = [0u8; 8192];

    loop {
        match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(bytes_read) => hasher.update(&buffer[..bytes_read]),
            Err(_) => return None,
        }
    }

    Some(FsId::new(format!("{:016x}", hasher.digest())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_path_same_id() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.txt");
        std::fs::write(&path, b"hello").unwrap();

        assert_eq!(fs_id(&path), fs_id(&path));
    }

    #[test]
    fn different_content_different_id() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.bin");
        let b = dir.path().join("b.bin");
        std::fs::write(&a, b"one").unwrap();
        std::fs::write(&b, b"two bytes more").unwrap();

        assert_ne!(fs_id(&a), fs_id(&b));
    }

    #[test]
    fn folders_hash_their_path() {
        let dir = tempfile::tempdir().unwrap();
        let id = fs_id(dir.path());
        assert_eq!(id, fs_id(dir.path()));
        assert!(!id.as_str().is_empty());
    }
}

//! Path ↔ pathvec conversion
//!
//! A pathvec is the decomposed form of a filesystem path: its ordered
//! component segments. Converting a path to a pathvec and back yields the
//! normalized path (no trailing or duplicate separators).

use std::path::{Path, PathBuf};

/// Split a path into its component segments.
pub fn path_to_pathvec(path: &str) -> Vec<String> {
    Path::new(path)
        .components()
        .map(|comp| comp.as_os_str().to_string_lossy().into_owned())
        .collect()
}

/// Join component segments back into a path.
pub fn pathvec_to_path(pathvec: &[String]) -> String {
    let mut pathbuf = PathBuf::new();
    for component in pathvec {
        pathbuf.push(component);
    }
    pathbuf.to_string_lossy().into_owned()
}

/// The canonical spelling of `path`: the result of a round trip through
/// its pathvec.
pub fn normalize(path: &str) -> String {
    pathvec_to_path(&path_to_pathvec(path))
}

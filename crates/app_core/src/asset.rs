//! Asset resolution seam
//!
//! Local resource paths returned by the thumbnail command must be
//! converted into a reference the presentation layer can actually load.
//! The conversion depends on the embedding shell, so it sits behind a
//! trait.

use std::path::Path;

pub trait AssetResolver: Send + Sync {
    fn resolve(&self, local_path: &Path) -> String;
}

/// Plain `file://` URLs, for shells that can read the local disk.
pub struct FileUrlResolver;

impl AssetResolver for FileUrlResolver {
    fn resolve(&self, local_path: &Path) -> String {
        format!("file://{}", local_path.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_urls_keep_the_path() {
        let src = FileUrlResolver.resolve(Path::new("/cache/abc.png"));
        assert_eq!(src, "file:///cache/abc.png");
    }
}

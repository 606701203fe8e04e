//! File system info and detail types
//!
//! Wire-shaped (camelCase, type-tagged) structures handed across the
//! command boundary, discriminating files from folders.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::time::SystemTime;

/// Content-derived identity of a filesystem entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FsId(String);

impl FsId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FsId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileInfo {
    pub id: FsId,
    pub name: String,
    pub path: String,
    pub size: Option<i64>,
    pub modified_time: Option<SystemTime>,
    pub total_views: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderInfo {
    pub id: FsId,
    pub name: String,
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "type")]
pub enum FsInfo {
    File(FileInfo),
    Folder(FolderInfo),
}

impl FsInfo {
    pub fn name(&self) -> &str {
        match self {
            FsInfo::File(file) => &file.name,
            FsInfo::Folder(folder) => &folder.name,
        }
    }

    pub fn path(&self) -> &str {
        match self {
            FsInfo::File(file) => &file.path,
            FsInfo::Folder(folder) => &folder.path,
        }
    }

    pub fn is_file(&self) -> bool {
        matches!(self, FsInfo::File(_))
    }

    pub fn is_folder(&self) -> bool {
        matches!(self, FsInfo::Folder(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileDetail {
    pub mime: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderDetail {
    /// None when the folder exists but its entries can't be enumerated.
    pub total_items: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "type")]
pub enum FsDetail {
    File(FileDetail),
    Folder(FolderDetail),
}

/// Best-effort mime type from the file extension.
pub fn mime_of(path: &Path) -> Option<String> {
    mime_guess::from_path(path)
        .first()
        .map(|mime| mime.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fs_info_serializes_with_type_tag() {
        let info = FsInfo::Folder(FolderInfo {
            id: FsId::new("abc"),
            name: "photos".into(),
            path: "/photos".into(),
        });

        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["type"], "folder");
        assert_eq!(json["name"], "photos");
    }

    #[test]
    fn detail_uses_camel_case_fields() {
        let detail = FsDetail::Folder(FolderDetail {
            total_items: Some(3),
        });
        let json = serde_json::to_value(&detail).unwrap();
        assert_eq!(json["totalItems"], 3);
    }

    #[test]
    fn mime_is_guessed_from_extension() {
        assert_eq!(
            mime_of(Path::new("/a/photo.jpg")).as_deref(),
            Some("image/jpeg")
        );
        assert_eq!(mime_of(Path::new("/a/unknown.zzz")), None);
    }
}

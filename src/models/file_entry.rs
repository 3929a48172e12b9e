use serde::Serialize;

/// Size shown for directories; the client asks `dir_size` separately.
pub const DIR_SIZE_PLACEHOLDER: &str = "--";

/// One row of a directory listing, as sent to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectoryEntry {
    pub name: String,
    pub path: String,
    #[serde(rename = "type")]
    pub kind: FileKind,
    pub size: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_count: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Directory,
    File,
}

impl DirectoryEntry {
    pub fn is_dir(&self) -> bool {
        self.kind == FileKind::Directory
    }
}

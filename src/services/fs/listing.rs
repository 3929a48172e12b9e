use std::cmp::Ordering;
use std::ffi::OsStr;
use std::fs;
use std::path::Path;

use tokio::task;

use crate::core::errors::{Error, Result};
use crate::core::humanize::format_size;
use crate::models::file_entry::{DirectoryEntry, FileKind, DIR_SIZE_PLACEHOLDER};
use crate::services::fs::meta;
use crate::services::fs::resolve::resolve_dir;

#[derive(Debug, Clone, Copy, Default)]
pub struct ListParams<'a> {
    pub path: &'a str,
    /// Drop files that already have more than one hard link.
    pub filter_single_link: bool,
    /// Prepend a `..` entry for upward navigation (never at the filesystem root).
    pub include_parent: bool,
}

pub async fn list_dir(params: ListParams<'_>) -> Result<Vec<DirectoryEntry>> {
    let path = params.path.to_string();
    let filter_single_link = params.filter_single_link;
    let include_parent = params.include_parent;

    task::spawn_blocking(move || {
        list_dir_sync(ListParams {
            path: &path,
            filter_single_link,
            include_parent,
        })
    })
    .await
    .map_err(|err| Error::Other(format!("listing task failed: {err}")))?
}

/// Synchronous variant for callers that are not on an async runtime.
pub fn list_dir_sync(params: ListParams<'_>) -> Result<Vec<DirectoryEntry>> {
    let dir = resolve_dir(params.path)?;
    let mut entries = Vec::new();

    for entry in fs::read_dir(&dir)? {
        let entry = entry?;
        let name = os_str_to_string(entry.file_name());
        let path = entry.path();

        // Follows symlinks once; entries that cannot be stat'ed are omitted.
        let md = match fs::metadata(&path) {
            Ok(md) => md,
            Err(err) => {
                tracing::debug!(path = %path.display(), error = %err, "omitting unreadable entry");
                continue;
            }
        };

        let entry = if md.is_dir() {
            DirectoryEntry {
                name,
                path: path.to_string_lossy().into_owned(),
                kind: FileKind::Directory,
                size: DIR_SIZE_PLACEHOLDER.to_string(),
                link_count: None,
            }
        } else {
            if params.filter_single_link && !(md.is_file() && meta::is_single_link(&md)) {
                continue;
            }
            DirectoryEntry {
                name,
                path: path.to_string_lossy().into_owned(),
                kind: FileKind::File,
                size: format_size(md.len()),
                link_count: Some(meta::link_count(&md)),
            }
        };
        entries.push(entry);
    }

    entries.sort_by(compare_entries);

    if params.include_parent {
        if let Some(parent) = dir.parent() {
            entries.insert(0, parent_entry(parent));
        }
    }

    Ok(entries)
}

/// Directories before files, then case-insensitive name, then case-sensitive name.
fn compare_entries(a: &DirectoryEntry, b: &DirectoryEntry) -> Ordering {
    a.kind
        .cmp(&b.kind)
        .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        .then_with(|| a.name.cmp(&b.name))
}

fn parent_entry(parent: &Path) -> DirectoryEntry {
    DirectoryEntry {
        name: "..".to_string(),
        path: parent.to_string_lossy().into_owned(),
        kind: FileKind::Directory,
        size: DIR_SIZE_PLACEHOLDER.to_string(),
        link_count: None,
    }
}

fn os_str_to_string(s: impl AsRef<OsStr>) -> String {
    s.as_ref().to_string_lossy().into_owned()
}

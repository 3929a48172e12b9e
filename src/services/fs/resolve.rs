//! Turns client-supplied path strings into canonical absolute paths.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::core::errors::{Error, Result};

/// Canonicalizes `raw`, resolving relative segments against the working directory
/// and following symlinks. Nothing is created along the way.
pub fn resolve(raw: &str) -> Result<PathBuf> {
    if raw.trim().is_empty() {
        return Err(Error::InvalidPath("path is empty".to_string()));
    }

    fs::canonicalize(Path::new(raw)).map_err(|err| match err.kind() {
        io::ErrorKind::NotFound => Error::InvalidPath(format!("{raw} does not exist")),
        _ => Error::InvalidPath(format!("{raw}: {err}")),
    })
}

/// Like [`resolve`], but the target must be a directory.
pub fn resolve_dir(raw: &str) -> Result<PathBuf> {
    let path = resolve(raw)?;
    if !path.is_dir() {
        return Err(Error::NotADirectory(path));
    }
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn rejects_empty_input() {
        assert!(matches!(resolve(""), Err(Error::InvalidPath(_))));
        assert!(matches!(resolve("   "), Err(Error::InvalidPath(_))));
    }

    #[test]
    fn collapses_traversal_segments() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        fs::create_dir(dir.path().join("a"))?;
        let raw = dir.path().join("a").join("..").join("a");

        let resolved = resolve_dir(&raw.to_string_lossy())?;
        assert_eq!(resolved, fs::canonicalize(dir.path().join("a"))?);
        Ok(())
    }

    #[test]
    fn rejects_missing_intermediate_segments() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let raw = dir.path().join("missing").join("..");

        assert!(matches!(
            resolve(&raw.to_string_lossy()),
            Err(Error::InvalidPath(_))
        ));
        assert!(!dir.path().join("missing").exists());
        Ok(())
    }

    #[test]
    fn requires_directory() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let file = dir.path().join("plain.txt");
        fs::write(&file, "x")?;

        assert!(resolve(&file.to_string_lossy()).is_ok());
        assert!(matches!(
            resolve_dir(&file.to_string_lossy()),
            Err(Error::NotADirectory(_))
        ));
        Ok(())
    }
}

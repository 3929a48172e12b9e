use std::fs;
use std::io;
use std::path::PathBuf;

use crate::core::errors::{Error, Result};
use crate::services::fs::resolve::resolve_dir;

/// Creates one empty directory `name` inside `parent` and returns its path.
pub fn create_dir(parent: &str, name: &str) -> Result<PathBuf> {
    validate_name(name)?;
    let parent = resolve_dir(parent)?;
    let target = parent.join(name);

    match fs::create_dir(&target) {
        Ok(()) => {
            tracing::info!(path = %target.display(), "created directory");
            Ok(target)
        }
        Err(err) if err.kind() == io::ErrorKind::AlreadyExists => Err(Error::AlreadyExists(target)),
        Err(err) => Err(Error::Io(err)),
    }
}

fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
        return Err(Error::InvalidName(name.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn second_create_reports_existing_directory() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let parent = dir.path().to_string_lossy().into_owned();

        let created = create_dir(&parent, "new")?;
        assert_eq!(created, fs::canonicalize(dir.path())?.join("new"));
        assert!(created.is_dir());

        assert!(matches!(
            create_dir(&parent, "new"),
            Err(Error::AlreadyExists(_))
        ));
        Ok(())
    }

    #[test]
    fn rejects_names_with_separators() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let parent = dir.path().to_string_lossy().into_owned();

        for name in ["", ".", "..", "a/b", "a\\b"] {
            assert!(
                matches!(create_dir(&parent, name), Err(Error::InvalidName(_))),
                "{name:?} should be rejected"
            );
        }
        assert_eq!(fs::read_dir(dir.path())?.count(), 0);
        Ok(())
    }

    #[test]
    fn existing_file_counts_as_taken() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        fs::write(dir.path().join("taken"), "x")?;

        assert!(matches!(
            create_dir(&dir.path().to_string_lossy(), "taken"),
            Err(Error::AlreadyExists(_))
        ));
        Ok(())
    }
}

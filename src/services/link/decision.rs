//! Per-entry linking decisions. Probing reads the filesystem; [`decide`] does not.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::core::errors::Error;
use crate::services::fs::meta::device_id;

/// What a source path turned out to be. Symlinks are never followed.
#[derive(Debug)]
pub enum SourceState {
    Missing,
    Unreadable(io::Error),
    File { device: Option<u64> },
    Directory { device: Option<u64> },
    Symlink,
    Other,
}

impl SourceState {
    pub fn probe(path: &Path) -> Self {
        match fs::symlink_metadata(path) {
            Ok(md) => {
                let file_type = md.file_type();
                if file_type.is_symlink() {
                    SourceState::Symlink
                } else if file_type.is_dir() {
                    SourceState::Directory {
                        device: device_id(&md),
                    }
                } else if file_type.is_file() {
                    SourceState::File {
                        device: device_id(&md),
                    }
                } else {
                    SourceState::Other
                }
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => SourceState::Missing,
            Err(err) => SourceState::Unreadable(err),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Occupant {
    Directory,
    Other,
}

/// The would-be link location and whatever already sits there.
#[derive(Debug, Clone)]
pub struct Destination {
    pub path: PathBuf,
    pub occupant: Option<Occupant>,
    /// Device of the occupant, or of the parent directory when vacant.
    pub device: Option<u64>,
}

impl Destination {
    pub fn probe(path: PathBuf) -> Self {
        match fs::symlink_metadata(&path) {
            Ok(md) => {
                let occupant = if md.file_type().is_dir() {
                    Occupant::Directory
                } else {
                    Occupant::Other
                };
                Destination {
                    device: device_id(&md),
                    occupant: Some(occupant),
                    path,
                }
            }
            Err(_) => {
                let device = path
                    .parent()
                    .and_then(|parent| fs::metadata(parent).ok())
                    .and_then(|md| device_id(&md));
                Destination {
                    path,
                    occupant: None,
                    device,
                }
            }
        }
    }
}

#[derive(Debug)]
pub enum Decision {
    /// Hard-link the source file to the destination path.
    Link,
    /// Create (or reuse) the destination directory and descend.
    Mirror,
    Skip(Error),
    Fail(Error),
}

pub fn decide(source: SourceState, destination: &Destination) -> Decision {
    let (source_device, is_dir) = match source {
        SourceState::Missing => return Decision::Fail(Error::NotFound),
        SourceState::Unreadable(err) => return Decision::Fail(Error::Io(err)),
        SourceState::Symlink => return Decision::Skip(Error::SymlinkUnsupported),
        SourceState::Other => return Decision::Skip(Error::UnsupportedFileType),
        SourceState::File { device } => (device, false),
        SourceState::Directory { device } => (device, true),
    };

    match (is_dir, destination.occupant) {
        (false, Some(_)) => return Decision::Skip(Error::AlreadyExists(destination.path.clone())),
        (true, Some(Occupant::Other)) => {
            return Decision::Fail(Error::NotADirectory(destination.path.clone()))
        }
        _ => {}
    }

    if let (Some(source), Some(target)) = (source_device, destination.device) {
        if source != target {
            return Decision::Fail(Error::CrossDeviceLink);
        }
    }

    if is_dir {
        Decision::Mirror
    } else {
        Decision::Link
    }
}

/// Text shown to the client for a per-item error.
pub fn detail(err: &Error) -> String {
    match err {
        Error::AlreadyExists(_) => "already exists".to_string(),
        Error::NotADirectory(_) => "destination exists and is not a directory".to_string(),
        Error::Io(err) => err.to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vacant(device: Option<u64>) -> Destination {
        Destination {
            path: PathBuf::from("/dst/a.txt"),
            occupant: None,
            device,
        }
    }

    fn occupied(occupant: Occupant) -> Destination {
        Destination {
            path: PathBuf::from("/dst/a.txt"),
            occupant: Some(occupant),
            device: Some(1),
        }
    }

    #[test]
    fn file_into_vacant_slot_links() {
        let decision = decide(SourceState::File { device: Some(1) }, &vacant(Some(1)));
        assert!(matches!(decision, Decision::Link));
    }

    #[test]
    fn occupied_slot_is_skipped_never_overwritten() {
        for occupant in [Occupant::Directory, Occupant::Other] {
            let decision = decide(SourceState::File { device: Some(1) }, &occupied(occupant));
            match decision {
                Decision::Skip(err) => assert_eq!(detail(&err), "already exists"),
                other => panic!("unexpected decision {other:?}"),
            }
        }
    }

    #[test]
    fn different_devices_fail() {
        let decision = decide(SourceState::File { device: Some(1) }, &vacant(Some(2)));
        match decision {
            Decision::Fail(err) => assert_eq!(detail(&err), "cross-device link not supported"),
            other => panic!("unexpected decision {other:?}"),
        }
    }

    #[test]
    fn directories_mirror_into_existing_directories_only() {
        let into_dir = decide(
            SourceState::Directory { device: Some(1) },
            &occupied(Occupant::Directory),
        );
        assert!(matches!(into_dir, Decision::Mirror));

        let into_file = decide(
            SourceState::Directory { device: Some(1) },
            &occupied(Occupant::Other),
        );
        assert!(matches!(into_file, Decision::Fail(Error::NotADirectory(_))));
    }

    #[test]
    fn missing_and_symlinked_sources() {
        match decide(SourceState::Missing, &vacant(None)) {
            Decision::Fail(err) => assert_eq!(detail(&err), "source not found"),
            other => panic!("unexpected decision {other:?}"),
        }
        match decide(SourceState::Symlink, &vacant(None)) {
            Decision::Skip(err) => assert_eq!(detail(&err), "symlink not supported"),
            other => panic!("unexpected decision {other:?}"),
        }
    }
}

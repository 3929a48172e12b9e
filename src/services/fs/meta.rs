use std::fs::Metadata;

/// Number of hard links to the file described by `metadata`.
#[cfg(unix)]
pub fn link_count(metadata: &Metadata) -> u64 {
    use std::os::unix::fs::MetadataExt;
    metadata.nlink()
}

#[cfg(not(unix))]
pub fn link_count(_metadata: &Metadata) -> u64 {
    1
}

/// Device the entry lives on, when the platform exposes one.
#[cfg(unix)]
pub fn device_id(metadata: &Metadata) -> Option<u64> {
    use std::os::unix::fs::MetadataExt;
    Some(metadata.dev())
}

#[cfg(not(unix))]
pub fn device_id(_metadata: &Metadata) -> Option<u64> {
    None
}

/// The single-hardlink predicate used by filtered listings.
pub fn is_single_link(metadata: &Metadata) -> bool {
    link_count(metadata) == 1
}

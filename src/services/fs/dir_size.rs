//! Recursive directory sizes with a process-wide memoization cache.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use walkdir::WalkDir;

use crate::core::errors::{Error, Result};
use crate::core::humanize::format_size;
use crate::services::fs::resolve::resolve_dir;

/// Returned when any part of a subtree could not be read.
pub const UNKNOWN_SIZE: &str = "unknown";

#[derive(Default)]
struct CacheState {
    sizes: HashMap<PathBuf, String>,
    /// Bumped by every clear; inserts computed under an older generation are dropped.
    generation: u64,
}

/// Formatted sizes keyed by canonical directory path. Entries never expire on their own.
#[derive(Default)]
pub struct SizeCache {
    state: Mutex<CacheState>,
}

impl SizeCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, CacheState>> {
        self.state
            .lock()
            .map_err(|_| Error::Other("size cache lock poisoned".to_string()))
    }

    /// Cached value for `path` together with the generation it was read under.
    pub fn get(&self, path: &Path) -> Result<(Option<String>, u64)> {
        let state = self.lock()?;
        Ok((state.sizes.get(path).cloned(), state.generation))
    }

    /// Stores `size` unless the cache was cleared since `generation` was observed.
    pub fn insert(&self, path: PathBuf, size: String, generation: u64) -> Result<bool> {
        let mut state = self.lock()?;
        if state.generation != generation {
            return Ok(false);
        }
        state.sizes.insert(path, size);
        Ok(true)
    }

    /// Drops every entry and returns how many there were.
    pub fn clear(&self) -> Result<usize> {
        let mut state = self.lock()?;
        let cleared = state.sizes.len();
        state.sizes.clear();
        state.generation += 1;
        Ok(cleared)
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.lock()?.sizes.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

/// Computes directory sizes, consulting the shared cache first.
#[derive(Default)]
pub struct DirSizeService {
    cache: SizeCache,
    traversals: AtomicUsize,
}

impl DirSizeService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Human-readable size of the subtree at `raw`, or [`UNKNOWN_SIZE`].
    pub fn size_of(&self, raw: &str) -> Result<String> {
        let path = resolve_dir(raw)?;

        let (cached, generation) = self.cache.get(&path)?;
        if let Some(size) = cached {
            tracing::debug!(path = %path.display(), "dir size cache hit");
            return Ok(size);
        }

        let size = match self.walk(&path) {
            Ok(bytes) => format_size(bytes),
            Err(err) => {
                tracing::debug!(path = %path.display(), error = %err, "dir size unknown");
                UNKNOWN_SIZE.to_string()
            }
        };

        if !self.cache.insert(path.clone(), size.clone(), generation)? {
            tracing::debug!(path = %path.display(), "cache cleared during walk, not storing size");
        }
        Ok(size)
    }

    /// Empties the cache; the next query for any directory walks it again.
    pub fn clear(&self) -> Result<usize> {
        let cleared = self.cache.clear()?;
        tracing::info!(cleared, "dir size cache cleared");
        Ok(cleared)
    }

    /// Number of subtree walks performed so far.
    pub fn traversals(&self) -> usize {
        self.traversals.load(Ordering::Relaxed)
    }

    pub fn cache(&self) -> &SizeCache {
        &self.cache
    }

    // Symlinks are not followed and contribute nothing.
    fn walk(&self, root: &Path) -> walkdir::Result<u64> {
        self.traversals.fetch_add(1, Ordering::Relaxed);

        let mut total = 0u64;
        for entry in WalkDir::new(root).follow_links(false) {
            let entry = entry?;
            if entry.file_type().is_file() {
                total = total.saturating_add(entry.metadata()?.len());
            }
        }
        Ok(total)
    }
}

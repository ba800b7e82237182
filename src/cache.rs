//! Modification-time keyed cache of extracted symbols.
//!
//! The indexer consults the cache before reading a file.  An entry is
//! reused only when the file's current modification time is *exactly* the
//! stored one; any other value (newer or older) forces a reparse, which
//! also covers clock skew and files restored from backups.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::types::Symbol;

/// One cached file: the timestamp it was parsed at and what it produced.
#[derive(Debug, Clone)]
pub struct FileCacheEntry {
    pub modified_at: SystemTime,
    pub symbols: Vec<Symbol>,
}

/// Per-path cache of the last parse result.
///
/// Entries are replaced wholesale on [`store`](FileCache::store), never
/// patched in place.
#[derive(Debug, Default)]
pub struct FileCache {
    entries: HashMap<PathBuf, FileCacheEntry>,
}

impl FileCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `path` has to be parsed again given its current timestamp.
    pub fn should_reparse(&self, path: &Path, current: SystemTime) -> bool {
        match self.entries.get(path) {
            Some(entry) => entry.modified_at != current,
            None => true,
        }
    }

    /// Record the result of parsing `path` at `modified_at`.
    pub fn store(&mut self, path: &Path, modified_at: SystemTime, symbols: Vec<Symbol>) {
        self.entries.insert(
            path.to_path_buf(),
            FileCacheEntry {
                modified_at,
                symbols,
            },
        );
    }

    /// The symbols cached for `path`, if any.
    pub fn get(&self, path: &Path) -> Option<&[Symbol]> {
        self.entries.get(path).map(|entry| entry.symbols.as_slice())
    }

    /// Forget `path`.  Returns whether an entry existed.
    pub fn remove(&mut self, path: &Path) -> bool {
        self.entries.remove(path).is_some()
    }

    /// Forget every entry at or below `prefix` (a file or a directory).
    /// Returns how many entries were dropped.
    pub fn remove_under(&mut self, prefix: &Path) -> usize {
        let before = self.entries.len();
        self.entries.retain(|path, _| !path.starts_with(prefix));
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

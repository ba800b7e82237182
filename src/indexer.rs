//! Workspace indexing.
//!
//! The [`Indexer`] walks the configured script roots, runs every source
//! file through the cache and the declaration extractor, and writes the
//! results into the shared [`SymbolIndex`].  It is also the single entry
//! point for incremental updates coming from file-change notifications.
//!
//! Failures never abort a pass.  An unreadable directory or file is logged
//! with its path and contributes zero symbols; the rest of the scan goes on.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use ignore::WalkBuilder;
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::cache::FileCache;
use crate::index::SymbolIndex;
use crate::parser;

/// Default Papyrus source extension.
pub const DEFAULT_EXTENSION: &str = "psc";

/// Why a single file could not be indexed.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    #[error("failed to stat {}: {source}", path.display())]
    Metadata {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Summary of one full scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanStats {
    /// Source files encountered, whether parsed or served from the cache.
    pub files_indexed: usize,
    /// Files that were (re)extracted.
    pub files_parsed: usize,
    /// Files skipped because their timestamp was unchanged.
    pub files_cached: usize,
    /// Directory entries or files that failed with an I/O error.
    pub errors: usize,
    pub elapsed: Duration,
}

/// Marks a scan as running for as long as it is alive.
///
/// Obtained from [`Indexer::begin_scan`]; dropping it clears the flag.
pub struct ScanGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for ScanGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Owns the write side of the symbol index.
#[derive(Debug)]
pub struct Indexer {
    index: Arc<SymbolIndex>,
    cache: Mutex<FileCache>,
    extension: String,
    scanning: AtomicBool,
    parses: AtomicUsize,
}

impl Default for Indexer {
    fn default() -> Self {
        Self::new(DEFAULT_EXTENSION)
    }
}

impl Indexer {
    /// Create an indexer for files with the given extension (with or
    /// without the leading dot).
    pub fn new(extension: &str) -> Self {
        Self {
            index: Arc::new(SymbolIndex::new()),
            cache: Mutex::new(FileCache::new()),
            extension: extension.trim_start_matches('.').to_string(),
            scanning: AtomicBool::new(false),
            parses: AtomicUsize::new(0),
        }
    }

    /// Shared handle to the index this indexer writes to.
    pub fn index(&self) -> &Arc<SymbolIndex> {
        &self.index
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// How many times the extractor has run.  Cache hits do not count.
    pub fn parse_count(&self) -> usize {
        self.parses.load(Ordering::Relaxed)
    }

    /// Whether `path` carries the source extension (ASCII case-insensitive).
    pub fn is_source_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(&self.extension))
    }

    /// Claim the scan flag.  Returns `None` when a scan is already running.
    pub fn begin_scan(&self) -> Option<ScanGuard<'_>> {
        self.scanning
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| ScanGuard {
                flag: &self.scanning,
            })
    }

    pub fn is_scanning(&self) -> bool {
        self.scanning.load(Ordering::Acquire)
    }

    /// Recursively index every source file under `roots`.
    ///
    /// Returns `None` without doing anything when another scan is in
    /// progress; the request is dropped, not queued.
    pub fn index_roots(&self, roots: &[PathBuf]) -> Option<ScanStats> {
        let Some(_guard) = self.begin_scan() else {
            debug!("scan already in progress, ignoring request");
            return None;
        };

        info!(roots = roots.len(), "starting symbol indexing");
        let started = Instant::now();
        let mut stats = ScanStats::default();

        for root in roots {
            if !root.is_dir() {
                warn!(path = %root.display(), "index root is not a directory, skipping");
                continue;
            }
            self.index_directory(root, &mut stats);
        }

        stats.elapsed = started.elapsed();
        info!(
            files = stats.files_indexed,
            parsed = stats.files_parsed,
            cached = stats.files_cached,
            errors = stats.errors,
            elapsed_ms = stats.elapsed.as_millis() as u64,
            "indexed {} files in {}ms",
            stats.files_indexed,
            stats.elapsed.as_millis()
        );
        Some(stats)
    }

    fn index_directory(&self, root: &Path, stats: &mut ScanStats) {
        let walker = WalkBuilder::new(root)
            .standard_filters(false)
            .follow_links(true)
            .sort_by_file_name(|a, b| a.cmp(b))
            .build();

        for result in walker {
            let entry = match result {
                Ok(entry) => entry,
                Err(err) => {
                    stats.errors += 1;
                    warn!(error = %err, "error indexing directory");
                    continue;
                }
            };

            if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                continue;
            }
            let path = entry.path();
            if !self.is_source_file(path) {
                continue;
            }

            stats.files_indexed += 1;
            match self.index_file(path) {
                Ok(true) => stats.files_parsed += 1,
                Ok(false) => stats.files_cached += 1,
                Err(err) => {
                    stats.errors += 1;
                    warn!(path = %path.display(), error = %err, "error indexing file");
                }
            }
        }
    }

    /// Re-index a single file after a change notification.
    ///
    /// Paths without the source extension are ignored.  Returns `true` when
    /// the file was re-extracted, `false` on a cache hit, an ignored path or
    /// an I/O failure (which is logged).
    pub fn reindex_file(&self, path: &Path) -> bool {
        if !self.is_source_file(path) {
            return false;
        }
        match self.index_file(path) {
            Ok(parsed) => {
                debug!(path = %path.display(), parsed, "reindexed file");
                parsed
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "error indexing file");
                false
            }
        }
    }

    /// Forget a deleted file or directory: the cache entries, symbols and
    /// descriptors of every file at or below `path`.  Returns whether
    /// anything was known about it.
    pub fn remove_file(&self, path: &Path) -> bool {
        let cached = self.cache.lock().remove_under(path);
        let indexed = self.index.remove_under(path);
        debug!(path = %path.display(), cached, indexed, "removed from index");
        cached > 0 || indexed > 0
    }

    /// Cache check, extraction and store for one path.  Returns whether
    /// the extractor ran.
    fn index_file(&self, path: &Path) -> Result<bool, IndexError> {
        let modified = std::fs::metadata(path)
            .and_then(|meta| meta.modified())
            .map_err(|source| IndexError::Metadata {
                path: path.to_path_buf(),
                source,
            })?;

        if !self.cache.lock().should_reparse(path, modified) {
            return Ok(false);
        }

        let bytes = std::fs::read(path).map_err(|source| IndexError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        // Papyrus sources are often Windows-1252; keep what decodes.
        let text = String::from_utf8_lossy(&bytes);

        let fallback = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        let extraction = parser::extract_declarations(&text, &fallback);
        self.parses.fetch_add(1, Ordering::Relaxed);

        self.cache
            .lock()
            .store(path, modified, extraction.symbols.clone());
        self.index
            .put(path, extraction.symbols, extraction.descriptor);

        Ok(true)
    }
}

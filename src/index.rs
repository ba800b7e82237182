/// The in-memory symbol store.
///
/// Holds the two indexes every query is answered from:
///
/// - **files**: file path → symbols declared in that file, in source order
/// - **scripts**: lowercased script name → [`ScriptDescriptor`]
///
/// Both live behind a single read/write lock so that replacing one file's
/// symbols and its descriptor is a single atomic step: a concurrent reader
/// sees either the old state or the new one, never a mix.  The indexer is
/// the only writer; queries go through a read-only [`IndexView`].
///
/// Several files may declare the same script name.  Every declaring file
/// keeps its descriptor; the most recently indexed one answers lookups.
/// When that file goes away or renames its script, the next most recent
/// declarer takes over.
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use parking_lot::{RwLock, RwLockReadGuard};

use crate::types::{ScriptDescriptor, Symbol};

/// Normalise a script name for use as a `scripts` key.
///
/// Papyrus identifiers are case-insensitive.  Every read and write of the
/// script index goes through this function.
pub fn normalize_script_name(name: &str) -> String {
    name.to_ascii_lowercase()
}

#[derive(Debug, Default)]
struct IndexState {
    files: HashMap<PathBuf, Vec<Symbol>>,
    /// The descriptor each file declared.
    descriptors: HashMap<PathBuf, ScriptDescriptor>,
    /// Script key → declaring files in index order.  The last one wins.
    declarers: HashMap<String, Vec<PathBuf>>,
}

impl IndexState {
    /// Withdraw the descriptor `path` declared, if any.
    fn release_script(&mut self, path: &Path) {
        let Some(previous) = self.descriptors.remove(path) else {
            return;
        };
        let key = normalize_script_name(&previous.name);
        if let Some(paths) = self.declarers.get_mut(&key) {
            paths.retain(|p| p != path);
            if paths.is_empty() {
                self.declarers.remove(&key);
            }
        }
    }

    fn remove_file(&mut self, path: &Path) -> bool {
        self.release_script(path);
        self.files.remove(path).is_some()
    }

    fn script(&self, name: &str) -> Option<&ScriptDescriptor> {
        self.declarers
            .get(&normalize_script_name(name))
            .and_then(|paths| paths.last())
            .and_then(|path| self.descriptors.get(path))
    }
}

/// Process-wide symbol store.  See the module docs.
#[derive(Debug, Default)]
pub struct SymbolIndex {
    state: RwLock<IndexState>,
}

impl SymbolIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace everything known about `path`.
    ///
    /// If `descriptor` is present it becomes the answer for its normalised
    /// name (last write wins).  A descriptor this file declared before is
    /// withdrawn first, which hands a contested name back to the previous
    /// declarer.
    pub fn put(&self, path: &Path, symbols: Vec<Symbol>, descriptor: Option<ScriptDescriptor>) {
        let mut state = self.state.write();

        state.release_script(path);
        state.files.insert(path.to_path_buf(), symbols);

        if let Some(descriptor) = descriptor {
            let key = normalize_script_name(&descriptor.name);
            state
                .declarers
                .entry(key)
                .or_default()
                .push(path.to_path_buf());
            state.descriptors.insert(path.to_path_buf(), descriptor);
        }
    }

    /// Drop `path` and its descriptor.  Returns whether the file was known.
    pub fn remove(&self, path: &Path) -> bool {
        self.state.write().remove_file(path)
    }

    /// Drop every file at or below `prefix`.  Returns how many were known.
    pub fn remove_under(&self, prefix: &Path) -> usize {
        let mut state = self.state.write();
        let doomed: Vec<PathBuf> = state
            .files
            .keys()
            .filter(|path| path.starts_with(prefix))
            .cloned()
            .collect();
        doomed
            .iter()
            .filter(|path| state.remove_file(path))
            .count()
    }

    /// The symbols declared in `path`.
    pub fn get(&self, path: &Path) -> Option<Vec<Symbol>> {
        self.state.read().files.get(path).cloned()
    }

    /// Look up a script by name (case-insensitive).
    pub fn script(&self, name: &str) -> Option<ScriptDescriptor> {
        self.view().script(name).cloned()
    }

    /// Visit every indexed file under a single read lock.
    pub fn scan<F>(&self, mut visit: F)
    where
        F: FnMut(&Path, &[Symbol]),
    {
        let state = self.state.read();
        for (path, symbols) in &state.files {
            visit(path, symbols);
        }
    }

    /// Take a consistent read-only view of both indexes.
    ///
    /// The view holds the read lock; keep it short-lived.
    pub fn view(&self) -> IndexView<'_> {
        IndexView {
            state: self.state.read(),
        }
    }

    pub fn file_count(&self) -> usize {
        self.state.read().files.len()
    }

    /// Number of distinct script names.
    pub fn script_count(&self) -> usize {
        self.state.read().declarers.len()
    }
}

/// A read-locked snapshot of the [`SymbolIndex`].
pub struct IndexView<'a> {
    state: RwLockReadGuard<'a, IndexState>,
}

impl IndexView<'_> {
    /// Look up a script by name (case-insensitive).
    pub fn script(&self, name: &str) -> Option<&ScriptDescriptor> {
        self.state.script(name)
    }

    /// All indexed files with their symbols.  Enumeration order is
    /// unspecified.
    pub fn files(&self) -> impl Iterator<Item = (&Path, &[Symbol])> {
        self.state
            .files
            .iter()
            .map(|(path, symbols)| (path.as_path(), symbols.as_slice()))
    }
}

//! Scribe: a Papyrus language server.
//!
//! The server indexes the script sources of a mod project, extracts the
//! declared scripts, functions, events and properties, and answers
//! completion requests by walking each script's `extends` chain.
//!
//! Module layout:
//! - [`parser`] / [`docblock`]: line-oriented declaration extraction
//! - [`cache`] / [`index`] / [`indexer`]: incremental workspace indexing
//! - [`inheritance`]: member resolution along the inheritance chain
//! - [`completion`]: context detection, the query engine and LSP items
//! - [`config`]: `project.yaml` and `.scribe.toml` loading
//! - `server`: the `LanguageServer` implementation
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tower_lsp::Client;
use tracing::{info, warn};

pub mod cache;
pub mod completion;
pub mod config;
pub mod docblock;
pub mod index;
pub mod indexer;
pub mod inheritance;
pub mod parser;
mod server;
pub mod types;
pub mod util;

pub use indexer::{Indexer, ScanStats};
pub use types::{CompletionContext, ScriptDescriptor, Symbol, SymbolKind};

pub struct Backend {
    name: String,
    version: String,
    /// Text of documents currently open in the editor, keyed by URI.
    open_files: RwLock<HashMap<String, String>>,
    /// Workspace root from `initialize`, if the client sent one.
    workspace_root: Mutex<Option<PathBuf>>,
    /// The indexer; replaced in `initialized` once the configured source
    /// extension is known.
    indexer: RwLock<Arc<Indexer>>,
    client: Option<Client>,
}

impl Backend {
    pub fn new(client: Client) -> Self {
        Self {
            client: Some(client),
            ..Self::new_test()
        }
    }

    /// A backend without a client, for tests.
    pub fn new_test() -> Self {
        Self {
            name: "Scribe".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            open_files: RwLock::new(HashMap::new()),
            workspace_root: Mutex::new(None),
            indexer: RwLock::new(Arc::new(Indexer::default())),
            client: None,
        }
    }

    /// A test backend rooted at `workspace_root`.
    pub fn new_test_with_workspace(workspace_root: PathBuf) -> Self {
        Self {
            workspace_root: Mutex::new(Some(workspace_root)),
            ..Self::new_test()
        }
    }

    /// The current indexer.
    pub fn indexer(&self) -> Arc<Indexer> {
        Arc::clone(&self.indexer.read())
    }

    /// Switch to a fresh (empty) indexer for `extension` unless the current
    /// one already uses it.
    pub(crate) fn use_extension(&self, extension: &str) {
        let mut indexer = self.indexer.write();
        if !indexer.extension().eq_ignore_ascii_case(extension.trim_start_matches('.')) {
            *indexer = Arc::new(Indexer::new(extension));
        }
    }

    /// Directories to index for `workspace_root`, per `project.yaml` and
    /// `.scribe.toml`.  Configuration errors are logged and treated as
    /// missing configuration.
    pub fn configured_roots(workspace_root: &Path) -> (Vec<PathBuf>, config::ServerSettings) {
        let settings = config::load_settings(workspace_root).unwrap_or_else(|err| {
            warn!(error = %err, "ignoring server settings");
            config::ServerSettings::default()
        });

        let project = match config::load_project_config(workspace_root) {
            Ok(Some(project)) => Some(project),
            Ok(None) => {
                info!(
                    path = %workspace_root.display(),
                    "no {} found in workspace root",
                    config::PROJECT_FILE
                );
                None
            }
            Err(err) => {
                warn!(error = %err, "ignoring project config");
                None
            }
        };

        let roots = config::workspace_roots(workspace_root, project.as_ref(), &settings);
        (roots, settings)
    }

    /// Run a full scan of the workspace's configured roots on a blocking
    /// task and wait for it.
    ///
    /// Returns `None` when there is no workspace root or another scan is
    /// already running.
    pub async fn index_workspace(&self) -> Option<ScanStats> {
        let (indexer, roots) = self.prepare_scan()?;
        run_scan(indexer, roots).await
    }

    /// Load the workspace configuration, apply the configured extension and
    /// return the indexer together with the roots it should scan.
    pub(crate) fn prepare_scan(&self) -> Option<(Arc<Indexer>, Vec<PathBuf>)> {
        let root = self.workspace_root()?;
        let (roots, settings) = Self::configured_roots(&root);
        self.use_extension(settings.normalized_extension());
        Some((self.indexer(), roots))
    }

    /// Re-index one file after a create/change notification.
    pub async fn reindex_file(&self, path: PathBuf) -> bool {
        let indexer = self.indexer();
        tokio::task::spawn_blocking(move || indexer.reindex_file(&path))
            .await
            .unwrap_or_else(|err| {
                warn!(error = %err, "reindex task failed");
                false
            })
    }
}

/// Scan `roots` with `indexer` off the async runtime.
pub async fn run_scan(indexer: Arc<Indexer>, roots: Vec<PathBuf>) -> Option<ScanStats> {
    if roots.is_empty() {
        info!("no script roots configured, 0 files indexed");
        return Some(ScanStats::default());
    }
    tokio::task::spawn_blocking(move || indexer.index_roots(&roots))
        .await
        .unwrap_or_else(|err| {
            warn!(error = %err, "indexing task failed");
            None
        })
}

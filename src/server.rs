/// LSP server trait implementation.
///
/// This module contains the `impl LanguageServer for Backend` block,
/// which handles all LSP protocol messages (initialize, didOpen, didChange,
/// didClose, didChangeWatchedFiles, completion, etc.).
use tower_lsp::LanguageServer;
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tracing::{debug, warn};

use crate::Backend;

/// Registration id of the source file watcher.
const WATCHER_REGISTRATION_ID: &str = "scribe-source-watcher";

#[tower_lsp::async_trait]
impl LanguageServer for Backend {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        // Extract and store the workspace root path
        let workspace_root = params
            .root_uri
            .as_ref()
            .and_then(|uri| uri.to_file_path().ok())
            .or_else(|| {
                params
                    .workspace_folders
                    .as_ref()
                    .and_then(|folders| folders.first())
                    .and_then(|folder| folder.uri.to_file_path().ok())
            });

        if let Some(root) = workspace_root {
            *self.workspace_root.lock() = Some(root);
        }

        Ok(InitializeResult {
            capabilities: ServerCapabilities {
                completion_provider: Some(CompletionOptions {
                    resolve_provider: Some(false),
                    trigger_characters: Some(vec![".".to_string(), "(".to_string()]),
                    ..CompletionOptions::default()
                }),
                text_document_sync: Some(TextDocumentSyncCapability::Kind(
                    TextDocumentSyncKind::FULL,
                )),
                ..ServerCapabilities::default()
            },
            server_info: Some(ServerInfo {
                name: self.name.clone(),
                version: Some(self.version.clone()),
            }),
            offset_encoding: None,
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        let Some((indexer, roots)) = self.prepare_scan() else {
            self.log(
                MessageType::INFO,
                "Scribe initialized without a workspace root, nothing to index".to_string(),
            )
            .await;
            return;
        };

        self.register_source_watcher(indexer.extension()).await;

        // The initial scan can take a while on large dependency trees; run
        // it in the background so requests are served meanwhile.
        let client = self.client.clone();
        tokio::spawn(async move {
            let stats = crate::run_scan(indexer, roots).await;
            let message = match stats {
                Some(stats) => format!(
                    "Scribe indexed {} files in {}ms",
                    stats.files_indexed,
                    stats.elapsed.as_millis()
                ),
                None => "Scribe skipped indexing: a scan is already running".to_string(),
            };
            if let Some(client) = client {
                client.log_message(MessageType::INFO, message).await;
            }
        });
    }

    async fn shutdown(&self) -> Result<()> {
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let doc = params.text_document;
        self.open_files
            .write()
            .insert(doc.uri.to_string(), doc.text);
        debug!(uri = %doc.uri, "opened document");
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let uri = params.text_document.uri.to_string();

        // Full sync: the last change carries the whole document.
        if let Some(change) = params.content_changes.into_iter().last() {
            self.open_files.write().insert(uri, change.text);
        }
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let uri = params.text_document.uri;
        self.open_files.write().remove(uri.as_str());
        debug!(%uri, "closed document");
    }

    async fn did_change_watched_files(&self, params: DidChangeWatchedFilesParams) {
        for event in params.changes {
            let Ok(path) = event.uri.to_file_path() else {
                continue;
            };

            match event.typ {
                FileChangeType::CREATED | FileChangeType::CHANGED => {
                    self.reindex_file(path).await;
                }
                // Covers whole directories: everything below the path goes.
                FileChangeType::DELETED => {
                    self.indexer().remove_file(&path);
                }
                other => debug!(?other, "ignoring unknown file change type"),
            }
        }
    }

    async fn completion(&self, params: CompletionParams) -> Result<Option<CompletionResponse>> {
        self.handle_completion(params).await
    }
}

impl Backend {
    /// Ask the client to notify us about created, changed and deleted
    /// source files anywhere in the workspace.
    async fn register_source_watcher(&self, extension: &str) {
        let Some(client) = &self.client else {
            return;
        };

        let options = DidChangeWatchedFilesRegistrationOptions {
            watchers: vec![FileSystemWatcher {
                glob_pattern: GlobPattern::String(format!("**/*.{}", extension)),
                kind: None,
            }],
        };
        let register_options = match serde_json::to_value(options) {
            Ok(value) => value,
            Err(err) => {
                warn!(error = %err, "failed to encode watcher registration");
                return;
            }
        };

        let registration = Registration {
            id: WATCHER_REGISTRATION_ID.to_string(),
            method: "workspace/didChangeWatchedFiles".to_string(),
            register_options: Some(register_options),
        };
        if let Err(err) = client.register_capability(vec![registration]).await {
            warn!(error = %err, "client rejected file watcher registration");
        }
    }
}

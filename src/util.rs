/// Utility functions for the Scribe server.
///
/// This module contains helper methods for position handling, document
/// lookup and client logging.
use std::path::PathBuf;

use tower_lsp::lsp_types::*;

use crate::Backend;

/// The text of `position`'s line up to the cursor.
///
/// The character offset is treated as a count of `char`s, which matches
/// UTF-16 for the ASCII text Papyrus sources consist of.  Positions past
/// the end of the line clamp to the line end; positions past the last
/// line yield an empty string.
pub fn line_prefix(content: &str, position: Position) -> String {
    content
        .lines()
        .nth(position.line as usize)
        .map(|line| line.chars().take(position.character as usize).collect())
        .unwrap_or_default()
}

impl Backend {
    /// Text of an open document, falling back to the file on disk when the
    /// document is not open.
    pub(crate) async fn document_text(&self, uri: &Url) -> Option<String> {
        let open = self.open_files.read().get(uri.as_str()).cloned();
        if open.is_some() {
            return open;
        }
        let path = uri.to_file_path().ok()?;
        tokio::fs::read(&path)
            .await
            .ok()
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
    }

    /// The workspace root recorded during `initialize`.
    pub fn workspace_root(&self) -> Option<PathBuf> {
        self.workspace_root.lock().clone()
    }

    pub(crate) async fn log(&self, typ: MessageType, message: String) {
        if let Some(client) = &self.client {
            client.log_message(typ, message).await;
        }
    }
}

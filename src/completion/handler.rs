/// Completion request orchestration.
///
/// This module contains the `handle_completion` method called by
/// `LanguageServer::completion`.  It gathers the cursor line and the
/// enclosing document, detects the [`CompletionContext`], runs the query
/// engine against the current index and converts the result to LSP items.
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tracing::debug;

use crate::Backend;
use crate::completion::builder::build_completion_items;
use crate::inheritance::ancestry;
use crate::types::{CompletionContext, Symbol};
use crate::util::line_prefix;

impl Backend {
    /// Answer a completion context from the current index.
    pub fn query(&self, context: &CompletionContext) -> Vec<Symbol> {
        let indexer = self.indexer();
        let view = indexer.index().view();
        if let CompletionContext::MemberAccess { target } = context {
            debug!(%target, chain = ?ancestry(&view, target), "member access");
        }
        super::engine::query(&view, context)
    }

    /// Main completion handler.
    pub(crate) async fn handle_completion(
        &self,
        params: CompletionParams,
    ) -> Result<Option<CompletionResponse>> {
        let uri = params.text_document_position.text_document.uri;
        let position = params.text_document_position.position;

        let Some(content) = self.document_text(&uri).await else {
            debug!(%uri, "completion requested for unknown document");
            return Ok(None);
        };

        let preceding = line_prefix(&content, position);
        let context = CompletionContext::detect(&preceding, Some(content.as_str()));
        let symbols = self.query(&context);
        debug!(?context, results = symbols.len(), "completion");

        Ok(Some(CompletionResponse::Array(build_completion_items(
            &symbols, &context,
        ))))
    }
}

/// Completion item building.
///
/// This module converts the [`Symbol`]s produced by the query engine into
/// LSP `CompletionItem`s.  The item kind depends on the symbol kind and, for
/// functions, on whether the request was a member access (`Debug.Trace`
/// reads as a method call) or a general one.
use tower_lsp::lsp_types::*;

use crate::types::{CompletionContext, Symbol, SymbolKind};

/// Map a symbol kind to the LSP completion kind shown in the editor.
pub fn completion_kind(kind: SymbolKind, context: &CompletionContext) -> CompletionItemKind {
    match kind {
        SymbolKind::Script => CompletionItemKind::CLASS,
        SymbolKind::Function => match context {
            CompletionContext::MemberAccess { .. } => CompletionItemKind::METHOD,
            CompletionContext::General { .. } => CompletionItemKind::FUNCTION,
        },
        SymbolKind::Event => CompletionItemKind::EVENT,
        SymbolKind::Property => CompletionItemKind::PROPERTY,
    }
}

/// Build one completion item.  Empty documentation is omitted rather than
/// sent as an empty string.
pub fn completion_item(symbol: &Symbol, context: &CompletionContext) -> CompletionItem {
    let documentation = (!symbol.documentation.is_empty()).then(|| {
        Documentation::MarkupContent(MarkupContent {
            kind: MarkupKind::Markdown,
            value: symbol.documentation.clone(),
        })
    });

    CompletionItem {
        label: symbol.name.clone(),
        kind: Some(completion_kind(symbol.kind, context)),
        detail: Some(symbol.detail.clone()),
        documentation,
        insert_text: Some(symbol.name.clone()),
        filter_text: Some(symbol.name.clone()),
        ..CompletionItem::default()
    }
}

/// Build items for a whole result list, preserving its order.
pub fn build_completion_items(symbols: &[Symbol], context: &CompletionContext) -> Vec<CompletionItem> {
    symbols
        .iter()
        .map(|symbol| completion_item(symbol, context))
        .collect()
}

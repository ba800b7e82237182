/// Completion-related modules.
///
/// This sub-module groups all completion logic:
/// - **target**: Detecting the completion context from the text before the cursor
/// - **engine**: Answering a context from the symbol index
/// - **builder**: Building LSP `CompletionItem`s from symbols
/// - **handler**: The `textDocument/completion` request orchestration
pub mod builder;
pub mod engine;
mod handler;
pub mod target;

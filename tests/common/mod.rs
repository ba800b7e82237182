#![allow(dead_code)]

use scribe_lsp::Backend;
use std::fs;
use std::path::{Path, PathBuf};
use tower_lsp::LanguageServer;
use tower_lsp::lsp_types::*;

pub fn create_test_backend() -> Backend {
    Backend::new_test()
}

/// Write `files` (relative path, content) under `root`, creating parent
/// directories as needed.
pub fn write_files(root: &Path, files: &[(&str, &str)]) {
    for (rel_path, content) in files {
        let full = root.join(rel_path);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).expect("failed to create dirs");
        }
        fs::write(&full, content).expect("failed to write script file");
    }
}

/// Helper: create a temp workspace with a `project.yaml` pointing at
/// `Scripts/Source` and the given script files, then return a Backend
/// rooted at that workspace.
pub fn create_workspace(files: &[(&str, &str)]) -> (Backend, tempfile::TempDir) {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    fs::write(
        dir.path().join("project.yaml"),
        "name: TestMod\nscripts: Scripts/Source\n",
    )
    .expect("failed to write project.yaml");
    write_files(dir.path(), files);

    let backend = Backend::new_test_with_workspace(dir.path().to_path_buf());
    (backend, dir)
}

/// Same as [`create_workspace`], but also runs the initial scan.
pub async fn create_indexed_workspace(files: &[(&str, &str)]) -> (Backend, tempfile::TempDir) {
    let (backend, dir) = create_workspace(files);
    backend
        .index_workspace()
        .await
        .expect("initial scan should run");
    (backend, dir)
}

pub fn script_path(dir: &tempfile::TempDir, rel_path: &str) -> PathBuf {
    dir.path().join(rel_path)
}

/// Open `text` as `uri` and request completion at `line`/`character`.
pub async fn complete_at(
    backend: &Backend,
    uri: &Url,
    text: &str,
    line: u32,
    character: u32,
) -> Vec<CompletionItem> {
    backend
        .did_open(DidOpenTextDocumentParams {
            text_document: TextDocumentItem {
                uri: uri.clone(),
                language_id: "papyrus".to_string(),
                version: 1,
                text: text.to_string(),
            },
        })
        .await;

    let result = backend
        .completion(CompletionParams {
            text_document_position: TextDocumentPositionParams {
                text_document: TextDocumentIdentifier { uri: uri.clone() },
                position: Position { line, character },
            },
            work_done_progress_params: WorkDoneProgressParams::default(),
            partial_result_params: PartialResultParams::default(),
            context: None,
        })
        .await
        .unwrap();

    match result {
        Some(CompletionResponse::Array(items)) => items,
        Some(CompletionResponse::List(list)) => list.items,
        None => Vec::new(),
    }
}

/// Labels of `items`, in order.
pub fn labels(items: &[CompletionItem]) -> Vec<&str> {
    items.iter().map(|i| i.label.as_str()).collect()
}

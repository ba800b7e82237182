mod common;

use common::{create_test_backend, create_workspace, script_path};
use tower_lsp::LanguageServer;
use tower_lsp::lsp_types::*;

#[tokio::test]
async fn test_initialize_server_info() {
    let backend = create_test_backend();
    let params = InitializeParams::default();
    let result = backend.initialize(params).await.unwrap();

    let server_info = result.server_info.expect("server_info should be present");
    assert_eq!(server_info.name, "Scribe");
    assert_eq!(
        server_info.version,
        Some(env!("CARGO_PKG_VERSION").to_string())
    );
}

#[tokio::test]
async fn test_initialize_capabilities() {
    let backend = create_test_backend();
    let result = backend
        .initialize(InitializeParams::default())
        .await
        .unwrap();

    let caps = result.capabilities;
    let completion = caps
        .completion_provider
        .expect("Completion provider should be enabled");
    assert_eq!(
        completion.trigger_characters,
        Some(vec![".".to_string(), "(".to_string()])
    );
    assert_eq!(
        caps.text_document_sync,
        Some(TextDocumentSyncCapability::Kind(TextDocumentSyncKind::FULL))
    );
}

#[tokio::test]
async fn test_initialize_records_workspace_root() {
    let backend = create_test_backend();
    let dir = tempfile::tempdir().unwrap();

    #[allow(deprecated)]
    let params = InitializeParams {
        root_uri: Some(Url::from_directory_path(dir.path()).unwrap()),
        ..InitializeParams::default()
    };
    backend.initialize(params).await.unwrap();

    assert_eq!(backend.workspace_root().as_deref(), Some(dir.path()));
}

#[tokio::test]
async fn test_initialize_falls_back_to_workspace_folder() {
    let backend = create_test_backend();
    let dir = tempfile::tempdir().unwrap();

    let params = InitializeParams {
        workspace_folders: Some(vec![WorkspaceFolder {
            uri: Url::from_directory_path(dir.path()).unwrap(),
            name: "mod".to_string(),
        }]),
        ..InitializeParams::default()
    };
    backend.initialize(params).await.unwrap();

    assert_eq!(backend.workspace_root().as_deref(), Some(dir.path()));
}

#[tokio::test]
async fn test_initialize_without_root() {
    let backend = create_test_backend();
    backend
        .initialize(InitializeParams::default())
        .await
        .unwrap();
    assert!(backend.workspace_root().is_none());
    assert!(backend.index_workspace().await.is_none());
}

#[tokio::test]
async fn test_shutdown() {
    let backend = create_test_backend();
    assert!(backend.shutdown().await.is_ok());
}

#[tokio::test]
async fn test_initialized_indexes_the_workspace() {
    let (backend, _dir) = create_workspace(&[(
        "Scripts/Source/Actor.psc",
        "ScriptName Actor extends ObjectReference\nFunction Kill()\n",
    )]);

    backend.initialized(InitializedParams {}).await;

    // The scan runs in the background; wait for it to land.
    let index = backend.indexer().index().clone();
    for _ in 0..200 {
        if index.script("actor").is_some() {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
    assert!(index.script("actor").is_some());
}

#[tokio::test]
async fn test_index_workspace_applies_configured_extension() {
    let (backend, dir) = create_workspace(&[
        ("Scripts/Source/A.psc", "ScriptName A\n"),
        ("Scripts/Source/B.pap", "ScriptName B\n"),
    ]);
    std::fs::write(dir.path().join(".scribe.toml"), "extension = \".pap\"\n").unwrap();

    let stats = backend.index_workspace().await.unwrap();
    assert_eq!(stats.files_indexed, 1);
    assert_eq!(backend.indexer().extension(), "pap");
    assert!(backend.indexer().index().script("b").is_some());
    assert!(backend.indexer().index().script("a").is_none());
}

#[tokio::test]
async fn test_workspace_without_project_file_indexes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    common::write_files(dir.path(), &[("Loose.psc", "ScriptName Loose\n")]);
    let backend = scribe_lsp::Backend::new_test_with_workspace(dir.path().to_path_buf());

    let stats = backend.index_workspace().await.unwrap();
    assert_eq!(stats.files_indexed, 0);
    assert_eq!(backend.indexer().index().file_count(), 0);
}

// ─── Document sync ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_did_change_replaces_document_text() {
    let backend = create_test_backend();
    let uri = Url::parse("file:///virtual/Mine.psc").unwrap();

    let items = common::complete_at(&backend, &uri, "ScriptName Mine\n", 1, 0).await;
    assert!(items.is_empty(), "nothing is indexed yet");

    backend
        .did_change(DidChangeTextDocumentParams {
            text_document: VersionedTextDocumentIdentifier {
                uri: uri.clone(),
                version: 2,
            },
            content_changes: vec![
                TextDocumentContentChangeEvent {
                    range: None,
                    range_length: None,
                    text: "stale".to_string(),
                },
                TextDocumentContentChangeEvent {
                    range: None,
                    range_length: None,
                    text: "ScriptName Mine extends Actor\n".to_string(),
                },
            ],
        })
        .await;

    // Only the enclosing parent depends on the open text here.
    backend.indexer().index().put(
        std::path::Path::new("/virtual/Actor.psc"),
        vec![],
        Some(scribe_lsp::ScriptDescriptor {
            name: "Actor".to_string(),
            parent: None,
            functions: vec![scribe_lsp::Symbol {
                name: "Kill".to_string(),
                kind: scribe_lsp::SymbolKind::Function,
                detail: "Function in Actor".to_string(),
                documentation: String::new(),
            }],
            events: vec![],
            properties: vec![],
        }),
    );

    let result = backend
        .completion(CompletionParams {
            text_document_position: TextDocumentPositionParams {
                text_document: TextDocumentIdentifier { uri: uri.clone() },
                position: Position {
                    line: 1,
                    character: 0,
                },
            },
            work_done_progress_params: WorkDoneProgressParams::default(),
            partial_result_params: PartialResultParams::default(),
            context: None,
        })
        .await
        .unwrap();
    let Some(CompletionResponse::Array(items)) = result else {
        panic!("expected an item array");
    };
    assert_eq!(common::labels(&items), vec!["Kill"]);
    assert_eq!(items[0].detail.as_deref(), Some("Function in Actor (inherited)"));
}

#[tokio::test]
async fn test_completion_for_unknown_document_is_none() {
    let backend = create_test_backend();
    let uri = Url::parse("file:///nowhere/at/all/Missing.psc").unwrap();

    let result = backend
        .completion(CompletionParams {
            text_document_position: TextDocumentPositionParams {
                text_document: TextDocumentIdentifier { uri },
                position: Position {
                    line: 0,
                    character: 0,
                },
            },
            work_done_progress_params: WorkDoneProgressParams::default(),
            partial_result_params: PartialResultParams::default(),
            context: None,
        })
        .await
        .unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn test_did_close_falls_back_to_disk() {
    let (backend, dir) = create_workspace(&[(
        "Scripts/Source/Mine.psc",
        "ScriptName Mine extends Actor\n",
    )]);
    let path = script_path(&dir, "Scripts/Source/Mine.psc");
    let uri = Url::from_file_path(&path).unwrap();

    // Open an unrelated buffer under the same URI, then close it.
    common::complete_at(&backend, &uri, "Debug.", 0, 6).await;
    backend
        .did_close(DidCloseTextDocumentParams {
            text_document: TextDocumentIdentifier { uri: uri.clone() },
        })
        .await;

    let result = backend
        .completion(CompletionParams {
            text_document_position: TextDocumentPositionParams {
                text_document: TextDocumentIdentifier { uri },
                position: Position {
                    line: 0,
                    character: 0,
                },
            },
            work_done_progress_params: WorkDoneProgressParams::default(),
            partial_result_params: PartialResultParams::default(),
            context: None,
        })
        .await
        .unwrap();
    assert!(
        matches!(result, Some(CompletionResponse::Array(_))),
        "closed documents are read from disk"
    );
}

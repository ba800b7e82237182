/// Papyrus declaration extraction.
///
/// This module turns raw script text into the flat symbol list used for
/// file-based enumeration and the [`ScriptDescriptor`] used for inheritance.
/// It performs line-oriented declaration extraction only; bodies,
/// expressions and types are never parsed.
///
/// Sub-modules:
/// - [`classify`]: The per-line classifiers that recognise declarations
mod classify;

pub use classify::{
    LineDecl, classify_line, event_decl, function_decl, property_decl, script_decl,
};

use crate::docblock::extract_docs;
use crate::types::{ScriptDescriptor, Symbol, SymbolKind};

/// The result of extracting one file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    /// Every declaration in source order.
    pub symbols: Vec<Symbol>,
    /// The script the file declares, or a descriptor named after the file
    /// when it declares none.  `None` only when no usable name exists.
    pub descriptor: Option<ScriptDescriptor>,
}

/// Extract declarations from `text`.
///
/// `fallback_script_name` (normally the file stem) identifies the script
/// when the file has no `ScriptName` line.  When several `ScriptName`
/// lines are present, each emits a Script symbol but only the last one
/// names the descriptor.
pub fn extract_declarations(text: &str, fallback_script_name: &str) -> Extraction {
    let lines: Vec<&str> = text.lines().collect();

    let mut symbols = Vec::new();
    let mut functions = Vec::new();
    let mut events = Vec::new();
    let mut properties = Vec::new();

    let mut script_name = fallback_script_name.to_string();
    let mut parent: Option<String> = None;

    for (index, line) in lines.iter().enumerate() {
        let (symbol, bucket) = match classify_line(line) {
            LineDecl::Script {
                name,
                parent: declared_parent,
            } => {
                script_name = name.to_string();
                parent = declared_parent.map(str::to_string);
                let detail = match declared_parent {
                    Some(p) => format!("Script extends {}", p),
                    None => "Script".to_string(),
                };
                (
                    make_symbol(name, SymbolKind::Script, detail, &lines, index),
                    None,
                )
            }
            LineDecl::Function { name, .. } => (
                make_symbol(
                    name,
                    SymbolKind::Function,
                    format!("Function in {}", script_name),
                    &lines,
                    index,
                ),
                Some(&mut functions),
            ),
            LineDecl::Event { name } => (
                make_symbol(
                    name,
                    SymbolKind::Event,
                    format!("Event in {}", script_name),
                    &lines,
                    index,
                ),
                Some(&mut events),
            ),
            LineDecl::Property { name, type_name } => (
                make_symbol(
                    name,
                    SymbolKind::Property,
                    format!("{} Property in {}", type_name, script_name),
                    &lines,
                    index,
                ),
                Some(&mut properties),
            ),
            LineDecl::Other => continue,
        };

        if let Some(members) = bucket {
            members.push(symbol.clone());
        }
        symbols.push(symbol);
    }

    let descriptor = (!script_name.is_empty()).then(|| ScriptDescriptor {
        name: script_name,
        parent,
        functions,
        events,
        properties,
    });

    Extraction {
        symbols,
        descriptor,
    }
}

/// Return the `extends` target of the last script declaration in `text`.
///
/// Used to find the parent of the file a completion request comes from
/// without running a full extraction.
pub fn declared_parent(text: &str) -> Option<String> {
    text.lines()
        .filter_map(|line| match script_decl(line) {
            Some(LineDecl::Script { parent, .. }) => Some(parent),
            _ => None,
        })
        .last()
        .flatten()
        .map(str::to_string)
}

fn make_symbol(
    name: &str,
    kind: SymbolKind,
    detail: String,
    lines: &[&str],
    index: usize,
) -> Symbol {
    Symbol {
        name: name.to_string(),
        kind,
        detail,
        documentation: extract_docs(lines, index),
    }
}

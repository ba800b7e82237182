/// Completion query engine.
///
/// Answers a [`CompletionContext`] from a read-only [`IndexView`]:
///
/// - **Member access** returns the full inherited member set of the named
///   script, exactly as the inheritance resolver produces it.
/// - **General** first lists the members inherited from the enclosing
///   script's parent (their `detail` tagged as inherited), then every
///   symbol of every indexed file.  Names already emitted are skipped, so
///   the first occurrence of a name wins.
///
/// File enumeration order is unspecified; the only ordering guarantee is
/// that inherited members precede global ones.
use std::collections::HashSet;

use crate::index::IndexView;
use crate::inheritance::resolve_members;
use crate::types::{CompletionContext, Symbol};

/// Suffix appended to the `detail` of members inherited from the
/// enclosing script's parent chain.
pub const INHERITED_SUFFIX: &str = " (inherited)";

/// Produce the symbols offered for `context`.
pub fn query(view: &IndexView<'_>, context: &CompletionContext) -> Vec<Symbol> {
    match context {
        CompletionContext::MemberAccess { target } => resolve_members(view, target),
        CompletionContext::General { enclosing_parent } => {
            general_symbols(view, enclosing_parent.as_deref())
        }
    }
}

fn general_symbols(view: &IndexView<'_>, enclosing_parent: Option<&str>) -> Vec<Symbol> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut results = Vec::new();

    // ── Phase 1: members inherited by the script being edited ──
    if let Some(parent) = enclosing_parent {
        for mut member in resolve_members(view, parent) {
            if !seen.insert(member.name.clone()) {
                continue;
            }
            member.detail.push_str(INHERITED_SUFFIX);
            results.push(member);
        }
    }

    // ── Phase 2: everything in the index ──
    for (_, symbols) in view.files() {
        for symbol in symbols {
            if seen.contains(&symbol.name) {
                continue;
            }
            seen.insert(symbol.name.clone());
            results.push(symbol.clone());
        }
    }

    results
}

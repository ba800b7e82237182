/// Script inheritance resolution.
///
/// This module walks the `extends` chain of a script through the script
/// index and collects every member reachable along the way:
///
///   script own > parent > grandparent > ...
///
/// Each script contributes its functions, then events, then properties,
/// in declaration order.  The walk stops at the first name that is not
/// indexed, at a script without a parent, or at a name already visited in
/// this walk (so circular `extends` chains terminate).
use std::collections::HashSet;

use crate::index::{IndexView, normalize_script_name};
use crate::types::{ScriptDescriptor, Symbol};

/// Collect the members of `class_name` and all of its ancestors.
///
/// Returns an empty list when the script is not indexed.
pub fn resolve_members(view: &IndexView<'_>, class_name: &str) -> Vec<Symbol> {
    let mut members = Vec::new();
    walk_chain(view, class_name, |script| {
        members.extend(script.members().cloned());
    });
    members
}

/// The chain of scripts visited from `class_name`, starting with the
/// script itself, as declared names.
pub fn ancestry(view: &IndexView<'_>, class_name: &str) -> Vec<String> {
    let mut chain = Vec::new();
    walk_chain(view, class_name, |script| chain.push(script.name.clone()));
    chain
}

/// Visit every descriptor on the inheritance chain of `class_name`.
///
/// The visited set lives for exactly one call.
fn walk_chain<'v, F>(view: &'v IndexView<'_>, class_name: &str, mut visit: F)
where
    F: FnMut(&'v ScriptDescriptor),
{
    let mut visited: HashSet<String> = HashSet::new();
    let mut current = normalize_script_name(class_name);

    while !current.is_empty() && visited.insert(current.clone()) {
        let Some(script) = view.script(&current) else {
            break;
        };
        visit(script);

        match script.parent.as_deref() {
            Some(parent) => current = normalize_script_name(parent),
            None => break,
        }
    }
}

//! Data types used throughout the Scribe language server.
//!
//! This module contains the "model" structs and enums that represent
//! extracted Papyrus declarations (scripts, functions, events, properties)
//! as well as the completion context a query is answered against.

/// The kind of declaration a [`Symbol`] was extracted from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    /// A `ScriptName` declaration.
    Script,
    /// A `Function` declaration (with or without a return type).
    Function,
    /// An `Event` declaration.
    Event,
    /// A `<Type> Property <Name>` declaration.
    Property,
}

/// A named declaration extracted from Papyrus source text.
///
/// Symbols are plain values: each index owns its own copies, nothing is
/// shared by reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    /// The declared name exactly as written (e.g. `"OnInit"`).
    pub name: String,
    /// What kind of declaration this is.
    pub kind: SymbolKind,
    /// Human readable context, e.g. `"Function in Actor"` or
    /// `"Int Property in Quest"`.
    pub detail: String,
    /// Comment text found directly above the declaration, or empty.
    pub documentation: String,
}

/// The structured record of one script: its identity, parent and members.
///
/// `name` is never empty.  `parent` names another script but is not
/// validated; a parent that is not indexed simply ends an inheritance walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptDescriptor {
    /// The script name as declared (or the file stem when undeclared).
    pub name: String,
    /// The `extends` target, if any.
    pub parent: Option<String>,
    /// Function declarations, in source order.
    pub functions: Vec<Symbol>,
    /// Event declarations, in source order.
    pub events: Vec<Symbol>,
    /// Property declarations, in source order.
    pub properties: Vec<Symbol>,
}

impl ScriptDescriptor {
    /// Iterate over the script's own members: functions, then events,
    /// then properties.
    pub fn members(&self) -> impl Iterator<Item = &Symbol> {
        self.functions
            .iter()
            .chain(self.events.iter())
            .chain(self.properties.iter())
    }
}

/// What the text in front of the cursor asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionContext {
    /// `Identifier.` directly before the cursor: list the members the
    /// named script has, including inherited ones.
    MemberAccess {
        /// The identifier left of the `.` (e.g. `"Debug"`).
        target: String,
    },
    /// Anything else.  `enclosing_parent` is the `extends` target of the
    /// script being edited, when known.
    General {
        /// Parent script of the enclosing file, if it declares one.
        enclosing_parent: Option<String>,
    },
}

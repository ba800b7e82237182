//! Line classification.
//!
//! Papyrus declarations are line oriented, so instead of building an AST
//! every source line is run through a small set of classifiers, each of
//! which recognises exactly one declaration shape:
//!
//! ```text
//! ScriptName MyQuest extends Quest          -> LineDecl::Script
//! Int Function GetCount()                   -> LineDecl::Function
//! Event OnInit()                            -> LineDecl::Event
//! Actor Property PlayerRef Auto             -> LineDecl::Property
//! ```
//!
//! Keywords match ASCII case-insensitively.  Identifiers are runs of
//! `[A-Za-z0-9_]`.  Anything that does not fit a shape is `Other`.

/// The declaration shape a single source line carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineDecl<'a> {
    Script {
        name: &'a str,
        parent: Option<&'a str>,
    },
    Function {
        name: &'a str,
        return_type: Option<&'a str>,
    },
    Event {
        name: &'a str,
    },
    Property {
        name: &'a str,
        type_name: &'a str,
    },
    Other,
}

/// Classify one line of source text.
///
/// Classifiers are tried in the order script, function, event, property;
/// the first one that matches wins.
pub fn classify_line(line: &str) -> LineDecl<'_> {
    script_decl(line)
        .or_else(|| function_decl(line))
        .or_else(|| event_decl(line))
        .or_else(|| property_decl(line))
        .unwrap_or(LineDecl::Other)
}

/// `ScriptName <Name> [extends <Parent>] ...`
pub fn script_decl(line: &str) -> Option<LineDecl<'_>> {
    let rest = keyword(line.trim_start(), "ScriptName")?;
    let (name, rest) = identifier(rest)?;

    let parent = keyword(rest.trim_start(), "extends")
        .and_then(identifier)
        .map(|(parent, _)| parent);

    Some(LineDecl::Script { name, parent })
}

/// `[<ReturnType>] Function <Name>(`
pub fn function_decl(line: &str) -> Option<LineDecl<'_>> {
    let line = line.trim_start();

    if let Some(rest) = keyword(line, "Function")
        && let Some(name) = call_name(rest)
    {
        return Some(LineDecl::Function {
            name,
            return_type: None,
        });
    }

    let (return_type, rest) = type_token(line)?;
    let rest = skip_required_whitespace(rest)?;
    let rest = keyword(rest, "Function")?;
    let name = call_name(rest)?;

    Some(LineDecl::Function {
        name,
        return_type: Some(return_type),
    })
}

/// `Event <Name>(`
pub fn event_decl(line: &str) -> Option<LineDecl<'_>> {
    let rest = keyword(line.trim_start(), "Event")?;
    let name = call_name(rest)?;
    Some(LineDecl::Event { name })
}

/// `<Type> Property <Name>`
pub fn property_decl(line: &str) -> Option<LineDecl<'_>> {
    let (type_name, rest) = type_token(line.trim_start())?;
    let rest = skip_required_whitespace(rest)?;
    let rest = keyword(rest, "Property")?;
    let (name, _) = identifier(rest)?;
    Some(LineDecl::Property { name, type_name })
}

// ─── Token helpers ──────────────────────────────────────────────────────────

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Split a leading identifier off `text`.  Returns `None` when `text` does
/// not start with an identifier character.
fn identifier(text: &str) -> Option<(&str, &str)> {
    let end = text.find(|c: char| !is_ident_char(c)).unwrap_or(text.len());
    if end == 0 {
        return None;
    }
    Some(text.split_at(end))
}

/// A type name, optionally followed by an array suffix (`Int[]`).
fn type_token(text: &str) -> Option<(&str, &str)> {
    let (word, rest) = identifier(text)?;
    if rest.starts_with("[]") {
        let end = word.len() + 2;
        return Some((&text[..end], &text[end..]));
    }
    Some((word, rest))
}

/// Match `kw` (case-insensitively) as a whole word at the start of `text`,
/// followed by at least one whitespace character.  Returns the text after
/// that whitespace.
fn keyword<'a>(text: &'a str, kw: &str) -> Option<&'a str> {
    let (word, rest) = identifier(text)?;
    if !word.eq_ignore_ascii_case(kw) {
        return None;
    }
    skip_required_whitespace(rest)
}

fn skip_required_whitespace(text: &str) -> Option<&str> {
    let trimmed = text.trim_start();
    if trimmed.len() == text.len() {
        return None;
    }
    Some(trimmed)
}

/// `<Name>` followed by optional whitespace and an opening parenthesis.
fn call_name(text: &str) -> Option<&str> {
    let (name, rest) = identifier(text)?;
    rest.trim_start().starts_with('(').then_some(name)
}

/// Completion context detection.
///
/// This module decides what a completion request is asking for by
/// looking at the text in front of the cursor:
///
/// - `Debug.` (an identifier directly followed by a trailing `.`) is a
///   member access on `Debug`.
/// - anything else is a general request, which additionally carries the
///   parent script of the file being edited when that file declares one.
use crate::parser;
use crate::types::CompletionContext;

impl CompletionContext {
    /// Build the context for a request.
    ///
    /// `preceding_text` is the text between the start of the line and the
    /// cursor; `enclosing_file_text` is the whole document, when available.
    pub fn detect(preceding_text: &str, enclosing_file_text: Option<&str>) -> Self {
        if let Some(target) = member_access_target(preceding_text) {
            return CompletionContext::MemberAccess {
                target: target.to_string(),
            };
        }

        CompletionContext::General {
            enclosing_parent: enclosing_file_text.and_then(parser::declared_parent),
        }
    }
}

/// Extract `X` from text ending in `X.`, where `X` is an identifier.
///
/// The `.` must be the very last character; `Debug.Tr` or `Debug. ` do
/// not count.
pub fn member_access_target(preceding_text: &str) -> Option<&str> {
    let before_dot = preceding_text.strip_suffix('.')?;

    // Walk back through identifier chars
    let start = before_dot
        .char_indices()
        .rev()
        .take_while(|&(_, c)| c.is_ascii_alphanumeric() || c == '_')
        .last()
        .map(|(idx, _)| idx)?;

    Some(&before_dot[start..])
}

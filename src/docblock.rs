//! Documentation comment resolution.
//!
//! Papyrus has two comment forms that are conventionally used to document
//! a declaration when placed directly above it:
//!
//! ```text
//! { Sends a message to the log }
//! Function Trace(string asText) global native
//!
//! ; Shows a notification
//! ; in the top-left corner
//! Function Notification(string asText) global native
//! ```
//!
//! [`extract_docs`] walks upward from a declaration line and collects
//! whichever of those it finds.

/// How many lines above a declaration are inspected at most.
pub const DOC_LOOKBACK: usize = 4;

/// Extract the documentation attached to the declaration on line
/// `declaration_line`.
///
/// Scans upward starting at the line immediately preceding the
/// declaration, at most [`DOC_LOOKBACK`] lines:
///
/// - A single-line `{ ... }` block is taken whole (braces stripped,
///   trimmed) and ends the scan.
/// - Consecutive `;` line comments are accumulated, earliest line first.
/// - A blank line or any other non-comment line ends the scan.
///
/// Returns an empty string when nothing qualifies.
pub fn extract_docs<S: AsRef<str>>(lines: &[S], declaration_line: usize) -> String {
    let mut docs: Vec<&str> = Vec::new();
    let start = declaration_line.min(lines.len());
    let stop = declaration_line.saturating_sub(DOC_LOOKBACK);

    for index in (stop..start).rev() {
        let line = lines[index].as_ref().trim();

        if line.len() >= 2 && line.starts_with('{') && line.ends_with('}') {
            docs.push(line[1..line.len() - 1].trim());
            break;
        }

        match line.strip_prefix(';') {
            Some(comment) => docs.push(comment.trim()),
            None => break,
        }
    }

    // Collected bottom-up.
    docs.reverse();
    docs.join("\n")
}

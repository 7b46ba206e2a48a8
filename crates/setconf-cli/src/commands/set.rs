//! Set, multi-line, increment and uncomment operations

use setconf_content::{Document, Edit, EndMarker, Sign, SpanOutcome};
use tracing::debug;

/// Set every assignment of `key` to `value`.
pub fn run_set(doc: &mut Document, key: &[u8], value: &[u8]) -> Vec<Edit> {
    doc.set_value(key, value)
}

/// Replace the value of `key` that runs up to `end`.
///
/// A missing key or end marker leaves the document alone; the latter is
/// reported as a warning by the span rewriter.
pub fn run_span(doc: &mut Document, key: &[u8], value: &[u8], end: &EndMarker) -> Vec<Edit> {
    match doc.set_span(key, value, end) {
        SpanOutcome::Replaced(edit) if !edit.is_noop() => vec![edit],
        SpanOutcome::Replaced(_) => Vec::new(),
        SpanOutcome::KeyNotFound => {
            debug!(key = %String::from_utf8_lossy(key), "key not found");
            Vec::new()
        }
        SpanOutcome::EndMarkerNotFound { .. } => Vec::new(),
    }
}

/// Add `delta` to the current value of `key`, or subtract it.
pub fn run_adjust(doc: &mut Document, key: &[u8], delta: &[u8], sign: Sign) -> Vec<Edit> {
    doc.adjust_value(key, delta, sign)
}

/// Uncomment assignments of `key`, then set them.
pub fn run_uncomment(doc: &mut Document, key: &[u8], value: &[u8]) -> Vec<Edit> {
    let mut edits = doc.uncomment(key);
    edits.extend(doc.set_value(key, value));
    edits
}

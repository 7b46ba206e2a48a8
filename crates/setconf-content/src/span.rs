//! Multi-line value replacement
//!
//! A value may continue over several physical lines, e.g. a
//! parenthesized list in a PKGBUILD. The span of such a value runs from
//! the key to the next occurrence of an end marker; the whole span is
//! rewritten as if it were one line.

use tracing::{debug, warn};

use crate::edit::Edit;
use crate::line::{LineClassifier, is_key_byte};
use crate::syntax::LineEnding;

/// Where a multi-line value ends
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EndMarker {
    /// The line terminator of the syntax in use
    #[default]
    LineEnd,
    Literal(Vec<u8>),
}

impl EndMarker {
    /// Interpret a command-line marker; the escape `\n` means end of line.
    pub fn parse(marker: &[u8]) -> Self {
        match marker {
            b"\\n" | b"\n" => Self::LineEnd,
            _ => Self::Literal(marker.to_vec()),
        }
    }

    pub fn as_bytes(&self, line_ending: LineEnding) -> &[u8] {
        match self {
            Self::LineEnd => line_ending.as_bytes(),
            Self::Literal(marker) => marker,
        }
    }
}

/// Result of a span replacement
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpanOutcome {
    /// The value was found; applying the edit produces the new document.
    Replaced(Edit),
    /// No assignment of the key outside comments.
    KeyNotFound,
    /// The key was found but the end marker never follows it.
    EndMarkerNotFound { marker: Vec<u8> },
}

impl SpanOutcome {
    pub fn edit(&self) -> Option<&Edit> {
        match self {
            Self::Replaced(edit) => Some(edit),
            _ => None,
        }
    }
}

/// Replace the (possibly multi-line) value of `key` with `value`.
///
/// Searching starts at `search_from`. Occurrences of `key` that are not
/// the key of an assignment, such as ones inside comments or values, are
/// skipped and the search resumes after their span.
pub fn change_span(
    classifier: &LineClassifier,
    document: &[u8],
    key: &[u8],
    value: &[u8],
    end: &EndMarker,
    search_from: usize,
) -> SpanOutcome {
    if key.is_empty() || find(document, key, 0).is_none() {
        return SpanOutcome::KeyNotFound;
    }

    let newline = classifier.line_ending().as_bytes();
    let marker = end.as_bytes(classifier.line_ending());
    let mut from = search_from;

    loop {
        let Some(start) = find(document, key, from) else {
            return SpanOutcome::KeyNotFound;
        };

        let end_pos = find(document, marker, start + key.len());
        if end_pos.is_none() && *end != EndMarker::LineEnd {
            warn!(
                marker = %String::from_utf8_lossy(marker),
                "multi-line end marker not found"
            );
            return SpanOutcome::EndMarkerNotFound {
                marker: marker.to_vec(),
            };
        }
        let span_end = end_pos.unwrap_or(document.len());

        if !is_assigned_key(classifier, document, start, key, newline) {
            debug!(offset = start, "skipping occurrence that is not an assignment");
            from = span_end.max(start + 1);
            continue;
        }

        let mut replacement = classifier.rewrite_line(&document[start..span_end], value);
        let consumed_end = match end_pos {
            Some(pos) => {
                if marker.starts_with(newline) {
                    replacement.extend_from_slice(newline);
                }
                pos + marker.len()
            }
            None => document.len(),
        };

        debug!(start, end = consumed_end, "replacing value span");
        return SpanOutcome::Replaced(Edit::replace(document, start..consumed_end, replacement));
    }
}

/// The occurrence at `start` must end the key-part of an assignment on
/// its physical line, e.g. `PATH` in `export PATH=...`.
fn is_assigned_key(
    classifier: &LineClassifier,
    document: &[u8],
    start: usize,
    key: &[u8],
    newline: &[u8],
) -> bool {
    let line_start = rfind(&document[..start], newline).map_or(0, |p| p + newline.len());
    let line_end = find(document, newline, start).unwrap_or(document.len());
    let line = &document[line_start..line_end];

    let Some(split) = classifier.classify(line, false) else {
        return false;
    };
    let key_part = split.key.trim_ascii_end();
    let offset = start - line_start;
    offset + key.len() == key_part.len() && (offset == 0 || !is_key_byte(line[offset - 1]))
}

pub(crate) fn find(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    if needle.is_empty() || from > haystack.len() {
        return None;
    }
    haystack[from..]
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|p| p + from)
}

fn rfind(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() {
        return None;
    }
    haystack.windows(needle.len()).rposition(|w| w == needle)
}

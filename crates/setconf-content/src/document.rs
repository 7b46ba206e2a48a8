//! Whole-document editing
//!
//! [`Document`] holds the bytes of a configuration file and applies
//! single-line, multi-line and append edits to them. Line terminators
//! are never rewritten: every edit replaces the body of a line only, so
//! a file that lacks a final newline keeps lacking it.

use std::ops::Range;

use tracing::debug;

use crate::delta::{Sign, apply_delta};
use crate::edit::Edit;
use crate::error::Result;
use crate::line::LineClassifier;
use crate::span::{EndMarker, SpanOutcome, change_span, find};
use crate::syntax::Syntax;

/// A configuration document being edited.
#[derive(Debug, Clone)]
pub struct Document {
    original_source: Vec<u8>,
    source: Vec<u8>,
    classifier: LineClassifier,
}

impl Document {
    /// Parse a document with the given syntax.
    pub fn new(source: impl Into<Vec<u8>>, syntax: &Syntax) -> Result<Self> {
        Ok(Self::with_classifier(source, LineClassifier::new(syntax)?))
    }

    pub fn with_classifier(source: impl Into<Vec<u8>>, classifier: LineClassifier) -> Self {
        let source = source.into();
        Self {
            original_source: source.clone(),
            source,
            classifier,
        }
    }

    /// Current content, including any edits applied so far.
    pub fn source(&self) -> &[u8] {
        &self.source
    }

    pub fn original_source(&self) -> &[u8] {
        &self.original_source
    }

    pub fn into_source(self) -> Vec<u8> {
        self.source
    }

    pub fn classifier(&self) -> &LineClassifier {
        &self.classifier
    }

    /// True if the content differs from what the document was created with.
    pub fn is_modified(&self) -> bool {
        self.source != self.original_source
    }

    /// Lines without their terminators.
    pub fn lines(&self) -> impl Iterator<Item = &[u8]> + '_ {
        self.line_spans().into_iter().map(move |span| &self.source[span])
    }

    /// Set the value of every assignment of `key` outside comments.
    ///
    /// Returns the edits that changed something; lines already holding
    /// the value produce no edit.
    pub fn set_value(&mut self, key: &[u8], value: &[u8]) -> Vec<Edit> {
        let edits: Vec<Edit> = self
            .line_spans()
            .into_iter()
            .filter_map(|span| {
                let new = self.classifier.changed_line(&self.source[span.clone()], key, value)?;
                let edit = Edit::replace(&self.source, span, new);
                (!edit.is_noop()).then_some(edit)
            })
            .collect();

        debug!(
            key = %String::from_utf8_lossy(key),
            changed = edits.len(),
            "set value"
        );
        self.apply(&edits);
        edits
    }

    /// Remove the comment marker from commented-out assignments of `key`.
    pub fn uncomment(&mut self, key: &[u8]) -> Vec<Edit> {
        let edits: Vec<Edit> = self
            .line_spans()
            .into_iter()
            .filter_map(|span| {
                let new = self.classifier.uncommented_line(&self.source[span.clone()], key)?;
                Some(Edit::uncomment(&self.source, span, new))
            })
            .collect();

        debug!(
            key = %String::from_utf8_lossy(key),
            uncommented = edits.len(),
            "uncomment"
        );
        self.apply(&edits);
        edits
    }

    /// Replace the first multi-line value of `key`, up to `end`.
    pub fn set_span(&mut self, key: &[u8], value: &[u8], end: &EndMarker) -> SpanOutcome {
        let outcome = change_span(&self.classifier, &self.source, key, value, end, 0);
        if let SpanOutcome::Replaced(edit) = &outcome
            && !edit.is_noop()
        {
            self.apply(std::slice::from_ref(edit));
        }
        outcome
    }

    /// Increment or decrement the value of `key` by `delta`.
    ///
    /// A missing key or a value that is not a number is simply set to
    /// `delta`.
    pub fn adjust_value(&mut self, key: &[u8], delta: &[u8], sign: Sign) -> Vec<Edit> {
        let current = self.get_value(key).unwrap_or_default().to_vec();
        let value = apply_delta(&current, delta, sign);
        self.set_value(key, &value)
    }

    /// Append a line, ensuring the document ends with exactly one terminator.
    ///
    /// A document that holds only whitespace is replaced by the line.
    pub fn append_line(&mut self, line: &[u8]) -> Edit {
        let newline = self.classifier.line_ending().as_bytes();
        let line = line.strip_suffix(newline).unwrap_or(line);

        let mut content = Vec::with_capacity(line.len() + 2 * newline.len());
        let edit = if self.source.trim_ascii().is_empty() {
            content.extend_from_slice(line);
            content.extend_from_slice(newline);
            Edit::replace(&self.source, 0..self.source.len(), content)
        } else {
            if !self.source.ends_with(newline) {
                content.extend_from_slice(newline);
            }
            content.extend_from_slice(line);
            content.extend_from_slice(newline);
            Edit::insert(&self.source, self.source.len(), content)
        };

        debug!(line = %String::from_utf8_lossy(line), "append line");
        self.apply(std::slice::from_ref(&edit));
        edit
    }

    /// Set `key` to `value`, or append `line` if `key` is not assigned anywhere.
    pub fn set_or_append(&mut self, key: &[u8], value: &[u8], line: &[u8]) -> Vec<Edit> {
        let edits = self.set_value(key, value);
        if !edits.is_empty() || self.has_key(key) {
            return edits;
        }
        vec![self.append_line(line)]
    }

    /// True if some line has an assignment operator and the trimmed text
    /// before it equals `key`. Commented lines count.
    pub fn has_key(&self, key: &[u8]) -> bool {
        self.lines().any(|line| {
            !line.trim_ascii().is_empty()
                && self
                    .classifier
                    .split(line, false)
                    .is_some_and(|split| split.key.trim_ascii() == key)
        })
    }

    /// The trimmed value of the first assignment of `key` outside comments.
    pub fn get_value(&self, key: &[u8]) -> Option<&[u8]> {
        self.lines().find_map(|line| {
            let split = self.classifier.classify(line, false)?;
            (split.key.trim_ascii() == key).then(|| split.value.trim_ascii())
        })
    }

    fn line_spans(&self) -> Vec<Range<usize>> {
        line_spans(&self.source, self.classifier.line_ending().as_bytes())
    }

    fn apply(&mut self, edits: &[Edit]) {
        if !edits.is_empty() {
            self.source = Edit::apply_all(&self.source, edits);
        }
    }
}

/// Byte ranges of each line, terminators excluded. A final terminator
/// does not start another line.
fn line_spans(source: &[u8], newline: &[u8]) -> Vec<Range<usize>> {
    let mut spans = Vec::new();
    let mut start = 0;
    while let Some(pos) = find(source, newline, start) {
        spans.push(start..pos);
        start = pos + newline.len();
    }
    if start < source.len() {
        spans.push(start..source.len());
    }
    spans
}

/// Set `key` to `value` throughout `data`.
///
/// Returns the new content and whether anything changed.
pub fn change_file(
    classifier: &LineClassifier,
    data: &[u8],
    key: &[u8],
    value: &[u8],
) -> (Vec<u8>, bool) {
    let mut doc = Document::with_classifier(data, classifier.clone());
    doc.set_value(key, value);
    let modified = doc.is_modified();
    (doc.into_source(), modified)
}

/// Replace the multi-line value of `key`; `data` is returned unchanged if
/// the key or the end marker is missing.
pub fn change_file_multiline(
    classifier: &LineClassifier,
    data: &[u8],
    key: &[u8],
    value: &[u8],
    end: &EndMarker,
) -> Vec<u8> {
    let mut doc = Document::with_classifier(data, classifier.clone());
    doc.set_span(key, value, end);
    doc.into_source()
}

/// Append `line` to `data`.
pub fn add_line(classifier: &LineClassifier, data: &[u8], line: &[u8]) -> Vec<u8> {
    let mut doc = Document::with_classifier(data, classifier.clone());
    doc.append_line(line);
    doc.into_source()
}

pub fn has_key(classifier: &LineClassifier, data: &[u8], key: &[u8]) -> bool {
    Document::with_classifier(data, classifier.clone()).has_key(key)
}

/// The value of `key`, or an empty value when it is not assigned.
pub fn get_value(classifier: &LineClassifier, data: &[u8], key: &[u8]) -> Vec<u8> {
    Document::with_classifier(data, classifier.clone())
        .get_value(key)
        .unwrap_or_default()
        .to_vec()
}

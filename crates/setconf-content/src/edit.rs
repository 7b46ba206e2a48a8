//! Edit types for content modification.

use std::ops::Range;

/// The kind of edit operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKind {
    /// Replace existing content.
    Replace,
    /// Insert new content.
    Insert,
    /// Remove a comment marker in front of an assignment.
    Uncomment,
}

/// A byte-range replacement against a source document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub kind: EditKind,
    /// Range in the source being replaced (empty for insertions).
    pub span: Range<usize>,
    /// 1-based line of `span.start` in the source.
    pub line: usize,
    pub old_content: Vec<u8>,
    pub new_content: Vec<u8>,
}

impl Edit {
    pub fn replace(source: &[u8], span: Range<usize>, new_content: Vec<u8>) -> Self {
        Self {
            kind: EditKind::Replace,
            line: line_number(source, span.start),
            old_content: source[span.clone()].to_vec(),
            span,
            new_content,
        }
    }

    pub fn insert(source: &[u8], at: usize, new_content: Vec<u8>) -> Self {
        Self {
            kind: EditKind::Insert,
            span: at..at,
            line: line_number(source, at),
            old_content: Vec::new(),
            new_content,
        }
    }

    pub fn uncomment(source: &[u8], span: Range<usize>, new_content: Vec<u8>) -> Self {
        Self {
            kind: EditKind::Uncomment,
            ..Self::replace(source, span, new_content)
        }
    }

    /// True if applying the edit leaves the source as it is.
    pub fn is_noop(&self) -> bool {
        self.old_content == self.new_content
    }

    /// Apply this edit to the source it was computed against.
    pub fn apply(&self, source: &[u8]) -> Vec<u8> {
        Self::apply_all(source, std::slice::from_ref(self))
    }

    /// Apply non-overlapping edits computed against the same source.
    pub fn apply_all(source: &[u8], edits: &[Edit]) -> Vec<u8> {
        let mut ordered: Vec<&Edit> = edits.iter().collect();
        ordered.sort_by_key(|e| e.span.start);

        let grown: usize = edits.iter().map(|e| e.new_content.len()).sum();
        let mut out = Vec::with_capacity(source.len() + grown);
        let mut cursor = 0;
        for edit in ordered {
            out.extend_from_slice(&source[cursor..edit.span.start]);
            out.extend_from_slice(&edit.new_content);
            cursor = edit.span.end;
        }
        out.extend_from_slice(&source[cursor..]);
        out
    }
}

fn line_number(source: &[u8], offset: usize) -> usize {
    let offset = offset.min(source.len());
    source[..offset].iter().filter(|&&b| b == b'\n').count() + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_records_old_content() {
        let edit = Edit::replace(b"a=1\nb=2\n", 4..7, b"b=3".to_vec());
        assert_eq!(edit.kind, EditKind::Replace);
        assert_eq!(edit.old_content, b"b=2");
        assert_eq!(edit.line, 2);
        assert_eq!(edit.apply(b"a=1\nb=2\n"), b"a=1\nb=3\n");
    }

    #[test]
    fn test_insert_at_end() {
        let edit = Edit::insert(b"a=1\n", 4, b"b=2\n".to_vec());
        assert_eq!(edit.span, 4..4);
        assert_eq!(edit.line, 2);
        assert_eq!(edit.apply(b"a=1\n"), b"a=1\nb=2\n");
    }

    #[test]
    fn test_apply_all_in_any_order() {
        let source = b"a=1\nb=2\nc=3";
        let edits = [
            Edit::replace(source, 8..11, b"c=9".to_vec()),
            Edit::replace(source, 0..3, b"a=7".to_vec()),
        ];
        assert_eq!(Edit::apply_all(source, &edits), b"a=7\nb=2\nc=9");
    }

    #[test]
    fn test_noop_edit() {
        assert!(Edit::replace(b"a=1", 0..3, b"a=1".to_vec()).is_noop());
        assert!(!Edit::replace(b"a=1", 0..3, b"a=2".to_vec()).is_noop());
    }
}

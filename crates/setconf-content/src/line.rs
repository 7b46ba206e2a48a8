//! Line classification and rewriting
//!
//! A line is an assignment when it is neither blank nor a comment and
//! contains at least one assignment operator. When several operators
//! occur, the one starting furthest left wins; operators starting at
//! the same offset are ranked by their position in [`Syntax::operators`].

use std::borrow::Cow;

use regex::bytes::Regex;

use crate::error::{Error, Result};
use crate::syntax::{LineEnding, Operator, Syntax};

/// A line split around its assignment operator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Split<'a> {
    /// Everything before the operator, plus the operator when requested
    pub key: &'a [u8],
    /// Everything after the operator
    pub value: &'a [u8],
    pub operator: &'a Operator,
    /// Byte offset of the operator within the line
    pub offset: usize,
}

/// Classifies lines as assignments and rewrites their values.
///
/// Built once from a [`Syntax`]; cheap to clone.
#[derive(Debug, Clone)]
pub struct LineClassifier {
    /// One capture group per entry in `operators`, in priority order
    pattern: Regex,
    operators: Vec<Operator>,
    comment_markers: Vec<Vec<u8>>,
    /// Longest first, so `##` is stripped before `#`
    line_comments: Vec<Vec<u8>>,
    line_ending: LineEnding,
}

impl LineClassifier {
    pub fn new(syntax: &Syntax) -> Result<Self> {
        syntax.validate()?;

        let operators: Vec<Operator> = syntax.assignment_operators().cloned().collect();
        let alternatives: Vec<String> = operators
            .iter()
            .map(|op| {
                let token = regex::escape(op.token());
                if op.is_word() {
                    format!(r"[ \t]({token})(?:[ \t]|$)")
                } else {
                    format!("({token})")
                }
            })
            .collect();
        let pattern = Regex::new(&alternatives.join("|"))?;

        let mut line_comments: Vec<Vec<u8>> = syntax
            .line_comments
            .iter()
            .map(|m| m.as_bytes().to_vec())
            .collect();
        line_comments.sort_by_key(|m| std::cmp::Reverse(m.len()));

        Ok(Self {
            pattern,
            operators,
            comment_markers: syntax.comment_markers().map(|m| m.as_bytes().to_vec()).collect(),
            line_comments,
            line_ending: syntax.line_ending,
        })
    }

    pub fn line_ending(&self) -> LineEnding {
        self.line_ending
    }

    /// True if the line, ignoring leading whitespace, starts with a comment marker.
    pub fn is_comment(&self, line: &[u8]) -> bool {
        let line = line.trim_ascii_start();
        self.comment_markers.iter().any(|m| line.starts_with(m))
    }

    /// Split a line at its leftmost assignment operator.
    ///
    /// Blank and commented lines are not special here; see [`classify`](Self::classify).
    pub fn split<'a>(&'a self, line: &'a [u8], including_operator: bool) -> Option<Split<'a>> {
        let caps = self.pattern.captures(line)?;
        let (index, m) = caps
            .iter()
            .skip(1)
            .enumerate()
            .find_map(|(i, m)| m.map(|m| (i, m)))?;

        let key_end = if including_operator { m.end() } else { m.start() };
        Some(Split {
            key: &line[..key_end],
            value: &line[m.end()..],
            operator: &self.operators[index],
            offset: m.start(),
        })
    }

    /// Split a line into key and value, or `None` for blank lines,
    /// comments and lines without an assignment operator.
    pub fn classify<'a>(&'a self, line: &'a [u8], including_operator: bool) -> Option<Split<'a>> {
        let trimmed = line.trim_ascii();
        if trimmed.is_empty() || self.is_comment(trimmed) {
            return None;
        }
        self.split(line, including_operator)
    }

    /// Replace the value of an assignment line, keeping the key, the
    /// operator and the separator style.
    ///
    /// Anything that is not an assignment is returned unchanged. Word
    /// operators are turned into `=`, so `FOO is not set` becomes `FOO=y`.
    pub fn rewrite_line(&self, line: &[u8], new_value: &[u8]) -> Vec<u8> {
        let (body, cr) = match line.strip_suffix(b"\r") {
            Some(body) => (body, true),
            None => (line, false),
        };
        let Some(split) = self.classify(body, true) else {
            return line.to_vec();
        };

        let mut out = Vec::with_capacity(line.len() + new_value.len());
        if split.operator.is_word() {
            out.extend_from_slice(body[..split.offset].trim_ascii_end());
            out.push(b'=');
        } else {
            out.extend_from_slice(split.key);
            match split.value.first() {
                Some(b' ') => out.push(b' '),
                Some(b'\t') => out.push(b'\t'),
                _ => {}
            }
        }
        out.extend_from_slice(new_value);
        if cr {
            out.push(b'\r');
        }
        out
    }

    /// Set `key` to `value` on every line whose key matches exactly.
    pub fn change<'a, I>(&self, lines: I, key: &[u8], value: &[u8]) -> Vec<Cow<'a, [u8]>>
    where
        I: IntoIterator<Item = &'a [u8]>,
    {
        lines
            .into_iter()
            .map(|line| match self.changed_line(line, key, value) {
                Some(new) => Cow::Owned(new),
                None => Cow::Borrowed(line),
            })
            .collect()
    }

    /// Remove the comment marker from every commented-out line that
    /// assigns `key`.
    pub fn uncomment<'a, I>(&self, lines: I, key: &[u8]) -> Vec<Cow<'a, [u8]>>
    where
        I: IntoIterator<Item = &'a [u8]>,
    {
        lines
            .into_iter()
            .map(|line| match self.uncommented_line(line, key) {
                Some(new) => Cow::Owned(new),
                None => Cow::Borrowed(line),
            })
            .collect()
    }

    /// Split a literal such as `KEY=value` into trimmed key and value.
    pub fn parse_assignment<'a>(&'a self, literal: &'a [u8]) -> Result<(&'a [u8], &'a [u8])> {
        let split = self
            .classify(literal, false)
            .ok_or_else(|| Error::no_assignment(literal))?;
        Ok((split.key.trim_ascii(), split.value.trim_ascii()))
    }

    pub(crate) fn changed_line(&self, line: &[u8], key: &[u8], value: &[u8]) -> Option<Vec<u8>> {
        let split = self.classify(line, false)?;
        if split.key.trim_ascii() != key {
            return None;
        }
        Some(self.rewrite_line(line, value))
    }

    /// Drop the comment marker and all whitespace after it, spaces and
    /// tabs alike, so `#\tFOO=1` becomes `FOO=1`. Indentation before the
    /// marker is kept.
    pub(crate) fn uncommented_line(&self, line: &[u8], key: &[u8]) -> Option<Vec<u8>> {
        let body = line.trim_ascii_start();
        let indent = &line[..line.len() - body.len()];
        let marker = self.line_comments.iter().find(|m| body.starts_with(m))?;
        let rest = body[marker.len()..].trim_ascii_start();
        if !starts_with_key(rest, key) {
            return None;
        }

        let mut out = Vec::with_capacity(line.len());
        out.extend_from_slice(indent);
        out.extend_from_slice(rest);
        Some(out)
    }
}

/// Bytes that may continue a key: anything but whitespace and
/// punctuation, except `_`, `-` and `.`.
pub(crate) fn is_key_byte(b: u8) -> bool {
    !(b.is_ascii_whitespace() || (b.is_ascii_punctuation() && !matches!(b, b'_' | b'-' | b'.')))
}

fn starts_with_key(text: &[u8], key: &[u8]) -> bool {
    !key.is_empty()
        && text.starts_with(key)
        && text.get(key.len()).is_none_or(|&b| !is_key_byte(b))
}

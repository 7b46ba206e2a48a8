//! Assignment operators, comment markers and line endings

use serde::{Deserialize, Serialize};

use crate::delta::Sign;
use crate::error::{Error, Result};

/// Operators in priority order. Position only matters as a tie-break
/// between tokens that start at the same offset in a line.
pub const DEFAULT_OPERATORS: &[&str] = &["==", "=>", "+=", "-=", "?=", "=", ":=", "::", ":", "is"];

/// Markers that comment out the rest of a line
pub const DEFAULT_LINE_COMMENTS: &[&str] = &["#", "//", "--"];

/// Markers that open a multi-line comment
pub const DEFAULT_BLOCK_COMMENTS: &[&str] = &["/*"];

/// How an operator token is matched and rewritten
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorKind {
    /// Matched anywhere in the line as a raw substring
    Symbol,
    /// Matched only as a whole word, e.g. `KEY is not set`
    Word,
    /// `+=` / `-=`, reserved for increment and decrement
    Delta(Sign),
}

/// A token separating a key from its value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Operator {
    token: String,
    kind: OperatorKind,
}

impl Operator {
    /// Create an operator, inferring its kind from the token.
    pub fn new(token: impl Into<String>) -> Result<Self> {
        let token = token.into();
        if token.is_empty() {
            return Err(Error::invalid_operator(token, "empty token"));
        }
        if token.chars().any(char::is_whitespace) {
            return Err(Error::invalid_operator(token, "contains whitespace"));
        }

        Ok(Self::inferred(token))
    }

    fn inferred(token: String) -> Self {
        let kind = match token.as_str() {
            "+=" => OperatorKind::Delta(Sign::Plus),
            "-=" => OperatorKind::Delta(Sign::Minus),
            t if t.chars().all(char::is_alphanumeric) => OperatorKind::Word,
            _ => OperatorKind::Symbol,
        };
        Self { token, kind }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.token.as_bytes()
    }

    pub fn kind(&self) -> OperatorKind {
        self.kind
    }

    pub fn is_word(&self) -> bool {
        self.kind == OperatorKind::Word
    }

    /// The sign of a delta operator, `None` for plain assignments.
    pub fn delta_sign(&self) -> Option<Sign> {
        match self.kind {
            OperatorKind::Delta(sign) => Some(sign),
            _ => None,
        }
    }
}

impl TryFrom<String> for Operator {
    type Error = Error;

    fn try_from(token: String) -> Result<Self> {
        Self::new(token)
    }
}

impl From<Operator> for String {
    fn from(op: Operator) -> Self {
        op.token
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.token)
    }
}

/// Line terminator used to split and rejoin documents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineEnding {
    Lf,
    CrLf,
}

impl LineEnding {
    /// The terminator of the platform we are running on.
    pub const fn native() -> Self {
        if cfg!(windows) { Self::CrLf } else { Self::Lf }
    }

    pub const fn as_bytes(&self) -> &'static [u8] {
        match self {
            Self::Lf => b"\n",
            Self::CrLf => b"\r\n",
        }
    }
}

impl Default for LineEnding {
    fn default() -> Self {
        Self::native()
    }
}

/// The set of tokens a document is interpreted with.
///
/// Every field may be omitted in a syntax file and falls back to the
/// defaults below.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Syntax {
    /// Assignment operators in priority order
    pub operators: Vec<Operator>,
    /// Single-line comment markers (`#`, `//`, `--`)
    pub line_comments: Vec<String>,
    /// Multi-line comment openers (`/*`)
    pub block_comments: Vec<String>,
    pub line_ending: LineEnding,
}

impl Default for Syntax {
    fn default() -> Self {
        Self {
            operators: DEFAULT_OPERATORS
                .iter()
                .map(|t| Operator::inferred(t.to_string()))
                .collect(),
            line_comments: strings(DEFAULT_LINE_COMMENTS),
            block_comments: strings(DEFAULT_BLOCK_COMMENTS),
            line_ending: LineEnding::native(),
        }
    }
}

impl Syntax {
    pub fn with_line_ending(mut self, line_ending: LineEnding) -> Self {
        self.line_ending = line_ending;
        self
    }

    /// Operators usable as a key/value separator, in priority order.
    pub fn assignment_operators(&self) -> impl Iterator<Item = &Operator> {
        self.operators.iter().filter(|op| op.delta_sign().is_none())
    }

    /// `+=` / `-=` style operators, in priority order.
    pub fn delta_operators(&self) -> impl Iterator<Item = (&Operator, Sign)> {
        self.operators
            .iter()
            .filter_map(|op| op.delta_sign().map(|sign| (op, sign)))
    }

    /// All comment markers, single-line first.
    pub fn comment_markers(&self) -> impl Iterator<Item = &str> {
        self.line_comments
            .iter()
            .chain(self.block_comments.iter())
            .map(String::as_str)
    }

    /// Check that the syntax can classify anything at all.
    pub fn validate(&self) -> Result<()> {
        if self.assignment_operators().next().is_none() {
            return Err(Error::InvalidSyntax {
                message: "at least one assignment operator is required".into(),
            });
        }
        if self.comment_markers().any(str::is_empty) {
            return Err(Error::InvalidSyntax {
                message: "comment markers must not be empty".into(),
            });
        }
        Ok(())
    }
}

fn strings(xs: &[&str]) -> Vec<String> {
    xs.iter().map(|s| s.to_string()).collect()
}

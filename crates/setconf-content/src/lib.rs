//! Content editing for setconf
//!
//! Recognizes `KEY <op> value` assignments in configuration files of
//! unknown syntax and rewrites their values in place. All content is
//! treated as opaque bytes: everything outside the edited span is
//! returned unchanged, whatever its encoding.

pub mod delta;
pub mod document;
pub mod edit;
pub mod error;
pub mod line;
pub mod span;
pub mod syntax;

pub use delta::{Sign, apply_delta};
pub use document::{Document, add_line, change_file, change_file_multiline, get_value, has_key};
pub use edit::{Edit, EditKind};
pub use error::{Error, Result};
pub use line::{LineClassifier, Split};
pub use span::{EndMarker, SpanOutcome, change_span};
pub use syntax::{LineEnding, Operator, OperatorKind, Syntax};

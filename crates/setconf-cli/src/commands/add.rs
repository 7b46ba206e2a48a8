//! Add mode: set a key, or append it when it is missing

use std::path::Path;

use setconf_content::{Document, Edit};
use setconf_fs::io;
use tracing::debug;

use crate::error::Result;

/// Content of `path`, creating the file if it does not exist.
///
/// In a dry run nothing is created and a missing file reads as empty.
pub fn read_or_create(path: &Path, dry_run: bool) -> Result<Vec<u8>> {
    if dry_run {
        if !io::exists(path) {
            return Ok(Vec::new());
        }
    } else if io::create_if_missing(path)? {
        debug!(path = %path.display(), "created file for add");
        return Ok(Vec::new());
    }
    Ok(io::read_bytes(path)?)
}

/// Set `key` to `value`; if no line assigns `key`, append `line`.
pub fn run_add(doc: &mut Document, key: &[u8], value: &[u8], line: &[u8]) -> Vec<Edit> {
    doc.set_or_append(key, value, line)
}

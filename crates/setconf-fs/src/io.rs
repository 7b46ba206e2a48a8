//! Whole-file I/O

use std::fs::{self, File, Metadata, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::debug;

use crate::{Error, Result};

static TEMP_COUNTER: AtomicUsize = AtomicUsize::new(0);

/// Read the whole file.
pub fn read_bytes(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|e| Error::read(path, e))
}

pub fn exists(path: &Path) -> bool {
    path.exists()
}

/// Create an empty file unless something already exists at `path`.
///
/// Returns `true` if the file was created.
pub fn create_if_missing(path: &Path) -> Result<bool> {
    match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(_) => {
            debug!(path = %path.display(), "created empty file");
            Ok(true)
        }
        Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(false),
        Err(e) => Err(Error::write(path, e)),
    }
}

/// Replace the content of a file atomically.
///
/// A symlink is resolved first, so the link stays and its target is
/// replaced. An existing target must be writable by the caller, otherwise
/// this fails with [`Error::Write`] and the file is left as it was.
///
/// The content goes to a temporary file next to the target, which takes
/// over the target's permissions and owner and is then renamed over it.
/// A target with other hard links, or one whose owner can't be copied or
/// whose directory isn't writable, is truncated and rewritten in place
/// instead, so it keeps its inode.
pub fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    let target = dunce::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());

    let existing = match OpenOptions::new().write(true).open(&target) {
        Ok(file) => Some(file),
        Err(e) if e.kind() == ErrorKind::NotFound => None,
        Err(e) => return Err(Error::write(path, e)),
    };

    let result = match existing {
        None => replace_via_temp(&target, content, None),
        Some(file) => {
            let metadata = file.metadata().map_err(|e| Error::write(path, e))?;
            if has_other_links(&metadata) {
                debug!(path = %target.display(), "hard-linked, writing in place");
                write_in_place(file, content)
            } else {
                match replace_via_temp(&target, content, Some(&metadata)) {
                    Err(e) if e.kind() == ErrorKind::PermissionDenied => {
                        debug!(
                            path = %target.display(),
                            error = %e,
                            "can't replace, writing in place"
                        );
                        write_in_place(file, content)
                    }
                    other => other,
                }
            }
        }
    };
    result.map_err(|e| Error::write(path, e))?;

    debug!(path = %target.display(), bytes = content.len(), "wrote file");
    Ok(())
}

fn replace_via_temp(
    target: &Path,
    content: &[u8],
    metadata: Option<&Metadata>,
) -> std::io::Result<()> {
    let temp_path = temp_path_for(target);
    let result = write_temp(&temp_path, content, metadata)
        .and_then(|()| fs::rename(&temp_path, target));
    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    result
}

fn temp_path_for(target: &Path) -> PathBuf {
    let name = target
        .file_name()
        .map(|n| n.to_string_lossy())
        .unwrap_or_default();
    target.with_file_name(format!(
        ".{}.{}.{}.setconf.tmp",
        name,
        std::process::id(),
        TEMP_COUNTER.fetch_add(1, Ordering::Relaxed)
    ))
}

fn write_temp(
    temp_path: &Path,
    content: &[u8],
    metadata: Option<&Metadata>,
) -> std::io::Result<()> {
    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(temp_path)?;
    file.write_all(content)?;
    if let Some(metadata) = metadata {
        // chown clears setuid bits, so the mode goes on afterwards
        copy_owner(&file, metadata)?;
        file.set_permissions(metadata.permissions())?;
    }
    file.sync_all()
}

fn write_in_place(mut file: File, content: &[u8]) -> std::io::Result<()> {
    file.set_len(0)?;
    file.write_all(content)?;
    file.sync_all()
}

#[cfg(unix)]
fn copy_owner(file: &File, metadata: &Metadata) -> std::io::Result<()> {
    use std::os::unix::fs::{MetadataExt, fchown};

    let current = file.metadata()?;
    if current.uid() == metadata.uid() && current.gid() == metadata.gid() {
        return Ok(());
    }
    fchown(file, Some(metadata.uid()), Some(metadata.gid()))
}

#[cfg(not(unix))]
fn copy_owner(_file: &File, _metadata: &Metadata) -> std::io::Result<()> {
    Ok(())
}

#[cfg(unix)]
fn has_other_links(metadata: &Metadata) -> bool {
    use std::os::unix::fs::MetadataExt;
    metadata.nlink() > 1
}

#[cfg(not(unix))]
fn has_other_links(_metadata: &Metadata) -> bool {
    false
}

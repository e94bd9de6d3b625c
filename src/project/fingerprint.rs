//! Component fingerprints from file metadata.
//!
//! A fingerprint changes whenever any tracked file's mtime or size changes,
//! or a file appears or disappears. Contents are never read.

use std::collections::BTreeMap;
use std::io;
use std::time::UNIX_EPOCH;

use crate::base::{CoreError, FileKind};

/// Hex blake3 digest over the sorted `kind:path:mtime:size` lines of the
/// tracked files. A missing file contributes `kind:path:missing`.
pub fn compute_fingerprint(files: &BTreeMap<FileKind, String>) -> Result<String, CoreError> {
    let mut lines = files
        .iter()
        .map(|(kind, path)| fingerprint_line(*kind, path))
        .collect::<Result<Vec<_>, _>>()?;
    lines.sort();

    let mut hasher = blake3::Hasher::new();
    for line in &lines {
        hasher.update(line.as_bytes());
        hasher.update(b"\n");
    }
    Ok(hasher.finalize().to_hex().to_string())
}

fn fingerprint_line(kind: FileKind, path: &str) -> Result<String, CoreError> {
    match std::fs::metadata(path) {
        Ok(meta) => {
            let mtime = meta
                .modified()?
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis())
                .unwrap_or(0);
            Ok(format!("{kind}:{path}:{mtime}:{}", meta.len()))
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(format!("{kind}:{path}:missing")),
        Err(err) => Err(err.into()),
    }
}

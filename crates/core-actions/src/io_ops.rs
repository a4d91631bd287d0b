//! File IO helpers used by the dispatcher.
//!
//! Synchronous. Decoding problems are data errors and come back as a value the
//! dispatcher reports on the status line; read/write failures are environment
//! errors and propagate with context.

use anyhow::{Context, Result};
use core_text::{Document, EncodingError};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{info, warn};

/// Result of attempting to open a file.
#[derive(Debug)]
pub enum OpenOutcome {
    Opened(Document),
    /// The path does not exist yet: an empty document bound to it.
    Created(Document),
    Undecodable(EncodingError),
}

pub fn open_document(path: &Path, tab_width: usize) -> Result<OpenOutcome> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            let mut doc = Document::new(tab_width);
            doc.filename = Some(path.to_path_buf());
            info!(target: "io", path = %path.display(), "file_new");
            return Ok(OpenOutcome::Created(doc));
        }
        Err(e) => return Err(e).with_context(|| format!("cannot read {}", path.display())),
    };
    match Document::open(&bytes, Some(path), tab_width) {
        Ok(doc) => {
            info!(
                target: "io",
                path = %path.display(),
                bytes = bytes.len(),
                encoding = doc.encoding.label(),
                crlf = doc.uses_crlf,
                "file_opened"
            );
            Ok(OpenOutcome::Opened(doc))
        }
        Err(e) => {
            warn!(target: "io", path = %path.display(), error = %e, "file_undecodable");
            Ok(OpenOutcome::Undecodable(e))
        }
    }
}

/// Write `doc` to `target` (or its own filename) in its original encoding,
/// BOM and line-ending style. Returns the byte count, or `None` when the
/// document has no filename and no target was given. On failure the document
/// is left untouched.
pub fn save_document(
    doc: &mut Document,
    target: Option<&Path>,
    trim: bool,
) -> Result<Option<usize>> {
    let Some(path) = target.map(Path::to_path_buf).or_else(|| doc.filename.clone()) else {
        return Ok(None);
    };
    let (bytes, text) = doc.save(trim);
    fs::write(&path, &bytes).with_context(|| format!("cannot write {}", path.display()))?;
    info!(target: "io", path = %path.display(), bytes = bytes.len(), "file_saved");
    doc.filename = Some(path);
    doc.finish_save(&text);
    Ok(Some(bytes.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_text::Encoding;
    use pretty_assertions::assert_eq;

    #[test]
    fn open_missing_file_creates_named_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("new.txt");
        match open_document(&path, 4).unwrap() {
            OpenOutcome::Created(doc) => {
                assert!(doc.is_empty());
                assert_eq!(doc.filename.as_deref(), Some(path.as_path()));
            }
            other => panic!("expected Created, got {other:?}"),
        }
    }

    #[test]
    fn open_detects_crlf_and_save_restores_it() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dos.txt");
        std::fs::write(&path, b"a  \r\nb\r\n").unwrap();
        let OpenOutcome::Opened(mut doc) = open_document(&path, 4).unwrap() else {
            panic!("expected Opened");
        };
        assert!(doc.uses_crlf);
        assert_eq!(doc.contents(), "a  \nb\n");
        doc.set_modified(true);
        assert_eq!(save_document(&mut doc, None, true).unwrap(), Some(6));
        assert_eq!(std::fs::read(&path).unwrap(), b"a\r\nb\r\n");
        assert!(!doc.is_modified());
    }

    #[test]
    fn utf16_round_trip_is_byte_identical() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wide.txt");
        let mut bytes = vec![0xff, 0xfe];
        for unit in "hi\nthere".encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        std::fs::write(&path, &bytes).unwrap();
        let OpenOutcome::Opened(mut doc) = open_document(&path, 4).unwrap() else {
            panic!("expected Opened");
        };
        assert_eq!(doc.encoding, Encoding::Utf16Le);
        save_document(&mut doc, None, false).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), bytes);
    }

    #[test]
    fn odd_utf16_length_is_a_data_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.txt");
        std::fs::write(&path, [0xff, 0xfe, b'a']).unwrap();
        assert!(matches!(open_document(&path, 4).unwrap(), OpenOutcome::Undecodable(_)));
    }

    #[test]
    fn unnamed_document_is_not_saved() {
        let mut doc = Document::from_text("x", 4);
        assert_eq!(save_document(&mut doc, None, true).unwrap(), None);
    }

    #[test]
    fn write_failure_carries_path_context() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("missing").join("out.txt");
        let mut doc = Document::from_text("x", 4);
        doc.set_modified(true);
        let err = save_document(&mut doc, Some(&target), true).unwrap_err();
        assert!(err.to_string().contains("cannot write"));
        assert!(doc.is_modified());
        assert!(doc.filename.is_none());
    }
}

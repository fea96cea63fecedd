use crate::atomic::StagedFile;
use crate::normalize::normalize_document;
use crate::CanonError;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Result of normalizing a single document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentOutcome {
    /// Whether the normalized bytes differ from what is on disk.
    pub changed: bool,
    /// blake3 hex digest of the normalized bytes.
    pub digest: String,
}

/// Compute the canonical bytes for the document at `path` without writing.
fn render(path: &Path, sort_keys: bool) -> Result<(Vec<u8>, Vec<u8>), CanonError> {
    let original = fs::read(path).map_err(|e| CanonError::io(path, e))?;
    let value = serde_json::from_slice(&original).map_err(|source| CanonError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    let normalized = normalize_document(value, sort_keys)?;
    Ok((original, normalized))
}

/// Normalize the document at `path` in place.
///
/// The file is replaced through a staged temporary file; on any error the
/// original content is left as it was. Already-canonical files are not
/// rewritten.
pub fn normalize_file(path: &Path, sort_keys: bool) -> Result<DocumentOutcome, CanonError> {
    let (original, normalized) = render(path, sort_keys)?;
    let digest = blake3::hash(&normalized).to_hex().to_string();

    if original == normalized {
        debug!("{}: already canonical", path.display());
        return Ok(DocumentOutcome {
            changed: false,
            digest,
        });
    }

    StagedFile::stage(path, &normalized)?.commit()?;
    info!("{}: rewritten", path.display());
    Ok(DocumentOutcome {
        changed: true,
        digest,
    })
}

/// Report whether the document at `path` would be rewritten.
pub fn check_file(path: &Path, sort_keys: bool) -> Result<DocumentOutcome, CanonError> {
    let (original, normalized) = render(path, sort_keys)?;
    let changed = original != normalized;
    debug!("{}: changed={changed}", path.display());
    Ok(DocumentOutcome {
        changed,
        digest: blake3::hash(&normalized).to_hex().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const CANONICAL: &str = "{\n    \"b\": [\n        1,\n        2,\n        3\n    ],\n    \"a\": \"x\"\n}\n";

    fn write(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn normalize_file_rewrites_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "t.biotools.json", r#"{"b": [3,1,2], "a": "x"}"#);

        let outcome = normalize_file(&path, false).unwrap();
        assert!(outcome.changed);
        assert_eq!(fs::read_to_string(&path).unwrap(), CANONICAL);
        assert_eq!(
            outcome.digest,
            blake3::hash(CANONICAL.as_bytes()).to_hex().to_string()
        );
    }

    #[test]
    fn normalize_file_twice_is_byte_identical() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            dir.path(),
            "t.json",
            r#"{"x": [[2,1],[4,3]], "y": [{"b": [true, null]}, 1.5, "s"]}"#,
        );

        let first = normalize_file(&path, false).unwrap();
        let after_first = fs::read(&path).unwrap();
        let second = normalize_file(&path, false).unwrap();
        let after_second = fs::read(&path).unwrap();

        assert!(first.changed);
        assert!(!second.changed);
        assert_eq!(after_first, after_second);
        assert_eq!(first.digest, second.digest);
    }

    #[test]
    fn canonical_file_is_not_rewritten() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "t.json", CANONICAL);
        let before = fs::metadata(&path).unwrap().modified().unwrap();

        let outcome = normalize_file(&path, false).unwrap();
        assert!(!outcome.changed);
        assert_eq!(fs::metadata(&path).unwrap().modified().unwrap(), before);
    }

    #[test]
    fn number_literals_are_kept_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            dir.path(),
            "t.json",
            "[123456789012345678901234567890, 1E2, 18446744073709551616, 1.50, -0.0]",
        );

        normalize_file(&path, false).unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "[\n    -0.0,\n    1.50,\n    1E2,\n    18446744073709551616,\n    123456789012345678901234567890\n]\n"
        );
        assert!(!normalize_file(&path, false).unwrap().changed);
    }

    #[test]
    fn out_of_range_float_is_not_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "t.json", "[1e400, 1, -1e400]");

        let outcome = normalize_file(&path, false).unwrap();
        assert!(outcome.changed);
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "[\n    -1e400,\n    1,\n    1e400\n]\n"
        );
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_document_rewrites_target_and_keeps_link() {
        let dir = tempfile::tempdir().unwrap();
        let target = write(dir.path(), "real.json", r#"{"b": [3,1,2], "a": "x"}"#);
        let link = dir.path().join("link.json");
        std::os::unix::fs::symlink(&target, &link).unwrap();

        assert!(normalize_file(&link, false).unwrap().changed);
        assert!(fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
        assert_eq!(fs::read_to_string(&target).unwrap(), CANONICAL);
    }

    #[test]
    fn malformed_json_is_parse_error_and_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "bad.json", r#"{"a": [1,2,}"#);

        let err = normalize_file(&path, false).unwrap_err();
        assert!(err.is_parse());
        assert_eq!(fs::read_to_string(&path).unwrap(), r#"{"a": [1,2,}"#);
    }

    #[test]
    fn non_utf8_input_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("latin1.json");
        fs::write(&path, b"[\"caf\xe9\"]").unwrap();
        assert!(normalize_file(&path, false).unwrap_err().is_parse());
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = normalize_file(&dir.path().join("nope.json"), false).unwrap_err();
        assert!(matches!(err, CanonError::Io { .. }));
    }

    #[test]
    fn check_file_never_writes() {
        let dir = tempfile::tempdir().unwrap();
        let raw = r#"{"b": [3,1,2], "a": "x"}"#;
        let path = write(dir.path(), "t.json", raw);

        let outcome = check_file(&path, false).unwrap();
        assert!(outcome.changed);
        assert_eq!(fs::read_to_string(&path).unwrap(), raw);
    }

    #[test]
    fn check_file_accepts_canonical() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "t.json", CANONICAL);
        assert!(!check_file(&path, false).unwrap().changed);
    }

    #[test]
    fn sort_keys_changes_canonical_form() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "t.json", CANONICAL);
        assert!(check_file(&path, true).unwrap().changed);
    }
}

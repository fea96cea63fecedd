use crate::document::{check_file, normalize_file, DocumentOutcome};
use crate::signal::shutdown_requested;
use crate::CanonError;
use glob::MatchOptions;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Rewrite non-canonical files in place.
    Rewrite,
    /// Only report which files would be rewritten.
    Check,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Parse,
    Io,
}

impl FailureKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Parse => "parse",
            Self::Io => "io",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileStatus {
    Rewritten,
    Unchanged,
    WouldRewrite,
    Failed { kind: FailureKind, reason: String },
}

impl FileStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rewritten => "rewritten",
            Self::Unchanged => "unchanged",
            Self::WouldRewrite => "would_rewrite",
            Self::Failed { .. } => "failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileOutcome {
    pub path: PathBuf,
    pub status: FileStatus,
    /// blake3 digest of the canonical bytes; `None` on failure.
    pub digest: Option<String>,
}

#[derive(Debug, Default)]
pub struct BatchReport {
    /// One entry per processed file, in path order.
    pub outcomes: Vec<FileOutcome>,
    /// Set when a shutdown request stopped the batch early.
    pub interrupted: bool,
}

impl BatchReport {
    pub fn checked(&self) -> usize {
        self.outcomes.len()
    }

    fn count(&self, pred: impl Fn(&FileStatus) -> bool) -> usize {
        self.outcomes.iter().filter(|o| pred(&o.status)).count()
    }

    pub fn rewritten(&self) -> usize {
        self.count(|s| *s == FileStatus::Rewritten)
    }

    pub fn unchanged(&self) -> usize {
        self.count(|s| *s == FileStatus::Unchanged)
    }

    pub fn would_rewrite(&self) -> usize {
        self.count(|s| *s == FileStatus::WouldRewrite)
    }

    pub fn failed(&self) -> usize {
        self.count(|s| matches!(s, FileStatus::Failed { .. }))
    }

    pub fn failures(&self) -> impl Iterator<Item = &FileOutcome> {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.status, FileStatus::Failed { .. }))
    }

    pub fn has_failure(&self, kind: FailureKind) -> bool {
        self.outcomes
            .iter()
            .any(|o| matches!(&o.status, FileStatus::Failed { kind: k, .. } if *k == kind))
    }

    /// True when every file succeeded and nothing is left to rewrite.
    pub fn is_clean(&self) -> bool {
        self.failed() == 0 && self.would_rewrite() == 0 && !self.interrupted
    }
}

/// Files selected by a set of inputs, plus entries that could not be read
/// while expanding patterns.
#[derive(Debug, Default)]
pub struct Expansion {
    pub files: Vec<PathBuf>,
    pub errors: Vec<(PathBuf, std::io::Error)>,
}

/// An existing path is taken literally even when its name holds glob
/// metacharacters, such as `tool[1].json`.
fn is_pattern(input: &str) -> bool {
    input.contains(['*', '?', '[']) && !Path::new(input).exists()
}

/// Hidden files, including stray temp files, are never matched.
fn match_options() -> MatchOptions {
    MatchOptions {
        require_literal_leading_dot: true,
        ..MatchOptions::new()
    }
}

/// Expand glob patterns and literal paths into a sorted, de-duplicated file list.
///
/// An invalid pattern fails the whole expansion. A pattern matching nothing
/// is logged and skipped. Literal paths are kept even if missing so that the
/// caller reports them.
pub fn expand_inputs(inputs: &[String]) -> Result<Expansion, CanonError> {
    let mut expansion = Expansion::default();

    for input in inputs {
        if !is_pattern(input) {
            let path = PathBuf::from(input);
            if path.is_dir() {
                warn!("{input}: is a directory, skipping");
            } else {
                expansion.files.push(path);
            }
            continue;
        }

        let entries = glob::glob_with(input, match_options()).map_err(|source| {
            CanonError::Pattern {
                pattern: input.clone(),
                source,
            }
        })?;

        let mut matched = 0usize;
        for entry in entries {
            match entry {
                Ok(path) if path.is_dir() => debug!("{}: directory match skipped", path.display()),
                Ok(path) => {
                    matched += 1;
                    expansion.files.push(path);
                }
                Err(e) => {
                    let path = e.path().to_path_buf();
                    expansion.errors.push((path, e.into_error()));
                }
            }
        }
        if matched == 0 {
            warn!("pattern '{input}' matched no files");
        }
    }

    expansion.files.sort();
    expansion.files.dedup();
    Ok(expansion)
}

/// Normalize (or check) every file selected by `inputs`.
///
/// Per-file failures are recorded in the report and never stop the batch.
/// Only an invalid glob pattern returns `Err`, before any file is touched.
pub fn run_batch(inputs: &[String], mode: Mode, sort_keys: bool) -> Result<BatchReport, CanonError> {
    run_batch_with(inputs, mode, sort_keys, shutdown_requested)
}

pub(crate) fn run_batch_with(
    inputs: &[String],
    mode: Mode,
    sort_keys: bool,
    stop: impl Fn() -> bool,
) -> Result<BatchReport, CanonError> {
    let expansion = expand_inputs(inputs)?;
    let mut report = BatchReport::default();

    for (path, e) in expansion.errors {
        warn!("{}: {e}", path.display());
        report.outcomes.push(FileOutcome {
            path,
            status: FileStatus::Failed {
                kind: FailureKind::Io,
                reason: e.to_string(),
            },
            digest: None,
        });
    }

    for path in expansion.files {
        if stop() {
            warn!("batch interrupted before {}", path.display());
            report.interrupted = true;
            break;
        }
        report.outcomes.push(process_one(&path, mode, sort_keys));
    }

    report.outcomes.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(report)
}

fn process_one(path: &Path, mode: Mode, sort_keys: bool) -> FileOutcome {
    let result = match mode {
        Mode::Rewrite => normalize_file(path, sort_keys),
        Mode::Check => check_file(path, sort_keys),
    };

    match result {
        Ok(DocumentOutcome { changed, digest }) => {
            let status = match (mode, changed) {
                (_, false) => FileStatus::Unchanged,
                (Mode::Rewrite, true) => FileStatus::Rewritten,
                (Mode::Check, true) => FileStatus::WouldRewrite,
            };
            FileOutcome {
                path: path.to_path_buf(),
                status,
                digest: Some(digest),
            }
        }
        Err(e) => {
            warn!("{e}");
            let kind = if e.is_parse() {
                FailureKind::Parse
            } else {
                FailureKind::Io
            };
            FileOutcome {
                path: path.to_path_buf(),
                status: FileStatus::Failed {
                    kind,
                    reason: e.to_string(),
                },
                digest: None,
            }
        }
    }
}

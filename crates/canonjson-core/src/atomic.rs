use crate::CanonError;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Fully written replacement content waiting to be renamed over its target.
///
/// The temporary file lives in the target's directory so the final rename
/// never crosses a filesystem. Dropping a `StagedFile` without calling
/// [`StagedFile::commit`] deletes the temporary file and leaves the target
/// untouched.
pub struct StagedFile {
    tmp: NamedTempFile,
    dest: PathBuf,
}

impl StagedFile {
    /// Write `content` to a temporary sibling of `dest` and fsync it.
    ///
    /// A symlinked `dest` is followed: the link's final target is replaced
    /// and the link itself is left in place.
    pub fn stage(dest: &Path, content: &[u8]) -> Result<Self, CanonError> {
        let dest = resolve_symlink(dest)?;
        let dir = parent_dir(&dest);
        let mut tmp = NamedTempFile::new_in(&dir).map_err(|e| CanonError::io(&dir, e))?;
        tmp.write_all(content)
            .map_err(|e| CanonError::io(tmp.path(), e))?;
        tmp.as_file()
            .sync_all()
            .map_err(|e| CanonError::io(tmp.path(), e))?;

        // Keep the target's permission bits; NamedTempFile creates 0600 files.
        if let Ok(meta) = fs::metadata(&dest) {
            tmp.as_file()
                .set_permissions(meta.permissions())
                .map_err(|e| CanonError::io(tmp.path(), e))?;
        }

        Ok(Self { tmp, dest })
    }

    pub fn temp_path(&self) -> &Path {
        self.tmp.path()
    }

    /// Atomically replace the target with the staged content.
    pub fn commit(self) -> Result<(), CanonError> {
        let dir = parent_dir(&self.dest);
        self.tmp
            .persist(&self.dest)
            .map_err(|e| CanonError::io(&self.dest, e.error))?;
        fsync_dir(&dir).map_err(|e| CanonError::io(&dir, e))?;
        Ok(())
    }
}

/// Stage and commit in one step.
pub fn write_atomic(dest: &Path, content: &[u8]) -> Result<(), CanonError> {
    StagedFile::stage(dest, content)?.commit()
}

fn resolve_symlink(path: &Path) -> Result<PathBuf, CanonError> {
    match fs::symlink_metadata(path) {
        Ok(meta) if meta.file_type().is_symlink() => {
            fs::canonicalize(path).map_err(|e| CanonError::io(path, e))
        }
        _ => Ok(path.to_path_buf()),
    }
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Fsync a directory so a preceding `rename()` survives power loss.
fn fsync_dir(dir: &Path) -> Result<(), std::io::Error> {
    let f = fs::File::open(dir)?;
    f.sync_all()
}

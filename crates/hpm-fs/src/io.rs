//! File reads and atomic locked writes

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use fs2::FileExt;

use crate::{Error, NormalizedPath, Result};

/// Replace the file at `path` with `content` in one step.
///
/// The bytes go to a locked sibling temp file first, which is then renamed
/// over the target. Missing parent directories are created.
pub fn write_atomic(path: &NormalizedPath, content: &[u8]) -> Result<()> {
    let target = path.to_native();
    if let Some(dir) = target.parent()
        && !dir.as_os_str().is_empty()
    {
        fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?;
    }

    let staging = staging_path(&target);
    write_locked(&staging, &target, content)?;
    fs::rename(&staging, &target).map_err(|e| {
        let _ = fs::remove_file(&staging);
        Error::io(&target, e)
    })?;

    tracing::debug!(%path, bytes = content.len(), "Replaced file");
    Ok(())
}

/// `.<name>.<pid>.tmp` next to `target`, so the rename never crosses
/// filesystems.
fn staging_path(target: &Path) -> PathBuf {
    let name = target
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    target.with_file_name(format!(".{name}.{}.tmp", std::process::id()))
}

fn write_locked(staging: &Path, target: &Path, content: &[u8]) -> Result<()> {
    let mut file = File::create(staging).map_err(|e| Error::io(staging, e))?;
    let lock_failed = |_| Error::LockFailed {
        path: target.to_path_buf(),
    };

    file.lock_exclusive().map_err(lock_failed)?;
    file.write_all(content)
        .and_then(|()| file.sync_all())
        .map_err(|e| Error::io(staging, e))?;
    file.unlock().map_err(lock_failed)
}

pub fn read_text(path: &NormalizedPath) -> Result<String> {
    let native = path.to_native();
    fs::read_to_string(&native).map_err(|e| Error::io(native, e))
}

/// [`write_atomic`] for text.
pub fn write_text(path: &NormalizedPath, content: &str) -> Result<()> {
    write_atomic(path, content.as_bytes())
}

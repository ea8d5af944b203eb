use std::path::{Path, PathBuf};

use tracing::warn;
use walkdir::{DirEntry, WalkDir};

use crate::core::errors::{AppError, AppResult};

/// Every file under `root`, in walk order (not sorted).
///
/// Symlinked directories are not descended into. Symlinks that do not point
/// at a directory are listed like files, dangling ones included, so callers
/// that need the target must resolve it themselves. Entries the walker cannot
/// read are logged and skipped.
pub fn walk_files(root: &Path) -> impl Iterator<Item = PathBuf> {
    WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(err) => {
                warn!("skipping unreadable entry: {err}");
                None
            }
        })
        .filter(is_file_entry)
        .map(|entry| entry.into_path())
}

fn is_file_entry(entry: &DirEntry) -> bool {
    entry.file_type().is_file() || (entry.path_is_symlink() && !entry.path().is_dir())
}

/// True when `path` resolves to a regular file, following symlinks.
pub fn resolves_to_file(path: &Path) -> bool {
    std::fs::metadata(path).map(|meta| meta.is_file()).unwrap_or(false)
}

pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_default()
}

/// Lower-cased extension without the dot; empty when the file has none.
pub fn extension_lower(path: &Path) -> String {
    path.extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_ascii_lowercase()
}

/// Office writes `~$name.xlsx` lock files next to open workbooks.
pub fn is_office_lock_file(name: &str) -> bool {
    name.starts_with("~$")
}

/// True when both paths name the same file, even if only one exists yet.
pub fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

/// Delete a previous output so the next write is a full overwrite. Failing
/// to delete is fatal for the run.
pub fn remove_if_exists(path: &Path) -> AppResult<()> {
    if !path.exists() {
        return Ok(());
    }
    std::fs::remove_file(path).map_err(|err| {
        AppError::Io(format!(
            "could not delete old output file {}: {err}",
            path.display()
        ))
    })
}

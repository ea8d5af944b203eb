//! Manifest of spreadsheet files waiting to be ingested.

use std::path::Path;

use chrono::{DateTime, Local};
use md5::{Digest, Md5};
use tracing::{info, warn};

use crate::core::config::FileIndexConfig;
use crate::core::discovery::{
    extension_lower, file_name, is_office_lock_file, resolves_to_file, same_file, walk_files,
};
use crate::core::errors::{AppError, AppResult};
use crate::core::types::{FileIndexEntry, FileIndexSummary, Vendor};

const FILE_ID_LEN: usize = 12;

/// Stable for an unchanged path: a prefix of the MD5 of the path text, so
/// ids line up with manifests written by earlier runs.
pub fn make_file_id(path: &Path) -> String {
    let digest = format!("{:x}", Md5::digest(path.to_string_lossy().as_bytes()));
    digest[..FILE_ID_LEN].to_string()
}

/// Guess the manufacturer from anywhere in the path.
pub fn guess_vendor(path: &Path) -> Vendor {
    let haystack = path.to_string_lossy().to_lowercase();
    Vendor::KNOWN
        .into_iter()
        .find(|vendor| haystack.contains(&vendor.as_str().to_lowercase()))
        .unwrap_or(Vendor::Unknown)
}

pub fn entry_for(path: &Path) -> AppResult<FileIndexEntry> {
    let metadata = std::fs::metadata(path)?;
    let modified: DateTime<Local> = metadata.modified()?.into();
    let extension = extension_lower(path);

    Ok(FileIndexEntry {
        file_id: make_file_id(path),
        full_path: path.display().to_string(),
        file_name: file_name(path),
        extension: if extension.is_empty() {
            String::new()
        } else {
            format!(".{extension}")
        },
        vendor: guess_vendor(path),
        size_bytes: metadata.len(),
        last_modified: modified.format("%Y-%m-%dT%H:%M:%S").to_string(),
        ingested: false,
    })
}

pub fn collect_entries(config: &FileIndexConfig) -> Vec<FileIndexEntry> {
    walk_files(&config.root_dir)
        .filter(|path| resolves_to_file(path))
        .filter(|path| config.allows_extension(&extension_lower(path)))
        .filter(|path| !is_office_lock_file(&file_name(path)))
        .filter(|path| !same_file(path, &config.out_csv))
        .filter_map(|path| match entry_for(&path) {
            Ok(entry) => Some(entry),
            Err(err) => {
                warn!("skipping {}: {err}", path.display());
                None
            }
        })
        .collect()
}

pub fn build_file_index(config: &FileIndexConfig) -> AppResult<FileIndexSummary> {
    if !config.root_dir.is_dir() {
        return Err(AppError::NotFound(format!(
            "root folder does not exist: {}",
            config.root_dir.display()
        )));
    }

    let entries = collect_entries(config);
    if entries.is_empty() {
        return Err(AppError::InvalidInput(format!(
            "no files with extensions [{}] found under {}",
            config.extensions.join(", "),
            config.root_dir.display()
        )));
    }

    let mut writer = csv::Writer::from_path(&config.out_csv)?;
    for entry in &entries {
        writer.serialize(entry)?;
    }
    writer.flush()?;
    info!(
        "wrote {} file index rows to {}",
        entries.len(),
        config.out_csv.display()
    );

    Ok(FileIndexSummary {
        rows: entries.len(),
        out_csv: config.out_csv.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vendor_is_first_match_in_fixed_order() {
        assert_eq!(guess_vendor(Path::new("/prices/Genie/2024.xlsx")), Vendor::Genie);
        assert_eq!(guess_vendor(Path::new("/prices/JLG vs Genie.xlsx")), Vendor::Genie);
        assert_eq!(guess_vendor(Path::new("/prices/skyjack/sj.csv")), Vendor::Skyjack);
        assert_eq!(guess_vendor(Path::new("/prices/misc.csv")), Vendor::Unknown);
    }

    #[test]
    fn file_id_is_short_and_stable() {
        let path = Path::new("/inventory/Genie/prices.xlsx");
        let id = make_file_id(path);
        assert_eq!(id.len(), 12);
        assert_eq!(id, make_file_id(path));
        assert_ne!(id, make_file_id(Path::new("/inventory/Genie/prices2.xlsx")));
    }
}

use std::path::Path;

use tracing::{debug, info, warn};

use crate::core::config::SidecarIndexConfig;
use crate::core::discovery::{file_name, remove_if_exists, walk_files};
use crate::core::errors::AppResult;
use crate::core::types::{SidecarIndexSummary, SidecarRecord, SIDECAR_INDEX_COLUMNS};
use crate::sidecar::parser::{parse_sidecar, read_sidecar_text};
use crate::sidecar::resolver::{resolve_fallbacks, PartialRecord, SidecarLocation};

const SIDECAR_PREFIX: &str = "sn -";
const SIDECAR_SUFFIX: &str = ".txt";

/// `SN - 32223GT.txt`, matched case-insensitively.
pub fn is_sidecar_file_name(name: &str) -> bool {
    let lower = name.to_lowercase();
    lower.starts_with(SIDECAR_PREFIX) && lower.ends_with(SIDECAR_SUFFIX)
}

/// Build the record for one sidecar. Unreadable files still produce a row
/// so the index lists every sidecar that exists.
pub fn record_for_sidecar(path: &Path) -> SidecarRecord {
    let parsed = match read_sidecar_text(path) {
        Ok(text) => parse_sidecar(&text),
        Err(err) => {
            warn!("failed to read {}: {err}", path.display());
            PartialRecord::default()
        }
    };
    resolve_fallbacks(parsed, &SidecarLocation::from_path(path)).into_record(path)
}

/// One record per qualifying sidecar under `root`, in walk order.
pub fn collect_records(root: &Path) -> Vec<SidecarRecord> {
    walk_files(root)
        .filter(|path| is_sidecar_file_name(&file_name(path)))
        .map(|path| {
            debug!("parsing sidecar {}", path.display());
            record_for_sidecar(&path)
        })
        .collect()
}

pub fn write_index(out_csv: &Path, records: &[SidecarRecord]) -> AppResult<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(out_csv)?;
    writer.write_record(SIDECAR_INDEX_COLUMNS)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

/// Rebuild the serial index from scratch. A previous index that cannot be
/// removed aborts the build before anything is written.
pub fn build_index(config: &SidecarIndexConfig) -> AppResult<SidecarIndexSummary> {
    remove_if_exists(&config.out_csv)?;

    let records = collect_records(&config.root_dir);
    write_index(&config.out_csv, &records)?;
    info!(
        "wrote {} sidecar rows to {}",
        records.len(),
        config.out_csv.display()
    );

    Ok(SidecarIndexSummary {
        rows: records.len(),
        out_csv: config.out_csv.clone(),
    })
}

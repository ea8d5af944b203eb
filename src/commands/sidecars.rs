use crate::{cli::SidecarArgs, core::errors::AppResult, sidecar::index};

pub fn build_serial_index(args: SidecarArgs) -> AppResult<String> {
    let config = args.into_config();
    let summary = index::build_index(&config)?;
    Ok(format!(
        "Wrote {} rows to {}",
        summary.rows,
        summary.out_csv.display()
    ))
}

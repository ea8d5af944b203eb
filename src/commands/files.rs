use crate::{cli::FileIndexArgs, core::errors::AppResult, inventory::file_index};

pub fn build_file_manifest(args: FileIndexArgs) -> AppResult<String> {
    let config = args.into_config();
    let summary = file_index::build_file_index(&config)?;
    Ok(format!(
        "Wrote {} rows to {}",
        summary.rows,
        summary.out_csv.display()
    ))
}

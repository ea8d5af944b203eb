use crate::{cli::AggregateArgs, core::errors::AppResult, workbook::aggregator};

pub fn build_master_workbook(args: AggregateArgs) -> AppResult<String> {
    let config = args.into_config();
    let summary = aggregator::build_master(&config)?;
    Ok(format!(
        "Master workbook created from {} files ({} rows, {} before dedupe): {}",
        summary.workbooks,
        summary.rows_written,
        summary.rows_before_dedupe,
        summary.out_file.display()
    ))
}

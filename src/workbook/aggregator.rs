//! Consolidates every price-list workbook under a folder into one master
//! workbook.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use calamine::{open_workbook_auto, DataType, Range, Reader};
use tracing::{error, info, warn};

use crate::core::config::AggregatorConfig;
use crate::core::discovery::{extension_lower, file_name, remove_if_exists, walk_files};
use crate::core::errors::{AppError, AppResult};
use crate::core::types::{AggregateSummary, MasterRow, MASTER_COLUMNS};
use crate::workbook::xlsx_writer::{Sheet, Workbook};

const DATA_COLUMNS: u32 = 5;
const LOCK_MARKER: &str = "~$";
/// Leftover export artifact that shows up in the Year column.
const YEAR_ARTIFACT: &str = "Field4_text";
const OUTPUT_SHEET: &str = "Sheet1";

/// All `.xlsx` files under the base folder, minus lock files and previous
/// master outputs.
pub fn find_workbooks(config: &AggregatorConfig) -> Vec<PathBuf> {
    let marker = config.output_marker();
    walk_files(&config.base_dir)
        .filter(|path| extension_lower(path) == "xlsx")
        .filter(|path| {
            let name = file_name(path).to_lowercase();
            !name.contains(LOCK_MARKER) && (marker.is_empty() || !name.contains(&marker))
        })
        .collect()
}

/// Rows from every sheet of one workbook. A workbook that cannot be opened
/// yields nothing.
pub fn extract_rows(path: &Path) -> Vec<MasterRow> {
    let source_file = file_name(path);
    let mut workbook = match open_workbook_auto(path) {
        Ok(workbook) => workbook,
        Err(err) => {
            error!("cannot open {source_file}: {err}");
            return Vec::new();
        }
    };

    let mut rows = Vec::new();
    for sheet_name in workbook.sheet_names().to_vec() {
        match workbook.worksheet_range(&sheet_name) {
            Some(Ok(range)) => rows.extend(rows_from_range(&range, &source_file, &sheet_name)),
            Some(Err(err)) => {
                warn!("failed reading sheet '{sheet_name}' in {source_file}: {err}");
            }
            None => warn!("sheet '{sheet_name}' missing from {source_file}"),
        }
    }
    rows
}

/// First five columns of a sheet, read without a header row. Sheets
/// narrower than five columns contribute nothing.
pub fn rows_from_range(range: &Range<DataType>, source_file: &str, sheet_name: &str) -> Vec<MasterRow> {
    let (Some((first_row, _)), Some((last_row, last_col))) = (range.start(), range.end()) else {
        return Vec::new();
    };
    if range.is_empty() || last_col + 1 < DATA_COLUMNS {
        return Vec::new();
    }

    (first_row..=last_row)
        .filter_map(|row| {
            let cells: Vec<String> = (0..DATA_COLUMNS)
                .map(|col| range.get_value((row, col)).map(cell_text).unwrap_or_default())
                .collect();
            if cells.iter().all(|cell| cell.is_empty()) {
                return None;
            }
            let [model_and_build, description, price, part_number, year]: [String; 5] =
                cells.try_into().ok()?;
            Some(MasterRow {
                source_file: source_file.to_string(),
                sheet_name: sheet_name.to_string(),
                model_and_build,
                description,
                price,
                part_number,
                year,
            })
        })
        .collect()
}

pub fn cell_text(cell: &DataType) -> String {
    match cell {
        DataType::Empty => String::new(),
        DataType::String(value) => value.clone(),
        DataType::Bool(true) => "True".to_string(),
        DataType::Bool(false) => "False".to_string(),
        DataType::DateTime(_) => cell
            .as_datetime()
            .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| cell.to_string()),
        other => other.to_string(),
    }
}

/// Drop exact duplicates (first occurrence wins), then the export
/// artifact rows.
pub fn consolidate(rows: Vec<MasterRow>) -> Vec<MasterRow> {
    let mut seen = HashSet::new();
    rows.into_iter()
        .filter(|row| seen.insert(row.clone()))
        .filter(|row| row.year != YEAR_ARTIFACT)
        .collect()
}

pub fn write_master(path: &Path, rows: &[MasterRow]) -> AppResult<()> {
    let mut sheet = Sheet::new(OUTPUT_SHEET);
    sheet.push_row(MASTER_COLUMNS);
    for row in rows {
        sheet.push_row(row.cells());
    }
    let mut workbook = Workbook::new();
    workbook.add_sheet(sheet)?;
    workbook.save(path)
}

pub fn build_master(config: &AggregatorConfig) -> AppResult<AggregateSummary> {
    info!("scanning folder recursively: {}", config.base_dir.display());
    let workbooks = find_workbooks(config);
    if workbooks.is_empty() {
        return Err(AppError::NotFound(format!(
            "no Excel files found under {}",
            config.base_dir.display()
        )));
    }
    for path in &workbooks {
        info!("found workbook {}", path.display());
    }

    let mut rows = Vec::new();
    for path in &workbooks {
        info!("processing {}", file_name(path));
        rows.extend(extract_rows(path));
    }
    if rows.is_empty() {
        return Err(AppError::InvalidInput(
            "no data extracted from any Excel file".to_string(),
        ));
    }

    let rows_before_dedupe = rows.len();
    let rows = consolidate(rows);
    info!("rows before dedupe: {rows_before_dedupe}, after: {}", rows.len());

    remove_if_exists(&config.out_file)?;
    write_master(&config.out_file, &rows)?;
    info!("master workbook created: {}", config.out_file.display());

    Ok(AggregateSummary {
        workbooks: workbooks.len(),
        rows_before_dedupe,
        rows_written: rows.len(),
        out_file: config.out_file.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(source: &str, year: &str) -> MasterRow {
        MasterRow {
            source_file: source.to_string(),
            sheet_name: "Prices".to_string(),
            model_and_build: "S-40".to_string(),
            year: year.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn consolidate_keeps_first_duplicate_and_drops_artifacts() {
        let rows = vec![
            row("a.xlsx", "2019"),
            row("a.xlsx", "Field4_text"),
            row("a.xlsx", "2019"),
            row("b.xlsx", "2019"),
        ];
        let merged = consolidate(rows);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].source_file, "a.xlsx");
        assert_eq!(merged[1].source_file, "b.xlsx");
    }

    #[test]
    fn narrow_sheets_contribute_nothing() {
        let mut range: Range<DataType> = Range::new((0, 0), (1, 3));
        range.set_value((0, 0), DataType::String("S-40".to_string()));
        assert!(rows_from_range(&range, "a.xlsx", "Prices").is_empty());
    }

    #[test]
    fn numbers_render_without_trailing_zero() {
        assert_eq!(cell_text(&DataType::Float(2019.0)), "2019");
        assert_eq!(cell_text(&DataType::Int(7)), "7");
        assert_eq!(cell_text(&DataType::Empty), "");
    }
}

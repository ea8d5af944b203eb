pub mod files;
pub mod manuals;
pub mod sidecars;
pub mod spreadsheets;

use crate::cli::Command;
use crate::core::errors::AppResult;

/// Run one pipeline and return its completion line.
pub fn execute(command: Command) -> AppResult<String> {
    match command {
        Command::Sidecars(args) => sidecars::build_serial_index(args),
        Command::Files(args) => files::build_file_manifest(args),
        Command::Spreadsheets(args) => spreadsheets::build_master_workbook(args),
        Command::Manuals(args) => manuals::scrape(args),
    }
}

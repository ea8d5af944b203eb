pub mod aggregator;
pub mod xlsx_writer;

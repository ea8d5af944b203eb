pub mod file_index;

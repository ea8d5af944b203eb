pub mod config;
pub mod discovery;
pub mod errors;
pub mod hashing;
pub mod types;

//! Serial index built from `SN - <token>.txt` sidecar files.

pub mod index;
pub mod parser;
pub mod resolver;

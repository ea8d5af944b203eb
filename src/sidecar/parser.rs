//! Line parser for `SN - <token>.txt` sidecar files.
//!
//! A sidecar looks like:
//!
//! ```text
//! Manual: 32223GT - Genie S-40, S-45
//! Token : 32223GT
//! Link  : https://...
//! Serial: SN: Prior to 0830
//! File  : C:\...\32223GT - Genie S-40, S-45.pdf
//! ```
//!
//! Only the four labels below are captured; anything else is ignored.

use std::path::Path;

use crate::core::errors::AppResult;
use crate::sidecar::resolver::{self, PartialRecord, PARSER_STEPS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SidecarLabel {
    Manual,
    Token,
    Serial,
    File,
}

impl SidecarLabel {
    /// Precedence order when a line could match more than one prefix.
    const ORDERED: [SidecarLabel; 4] = [Self::Manual, Self::Token, Self::Serial, Self::File];

    fn prefix(&self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::Token => "token",
            Self::Serial => "serial",
            Self::File => "file",
        }
    }

    /// Case-insensitive prefix match on an already trimmed line.
    pub fn classify(line: &str) -> Option<Self> {
        let lower = line.to_lowercase();
        Self::ORDERED
            .into_iter()
            .find(|label| lower.starts_with(label.prefix()))
    }
}

/// Raw values captured from labelled lines, before any derivation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SidecarFields {
    pub manual: String,
    pub token: String,
    pub serial: String,
    pub file: String,
}

impl SidecarFields {
    fn slot(&mut self, label: SidecarLabel) -> &mut String {
        match label {
            SidecarLabel::Manual => &mut self.manual,
            SidecarLabel::Token => &mut self.token,
            SidecarLabel::Serial => &mut self.serial,
            SidecarLabel::File => &mut self.file,
        }
    }
}

/// Capture labelled values. Lines end at `\n`, `\r\n` or a bare `\r`.
/// Later lines with the same label win; lines without a colon or with
/// nothing after it are skipped.
pub fn parse_fields(text: &str) -> SidecarFields {
    let mut fields = SidecarFields::default();
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    for line in text.split(['\n', '\r']) {
        let line = line.trim();
        let Some(label) = SidecarLabel::classify(line) else {
            continue;
        };
        let Some((_, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim();
        if value.is_empty() {
            continue;
        }
        *fields.slot(label) = value.to_string();
    }

    fields
}

/// Parse sidecar text into the fields derivable from its content alone.
pub fn parse_sidecar(text: &str) -> PartialRecord {
    let fields = parse_fields(text);
    resolver::resolve_fields(PartialRecord::default(), &fields, PARSER_STEPS)
}

/// Read a sidecar as text. Bytes that are not valid UTF-8 are dropped
/// rather than failing the read.
pub fn read_sidecar_text(path: &Path) -> AppResult<String> {
    let bytes = std::fs::read(path)?;
    Ok(String::from_utf8_lossy(&bytes).replace('\u{fffd}', ""))
}

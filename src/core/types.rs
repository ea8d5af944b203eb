use std::path::PathBuf;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// One row of the serial index, one per `SN - <token>.txt` sidecar file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SidecarRecord {
    pub manual_no: String,
    pub model_title: String,
    pub serial_text: String,
    pub pdf_path: String,
    pub sidecar_path: String,
}

pub const SIDECAR_INDEX_COLUMNS: [&str; 5] = [
    "manual_no",
    "model_title",
    "serial_text",
    "pdf_path",
    "sidecar_path",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Vendor {
    Genie,
    Jlg,
    Skyjack,
    Snorkel,
    Haulotte,
    Magni,
    Unknown,
}

impl Vendor {
    /// Checked in this order; the first hit wins.
    pub const KNOWN: [Vendor; 6] = [
        Self::Genie,
        Self::Jlg,
        Self::Skyjack,
        Self::Snorkel,
        Self::Haulotte,
        Self::Magni,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Genie => "GENIE",
            Self::Jlg => "JLG",
            Self::Skyjack => "SKYJACK",
            Self::Snorkel => "SNORKEL",
            Self::Haulotte => "HAULOTTE",
            Self::Magni => "MAGNI",
            Self::Unknown => "UNKNOWN",
        }
    }
}

/// One row of the file manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileIndexEntry {
    pub file_id: String,
    pub full_path: String,
    pub file_name: String,
    pub extension: String,
    pub vendor: Vendor,
    pub size_bytes: u64,
    pub last_modified: String,
    #[serde(serialize_with = "bool_as_flag", deserialize_with = "flag_as_bool")]
    pub ingested: bool,
}

fn bool_as_flag<S>(value: &bool, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_u8(u8::from(*value))
}

fn flag_as_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(matches!(raw.trim(), "1" | "true" | "True"))
}

pub const MASTER_COLUMNS: [&str; 7] = [
    "SourceFile",
    "SheetName",
    "ModelAndBuild",
    "Description",
    "Price",
    "PartNumber",
    "Year",
];

/// A consolidated price-list row tagged with where it came from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct MasterRow {
    pub source_file: String,
    pub sheet_name: String,
    pub model_and_build: String,
    pub description: String,
    pub price: String,
    pub part_number: String,
    pub year: String,
}

impl MasterRow {
    pub fn cells(&self) -> [&str; 7] {
        [
            &self.source_file,
            &self.sheet_name,
            &self.model_and_build,
            &self.description,
            &self.price,
            &self.part_number,
            &self.year,
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManualEntry {
    pub id: usize,
    pub url: String,
    pub file: String,
    pub sha256: String,
    pub size_bytes: u64,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidecarIndexSummary {
    pub rows: usize,
    pub out_csv: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileIndexSummary {
    pub rows: usize,
    pub out_csv: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateSummary {
    pub workbooks: usize,
    pub rows_before_dedupe: usize,
    pub rows_written: usize,
    pub out_file: PathBuf,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScrapeSummary {
    pub links: usize,
    pub downloaded: usize,
    pub reused: usize,
    pub extraction_failures: usize,
    pub out_xml: PathBuf,
    pub out_dir: PathBuf,
}

//! Run configuration for each pipeline.
//!
//! Every pipeline takes its paths from one of these structs instead of
//! hard-coded constants, so the binary can fill them from flags/env vars and
//! tests can point them at temporary directories.

use std::path::{Path, PathBuf};
use std::time::Duration;

pub const SIDECAR_INDEX_FILE: &str = "_SerialIndex_Master.csv";
pub const FILE_INDEX_FILE: &str = "_FileIndex.csv";
pub const MASTER_WORKBOOK_FILE: &str = "MASTER_FULL_BRAIN.xlsx";
pub const DEFAULT_EXTENSIONS: [&str; 3] = ["xlsx", "xls", "csv"];

pub const DEFAULT_BASE_URL: &str = "https://www.dana.com";
pub const DEFAULT_PDF_DIR: &str = "manuals_pdfs";
pub const DEFAULT_XML_FILE: &str = "manuals_text.xml";

#[derive(Debug, Clone)]
pub struct SidecarIndexConfig {
    pub root_dir: PathBuf,
    pub out_csv: PathBuf,
}

impl SidecarIndexConfig {
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        let root_dir = root_dir.into();
        let out_csv = root_dir.join(SIDECAR_INDEX_FILE);
        Self { root_dir, out_csv }
    }

    pub fn with_out_csv(mut self, out_csv: impl Into<PathBuf>) -> Self {
        self.out_csv = out_csv.into();
        self
    }
}

#[derive(Debug, Clone)]
pub struct FileIndexConfig {
    pub root_dir: PathBuf,
    pub out_csv: PathBuf,
    /// Lower-case, without the leading dot.
    pub extensions: Vec<String>,
}

impl FileIndexConfig {
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        let root_dir = root_dir.into();
        let out_csv = root_dir.join(FILE_INDEX_FILE);
        Self {
            root_dir,
            out_csv,
            extensions: DEFAULT_EXTENSIONS.iter().map(|ext| ext.to_string()).collect(),
        }
    }

    pub fn with_out_csv(mut self, out_csv: impl Into<PathBuf>) -> Self {
        self.out_csv = out_csv.into();
        self
    }

    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.extensions = extensions
            .into_iter()
            .map(|ext| normalize_extension(ext.as_ref()))
            .filter(|ext| !ext.is_empty())
            .collect();
        self
    }

    pub fn allows_extension(&self, ext: &str) -> bool {
        let ext = normalize_extension(ext);
        self.extensions.iter().any(|allowed| *allowed == ext)
    }
}

fn normalize_extension(raw: &str) -> String {
    raw.trim().trim_start_matches('.').to_ascii_lowercase()
}

#[derive(Debug, Clone)]
pub struct AggregatorConfig {
    pub base_dir: PathBuf,
    pub out_file: PathBuf,
}

impl AggregatorConfig {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        let base_dir = base_dir.into();
        let out_file = base_dir.join(MASTER_WORKBOOK_FILE);
        Self { base_dir, out_file }
    }

    pub fn with_out_file(mut self, out_file: impl Into<PathBuf>) -> Self {
        self.out_file = out_file.into();
        self
    }

    /// Lower-cased output stem; any workbook whose name contains it is
    /// treated as a previous output and skipped.
    pub fn output_marker(&self) -> String {
        self.out_file
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase()
    }
}

#[derive(Debug, Clone)]
pub struct ScraperConfig {
    pub base_url: String,
    pub input_html: PathBuf,
    pub out_dir: PathBuf,
    pub out_xml: PathBuf,
    pub politeness_delay: Duration,
    pub request_timeout: Duration,
    pub max_attempts: u32,
    pub retry_backoff: Duration,
    pub user_agent: String,
}

impl ScraperConfig {
    pub fn new(input_html: impl Into<PathBuf>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            input_html: input_html.into(),
            out_dir: PathBuf::from(DEFAULT_PDF_DIR),
            out_xml: PathBuf::from(DEFAULT_XML_FILE),
            politeness_delay: Duration::from_millis(600),
            request_timeout: Duration::from_secs(60),
            max_attempts: 3,
            retry_backoff: Duration::from_millis(1500),
            user_agent: user_agent_for(DEFAULT_BASE_URL),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self.user_agent = user_agent_for(&self.base_url);
        self
    }

    pub fn with_output(mut self, out_dir: impl Into<PathBuf>, out_xml: impl Into<PathBuf>) -> Self {
        self.out_dir = out_dir.into();
        self.out_xml = out_xml.into();
        self
    }

    pub fn pdf_path(&self, file_name: &str) -> PathBuf {
        self.out_dir.join(Path::new(file_name))
    }
}

fn user_agent_for(base_url: &str) -> String {
    format!("Mozilla/5.0 (manual-indexer; +{base_url})")
}

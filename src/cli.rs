use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use crate::core::config::{AggregatorConfig, FileIndexConfig, ScraperConfig, SidecarIndexConfig};

#[derive(Debug, Parser)]
#[command(name = "docbrain", version, about = "Inventory and manual-library indexing tools")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Build the serial index CSV from `SN - <token>.txt` sidecar files
    Sidecars(SidecarArgs),
    /// Write a CSV manifest of spreadsheet files under a folder
    Files(FileIndexArgs),
    /// Consolidate every workbook under a folder into one master workbook
    Spreadsheets(AggregateArgs),
    /// Download linked PDF manuals and extract their text into XML
    Manuals(ScrapeArgs),
}

#[derive(Debug, Args)]
pub struct SidecarArgs {
    /// Folder tree holding the sidecar files
    #[arg(long, env = "DOCBRAIN_SIDECAR_ROOT")]
    pub root: PathBuf,
    /// Output CSV (default: <root>/_SerialIndex_Master.csv)
    #[arg(long, env = "DOCBRAIN_SIDECAR_OUT")]
    pub out: Option<PathBuf>,
}

impl SidecarArgs {
    pub fn into_config(self) -> SidecarIndexConfig {
        let config = SidecarIndexConfig::new(self.root);
        match self.out {
            Some(out) => config.with_out_csv(out),
            None => config,
        }
    }
}

#[derive(Debug, Args)]
pub struct FileIndexArgs {
    #[arg(long, env = "DOCBRAIN_FILES_ROOT")]
    pub root: PathBuf,
    /// Output CSV (default: <root>/_FileIndex.csv)
    #[arg(long, env = "DOCBRAIN_FILES_OUT")]
    pub out: Option<PathBuf>,
    /// Extensions to index, comma separated (default: xlsx,xls,csv)
    #[arg(long = "ext", value_delimiter = ',')]
    pub extensions: Vec<String>,
}

impl FileIndexArgs {
    pub fn into_config(self) -> FileIndexConfig {
        let mut config = FileIndexConfig::new(self.root);
        if let Some(out) = self.out {
            config = config.with_out_csv(out);
        }
        if !self.extensions.is_empty() {
            config = config.with_extensions(self.extensions);
        }
        config
    }
}

#[derive(Debug, Args)]
pub struct AggregateArgs {
    #[arg(long, env = "DOCBRAIN_SHEETS_BASE")]
    pub base: PathBuf,
    /// Output workbook (default: <base>/MASTER_FULL_BRAIN.xlsx)
    #[arg(long, env = "DOCBRAIN_SHEETS_OUT")]
    pub out: Option<PathBuf>,
}

impl AggregateArgs {
    pub fn into_config(self) -> AggregatorConfig {
        let config = AggregatorConfig::new(self.base);
        match self.out {
            Some(out) => config.with_out_file(out),
            None => config,
        }
    }
}

#[derive(Debug, Args)]
pub struct ScrapeArgs {
    /// Saved page source containing the PDF links
    #[arg(long, env = "DOCBRAIN_MANUALS_HTML")]
    pub input_html: PathBuf,
    /// Site root relative links are resolved against
    #[arg(long, env = "DOCBRAIN_MANUALS_BASE_URL")]
    pub base_url: Option<String>,
    #[arg(long, env = "DOCBRAIN_MANUALS_PDF_DIR")]
    pub out_dir: Option<PathBuf>,
    #[arg(long, env = "DOCBRAIN_MANUALS_XML")]
    pub out_xml: Option<PathBuf>,
    /// Pause after each download, in milliseconds
    #[arg(long)]
    pub delay_ms: Option<u64>,
    #[arg(long)]
    pub timeout_secs: Option<u64>,
    /// Download attempts per PDF
    #[arg(long)]
    pub attempts: Option<u32>,
}

impl ScrapeArgs {
    pub fn into_config(self) -> ScraperConfig {
        let mut config = ScraperConfig::new(self.input_html);
        if let Some(base_url) = self.base_url {
            config = config.with_base_url(base_url);
        }
        let out_dir = self.out_dir.unwrap_or_else(|| config.out_dir.clone());
        let out_xml = self.out_xml.unwrap_or_else(|| config.out_xml.clone());
        config = config.with_output(out_dir, out_xml);
        if let Some(ms) = self.delay_ms {
            config.politeness_delay = Duration::from_millis(ms);
        }
        if let Some(secs) = self.timeout_secs {
            config.request_timeout = Duration::from_secs(secs);
        }
        if let Some(attempts) = self.attempts {
            config.max_attempts = attempts;
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sidecar_args_default_output_under_root() {
        let cli = Cli::try_parse_from(["docbrain", "sidecars", "--root", "/manuals/genie"])
            .expect("parse");
        let Command::Sidecars(args) = cli.command else {
            panic!("expected sidecars command");
        };
        let config = args.into_config();
        assert_eq!(
            config.out_csv,
            PathBuf::from("/manuals/genie/_SerialIndex_Master.csv")
        );
    }

    #[test]
    fn file_args_accept_comma_separated_extensions() {
        let cli = Cli::try_parse_from(["docbrain", "files", "--root", "/inv", "--ext", "pdf,TXT"])
            .expect("parse");
        let Command::Files(args) = cli.command else {
            panic!("expected files command");
        };
        let config = args.into_config();
        assert_eq!(config.extensions, vec!["pdf", "txt"]);
    }

    #[test]
    fn scrape_args_override_defaults() {
        let cli = Cli::try_parse_from([
            "docbrain",
            "manuals",
            "--input-html",
            "page.html",
            "--attempts",
            "5",
            "--delay-ms",
            "0",
        ])
        .expect("parse");
        let Command::Manuals(args) = cli.command else {
            panic!("expected manuals command");
        };
        let config = args.into_config();
        assert_eq!(config.max_attempts, 5);
        assert_eq!(config.politeness_delay, Duration::ZERO);
        assert_eq!(config.base_url, "https://www.dana.com");
    }
}

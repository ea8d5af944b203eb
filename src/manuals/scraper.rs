use std::fs::File;
use std::io::BufWriter;

use chrono::Utc;
use reqwest::Url;
use tracing::info;

use crate::core::config::ScraperConfig;
use crate::core::errors::{AppError, AppResult};
use crate::core::hashing::checksum_file;
use crate::core::types::{ManualEntry, ScrapeSummary};
use crate::manuals::download::{needs_download, ManualDownloader};
use crate::manuals::links::{absolutize, extract_pdf_links, safe_file_name};
use crate::manuals::pdf_text::text_or_failure;
use crate::manuals::xml::ManualXmlWriter;

/// Absolute PDF URLs found in the saved page, in page order.
pub fn collect_links(config: &ScraperConfig) -> AppResult<Vec<Url>> {
    let bytes = std::fs::read(&config.input_html).map_err(|err| {
        AppError::NotFound(format!("{}: {err}", config.input_html.display()))
    })?;
    let html = String::from_utf8_lossy(&bytes);
    extract_pdf_links(&html)
        .iter()
        .map(|href| absolutize(&config.base_url, href))
        .collect()
}

/// Download (when needed), extract and hash every linked manual, writing one
/// `<manual>` element per link. Runs strictly one manual at a time.
pub async fn scrape_manuals(config: &ScraperConfig) -> AppResult<ScrapeSummary> {
    std::fs::create_dir_all(&config.out_dir)?;
    let links = collect_links(config)?;
    let downloader = ManualDownloader::new(config)?;

    let fetched_at = Utc::now().to_rfc3339();
    let sink = BufWriter::new(File::create(&config.out_xml)?);
    let mut xml = ManualXmlWriter::begin(sink, &config.base_url, &fetched_at)?;

    let mut summary = ScrapeSummary {
        links: links.len(),
        out_xml: config.out_xml.clone(),
        out_dir: config.out_dir.clone(),
        ..Default::default()
    };
    let total = links.len();

    for (idx, url) in links.iter().enumerate() {
        let id = idx + 1;
        let file = safe_file_name(url.as_str());
        let pdf_path = config.pdf_path(&file);

        if needs_download(&pdf_path) {
            info!("[{id}/{total}] downloading {url}");
            downloader.download(url, &pdf_path).await?;
            summary.downloaded += 1;
            tokio::time::sleep(config.politeness_delay).await;
        } else {
            info!("[{id}/{total}] exists: {file}");
            summary.reused += 1;
        }

        info!("extracting text: {file}");
        let (text, extracted) = text_or_failure(&pdf_path);
        if !extracted {
            summary.extraction_failures += 1;
        }

        let entry = ManualEntry {
            id,
            url: url.to_string(),
            file,
            sha256: checksum_file(&pdf_path)?,
            size_bytes: std::fs::metadata(&pdf_path)?.len(),
            text,
        };
        xml.write_manual(&entry)?;
    }

    xml.finish()?;
    info!(
        "wrote {} manuals to {} (pdfs in {})",
        total,
        config.out_xml.display(),
        config.out_dir.display()
    );
    Ok(summary)
}

use crate::{cli::ScrapeArgs, core::errors::AppResult, manuals::scraper};

pub fn scrape(args: ScrapeArgs) -> AppResult<String> {
    let config = args.into_config();
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let summary = runtime.block_on(scraper::scrape_manuals(&config))?;
    Ok(format!(
        "Done -> {}\nPDFs -> {}\nLinks found -> {} ({} downloaded, {} reused, {} extraction failures)",
        summary.out_xml.display(),
        summary.out_dir.display(),
        summary.links,
        summary.downloaded,
        summary.reused,
        summary.extraction_failures
    ))
}

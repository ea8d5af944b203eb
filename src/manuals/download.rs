use std::future::Future;
use std::path::Path;
use std::time::Duration;

use reqwest::Url;
use tracing::{debug, warn};

use crate::core::config::ScraperConfig;
use crate::core::errors::{AppError, AppResult};

/// Local copies smaller than this are treated as broken and fetched again.
pub const MIN_PDF_BYTES: u64 = 1024;

pub fn needs_download(path: &Path) -> bool {
    std::fs::metadata(path)
        .map(|meta| !meta.is_file() || meta.len() < MIN_PDF_BYTES)
        .unwrap_or(true)
}

/// Run `op` until it succeeds or `max_attempts` is reached. Any failure is
/// retried. Sleeps `backoff * attempt` between attempts.
pub async fn retry_with_backoff<T, F, Fut>(max_attempts: u32, backoff: Duration, mut op: F) -> AppResult<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = AppResult<T>>,
{
    let max_attempts = max_attempts.max(1);
    let mut attempt = 1;
    loop {
        match op(attempt).await {
            Ok(value) => return Ok(value),
            Err(err) if attempt < max_attempts => {
                warn!("attempt {attempt}/{max_attempts} failed: {err}; retrying");
                tokio::time::sleep(backoff * attempt).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ManualDownloader {
    http: reqwest::Client,
    max_attempts: u32,
    backoff: Duration,
}

impl ManualDownloader {
    pub fn new(config: &ScraperConfig) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|err| AppError::Network(err.to_string()))?;
        Ok(Self {
            http,
            max_attempts: config.max_attempts,
            backoff: config.retry_backoff,
        })
    }

    async fn fetch(&self, url: &Url) -> AppResult<Vec<u8>> {
        let response = self.http.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AppError::HttpStatus(status.as_u16()));
        }
        let body = response.bytes().await?;
        Ok(body.to_vec())
    }

    async fn fetch_to(&self, url: &Url, dest: &Path) -> AppResult<u64> {
        let body = self.fetch(url).await?;
        std::fs::write(dest, &body)?;
        Ok(body.len() as u64)
    }

    /// Fetch `url` and write it to `dest`, retrying the whole attempt on any
    /// failure. Returns the byte count.
    pub async fn download(&self, url: &Url, dest: &Path) -> AppResult<u64> {
        retry_with_backoff(self.max_attempts, self.backoff, |attempt| {
            debug!("GET {url} (attempt {attempt})");
            self.fetch_to(url, dest)
        })
        .await
    }
}

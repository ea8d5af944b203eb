use std::sync::OnceLock;

use regex::Regex;
use reqwest::Url;

use crate::core::errors::{AppError, AppResult};

fn pdf_href_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r#"(?i)href="([^"]+\.pdf)""#).expect("valid href pattern"))
}

fn unsafe_run_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[^A-Za-z0-9._-]+").expect("valid file name pattern"))
}

/// Every `href="...pdf"` target in page order, duplicates removed.
pub fn extract_pdf_links(html: &str) -> Vec<String> {
    let mut links: Vec<String> = Vec::new();
    for capture in pdf_href_pattern().captures_iter(html) {
        let href = &capture[1];
        if !links.iter().any(|seen| seen == href) {
            links.push(href.to_string());
        }
    }
    links
}

/// Resolve a possibly relative link against the site root.
pub fn absolutize(base_url: &str, href: &str) -> AppResult<Url> {
    let base = Url::parse(base_url)
        .map_err(|err| AppError::InvalidInput(format!("bad base url {base_url}: {err}")))?;
    base.join(href)
        .map_err(|err| AppError::InvalidInput(format!("bad link {href}: {err}")))
}

/// Last path segment of the URL with anything outside `[A-Za-z0-9._-]`
/// collapsed to `_`.
pub fn safe_file_name(url: &str) -> String {
    let last = url.rsplit('/').next().unwrap_or(url);
    unsafe_run_pattern().replace_all(last, "_").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn links_keep_first_occurrence_order() {
        let html = r#"<a href="/docs/a.pdf">A</a><a HREF="/docs/B.PDF">B</a>
            <a href="/docs/a.pdf">again</a><a href="/docs/page.html">no</a>"#;
        assert_eq!(extract_pdf_links(html), vec!["/docs/a.pdf", "/docs/B.PDF"]);
    }

    #[test]
    fn relative_and_absolute_links_resolve() {
        let url = absolutize("https://www.dana.com", "/manuals/x.pdf").expect("join");
        assert_eq!(url.as_str(), "https://www.dana.com/manuals/x.pdf");
        let url = absolutize("https://www.dana.com", "https://cdn.example.com/y.pdf").expect("join");
        assert_eq!(url.as_str(), "https://cdn.example.com/y.pdf");
    }

    #[test]
    fn file_names_are_filesystem_safe() {
        assert_eq!(
            safe_file_name("https://www.dana.com/manuals/Axle%20Service (rev 2).pdf"),
            "Axle_20Service_rev_2_.pdf"
        );
        assert_eq!(safe_file_name("https://x.com/ok-name_1.pdf"), "ok-name_1.pdf");
    }
}

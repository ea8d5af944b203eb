//! Manual scraper: PDF links from a saved page, downloaded and extracted
//! into one XML document.

pub mod download;
pub mod links;
pub mod pdf_text;
pub mod scraper;
pub mod xml;

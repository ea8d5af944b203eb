//! `manuals_text.xml` writer.
//!
//! ```xml
//! <manuals source="https://..." fetchedAt="2026-01-01T00:00:00+00:00">
//!   <manual id="1" url="..." file="..." sha256="..." sizeBytes="...">
//!     <text><![CDATA[ ... ]]></text>
//!   </manual>
//! </manuals>
//! ```

use std::io::Write;

use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::core::errors::{AppError, AppResult};
use crate::core::types::ManualEntry;

pub struct ManualXmlWriter<W: Write> {
    writer: Writer<W>,
}

fn xml_error(err: impl std::fmt::Display) -> AppError {
    AppError::Xml(err.to_string())
}

impl<W: Write> ManualXmlWriter<W> {
    /// Write the declaration and open the root element.
    pub fn begin(inner: W, source: &str, fetched_at: &str) -> AppResult<Self> {
        let mut this = Self {
            writer: Writer::new(inner),
        };
        this.emit(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        this.layout("\n")?;
        this.emit(Event::Start(
            BytesStart::new("manuals").with_attributes([("source", source), ("fetchedAt", fetched_at)]),
        ))?;
        this.layout("\n")?;
        Ok(this)
    }

    pub fn write_manual(&mut self, entry: &ManualEntry) -> AppResult<()> {
        let id = entry.id.to_string();
        let size = entry.size_bytes.to_string();
        self.layout("  ")?;
        self.emit(Event::Start(BytesStart::new("manual").with_attributes([
            ("id", id.as_str()),
            ("url", entry.url.as_str()),
            ("file", entry.file.as_str()),
            ("sha256", entry.sha256.as_str()),
            ("sizeBytes", size.as_str()),
        ])))?;
        self.layout("\n    ")?;
        self.emit(Event::Start(BytesStart::new("text")))?;
        let body = format!("\n{}\n    ", entry.text);
        for section in cdata_sections(&body) {
            self.emit(Event::CData(BytesCData::new(section)))?;
        }
        self.emit(Event::End(BytesEnd::new("text")))?;
        self.layout("\n  ")?;
        self.emit(Event::End(BytesEnd::new("manual")))?;
        self.layout("\n")
    }

    /// Close the root element and hand back the flushed sink.
    pub fn finish(mut self) -> AppResult<W> {
        self.emit(Event::End(BytesEnd::new("manuals")))?;
        self.layout("\n")?;
        let mut inner = self.writer.into_inner();
        inner.flush()?;
        Ok(inner)
    }

    fn emit(&mut self, event: Event<'_>) -> AppResult<()> {
        self.writer.write_event(event).map_err(xml_error)
    }

    /// Whitespace between elements.
    fn layout(&mut self, whitespace: &str) -> AppResult<()> {
        self.emit(Event::Text(BytesText::new(whitespace)))
    }
}

/// Split text so no CDATA section contains `]]>`: the terminator is broken
/// between two adjacent sections.
pub fn cdata_sections(text: &str) -> Vec<&str> {
    let mut sections = Vec::new();
    let mut rest = text;
    while let Some(idx) = rest.find("]]>") {
        sections.push(&rest[..idx + 2]);
        rest = &rest[idx + 2..];
    }
    sections.push(rest);
    sections
}

#[cfg(test)]
mod tests {
    use super::cdata_sections;

    #[test]
    fn cdata_terminator_is_split_across_sections() {
        assert_eq!(cdata_sections("plain"), vec!["plain"]);
        assert_eq!(cdata_sections("a]]>b"), vec!["a]]", ">b"]);
        let text = "]]>]]>";
        let sections = cdata_sections(text);
        assert_eq!(sections.concat(), text);
        assert!(sections.iter().all(|s| !s.contains("]]>")));
    }
}

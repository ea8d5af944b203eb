//! Minimal XLSX writer.
//!
//! Writes the smallest Office Open XML package Excel and `calamine` accept:
//! content types, package and workbook relationships, the workbook part and
//! one worksheet per sheet. Every non-empty cell is an inline string.

use std::fs::File;
use std::io::{Seek, Write};
use std::path::Path;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::core::errors::{AppError, AppResult};

const MAX_SHEET_NAME_LEN: usize = 31;
const NS_MAIN: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
const NS_REL: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const NS_PKG_REL: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const NS_CONTENT_TYPES: &str = "http://schemas.openxmlformats.org/package/2006/content-types";
const CT_RELATIONSHIPS: &str = "application/vnd.openxmlformats-package.relationships+xml";
const CT_WORKBOOK: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml";
const CT_WORKSHEET: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml";

#[derive(Debug, Clone, Default)]
pub struct Sheet {
    pub name: String,
    pub rows: Vec<Vec<String>>,
}

impl Sheet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rows: Vec::new(),
        }
    }

    pub fn push_row<I, S>(&mut self, cells: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows.push(cells.into_iter().map(Into::into).collect());
    }
}

#[derive(Debug, Clone, Default)]
pub struct Workbook {
    sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_sheet(&mut self, sheet: Sheet) -> AppResult<()> {
        let name = sheet.name.trim();
        if name.is_empty() || name.chars().count() > MAX_SHEET_NAME_LEN {
            return Err(AppError::InvalidInput(format!(
                "sheet name must be 1-{MAX_SHEET_NAME_LEN} characters: {:?}",
                sheet.name
            )));
        }
        if name.contains(['[', ']', ':', '*', '?', '/', '\\']) {
            return Err(AppError::InvalidInput(format!(
                "sheet name contains a forbidden character: {name}"
            )));
        }
        if self.sheets.iter().any(|s| s.name.eq_ignore_ascii_case(name)) {
            return Err(AppError::InvalidInput(format!("duplicate sheet name: {name}")));
        }
        self.sheets.push(sheet);
        Ok(())
    }

    pub fn save(&self, path: &Path) -> AppResult<()> {
        let file = File::create(path)?;
        self.write_to(file)?;
        Ok(())
    }

    pub fn write_to<W: Write + Seek>(&self, inner: W) -> AppResult<W> {
        if self.sheets.is_empty() {
            return Err(AppError::InvalidInput("workbook has no sheets".to_string()));
        }

        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        let mut zip = ZipWriter::new(inner);

        zip.start_file("[Content_Types].xml", options)?;
        zip.write_all(&self.content_types()?)?;

        zip.start_file("_rels/.rels", options)?;
        zip.write_all(&package_rels()?)?;

        zip.start_file("xl/workbook.xml", options)?;
        zip.write_all(&self.workbook_xml()?)?;

        zip.start_file("xl/_rels/workbook.xml.rels", options)?;
        zip.write_all(&self.workbook_rels()?)?;

        for (idx, sheet) in self.sheets.iter().enumerate() {
            zip.start_file(format!("xl/worksheets/sheet{}.xml", idx + 1), options)?;
            zip.write_all(&worksheet_xml(sheet)?)?;
        }

        Ok(zip.finish()?)
    }

    fn content_types(&self) -> AppResult<Vec<u8>> {
        let mut part = Part::new()?;
        part.open("Types", &[("xmlns", NS_CONTENT_TYPES)])?;
        part.empty(
            "Default",
            &[("Extension", "rels"), ("ContentType", CT_RELATIONSHIPS)],
        )?;
        part.empty(
            "Default",
            &[("Extension", "xml"), ("ContentType", "application/xml")],
        )?;
        part.empty(
            "Override",
            &[("PartName", "/xl/workbook.xml"), ("ContentType", CT_WORKBOOK)],
        )?;
        for idx in 1..=self.sheets.len() {
            let name = format!("/xl/worksheets/sheet{idx}.xml");
            part.empty(
                "Override",
                &[("PartName", name.as_str()), ("ContentType", CT_WORKSHEET)],
            )?;
        }
        part.close("Types")?;
        Ok(part.into_bytes())
    }

    fn workbook_xml(&self) -> AppResult<Vec<u8>> {
        let mut part = Part::new()?;
        part.open("workbook", &[("xmlns", NS_MAIN), ("xmlns:r", NS_REL)])?;
        part.open("sheets", &[])?;
        for (idx, sheet) in self.sheets.iter().enumerate() {
            let id = (idx + 1).to_string();
            let rel_id = format!("rId{id}");
            part.empty(
                "sheet",
                &[
                    ("name", sheet.name.trim()),
                    ("sheetId", id.as_str()),
                    ("r:id", rel_id.as_str()),
                ],
            )?;
        }
        part.close("sheets")?;
        part.close("workbook")?;
        Ok(part.into_bytes())
    }

    fn workbook_rels(&self) -> AppResult<Vec<u8>> {
        let rel_type = format!("{NS_REL}/worksheet");
        let mut part = Part::new()?;
        part.open("Relationships", &[("xmlns", NS_PKG_REL)])?;
        for idx in 1..=self.sheets.len() {
            let id = format!("rId{idx}");
            let target = format!("worksheets/sheet{idx}.xml");
            part.empty(
                "Relationship",
                &[
                    ("Id", id.as_str()),
                    ("Type", rel_type.as_str()),
                    ("Target", target.as_str()),
                ],
            )?;
        }
        part.close("Relationships")?;
        Ok(part.into_bytes())
    }
}

/// One XML part of the package, built in memory.
struct Part {
    writer: Writer<Vec<u8>>,
}

impl Part {
    fn new() -> AppResult<Self> {
        let mut writer = Writer::new(Vec::new());
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
        Ok(Self { writer })
    }

    fn open(&mut self, name: &str, attrs: &[(&str, &str)]) -> AppResult<()> {
        let start = BytesStart::new(name).with_attributes(attrs.iter().copied());
        self.writer.write_event(Event::Start(start))?;
        Ok(())
    }

    fn empty(&mut self, name: &str, attrs: &[(&str, &str)]) -> AppResult<()> {
        let start = BytesStart::new(name).with_attributes(attrs.iter().copied());
        self.writer.write_event(Event::Empty(start))?;
        Ok(())
    }

    fn text(&mut self, text: &str) -> AppResult<()> {
        self.writer.write_event(Event::Text(BytesText::new(text)))?;
        Ok(())
    }

    fn close(&mut self, name: &str) -> AppResult<()> {
        self.writer.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    fn into_bytes(self) -> Vec<u8> {
        self.writer.into_inner()
    }
}

fn package_rels() -> AppResult<Vec<u8>> {
    let rel_type = format!("{NS_REL}/officeDocument");
    let mut part = Part::new()?;
    part.open("Relationships", &[("xmlns", NS_PKG_REL)])?;
    part.empty(
        "Relationship",
        &[
            ("Id", "rId1"),
            ("Type", rel_type.as_str()),
            ("Target", "xl/workbook.xml"),
        ],
    )?;
    part.close("Relationships")?;
    Ok(part.into_bytes())
}

fn worksheet_xml(sheet: &Sheet) -> AppResult<Vec<u8>> {
    let mut part = Part::new()?;
    part.open("worksheet", &[("xmlns", NS_MAIN)])?;
    part.open("sheetData", &[])?;
    for (row_idx, row) in sheet.rows.iter().enumerate() {
        let row_no = (row_idx + 1).to_string();
        part.open("row", &[("r", row_no.as_str())])?;
        for (col_idx, value) in row.iter().enumerate() {
            if value.is_empty() {
                continue;
            }
            let cell_ref = format!("{}{row_no}", column_name(col_idx));
            part.open("c", &[("r", cell_ref.as_str()), ("t", "inlineStr")])?;
            part.open("is", &[])?;
            part.open("t", &[("xml:space", "preserve")])?;
            part.text(&strip_control_chars(value))?;
            part.close("t")?;
            part.close("is")?;
            part.close("c")?;
        }
        part.close("row")?;
    }
    part.close("sheetData")?;
    part.close("worksheet")?;
    Ok(part.into_bytes())
}

/// Zero-based column index to its letter name: 0 -> A, 26 -> AA.
pub fn column_name(mut idx: usize) -> String {
    let mut name = Vec::new();
    loop {
        name.push(b'A' + (idx % 26) as u8);
        if idx < 26 {
            break;
        }
        idx = idx / 26 - 1;
    }
    name.reverse();
    String::from_utf8_lossy(&name).to_string()
}

/// XML 1.0 cannot carry most C0 control characters, even escaped.
fn strip_control_chars(value: &str) -> String {
    value
        .chars()
        .filter(|c| !c.is_control() || matches!(c, '\t' | '\n' | '\r'))
        .collect()
}

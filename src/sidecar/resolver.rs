//! Field resolution for sidecar records.
//!
//! A record is built by running ordered steps over a [`PartialRecord`]. Each
//! step is a pure function that only fills fields that are still empty, so
//! precedence is the order of the step list:
//!
//! 1. `Token` line
//! 2. `Manual` line (`<no> - <title>`)
//! 3. file name (`SN - <no>.txt`)
//! 4. parent folder (`<n> - <no> - <title>`)

use std::path::Path;

use crate::core::discovery::file_name;
use crate::core::types::SidecarRecord;
use crate::sidecar::parser::SidecarFields;

const TITLE_SEPARATOR: &str = " - ";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartialRecord {
    pub manual_no: String,
    pub model_title: String,
    pub serial_text: String,
    pub pdf_path: String,
}

impl PartialRecord {
    fn fill(slot: &mut String, value: &str) {
        let value = value.trim();
        if slot.is_empty() && !value.is_empty() {
            *slot = value.to_string();
        }
    }

    pub fn fill_manual_no(mut self, value: &str) -> Self {
        Self::fill(&mut self.manual_no, value);
        self
    }

    pub fn fill_model_title(mut self, value: &str) -> Self {
        Self::fill(&mut self.model_title, value);
        self
    }

    pub fn into_record(self, sidecar_path: &Path) -> SidecarRecord {
        SidecarRecord {
            manual_no: self.manual_no,
            model_title: self.model_title,
            serial_text: self.serial_text,
            pdf_path: self.pdf_path,
            sidecar_path: sidecar_path.display().to_string(),
        }
    }
}

/// Where a sidecar sits on disk; the source for the fallback steps.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SidecarLocation {
    pub file_name: String,
    pub folder_name: String,
}

impl SidecarLocation {
    pub fn new(file_name: impl Into<String>, folder_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            folder_name: folder_name.into(),
        }
    }

    pub fn from_path(path: &Path) -> Self {
        let folder_name = path.parent().map(file_name).unwrap_or_default();
        Self::new(file_name(path), folder_name)
    }

    fn file_stem(&self) -> &str {
        match self.file_name.rsplit_once('.') {
            Some((stem, _)) if !stem.is_empty() => stem,
            _ => &self.file_name,
        }
    }
}

pub type Step<S> = fn(PartialRecord, &S) -> PartialRecord;

pub const PARSER_STEPS: &[Step<SidecarFields>] =
    &[copy_serial_and_file, fill_from_token, fill_from_manual_line];

pub const FALLBACK_STEPS: &[Step<SidecarLocation>] =
    &[fill_from_file_name, fill_from_folder_name];

pub fn resolve_fields<S>(partial: PartialRecord, source: &S, steps: &[Step<S>]) -> PartialRecord {
    steps.iter().fold(partial, |partial, step| step(partial, source))
}

/// Apply the file-name and folder-name fallbacks.
pub fn resolve_fallbacks(partial: PartialRecord, location: &SidecarLocation) -> PartialRecord {
    resolve_fields(partial, location, FALLBACK_STEPS)
}

pub fn copy_serial_and_file(mut partial: PartialRecord, fields: &SidecarFields) -> PartialRecord {
    PartialRecord::fill(&mut partial.serial_text, &fields.serial);
    PartialRecord::fill(&mut partial.pdf_path, &fields.file);
    partial
}

pub fn fill_from_token(partial: PartialRecord, fields: &SidecarFields) -> PartialRecord {
    partial.fill_manual_no(&fields.token)
}

/// `32223GT - Genie S-40, S-45` splits on the first separator; without one
/// the whole value is the title.
pub fn fill_from_manual_line(partial: PartialRecord, fields: &SidecarFields) -> PartialRecord {
    if fields.manual.is_empty() {
        return partial;
    }
    match fields.manual.split_once(TITLE_SEPARATOR) {
        Some((number, title)) => partial.fill_manual_no(number).fill_model_title(title),
        None => partial.fill_model_title(&fields.manual),
    }
}

/// `SN - 32223GT.txt` -> `32223GT`: split the stem once on `-`.
pub fn fill_from_file_name(partial: PartialRecord, location: &SidecarLocation) -> PartialRecord {
    if !partial.manual_no.is_empty() {
        return partial;
    }
    match location.file_stem().split_once('-') {
        Some((_, number)) => partial.fill_manual_no(number),
        None => partial,
    }
}

/// `001 - 32223GT - Genie S-40, S-45`: only consulted while the title is
/// unknown, and only folder names with exactly three segments count.
pub fn fill_from_folder_name(partial: PartialRecord, location: &SidecarLocation) -> PartialRecord {
    if !partial.model_title.is_empty() {
        return partial;
    }
    let chunks: Vec<&str> = location.folder_name.splitn(3, TITLE_SEPARATOR).collect();
    match chunks.as_slice() {
        [_, number, title] => partial.fill_manual_no(number).fill_model_title(title),
        _ => partial,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_never_overwrites_known_values() {
        let partial = PartialRecord::default()
            .fill_manual_no("A1")
            .fill_manual_no("B2")
            .fill_model_title("  ")
            .fill_model_title(" Boom ");
        assert_eq!(partial.manual_no, "A1");
        assert_eq!(partial.model_title, "Boom");
    }

    #[test]
    fn file_stem_strips_last_extension_only() {
        let location = SidecarLocation::new("SN - 1.2.txt", "");
        assert_eq!(location.file_stem(), "SN - 1.2");
    }
}

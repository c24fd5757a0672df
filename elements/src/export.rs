//! Per-element file synthesis.
//!
//! Each element kind maps to a small CSS or text snippet plus a filename
//! derived from the element's name. Palettes always export as
//! `color-palette.css`, one custom property per entry.

use crate::{ElementError, ElementKind, ExtractedElement};

#[cfg(test)]
#[path = "export_test.rs"]
mod tests;

/// Filename used for every palette export.
pub const PALETTE_FILENAME: &str = "color-palette.css";

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("palette export failed: {0}")]
    Palette(#[from] ElementError),
}

/// Media type of a synthesized file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MediaType {
    Css,
    PlainText,
}

impl MediaType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Css => "text/css",
            Self::PlainText => "text/plain",
        }
    }
}

/// A named blob ready to be saved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportFile {
    pub filename: String,
    pub media_type: MediaType,
    pub content: String,
}

/// Lowercase `name` and replace each run of whitespace with a single `-`.
#[must_use]
pub fn slug(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut in_space = false;
    for ch in name.chars() {
        if ch.is_whitespace() {
            if !in_space {
                out.push('-');
            }
            in_space = true;
        } else {
            out.extend(ch.to_lowercase());
            in_space = false;
        }
    }
    out
}

/// Synthesize the downloadable file for one element.
///
/// # Errors
///
/// Returns [`ExportError::Palette`] when a palette element's value is missing
/// or malformed. No partial file is produced.
pub fn export_element(element: &ExtractedElement) -> Result<ExportFile, ExportError> {
    let name = slug(&element.name);
    let details = &element.details;

    let file = match element.kind {
        ElementKind::Font => css(&name, format!("font-family: {details};")),
        ElementKind::Color => css(&name, format!("color: {details};\n--{name}: {details};")),
        ElementKind::Effect => css(&name, format!("box-shadow: {details};")),
        ElementKind::Shape | ElementKind::Text => ExportFile {
            filename: format!("{name}.txt"),
            media_type: MediaType::PlainText,
            content: details.clone(),
        },
        ElementKind::Palette => {
            let content = element
                .palette_entries()?
                .iter()
                .map(|entry| format!("--{}: {};", slug(&entry.name), entry.color))
                .collect::<Vec<_>>()
                .join("\n");
            ExportFile { filename: PALETTE_FILENAME.to_owned(), media_type: MediaType::Css, content }
        }
    };
    Ok(file)
}

fn css(slug: &str, content: String) -> ExportFile {
    ExportFile { filename: format!("{slug}.css"), media_type: MediaType::Css, content }
}

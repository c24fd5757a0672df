//! Element display model and per-element downloads.
//!
//! DESIGN
//! ======
//! `DisplayModel` is derived from the upload state on every render; it holds
//! no state of its own. The icon mapping is an exhaustive match over
//! `ElementKind`, so adding a kind forces a decision here.

use elements::export::export_element;
use elements::{ElementKind, ExtractedElement, PaletteEntry};

use super::notice::Notice;
use super::upload::UploadState;
use crate::sink::FileSink;

#[cfg(test)]
#[path = "display_test.rs"]
mod display_test;

pub const ANALYZING_MESSAGE: &str = "Analyzing image...";
pub const EMPTY_MESSAGE: &str = "Upload an image to see extracted elements";

/// Icon shown beside an element.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Icon {
    Type,
    Palette,
    Image,
    Settings,
    Text,
    SwatchBook,
}

impl From<ElementKind> for Icon {
    fn from(kind: ElementKind) -> Self {
        match kind {
            ElementKind::Font => Self::Type,
            ElementKind::Color => Self::Palette,
            ElementKind::Shape => Self::Image,
            ElementKind::Effect => Self::Settings,
            ElementKind::Text => Self::Text,
            ElementKind::Palette => Self::SwatchBook,
        }
    }
}

/// One row in the extracted-elements list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ElementCard {
    pub icon: Icon,
    pub name: String,
    pub details: String,
    /// Palette colors; empty for other kinds or an unreadable palette.
    pub swatches: Vec<PaletteEntry>,
}

impl From<&ExtractedElement> for ElementCard {
    fn from(element: &ExtractedElement) -> Self {
        let swatches = match element.kind {
            ElementKind::Palette => element.palette_entries().unwrap_or_default(),
            _ => Vec::new(),
        };
        Self { icon: element.kind.into(), name: element.name.clone(), details: element.details.clone(), swatches }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DisplayModel {
    Empty { message: &'static str },
    Processing { message: &'static str },
    Failed { message: String },
    Elements(Vec<ElementCard>),
}

impl DisplayModel {
    #[must_use]
    pub fn from_state(state: &UploadState) -> Self {
        match state {
            UploadState::Processing { .. } => Self::Processing { message: ANALYZING_MESSAGE },
            UploadState::Failed { message, .. } => Self::Failed { message: message.clone() },
            UploadState::Ready { elements, .. } if !elements.is_empty() => {
                Self::Elements(elements.iter().map(ElementCard::from).collect())
            }
            UploadState::Empty | UploadState::Ready { .. } => Self::Empty { message: EMPTY_MESSAGE },
        }
    }
}

/// Export `element` into `sink` and report the result as a notice. Nothing
/// is written when synthesis fails.
pub fn download(element: &ExtractedElement, sink: &mut dyn FileSink) -> Notice {
    let file = match export_element(element) {
        Ok(file) => file,
        Err(e) => {
            tracing::warn!(element = %element.name, error = %e, "export synthesis failed");
            return Notice::error("Download failed", e.to_string());
        }
    };

    match sink.save(&file) {
        Ok(()) => Notice::success("Download successful", format!("Saved {}", file.filename)),
        Err(e) => {
            tracing::warn!(file = %file.filename, error = %e, "export save failed");
            Notice::error("Download failed", e.to_string())
        }
    }
}

//! Shared design-element model for the extractor.
//!
//! This crate owns the JSON shapes exchanged between `server`, `client` and
//! `cli`: the extracted element itself, the save request body, and the stored
//! record. Field names on the wire follow the web client (`type`, `imageUrl`).

pub mod export;

use serde::{Deserialize, Serialize};

#[cfg(test)]
#[path = "lib_test.rs"]
mod tests;

/// Errors produced when reading a palette element's entries.
#[derive(Debug, thiserror::Error)]
pub enum ElementError {
    /// Palette entries were requested from a non-palette element.
    #[error("element of type {0} has no palette")]
    NotPalette(ElementKind),
    /// The palette element carries no `value`.
    #[error("palette element has no value")]
    MissingValue,
    /// The `value` is not a JSON array of `{color, name}` entries.
    #[error("malformed palette value: {0}")]
    MalformedValue(#[from] serde_json::Error),
}

// =============================================================================
// ELEMENT KIND
// =============================================================================

/// Closed set of design element categories.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Font,
    Color,
    Shape,
    Effect,
    Text,
    Palette,
}

impl ElementKind {
    /// Every kind, in display order.
    pub const ALL: [Self; 6] = [Self::Font, Self::Color, Self::Shape, Self::Effect, Self::Text, Self::Palette];

    /// Wire tag for this kind.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Font => "font",
            Self::Color => "color",
            Self::Shape => "shape",
            Self::Effect => "effect",
            Self::Text => "text",
            Self::Palette => "palette",
        }
    }
}

impl std::fmt::Display for ElementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// ELEMENTS
// =============================================================================

/// One color in a palette.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaletteEntry {
    /// CSS color string, e.g. `"#2563eb"`.
    pub color: String,
    /// Human label, e.g. `"Primary"`.
    pub name: String,
}

impl PaletteEntry {
    #[must_use]
    pub fn new(color: impl Into<String>, name: impl Into<String>) -> Self {
        Self { color: color.into(), name: name.into() }
    }
}

/// A single extracted design artifact.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedElement {
    #[serde(rename = "type")]
    pub kind: ElementKind,
    pub name: String,
    pub details: String,
    /// Serialized palette entries. Only read when `kind` is `Palette`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl ExtractedElement {
    #[must_use]
    pub fn new(kind: ElementKind, name: impl Into<String>, details: impl Into<String>) -> Self {
        Self { kind, name: name.into(), details: details.into(), value: None }
    }

    /// Build a palette element whose `value` is the JSON form of `entries`.
    ///
    /// # Errors
    ///
    /// Returns [`ElementError::MalformedValue`] if the entries fail to serialize.
    pub fn palette(
        name: impl Into<String>,
        details: impl Into<String>,
        entries: &[PaletteEntry],
    ) -> Result<Self, ElementError> {
        let value = serde_json::to_string(entries)?;
        Ok(Self { kind: ElementKind::Palette, name: name.into(), details: details.into(), value: Some(value) })
    }

    /// Parse the palette entries carried in `value`.
    ///
    /// # Errors
    ///
    /// Fails when the element is not a palette, has no value, or the value is
    /// not a JSON array of entries.
    pub fn palette_entries(&self) -> Result<Vec<PaletteEntry>, ElementError> {
        if self.kind != ElementKind::Palette {
            return Err(ElementError::NotPalette(self.kind));
        }
        let raw = self.value.as_deref().ok_or(ElementError::MissingValue)?;
        Ok(serde_json::from_str(raw)?)
    }
}

// =============================================================================
// REQUESTS AND RECORDS
// =============================================================================

/// Body of a save request: the image reference plus its elements.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementsInput {
    /// Opaque reference to the source image (URL or data URL).
    pub image_url: String,
    pub elements: Vec<ExtractedElement>,
}

/// A stored extraction result. Immutable once created.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedElementsRecord {
    pub id: u64,
    pub image_url: String,
    pub elements: Vec<ExtractedElement>,
}

impl ExtractedElementsRecord {
    /// Attach an assigned identifier to a save request.
    #[must_use]
    pub fn from_input(id: u64, input: ElementsInput) -> Self {
        Self { id, image_url: input.image_url, elements: input.elements }
    }
}

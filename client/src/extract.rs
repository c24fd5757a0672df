//! Extraction provider boundary.
//!
//! DESIGN
//! ======
//! The uploader only knows `ExtractionProvider`: image bytes in, ordered
//! elements out. `MockExtractor` is the stand-in used until a real analysis
//! backend exists; it ignores its input and returns a fixed payload after a
//! delay.

use std::time::Duration;

use elements::{ElementError, ElementKind, ExtractedElement, PaletteEntry};

#[cfg(test)]
#[path = "extract_test.rs"]
mod tests;

pub const DEFAULT_MOCK_DELAY: Duration = Duration::from_secs(2);

#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    /// The provider could not analyze the image.
    #[error("extraction failed: {0}")]
    Provider(String),
    #[error(transparent)]
    Element(#[from] ElementError),
}

#[async_trait::async_trait]
pub trait ExtractionProvider: Send + Sync {
    /// Analyze `image` and return the elements found, in display order.
    async fn extract(&self, image: &[u8]) -> Result<Vec<ExtractedElement>, ExtractionError>;
}

/// Input-independent provider returning [`mock_elements`] after `delay`.
#[derive(Clone, Copy, Debug)]
pub struct MockExtractor {
    delay: Duration,
}

impl MockExtractor {
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl Default for MockExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_MOCK_DELAY)
    }
}

#[async_trait::async_trait]
impl ExtractionProvider for MockExtractor {
    async fn extract(&self, image: &[u8]) -> Result<Vec<ExtractedElement>, ExtractionError> {
        tracing::debug!(bytes = image.len(), delay = ?self.delay, "mock extraction started");
        tokio::time::sleep(self.delay).await;
        mock_elements()
    }
}

/// The fixed five-element payload: font, color, shape, effect, palette.
///
/// # Errors
///
/// Only fails if the palette entries cannot be serialized.
pub fn mock_elements() -> Result<Vec<ExtractedElement>, ExtractionError> {
    let palette = ExtractedElement::palette(
        "Color Scheme",
        "Brand Colors",
        &[
            PaletteEntry::new("#2563eb", "Primary"),
            PaletteEntry::new("#1d4ed8", "Secondary"),
            PaletteEntry::new("#60a5fa", "Accent"),
            PaletteEntry::new("#f8fafc", "Background"),
        ],
    )?;

    Ok(vec![
        ExtractedElement::new(ElementKind::Font, "Primary Font", "Helvetica Neue, 24px Bold"),
        ExtractedElement::new(ElementKind::Color, "Primary Blue", "#2563eb"),
        ExtractedElement::new(ElementKind::Shape, "Hero Image", "PNG, 1200x800px"),
        ExtractedElement::new(ElementKind::Effect, "Shadow Effect", "0px 4px 6px rgba(0,0,0,0.1)"),
        palette,
    ])
}

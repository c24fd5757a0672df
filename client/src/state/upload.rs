//! Upload validation and the upload state machine.
//!
//! DESIGN
//! ======
//! `Uploader` owns the widget state (`Empty` → `Processing` → `Ready`) and a
//! generation counter published on a `watch` channel. Every accepted upload
//! and every `clear` bumps the generation. `process` races the provider
//! against that channel, so an extraction whose upload has been replaced is
//! dropped before it can emit, and a late result tagged with an old
//! generation is discarded by `complete`.
//!
//! The uploader sits behind a plain `Mutex`; the lock is only taken for the
//! synchronous transitions on either side of the provider call.

use std::sync::{Mutex, MutexGuard, PoisonError};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use elements::ExtractedElement;
use tokio::sync::watch;

use super::notice::Notice;
use crate::extract::{ExtractionError, ExtractionProvider};

#[cfg(test)]
#[path = "upload_test.rs"]
mod upload_test;

pub const DEFAULT_MAX_BYTES: u64 = 10 * 1024 * 1024;
pub const ACCEPTED_TYPES: [&str; 2] = ["image/jpeg", "image/png"];

const BYTES_PER_MB: u64 = 1024 * 1024;

// =============================================================================
// FILES AND VALIDATION
// =============================================================================

/// A candidate image: declared MIME type plus raw bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageFile {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl ImageFile {
    #[must_use]
    pub fn new(file_name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self { file_name: file_name.into(), mime_type: mime_type.into(), bytes }
    }

    #[must_use]
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// In-page representation of an accepted image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImagePreview {
    pub file_name: String,
    /// `data:<mime>;base64,<payload>`; also usable as a record's `imageUrl`.
    pub data_url: String,
}

impl ImagePreview {
    #[must_use]
    pub fn from_file(file: &ImageFile) -> Self {
        let data_url = format!("data:{};base64,{}", file.mime_type, STANDARD.encode(&file.bytes));
        Self { file_name: file.file_name.clone(), data_url }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum UploadError {
    #[error("unsupported file type: {0}")]
    UnsupportedType(String),
    #[error("file is {size} bytes; limit is {max} bytes")]
    TooLarge { size: u64, max: u64 },
}

impl UploadError {
    /// The toast shown for this rejection.
    #[must_use]
    pub fn notice(&self) -> Notice {
        match self {
            Self::UnsupportedType(_) => Notice::error("Invalid file type", "Please upload a PNG or JPG file"),
            Self::TooLarge { max, .. } => {
                Notice::error("File too large", format!("Please upload an image under {}", format_limit(*max)))
            }
        }
    }
}

fn format_limit(max: u64) -> String {
    if max >= BYTES_PER_MB && max % BYTES_PER_MB == 0 {
        format!("{}MB", max / BYTES_PER_MB)
    } else {
        format!("{max} bytes")
    }
}

/// Accepted types and the inclusive size ceiling.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadConfig {
    pub max_bytes: u64,
    pub accepted_types: Vec<String>,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self { max_bytes: DEFAULT_MAX_BYTES, accepted_types: ACCEPTED_TYPES.iter().map(|t| (*t).to_owned()).collect() }
    }
}

impl UploadConfig {
    #[must_use]
    pub fn with_max_bytes(max_bytes: u64) -> Self {
        Self { max_bytes, ..Self::default() }
    }

    /// Check type first, then size. A file of exactly `max_bytes` passes.
    ///
    /// # Errors
    ///
    /// [`UploadError::UnsupportedType`] or [`UploadError::TooLarge`].
    pub fn validate(&self, file: &ImageFile) -> Result<(), UploadError> {
        if !self.accepted_types.iter().any(|t| t.eq_ignore_ascii_case(&file.mime_type)) {
            return Err(UploadError::UnsupportedType(file.mime_type.clone()));
        }
        if file.size() > self.max_bytes {
            return Err(UploadError::TooLarge { size: file.size(), max: self.max_bytes });
        }
        Ok(())
    }
}

// =============================================================================
// STATE MACHINE
// =============================================================================

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum UploadState {
    /// No image selected.
    #[default]
    Empty,
    /// Image accepted, extraction in flight.
    Processing { image: ImagePreview },
    /// Extraction finished.
    Ready { image: ImagePreview, elements: Vec<ExtractedElement> },
    /// The provider reported an error.
    Failed { image: ImagePreview, message: String },
}

impl UploadState {
    #[must_use]
    pub fn image(&self) -> Option<&ImagePreview> {
        match self {
            Self::Empty => None,
            Self::Processing { image } | Self::Ready { image, .. } | Self::Failed { image, .. } => Some(image),
        }
    }

    #[must_use]
    pub fn is_processing(&self) -> bool {
        matches!(self, Self::Processing { .. })
    }

    /// Extracted elements; empty unless `Ready`.
    #[must_use]
    pub fn elements(&self) -> &[ExtractedElement] {
        match self {
            Self::Ready { elements, .. } => elements,
            _ => &[],
        }
    }
}

/// Handed out by [`Uploader::accept`]; carries what the provider needs.
#[derive(Debug)]
pub struct ExtractionTicket {
    pub generation: u64,
    pub bytes: Vec<u8>,
    current: watch::Receiver<u64>,
}

impl ExtractionTicket {
    /// Resolves once a newer upload or a `clear` replaces this one.
    pub async fn superseded(&mut self) {
        let generation = self.generation;
        if self.current.wait_for(|current| *current != generation).await.is_err() {
            // Uploader dropped: nothing can supersede us any more.
            std::future::pending::<()>().await;
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExtractionOutcome {
    /// The result (success or failure) was applied to the state.
    Applied,
    /// A newer upload replaced this one; the result was dropped.
    Superseded,
}

pub struct Uploader {
    config: UploadConfig,
    state: UploadState,
    generation: watch::Sender<u64>,
    notices: Vec<Notice>,
}

impl Uploader {
    #[must_use]
    pub fn new(config: UploadConfig) -> Self {
        let (generation, _) = watch::channel(0);
        Self { config, state: UploadState::Empty, generation, notices: Vec::new() }
    }

    #[must_use]
    pub fn state(&self) -> &UploadState {
        &self.state
    }

    #[must_use]
    pub fn config(&self) -> &UploadConfig {
        &self.config
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        *self.generation.borrow()
    }

    /// Validate `file` and, if it passes, move to `Processing` with a fresh
    /// preview. A rejected file leaves the state untouched and queues an
    /// error notice.
    ///
    /// # Errors
    ///
    /// Returns the validation failure.
    pub fn accept(&mut self, file: ImageFile) -> Result<ExtractionTicket, UploadError> {
        if let Err(e) = self.config.validate(&file) {
            tracing::debug!(file = %file.file_name, error = %e, "upload rejected");
            self.notices.push(e.notice());
            return Err(e);
        }

        self.generation.send_modify(|g| *g += 1);
        let generation = self.generation();
        self.state = UploadState::Processing { image: ImagePreview::from_file(&file) };
        tracing::debug!(file = %file.file_name, generation, "upload accepted");

        Ok(ExtractionTicket { generation, bytes: file.bytes, current: self.generation.subscribe() })
    }

    /// Remove the current image and cancel any in-flight extraction.
    pub fn clear(&mut self) {
        self.generation.send_modify(|g| *g += 1);
        self.state = UploadState::Empty;
    }

    /// Apply a provider result if `generation` is still current.
    pub fn complete(
        &mut self,
        generation: u64,
        result: Result<Vec<ExtractedElement>, ExtractionError>,
    ) -> ExtractionOutcome {
        if generation != self.generation() {
            tracing::debug!(generation, current = self.generation(), "discarding superseded extraction");
            return ExtractionOutcome::Superseded;
        }
        let UploadState::Processing { image } = &self.state else {
            return ExtractionOutcome::Superseded;
        };
        let image = image.clone();

        match result {
            Ok(elements) => {
                self.notices
                    .push(Notice::success("Image analyzed successfully", "Design elements have been extracted"));
                self.state = UploadState::Ready { image, elements };
            }
            Err(e) => {
                tracing::warn!(error = %e, "extraction failed");
                self.notices.push(Notice::error("Extraction failed", e.to_string()));
                self.state = UploadState::Failed { image, message: e.to_string() };
            }
        }
        ExtractionOutcome::Applied
    }

    /// Drain queued notices in the order they were raised.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }
}

impl Default for Uploader {
    fn default() -> Self {
        Self::new(UploadConfig::default())
    }
}

fn lock(uploader: &Mutex<Uploader>) -> MutexGuard<'_, Uploader> {
    uploader.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Accept `file`, run `provider`, and apply the result.
///
/// Returns [`ExtractionOutcome::Superseded`] when another upload (or a clear)
/// lands while the provider is running; the provider future is dropped at
/// that point.
///
/// # Errors
///
/// Returns the validation failure if `file` is rejected.
pub async fn process<P>(
    uploader: &Mutex<Uploader>,
    provider: &P,
    file: ImageFile,
) -> Result<ExtractionOutcome, UploadError>
where
    P: ExtractionProvider + ?Sized,
{
    let mut ticket = lock(uploader).accept(file)?;
    let generation = ticket.generation;
    let bytes = std::mem::take(&mut ticket.bytes);

    let result = tokio::select! {
        result = provider.extract(&bytes) => result,
        () = ticket.superseded() => {
            tracing::debug!(generation, "extraction cancelled");
            return Ok(ExtractionOutcome::Superseded);
        }
    };

    Ok(lock(uploader).complete(generation, result))
}

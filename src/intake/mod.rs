//! File intake.
//!
//! Picks a file, classifies it as an image or a PDF, and for images runs the
//! decoded bytes through a [`MarkdownConverter`].
//!
//! The interactive app runs these steps as separate messages so the image
//! shows before OCR finishes; [`select_file`] runs the whole flow as one
//! awaited call for headless use.

mod convert;
mod error;
mod picker;

pub use convert::{CommandConverter, DEFAULT_OCR_COMMAND, MarkdownConverter, items_from_markdown};
pub use error::IntakeError;
pub use picker::{DialogPicker, FilePicker, PathPicker, reference_for_path};

use tracing::{debug, info};

use crate::reference::{Selection, classify, decode_data_url};
use crate::store::Conversion;

/// Sequence number of a file selection request.
///
/// Only completions carrying the latest ticket are applied; anything older
/// was superseded by a newer selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IntakeTicket(u64);

impl IntakeTicket {
    pub const fn new(seq: u64) -> Self {
        Self(seq)
    }

    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }

    pub const fn seq(self) -> u64 {
        self.0
    }
}

/// Result of a complete intake run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntakeOutcome {
    Cancelled,
    Pdf(String),
    Image { url: String, conversion: Conversion },
}

/// Decode an image data URL and convert it to markdown.
///
/// # Errors
///
/// Returns [`IntakeError::InvalidPayload`] for a malformed data URL, or
/// whatever the converter reports.
pub async fn convert_image(
    url: &str,
    converter: &dyn MarkdownConverter,
) -> Result<Conversion, IntakeError> {
    let bytes = decode_data_url(url)?;
    debug!(bytes = bytes.len(), "decoded image payload");
    converter.convert(bytes).await
}

/// Run the full intake flow: pick, classify, and convert images.
///
/// # Errors
///
/// Propagates picker, decode and conversion errors.
pub async fn select_file(
    picker: &dyn FilePicker,
    converter: &dyn MarkdownConverter,
) -> Result<IntakeOutcome, IntakeError> {
    let picked = picker.open_file().await?;
    match classify(picked.as_deref()) {
        Selection::Cancelled => {
            info!("file selection cancelled");
            Ok(IntakeOutcome::Cancelled)
        }
        Selection::Pdf(url) => Ok(IntakeOutcome::Pdf(url)),
        Selection::Image(url) => {
            let conversion = convert_image(&url, converter).await?;
            Ok(IntakeOutcome::Image { url, conversion })
        }
    }
}

//! PDF loading collaborator.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RenderError {
    #[error("Failed to open PDF '{path}': {reason}")]
    Open { path: PathBuf, reason: String },

    #[error("PDF '{0}' has no pages")]
    Empty(PathBuf),

    #[error("PDF load task failed: {0}")]
    Task(String),
}

/// Auxiliary asset locations handed to the renderer.
///
/// These are fixed relative paths under the application's asset root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetPaths {
    pub cmaps: PathBuf,
    pub standard_fonts: PathBuf,
    pub wasm: PathBuf,
}

impl AssetPaths {
    pub fn under(root: &Path) -> Self {
        Self {
            cmaps: root.join("cmaps"),
            standard_fonts: root.join("standard_fonts"),
            wasm: root.join("wasm"),
        }
    }

    /// Asset directories that do not exist on disk.
    pub fn missing(&self) -> Vec<&Path> {
        [&self.cmaps, &self.standard_fonts, &self.wasm]
            .into_iter()
            .map(PathBuf::as_path)
            .filter(|p| !p.is_dir())
            .collect()
    }
}

impl Default for AssetPaths {
    fn default() -> Self {
        Self::under(Path::new("assets"))
    }
}

/// A loaded PDF: one entry of extracted text per page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadedPdf {
    pub pages: Vec<String>,
}

impl LoadedPdf {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Text of a 1-indexed page.
    pub fn page_text(&self, page: usize) -> Option<&str> {
        page.checked_sub(1)
            .and_then(|idx| self.pages.get(idx))
            .map(String::as_str)
    }
}

/// Loads a document reference into pages.
///
/// Loading may block; the app runs it off the UI thread.
pub trait PdfRenderer: Send + Sync {
    /// # Errors
    ///
    /// Returns a [`RenderError`] if the document cannot be opened or has no
    /// pages.
    fn load(&self, reference: &str, assets: &AssetPaths) -> Result<LoadedPdf, RenderError>;
}

/// Path on disk for a `file://` URL or plain path.
pub fn pdf_path(reference: &str) -> PathBuf {
    PathBuf::from(reference.strip_prefix("file://").unwrap_or(reference))
}

/// Text-layer renderer backed by `lopdf`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LopdfRenderer;

impl PdfRenderer for LopdfRenderer {
    fn load(&self, reference: &str, assets: &AssetPaths) -> Result<LoadedPdf, RenderError> {
        let path = pdf_path(reference);
        let missing = assets.missing();
        if !missing.is_empty() {
            debug!(?missing, "asset directories not present; text extraction does not need them");
        }

        let doc = lopdf::Document::load(&path).map_err(|err| RenderError::Open {
            path: path.clone(),
            reason: err.to_string(),
        })?;

        let pages: Vec<String> = doc
            .get_pages()
            .keys()
            .map(|&number| {
                doc.extract_text(&[number]).unwrap_or_else(|err| {
                    debug!(page = number, "text extraction failed: {err}");
                    String::new()
                })
            })
            .collect();

        if pages.is_empty() {
            return Err(RenderError::Empty(path));
        }
        info!(pages = pages.len(), "Loaded {}", path.display());
        Ok(LoadedPdf { pages })
    }
}

//! File pickers.
//!
//! A picker returns the selected file as a value the rest of intake can
//! classify: images become base64 data URLs, everything else a `file://`
//! URL. `Ok(None)` means the user cancelled.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, info};

use super::IntakeError;
use crate::reference::{encode_data_url, image_mime_for_path};

/// Extensions offered by the native dialog.
const DIALOG_EXTENSIONS: &[&str] = &["pdf", "png", "jpg", "jpeg", "gif", "bmp", "webp", "tif", "tiff"];

#[async_trait]
pub trait FilePicker: Send + Sync {
    /// Ask for a file. Returns `Ok(None)` when nothing was chosen.
    async fn open_file(&self) -> Result<Option<String>, IntakeError>;
}

/// Picks a path that is already known, e.g. typed into the prompt or passed
/// on the command line.
#[derive(Debug, Clone)]
pub struct PathPicker {
    path: Option<PathBuf>,
}

impl PathPicker {
    /// An empty (or whitespace-only) path behaves like a cancelled dialog.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let raw = path.as_ref().to_string_lossy();
        let trimmed = raw.trim();
        Self {
            path: (!trimmed.is_empty()).then(|| PathBuf::from(trimmed)),
        }
    }
}

#[async_trait]
impl FilePicker for PathPicker {
    async fn open_file(&self) -> Result<Option<String>, IntakeError> {
        match &self.path {
            Some(path) => reference_for_path(path).await.map(Some),
            None => Ok(None),
        }
    }
}

/// Native open-file dialog.
#[derive(Debug, Clone, Default)]
pub struct DialogPicker {
    start_dir: Option<PathBuf>,
}

impl DialogPicker {
    pub const fn new(start_dir: Option<PathBuf>) -> Self {
        Self { start_dir }
    }
}

#[async_trait]
impl FilePicker for DialogPicker {
    async fn open_file(&self) -> Result<Option<String>, IntakeError> {
        let start_dir = self.start_dir.clone();
        // The dialog blocks its thread until closed.
        let picked = tokio::task::spawn_blocking(move || {
            let mut dialog = rfd::FileDialog::new()
                .set_title("Open document")
                .add_filter("Documents", DIALOG_EXTENSIONS);
            if let Some(dir) = start_dir {
                dialog = dialog.set_directory(dir);
            }
            dialog.pick_file()
        })
        .await
        .map_err(|err| IntakeError::Picker(err.to_string()))?;

        match picked {
            Some(path) => {
                info!("Picked {}", path.display());
                reference_for_path(&path).await.map(Some)
            }
            None => {
                debug!("dialog closed without a selection");
                Ok(None)
            }
        }
    }
}

/// Turn a file on disk into the value a picker hands back.
///
/// # Errors
///
/// Returns [`IntakeError::ReadFailed`] if the file cannot be read or
/// resolved.
pub async fn reference_for_path(path: &Path) -> Result<String, IntakeError> {
    let read_failed = |err: std::io::Error| IntakeError::ReadFailed {
        path: path.to_path_buf(),
        reason: err.to_string(),
    };

    if let Some(mime) = image_mime_for_path(path) {
        let bytes = tokio::fs::read(path).await.map_err(read_failed)?;
        debug!("Encoding {} ({} bytes) as {mime}", path.display(), bytes.len());
        return Ok(encode_data_url(mime, &bytes));
    }

    let absolute = tokio::fs::canonicalize(path).await.map_err(read_failed)?;
    Ok(format!("file://{}", absolute.display()))
}

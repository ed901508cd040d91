use std::path::PathBuf;

use thiserror::Error;

/// Failures while picking a file or converting it to markdown.
///
/// None of these are fatal: the app reports them and keeps its prior state.
/// The type is `Clone + PartialEq` so it can travel inside app messages.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IntakeError {
    /// The picker could not read the selected file.
    #[error("Failed to read '{path}': {reason}")]
    ReadFailed { path: PathBuf, reason: String },

    /// The picker itself failed (dialog backend unavailable etc.).
    #[error("File picker failed: {0}")]
    Picker(String),

    /// The data URL was malformed or not valid base64.
    #[error("Invalid image payload: {0}")]
    InvalidPayload(String),

    /// The conversion collaborator failed.
    #[error("Markdown conversion failed: {0}")]
    Conversion(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_failed_display_names_path() {
        let err = IntakeError::ReadFailed {
            path: PathBuf::from("/tmp/scan.png"),
            reason: "denied".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("/tmp/scan.png"), "got: {msg}");
        assert!(msg.contains("denied"));
    }

    #[test]
    fn conversion_display() {
        let err = IntakeError::Conversion("exit status 1".into());
        assert_eq!(err.to_string(), "Markdown conversion failed: exit status 1");
    }
}

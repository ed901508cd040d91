//! Markdown conversion collaborators.

use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, info};

use super::IntakeError;
use crate::store::{Conversion, OcrResultItem};

/// Default OCR command: tesseract reading the image from stdin and writing
/// plain text to stdout.
pub const DEFAULT_OCR_COMMAND: &str = "tesseract stdin stdout";

/// Turns raw image bytes into markdown.
#[async_trait]
pub trait MarkdownConverter: Send + Sync {
    async fn markdown(&self, bytes: Vec<u8>) -> Result<String, IntakeError>;

    /// Markdown plus the raw OCR items it was built from.
    ///
    /// The default splits the markdown into one item per non-blank line.
    async fn convert(&self, bytes: Vec<u8>) -> Result<Conversion, IntakeError> {
        let markdown = self.markdown(bytes).await?;
        let items = items_from_markdown(&markdown);
        Ok(Conversion { markdown, items })
    }
}

pub fn items_from_markdown(markdown: &str) -> Vec<OcrResultItem> {
    markdown
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(OcrResultItem::new)
        .collect()
}

/// Runs an external OCR program, feeding the image on stdin.
#[derive(Debug, Clone)]
pub struct CommandConverter {
    program: String,
    args: Vec<String>,
}

impl CommandConverter {
    /// Build from a whitespace-separated command line.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::Conversion`] for an empty command line.
    pub fn from_command_line(command: &str) -> Result<Self, IntakeError> {
        let mut parts = command.split_whitespace().map(ToOwned::to_owned);
        let program = parts
            .next()
            .ok_or_else(|| IntakeError::Conversion("empty OCR command".to_string()))?;
        Ok(Self {
            program,
            args: parts.collect(),
        })
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Default for CommandConverter {
    fn default() -> Self {
        Self {
            program: "tesseract".to_string(),
            args: vec!["stdin".to_string(), "stdout".to_string()],
        }
    }
}

#[async_trait]
impl MarkdownConverter for CommandConverter {
    async fn markdown(&self, bytes: Vec<u8>) -> Result<String, IntakeError> {
        let conversion_failed = |err: std::io::Error| {
            IntakeError::Conversion(format!("{}: {err}", self.program))
        };

        debug!(program = %self.program, bytes = bytes.len(), "starting OCR command");
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(conversion_failed)?;

        // Feed stdin while stdout drains.
        let stdin = child.stdin.take();
        let feed = async move {
            if let Some(mut stdin) = stdin {
                // A converter that exits early closes the pipe; its exit
                // status carries the real error.
                if let Err(err) = stdin.write_all(&bytes).await {
                    debug!("OCR stdin closed early: {err}");
                }
            }
        };
        let ((), output) = tokio::join!(feed, child.wait_with_output());
        let output = output.map_err(conversion_failed)?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(IntakeError::Conversion(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }

        let markdown = String::from_utf8_lossy(&output.stdout).into_owned();
        info!(program = %self.program, chars = markdown.len(), "OCR command finished");
        Ok(markdown)
    }
}

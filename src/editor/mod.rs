//! Markdown editor pane.
//!
//! The pane bridges the store's markdown text and an embedded editing
//! surface. The surface itself is pluggable through [`SurfaceFactory`]; the
//! default one is a rope-backed [`EditorBuffer`].

mod buffer;
mod pane;

pub use buffer::{BufferFactory, Cursor, Direction, EditorBuffer, EditorEdit};
pub use pane::EditorPane;

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EditorError {
    #[error("Editor initialization failed: {0}")]
    Init(String),
}

/// An embedded markdown editing surface.
pub trait MarkdownSurface {
    /// Current text shown in the surface.
    fn value(&self) -> String;

    /// Replace the displayed text.
    fn set_value(&mut self, text: &str);

    /// Apply a keyboard edit. Returns `true` if the text changed.
    fn edit(&mut self, edit: EditorEdit) -> bool;

    /// Release anything the surface holds. Called once before it is dropped.
    fn destroy(&mut self) {}

    /// Buffer view for rendering, when the surface is buffer-backed.
    fn buffer(&self) -> Option<&EditorBuffer> {
        None
    }

    fn buffer_mut(&mut self) -> Option<&mut EditorBuffer> {
        None
    }
}

/// Creates editing surfaces seeded with initial text.
pub trait SurfaceFactory {
    /// # Errors
    ///
    /// Returns [`EditorError::Init`] if the surface cannot be created.
    fn create(&self, initial: &str) -> Result<Box<dyn MarkdownSurface>, EditorError>;
}

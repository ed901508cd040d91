// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. editor::EditorPane)
    clippy::module_name_repetitions
)]

//! # Docmark
//!
//! A terminal document viewer with OCR-to-markdown editing.
//!
//! Pick a PDF or an image; the viewer pane shows it (PDFs page by page) and
//! the editor pane holds markdown. Images are run through an OCR command
//! and the result replaces the editor contents.
//!
//! ## Architecture
//!
//! Docmark uses The Elm Architecture (TEA) pattern:
//! - **Model**: Application state
//! - **Message**: Events and actions
//! - **Update**: Pure state transitions
//! - **View**: Render to terminal
//!
//! ## Modules
//!
//! - [`app`]: Main application loop and state
//! - [`store`]: Document state shared by the panes
//! - [`intake`]: File selection, data-URL decoding and OCR conversion
//! - [`viewer`]: PDF pagination and image display
//! - [`editor`]: Markdown editing surface and its lifecycle
//! - [`layout`]: Split and editor-only pane geometry
//! - [`ui`]: Terminal UI components
//! - [`config`]: Saved command-line defaults

pub mod app;
pub mod config;
pub mod editor;
pub mod intake;
pub mod layout;
pub mod perf;
pub mod reference;
pub mod store;
pub mod ui;
pub mod viewer;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::app::{App, Message, Model};
    pub use crate::reference::DocumentReference;
    pub use crate::store::DocumentStore;
}

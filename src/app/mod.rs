//! Application state and main event loop.
//!
//! This module implements The Elm Architecture (TEA):
//! - [`Model`]: The complete application state
//! - [`Message`]: All possible events and actions
//! - [`update`]: Pure function for state transitions
//! - [`App::run`]: Main event loop with rendering
//!
//! Picker, OCR and PDF work runs on a tokio runtime. Each task reports back
//! with a [`Message`] that the loop applies like any key press, so the model
//! is only ever touched from the UI thread.

mod effects;
mod event_loop;
mod input;
mod model;
mod update;

pub use model::{Focus, IntakeRequest, Model, Task, ToastLevel};
pub use update::{Message, update};

use std::path::PathBuf;
use std::sync::Arc;

use crate::intake::{CommandConverter, MarkdownConverter};

/// Main application struct that owns the terminal and runs the event loop.
pub struct App {
    initial_file: Option<PathBuf>,
    viewer_visible: bool,
    images_enabled: bool,
    force_half_cell: bool,
    converter: Arc<dyn MarkdownConverter>,
    asset_root: PathBuf,
    config_global_path: Option<PathBuf>,
    config_local_path: Option<PathBuf>,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    pub fn new() -> Self {
        Self {
            initial_file: None,
            viewer_visible: true,
            images_enabled: true,
            force_half_cell: false,
            converter: Arc::new(CommandConverter::default()),
            asset_root: PathBuf::from("assets"),
            config_global_path: None,
            config_local_path: None,
        }
    }

    /// Open this file as soon as the UI is up.
    #[must_use]
    pub fn with_initial_file(mut self, path: Option<PathBuf>) -> Self {
        self.initial_file = path;
        self
    }

    /// Set initial viewer visibility.
    #[must_use]
    pub const fn with_viewer_visible(mut self, visible: bool) -> Self {
        self.viewer_visible = visible;
        self
    }

    /// Enable or disable image rendering in the viewer.
    #[must_use]
    pub const fn with_images_enabled(mut self, enabled: bool) -> Self {
        self.images_enabled = enabled;
        self
    }

    /// Use half-block image rendering without querying the terminal.
    #[must_use]
    pub const fn with_force_half_cell(mut self, force: bool) -> Self {
        self.force_half_cell = force;
        self
    }

    #[must_use]
    pub fn with_converter(mut self, converter: Arc<dyn MarkdownConverter>) -> Self {
        self.converter = converter;
        self
    }

    /// Root directory holding the renderer's `cmaps/`, `standard_fonts/` and
    /// `wasm/` assets.
    #[must_use]
    pub fn with_asset_root(mut self, root: PathBuf) -> Self {
        self.asset_root = root;
        self
    }

    /// Set config paths to show in help.
    #[must_use]
    pub fn with_config_paths(
        mut self,
        global_path: Option<PathBuf>,
        local_path: Option<PathBuf>,
    ) -> Self {
        self.config_global_path = global_path;
        self.config_local_path = local_path;
        self
    }
}

use std::path::PathBuf;
use std::time::{Duration, Instant};

use ratatui_image::picker::Picker;

use crate::editor::EditorPane;
use crate::intake::IntakeTicket;
use crate::store::DocumentStore;
use crate::viewer::ViewerPane;

const TOAST_DURATION: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
struct Toast {
    level: ToastLevel,
    message: String,
    expires_at: Instant,
}

/// Which pane receives keyboard input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Focus {
    #[default]
    Viewer,
    Editor,
}

/// Where a file selection comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntakeRequest {
    /// A path typed at the prompt or given on the command line.
    Path(String),
    /// The native file dialog.
    Dialog,
}

/// Background work requested by `update`, started by the side-effect pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Task {
    Pick(IntakeTicket, IntakeRequest),
    Convert(IntakeTicket, String),
    LoadPdf(IntakeTicket, String),
}

/// The complete application state.
///
/// All state lives here - no global or scattered state.
pub struct Model {
    /// Selected document, OCR output, markdown and viewer visibility
    pub store: DocumentStore,
    pub viewer: ViewerPane,
    pub editor: EditorPane,
    pub focus: Focus,
    /// Whether help overlay is visible
    pub help_visible: bool,
    /// Text typed into the open-path prompt, when it is open
    pub path_prompt: Option<String>,
    /// Whether OCR conversion is in flight for the active image
    pub converting: bool,
    /// Whether the active PDF is still loading
    pub loading_pdf: bool,
    /// Image picker for terminal rendering
    pub picker: Option<Picker>,
    /// Whether images are drawn (otherwise a text placeholder)
    pub images_enabled: bool,
    /// Global config path shown in help
    pub config_global_path: Option<PathBuf>,
    /// Local override path shown in help
    pub config_local_path: Option<PathBuf>,
    pub terminal_size: (u16, u16),
    /// Whether the app should quit
    pub should_quit: bool,
    toast: Option<Toast>,
    /// Most recent selection request
    requested: IntakeTicket,
    /// Selection whose result is in the store
    applied: IntakeTicket,
    pub(super) tasks: Vec<Task>,
}

impl std::fmt::Debug for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Model")
            .field("reference", &self.store.reference().display_name())
            .field("viewer_visible", &self.store.viewer_visible())
            .field("focus", &self.focus)
            .field("requested", &self.requested)
            .field("applied", &self.applied)
            .finish_non_exhaustive()
    }
}

impl Model {
    pub fn new(store: DocumentStore, terminal_size: (u16, u16)) -> Self {
        let focus = if store.viewer_visible() {
            Focus::Viewer
        } else {
            Focus::Editor
        };
        Self {
            store,
            focus,
            terminal_size,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_picker(mut self, picker: Option<Picker>) -> Self {
        self.picker = picker;
        self
    }

    pub const fn requested_ticket(&self) -> IntakeTicket {
        self.requested
    }

    pub const fn applied_ticket(&self) -> IntakeTicket {
        self.applied
    }

    /// Start a new selection; everything still in flight becomes stale.
    pub(super) fn begin_intake(&mut self, request: IntakeRequest) -> IntakeTicket {
        self.requested = self.requested.next();
        self.tasks.push(Task::Pick(self.requested, request));
        self.requested
    }

    /// A picker result is current only if no newer selection was started.
    pub(super) fn is_current_pick(&self, ticket: IntakeTicket) -> bool {
        ticket == self.requested
    }

    /// Record that the selection for `ticket` replaced the store reference.
    pub(super) const fn mark_applied(&mut self, ticket: IntakeTicket) {
        self.applied = ticket;
    }

    /// Conversion and load results belong to whichever selection is shown.
    pub(super) fn is_current_document(&self, ticket: IntakeTicket) -> bool {
        ticket == self.applied
    }

    /// Drain tasks queued by `update`.
    pub(super) fn take_tasks(&mut self) -> Vec<Task> {
        std::mem::take(&mut self.tasks)
    }

    pub fn pending_tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn show_toast(&mut self, level: ToastLevel, message: impl Into<String>) {
        self.toast = Some(Toast {
            level,
            message: message.into(),
            expires_at: Instant::now() + TOAST_DURATION,
        });
    }

    pub(super) fn expire_toast(&mut self, now: Instant) -> bool {
        if self
            .toast
            .as_ref()
            .is_some_and(|toast| toast.expires_at <= now)
        {
            self.toast = None;
            return true;
        }
        false
    }

    pub fn active_toast(&self) -> Option<(&str, ToastLevel)> {
        self.toast
            .as_ref()
            .map(|toast| (toast.message.as_str(), toast.level))
    }

    pub const fn prompt_active(&self) -> bool {
        self.path_prompt.is_some()
    }
}

// Implement Default for Model to allow std::mem::take
impl Default for Model {
    fn default() -> Self {
        Self {
            store: DocumentStore::new(),
            viewer: ViewerPane::new(),
            editor: EditorPane::new(),
            focus: Focus::Viewer,
            help_visible: false,
            path_prompt: None,
            converting: false,
            loading_pdf: false,
            picker: None,
            images_enabled: true,
            config_global_path: None,
            config_local_path: None,
            terminal_size: (80, 24),
            should_quit: false,
            toast: None,
            requested: IntakeTicket::default(),
            applied: IntakeTicket::default(),
            tasks: Vec::new(),
        }
    }
}

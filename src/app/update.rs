use tracing::{debug, info, warn};

use crate::app::Model;
use crate::app::model::{Focus, IntakeRequest, Task, ToastLevel};
use crate::editor::EditorEdit;
use crate::intake::{IntakeError, IntakeTicket};
use crate::reference::{Selection, classify};
use crate::store::Conversion;
use crate::viewer::{LoadedPdf, RenderError};

/// All possible events and actions in the application.
///
/// These represent user input, completions of background work, and
/// terminal events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    // Viewer
    /// Go to the next PDF page
    NextPage,
    /// Go to the previous PDF page
    PrevPage,

    // Layout
    /// Show or hide the viewer pane
    ToggleViewer,
    /// Switch focus between viewer and editor
    SwitchFocus,
    /// Move focus back to the viewer
    FocusViewer,
    /// Toggle help overlay
    ToggleHelp,
    /// Hide help overlay
    HideHelp,

    // Intake
    /// Open the path prompt
    OpenPrompt,
    /// Update the path prompt text
    PromptInput(String),
    /// Open the path typed at the prompt
    SubmitPrompt,
    /// Close the prompt without opening anything
    CancelPrompt,
    /// Open a path directly (command line)
    OpenPath(String),
    /// Open the native file dialog
    OpenDialog,
    /// The picker finished
    FilePicked(IntakeTicket, Result<Option<String>, IntakeError>),
    /// OCR conversion of the active image finished
    MarkdownConverted(IntakeTicket, Result<Conversion, IntakeError>),
    /// The PDF renderer finished loading
    PdfLoaded(IntakeTicket, Result<LoadedPdf, RenderError>),

    // Editor
    /// Keyboard edit in the editor pane
    Edit(EditorEdit),
    /// Bracketed paste into the editor pane
    Paste(String),

    // Window
    /// Terminal resized
    Resize(u16, u16),
    /// Redraw screen
    Redraw,

    // Application
    /// Quit the application
    Quit,
}

impl Message {
    /// Short name for logs; completions can carry whole documents.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::NextPage => "next_page",
            Self::PrevPage => "prev_page",
            Self::ToggleViewer => "toggle_viewer",
            Self::SwitchFocus => "switch_focus",
            Self::FocusViewer => "focus_viewer",
            Self::ToggleHelp => "toggle_help",
            Self::HideHelp => "hide_help",
            Self::OpenPrompt => "open_prompt",
            Self::PromptInput(_) => "prompt_input",
            Self::SubmitPrompt => "submit_prompt",
            Self::CancelPrompt => "cancel_prompt",
            Self::OpenPath(_) => "open_path",
            Self::OpenDialog => "open_dialog",
            Self::FilePicked(..) => "file_picked",
            Self::MarkdownConverted(..) => "markdown_converted",
            Self::PdfLoaded(..) => "pdf_loaded",
            Self::Edit(_) => "edit",
            Self::Paste(_) => "paste",
            Self::Resize(..) => "resize",
            Self::Redraw => "redraw",
            Self::Quit => "quit",
        }
    }
}

/// Pure function that updates the model based on a message.
///
/// No side effects happen here. Background work is queued on the model as
/// [`Task`]s and started by the event loop afterwards.
pub fn update(mut model: Model, msg: Message) -> Model {
    match msg {
        Message::NextPage => model.viewer.next_page(),
        Message::PrevPage => model.viewer.prev_page(),

        Message::ToggleViewer => {
            model.store.toggle_viewer();
            if !model.store.viewer_visible() {
                model.focus = Focus::Editor;
            }
        }
        Message::SwitchFocus => {
            if model.store.viewer_visible() {
                model.focus = match model.focus {
                    Focus::Viewer => Focus::Editor,
                    Focus::Editor => Focus::Viewer,
                };
            }
        }
        Message::FocusViewer => {
            if model.store.viewer_visible() {
                model.focus = Focus::Viewer;
            }
        }
        Message::ToggleHelp => {
            model.help_visible = !model.help_visible;
        }
        Message::HideHelp => {
            model.help_visible = false;
        }

        Message::OpenPrompt => {
            model.path_prompt = Some(String::new());
        }
        Message::PromptInput(text) => {
            if model.path_prompt.is_some() {
                model.path_prompt = Some(text);
            }
        }
        Message::SubmitPrompt => {
            if let Some(path) = model.path_prompt.take() {
                model.begin_intake(IntakeRequest::Path(path));
            }
        }
        Message::CancelPrompt => {
            model.path_prompt = None;
        }
        Message::OpenPath(path) => {
            model.begin_intake(IntakeRequest::Path(path));
        }
        Message::OpenDialog => {
            model.begin_intake(IntakeRequest::Dialog);
        }
        Message::FilePicked(ticket, result) => apply_pick(&mut model, ticket, result),
        Message::MarkdownConverted(ticket, result) => {
            apply_conversion(&mut model, ticket, result);
        }
        Message::PdfLoaded(ticket, result) => apply_pdf_load(&mut model, ticket, result),

        Message::Edit(edit) => {
            if model.focus == Focus::Editor {
                let Model { editor, store, .. } = &mut model;
                editor.apply_edit(edit, store);
            }
        }
        Message::Paste(text) => {
            if model.focus == Focus::Editor {
                let Model { editor, store, .. } = &mut model;
                editor.paste(&text, store);
            }
        }

        Message::Resize(width, height) => {
            model.terminal_size = (width, height);
        }
        Message::Redraw => {}
        Message::Quit => {
            model.should_quit = true;
        }
    }
    model
}

fn apply_pick(model: &mut Model, ticket: IntakeTicket, result: Result<Option<String>, IntakeError>) {
    if !model.is_current_pick(ticket) {
        debug!(ticket = ticket.seq(), "discarding superseded file selection");
        return;
    }
    let picked = match result {
        Ok(picked) => picked,
        Err(err) => {
            warn!("file selection failed: {err}");
            model.show_toast(ToastLevel::Error, err.to_string());
            return;
        }
    };
    match classify(picked.as_deref()) {
        Selection::Cancelled => {
            info!("file selection cancelled");
        }
        Selection::Pdf(url) => {
            model.store.select_pdf(url.clone());
            model.mark_applied(ticket);
            model.viewer.sync_reference(&model.store);
            model.converting = false;
            model.loading_pdf = true;
            model.tasks.push(Task::LoadPdf(ticket, url));
        }
        Selection::Image(url) => {
            model.store.select_image(url.clone());
            model.mark_applied(ticket);
            model.viewer.sync_reference(&model.store);
            model.loading_pdf = false;
            model.converting = true;
            model.tasks.push(Task::Convert(ticket, url));
        }
    }
}

fn apply_conversion(
    model: &mut Model,
    ticket: IntakeTicket,
    result: Result<Conversion, IntakeError>,
) {
    if !model.is_current_document(ticket) {
        debug!(ticket = ticket.seq(), "discarding conversion for replaced document");
        return;
    }
    model.converting = false;
    match result {
        Ok(conversion) => {
            let lines = conversion.items.len();
            model.store.apply_conversion(conversion);
            model.editor.sync_from(&model.store);
            model.show_toast(ToastLevel::Info, format!("Converted {lines} lines"));
        }
        Err(err) => {
            warn!("conversion failed: {err}");
            model.show_toast(ToastLevel::Error, err.to_string());
        }
    }
}

fn apply_pdf_load(model: &mut Model, ticket: IntakeTicket, result: Result<LoadedPdf, RenderError>) {
    if !model.is_current_document(ticket) {
        debug!(ticket = ticket.seq(), "discarding PDF load for replaced document");
        return;
    }
    model.loading_pdf = false;
    match result {
        Ok(pdf) => model.viewer.on_pdf_loaded(pdf),
        Err(err) => {
            warn!("{err}");
            model.show_toast(ToastLevel::Error, err.to_string());
        }
    }
}

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::model::Focus;
use crate::app::{App, Message, Model};
use crate::editor::{Direction, EditorEdit};

use super::event_loop::ResizeDebouncer;

impl App {
    pub(super) fn handle_event(
        event: &Event,
        model: &Model,
        now_ms: u64,
        resize_debouncer: &mut ResizeDebouncer,
    ) -> Option<Message> {
        match event {
            Event::Key(key) if key.kind != KeyEventKind::Release => Self::handle_key(*key, model),
            Event::Paste(text) => Self::handle_paste(text, model),
            Event::Resize(w, h) => {
                crate::perf::log_event("event.resize.queue", format!("width={w} height={h}"));
                resize_debouncer.queue(*w, *h, now_ms);
                None
            }
            _ => None,
        }
    }

    pub(super) fn handle_paste(text: &str, model: &Model) -> Option<Message> {
        if let Some(current) = model.path_prompt.as_ref() {
            return Some(Message::PromptInput(format!("{current}{}", text.trim())));
        }
        if model.help_visible || model.focus != Focus::Editor {
            return None;
        }
        Some(Message::Paste(text.to_string()))
    }

    pub(super) fn handle_key(key: KeyEvent, model: &Model) -> Option<Message> {
        if model.help_visible {
            return Some(Message::HideHelp);
        }

        if let Some(current) = model.path_prompt.as_ref() {
            return Self::handle_prompt_key(key, current);
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('q') if ctrl => return Some(Message::Quit),
            KeyCode::Char('c') if ctrl => return Some(Message::Quit),
            KeyCode::Char('o') if ctrl => return Some(Message::OpenDialog),
            KeyCode::Tab => return Some(Message::SwitchFocus),
            KeyCode::F(1) => return Some(Message::ToggleHelp),
            _ => {}
        }

        match model.focus {
            Focus::Viewer => Self::handle_viewer_key(key),
            Focus::Editor => Self::handle_editor_key(key),
        }
    }

    fn handle_prompt_key(key: KeyEvent, current: &str) -> Option<Message> {
        match key.code {
            KeyCode::Esc => Some(Message::CancelPrompt),
            KeyCode::Enter => Some(Message::SubmitPrompt),
            KeyCode::Backspace => {
                let mut next = current.to_string();
                next.pop();
                Some(Message::PromptInput(next))
            }
            KeyCode::Char(c)
                if !key.modifiers.contains(KeyModifiers::CONTROL)
                    && !key.modifiers.contains(KeyModifiers::ALT) =>
            {
                let mut next = current.to_string();
                next.push(c);
                Some(Message::PromptInput(next))
            }
            _ => None,
        }
    }

    fn handle_viewer_key(key: KeyEvent) -> Option<Message> {
        match key.code {
            KeyCode::Char('n') | KeyCode::Right | KeyCode::PageDown | KeyCode::Char(' ') => {
                Some(Message::NextPage)
            }
            KeyCode::Char('p') | KeyCode::Left | KeyCode::PageUp => Some(Message::PrevPage),
            KeyCode::Char('v') => Some(Message::ToggleViewer),
            KeyCode::Char('o') => Some(Message::OpenPrompt),
            KeyCode::Char('e') | KeyCode::Enter => Some(Message::SwitchFocus),
            KeyCode::Char('q') => Some(Message::Quit),
            KeyCode::Char('?') => Some(Message::ToggleHelp),
            _ => None,
        }
    }

    fn handle_editor_key(key: KeyEvent) -> Option<Message> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let edit = match key.code {
            KeyCode::Char('v') if ctrl => return Some(Message::ToggleViewer),
            KeyCode::Esc => return Some(Message::FocusViewer),
            KeyCode::Char(c) if !ctrl && !key.modifiers.contains(KeyModifiers::ALT) => {
                EditorEdit::Insert(c)
            }
            KeyCode::Enter => EditorEdit::Newline,
            KeyCode::Backspace => EditorEdit::Backspace,
            KeyCode::Delete => EditorEdit::Delete,
            KeyCode::Up => EditorEdit::Move(Direction::Up),
            KeyCode::Down => EditorEdit::Move(Direction::Down),
            KeyCode::Left => EditorEdit::Move(Direction::Left),
            KeyCode::Right => EditorEdit::Move(Direction::Right),
            KeyCode::Home => EditorEdit::Home,
            KeyCode::End => EditorEdit::End,
            _ => return None,
        };
        Some(Message::Edit(edit))
    }
}

use ratatui::prelude::*;
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthStr;

use crate::app::{Focus, Model, ToastLevel};
use crate::viewer::ViewerContent;

/// Page indicator text, e.g. `Page 2 of 5`.
pub fn page_label(current: usize, total: usize) -> String {
    format!("Page {current} of {total}")
}

pub fn render_status_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let base = Style::default().bg(Color::DarkGray).fg(Color::White);
    let disabled = base.fg(Color::Gray).add_modifier(Modifier::DIM);

    let mut spans = vec![Span::raw(format!(
        " {} ",
        model.store.reference().display_name()
    ))];

    match model.viewer.content() {
        ViewerContent::Pdf { pager, .. } if pager.is_loaded() => {
            let prev_style = if pager.can_prev() { base } else { disabled };
            let next_style = if pager.can_next() { base } else { disabled };
            spans.push(Span::styled(" \u{25c0} p ", prev_style));
            spans.push(Span::raw(page_label(
                pager.current_page(),
                pager.total_pages(),
            )));
            spans.push(Span::styled(" n \u{25b6} ", next_style));
        }
        ViewerContent::Pdf { .. } if model.loading_pdf => {
            spans.push(Span::raw(" [loading]"));
        }
        _ => {}
    }

    if model.converting {
        spans.push(Span::raw(" [converting]"));
    }
    if !model.store.viewer_visible() {
        spans.push(Span::raw(" [editor only]"));
    }
    let focus = match model.focus {
        Focus::Viewer => "viewer",
        Focus::Editor => "editor",
    };
    spans.push(Span::raw(format!("  focus:{focus}  ?:help")));

    frame.render_widget(Paragraph::new(Line::from(spans)).style(base), area);
}

pub fn render_prompt_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let input = model.path_prompt.as_deref().unwrap_or_default();
    let prefix = "Open: ";
    let text = format!("{prefix}{input}  Enter: open  Esc: cancel");
    let bar = Paragraph::new(text).style(Style::default().bg(Color::Blue).fg(Color::White));
    frame.render_widget(bar, area);

    let cursor_x = area.x + u16::try_from(prefix.width() + input.width()).unwrap_or(area.width);
    if cursor_x < area.x + area.width {
        frame.set_cursor_position((cursor_x, area.y));
    }
}

pub fn render_toast_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let Some((message, level)) = model.active_toast() else {
        return;
    };
    let (prefix, style) = match level {
        ToastLevel::Info => (
            "[info]",
            Style::default().bg(Color::DarkGray).fg(Color::White),
        ),
        ToastLevel::Warning => (
            "[warn]",
            Style::default().bg(Color::Yellow).fg(Color::Black),
        ),
        ToastLevel::Error => ("[error]", Style::default().bg(Color::Red).fg(Color::White)),
    };
    let toast = Paragraph::new(format!("{prefix} {message}")).style(style);
    frame.render_widget(toast, area);
}

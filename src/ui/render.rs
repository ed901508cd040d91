use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Padding, Paragraph, Wrap};
use ratatui_image::protocol::StatefulProtocolType;
use ratatui_image::{Resize, StatefulImage};

use crate::app::{Focus, Model};
use crate::layout::split_panes;
use crate::viewer::ViewerContent;

use super::{overlays, status};

/// Render the complete UI.
pub fn render(model: &mut Model, frame: &mut Frame) {
    let area = frame.area();

    let footer_active = model.prompt_active() || model.active_toast().is_some();
    let footer_rows = 1 + u16::from(footer_active);
    let body = Rect {
        height: area.height.saturating_sub(footer_rows),
        ..area
    };

    let panes = split_panes(body, model.store.viewer_visible());
    if let Some(viewer_area) = panes.viewer {
        render_viewer(model, frame, viewer_area);
    }
    render_editor(model, frame, panes.editor);

    if footer_active {
        let footer_area = Rect {
            y: area.y + area.height.saturating_sub(2),
            height: 1,
            ..area
        };
        if model.prompt_active() {
            status::render_prompt_bar(model, frame, footer_area);
        } else {
            status::render_toast_bar(model, frame, footer_area);
        }
    }
    let status_area = Rect {
        y: area.y + area.height.saturating_sub(1),
        height: 1,
        ..area
    };
    status::render_status_bar(model, frame, status_area);

    if model.help_visible {
        overlays::render_help_overlay(model, frame, area);
    }
}

fn pane_block(title: String, focused: bool) -> Block<'static> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(if focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        })
}

fn render_viewer(model: &mut Model, frame: &mut Frame, area: Rect) {
    let reference = model.store.reference();
    let title = if reference.is_none() {
        "Viewer".to_string()
    } else {
        format!("Viewer: {}", reference.display_name())
    };
    let block = pane_block(title, model.focus == Focus::Viewer);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let dim = Style::default().fg(Color::DarkGray);
    if model.images_enabled {
        model.viewer.prepare_image(model.picker.as_ref());
    }
    let loading_pdf = model.loading_pdf;
    let images_enabled = model.images_enabled;

    match model.viewer.content_mut() {
        ViewerContent::Empty => {
            let hint = Paragraph::new(vec![
                Line::styled("No document", Style::default().add_modifier(Modifier::BOLD)),
                Line::raw(""),
                Line::styled("o       open a path", dim),
                Line::styled("Ctrl+O  open file dialog", dim),
            ])
            .block(Block::default().padding(Padding::uniform(1)));
            frame.render_widget(hint, inner);
        }
        ViewerContent::Pdf { pager, loaded } => {
            let text = match loaded {
                Some(pdf) => pdf
                    .page_text(pager.current_page())
                    .map_or_else(String::new, ToString::to_string),
                None if loading_pdf => "Loading...".to_string(),
                None => "PDF could not be loaded".to_string(),
            };
            let page = Paragraph::new(text)
                .wrap(Wrap { trim: false })
                .block(Block::default().padding(Padding::horizontal(1)));
            frame.render_widget(page, inner);
        }
        ViewerContent::Image(view) => {
            if let Some(err) = view.error() {
                let msg = Paragraph::new(format!("Image preview unavailable: {err}"))
                    .style(Style::default().fg(Color::Red))
                    .wrap(Wrap { trim: true });
                frame.render_widget(msg, inner);
                return;
            }
            let dimensions = view.dimensions();
            match view.protocol_mut() {
                Some(protocol) if images_enabled => {
                    let resize =
                        if matches!(protocol.protocol_type(), StatefulProtocolType::Halfblocks(_)) {
                            // Nearest-neighbor causes strong color aliasing in half-cell mode.
                            Resize::Fit(Some(image::imageops::FilterType::CatmullRom))
                        } else {
                            Resize::Fit(None)
                        };
                    frame.render_stateful_widget(
                        StatefulImage::default().resize(resize),
                        inner,
                        protocol,
                    );
                }
                _ => {
                    let label = dimensions.map_or_else(
                        || "[Image]".to_string(),
                        |(w, h)| format!("[Image {w}x{h}]"),
                    );
                    let placeholder = Paragraph::new(Line::styled(label, dim))
                        .block(Block::default().padding(Padding::uniform(1)));
                    frame.render_widget(placeholder, inner);
                }
            }
        }
    }
}

fn render_editor(model: &mut Model, frame: &mut Frame, area: Rect) {
    let focused = model.focus == Focus::Editor;
    let title = if model.converting {
        "Markdown (converting...)".to_string()
    } else {
        "Markdown".to_string()
    };
    let block = pane_block(title, focused);
    let inner = block.inner(area);
    frame.render_widget(Clear, area);
    frame.render_widget(block, area);

    if let Some(err) = model.editor.init_error() {
        let msg = Paragraph::new(format!("Editor unavailable: {err}"))
            .style(Style::default().fg(Color::Red))
            .wrap(Wrap { trim: true });
        frame.render_widget(msg, inner);
        return;
    }

    let Some(surface) = model.editor.surface_mut() else {
        return;
    };
    if surface.buffer().is_none() {
        frame.render_widget(Paragraph::new(surface.value()), inner);
        return;
    }
    let Some(buf) = surface.buffer_mut() else {
        return;
    };

    let visible_height = inner.height as usize;
    buf.follow_cursor(visible_height);

    let total_lines = buf.line_count();
    let gutter_width = line_number_width(total_lines) as usize;
    let start = buf.scroll();
    let end = (start + visible_height).min(total_lines);
    let cursor = buf.cursor();

    let mut content: Vec<Line> = Vec::new();
    for line_idx in start..end {
        let line_text = buf.line(line_idx).unwrap_or_default();
        let line_num = format!("{:>gutter_width$} ", line_idx + 1);
        let mut spans = vec![Span::styled(line_num, Style::default().fg(Color::DarkGray))];

        if focused && line_idx == cursor.line {
            let chars: Vec<char> = line_text.chars().collect();
            let col = cursor.col.min(chars.len());
            let before: String = chars[..col].iter().collect();
            let cursor_char = chars.get(col).map_or_else(|| " ".to_string(), char::to_string);
            let after: String = chars.iter().skip(col + 1).collect();

            if !before.is_empty() {
                spans.push(Span::raw(before));
            }
            spans.push(Span::styled(
                cursor_char,
                Style::default().bg(Color::White).fg(Color::Black),
            ));
            if !after.is_empty() {
                spans.push(Span::raw(after));
            }
        } else {
            spans.push(Span::raw(line_text));
        }
        content.push(Line::from(spans));
    }

    frame.render_widget(Paragraph::new(content), inner);
}

/// Calculate the width needed for line numbers.
pub const fn line_number_width(total_lines: usize) -> u16 {
    if total_lines < 10 {
        1
    } else if total_lines < 100 {
        2
    } else if total_lines < 1_000 {
        3
    } else if total_lines < 10_000 {
        4
    } else if total_lines < 100_000 {
        5
    } else {
        6
    }
}

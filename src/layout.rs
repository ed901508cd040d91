//! Split view vs editor-only layout.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

pub const VIEWER_WIDTH_PERCENT: u16 = 50;
pub const EDITOR_WIDTH_PERCENT: u16 = 50;

/// Where each pane goes for a given visibility flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaneAreas {
    pub viewer: Option<Rect>,
    pub editor: Rect,
}

/// Viewer and editor share the width half and half; with the viewer hidden
/// the editor takes all of it.
pub fn split_panes(area: Rect, viewer_visible: bool) -> PaneAreas {
    if !viewer_visible {
        return PaneAreas {
            viewer: None,
            editor: area,
        };
    }
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(VIEWER_WIDTH_PERCENT),
            Constraint::Percentage(EDITOR_WIDTH_PERCENT),
        ])
        .split(area);
    PaneAreas {
        viewer: Some(chunks[0]),
        editor: chunks[1],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::DocumentStore;

    #[test]
    fn test_split_gives_each_pane_half() {
        let panes = split_panes(Rect::new(0, 0, 100, 30), true);
        let viewer = panes.viewer.unwrap();
        assert_eq!(viewer.width, 50);
        assert_eq!(panes.editor.width, 50);
        assert_eq!(panes.editor.x, 50);
        assert_eq!(viewer.height, 30);
    }

    #[test]
    fn test_hidden_viewer_gives_editor_full_width() {
        let area = Rect::new(0, 0, 81, 20);
        let panes = split_panes(area, false);
        assert!(panes.viewer.is_none());
        assert_eq!(panes.editor, area);
    }

    #[test]
    fn test_odd_width_covers_whole_area() {
        let panes = split_panes(Rect::new(0, 0, 81, 20), true);
        assert_eq!(panes.viewer.unwrap().width + panes.editor.width, 81);
    }

    #[test]
    fn test_toggle_twice_restores_layout() {
        let area = Rect::new(0, 0, 120, 40);
        let mut store = DocumentStore::new();
        let before = split_panes(area, store.viewer_visible());
        store.toggle_viewer();
        assert_ne!(split_panes(area, store.viewer_visible()), before);
        store.toggle_viewer();
        assert_eq!(split_panes(area, store.viewer_visible()), before);
    }
}

//! Terminal UI.
//!
//! Draws the viewer and editor panes side by side (or the editor alone),
//! followed by the toast or prompt line and the status bar.

mod overlays;
mod render;
mod status;

pub use render::{line_number_width, render};
pub use status::page_label;

use ratatui_image::picker::Picker;
#[cfg(unix)]
use ratatui_image::picker::cap_parser::QueryStdioOptions;

#[cfg(unix)]
const PICKER_QUERY_TIMEOUT_MS: u64 = 250;

/// Create a picker for terminal image rendering.
///
/// The picker detects terminal capabilities and chooses the best protocol.
/// `force_half_cell` skips detection and uses Unicode half blocks.
pub fn create_picker(force_half_cell: bool) -> Option<Picker> {
    if force_half_cell {
        crate::perf::log_event("image.create_picker", "force_half_cell=true protocol=Halfblocks");
        return Some(Picker::halfblocks());
    }

    // Querying stdio on Windows consoles can leave a reader thread behind.
    #[cfg(not(unix))]
    {
        crate::perf::log_event("image.create_picker", "windows fallback protocol=Halfblocks");
        Some(Picker::halfblocks())
    }

    #[cfg(unix)]
    {
        let mut options = QueryStdioOptions::default();
        options.timeout = std::time::Duration::from_millis(PICKER_QUERY_TIMEOUT_MS);
        let picker = match Picker::from_query_stdio_with_options(options) {
            Ok(picker) => picker,
            Err(err) => {
                tracing::debug!("terminal image query failed: {err}");
                return Some(Picker::halfblocks());
            }
        };
        crate::perf::log_event(
            "image.create_picker",
            format!("protocol={:?}", picker.protocol_type()),
        );
        Some(picker)
    }
}

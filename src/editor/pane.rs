use tracing::{debug, trace, warn};

use super::{EditorEdit, EditorError, MarkdownSurface, SurfaceFactory};
use crate::store::DocumentStore;

/// Owns the embedded editing surface for as long as the pane is mounted.
///
/// The surface is released on [`EditorPane::unmount`] or when the pane is
/// dropped, whichever comes first.
#[derive(Default)]
pub struct EditorPane {
    surface: Option<Box<dyn MarkdownSurface>>,
    /// Store revision the surface was last synced from.
    synced_revision: u64,
    init_error: Option<EditorError>,
}

impl std::fmt::Debug for EditorPane {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorPane")
            .field("mounted", &self.surface.is_some())
            .field("synced_revision", &self.synced_revision)
            .field("init_error", &self.init_error)
            .finish()
    }
}

impl EditorPane {
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn is_mounted(&self) -> bool {
        self.surface.is_some()
    }

    pub const fn init_error(&self) -> Option<&EditorError> {
        self.init_error.as_ref()
    }

    pub fn surface(&self) -> Option<&dyn MarkdownSurface> {
        self.surface.as_deref()
    }

    pub fn surface_mut(&mut self) -> Option<&mut (dyn MarkdownSurface + 'static)> {
        self.surface.as_deref_mut()
    }

    /// Create the surface, seeded with the store's markdown.
    ///
    /// Mounting twice keeps the existing surface. A failed initialization
    /// leaves the pane unmounted and is remembered for display.
    ///
    /// # Errors
    ///
    /// Returns the factory's [`EditorError`] when the surface cannot be
    /// created.
    pub fn mount(
        &mut self,
        factory: &dyn SurfaceFactory,
        store: &DocumentStore,
    ) -> Result<(), EditorError> {
        if self.surface.is_some() {
            debug!("editor already mounted");
            return Ok(());
        }
        match factory.create(store.markdown()) {
            Ok(surface) => {
                self.surface = Some(surface);
                self.synced_revision = store.external_revision();
                self.init_error = None;
                debug!("editor mounted");
                Ok(())
            }
            Err(err) => {
                warn!("{err}");
                self.init_error = Some(err.clone());
                Err(err)
            }
        }
    }

    /// Push store markdown into the surface if it changed from outside the
    /// editor. Returns `true` when the surface was updated.
    pub fn sync_from(&mut self, store: &DocumentStore) -> bool {
        let Some(surface) = self.surface.as_mut() else {
            return false;
        };
        if store.external_revision() == self.synced_revision {
            return false;
        }
        surface.set_value(store.markdown());
        self.synced_revision = store.external_revision();
        debug!(revision = self.synced_revision, "editor synced from store");
        true
    }

    /// Apply a keyboard edit and write the resulting text back to the store.
    pub fn apply_edit(&mut self, edit: EditorEdit, store: &mut DocumentStore) -> bool {
        let Some(surface) = self.surface.as_mut() else {
            return false;
        };
        if !surface.edit(edit) {
            return false;
        }
        let text = surface.value();
        trace!(len = text.len(), "editor changed");
        store.apply_editor_text(text);
        true
    }

    /// Insert pasted text at the cursor. The store is written once for the
    /// whole paste; `\r\n` and lone `\r` become newlines.
    pub fn paste(&mut self, text: &str, store: &mut DocumentStore) -> bool {
        let Some(surface) = self.surface.as_mut() else {
            return false;
        };
        let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
        let mut changed = false;
        for ch in normalized.chars() {
            let edit = if ch == '\n' {
                EditorEdit::Newline
            } else {
                EditorEdit::Insert(ch)
            };
            changed |= surface.edit(edit);
        }
        if changed {
            let text = surface.value();
            trace!(len = text.len(), "editor changed by paste");
            store.apply_editor_text(text);
        }
        changed
    }

    /// Destroy the surface. Safe to call when not mounted.
    pub fn unmount(&mut self) {
        if let Some(mut surface) = self.surface.take() {
            surface.destroy();
            debug!("editor unmounted");
        }
    }
}

impl Drop for EditorPane {
    fn drop(&mut self) {
        self.unmount();
    }
}

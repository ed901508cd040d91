//! Viewer pane.
//!
//! Shows whatever the store's [`DocumentReference`] points at: a paginated
//! PDF or a single static image. Pagination state lives here and is rebuilt
//! whenever the reference changes.

mod pager;
mod pdf;

pub use pager::Pager;
pub use pdf::{AssetPaths, LoadedPdf, LopdfRenderer, PdfRenderer, RenderError, pdf_path};

use image::{DynamicImage, GenericImageView};
use ratatui_image::picker::Picker;
use ratatui_image::protocol::StatefulProtocol;
use tracing::{debug, warn};

use crate::reference::{DocumentReference, decode_data_url};
use crate::store::DocumentStore;

/// A decoded image ready for display.
pub struct ImageView {
    image: Option<DynamicImage>,
    protocol: Option<StatefulProtocol>,
    error: Option<String>,
}

impl ImageView {
    fn decode(url: &str) -> Self {
        let decoded = decode_data_url(url)
            .map_err(|err| err.to_string())
            .and_then(|bytes| image::load_from_memory(&bytes).map_err(|err| err.to_string()));
        match decoded {
            Ok(image) => Self {
                image: Some(image),
                protocol: None,
                error: None,
            },
            Err(err) => {
                warn!("image preview unavailable: {err}");
                Self {
                    image: None,
                    protocol: None,
                    error: Some(err),
                }
            }
        }
    }

    pub fn dimensions(&self) -> Option<(u32, u32)> {
        self.image.as_ref().map(GenericImageView::dimensions)
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub const fn protocol_mut(&mut self) -> Option<&mut StatefulProtocol> {
        self.protocol.as_mut()
    }
}

/// What the viewer is currently showing.
pub enum ViewerContent {
    Empty,
    Pdf {
        pager: Pager,
        loaded: Option<LoadedPdf>,
    },
    Image(ImageView),
}

pub struct ViewerPane {
    content: ViewerContent,
    reference_revision: u64,
}

impl std::fmt::Debug for ViewerPane {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match &self.content {
            ViewerContent::Empty => "empty",
            ViewerContent::Pdf { .. } => "pdf",
            ViewerContent::Image(_) => "image",
        };
        f.debug_struct("ViewerPane")
            .field("content", &kind)
            .field("reference_revision", &self.reference_revision)
            .finish_non_exhaustive()
    }
}

impl Default for ViewerPane {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewerPane {
    pub const fn new() -> Self {
        Self {
            content: ViewerContent::Empty,
            reference_revision: 0,
        }
    }

    pub const fn content(&self) -> &ViewerContent {
        &self.content
    }

    pub const fn content_mut(&mut self) -> &mut ViewerContent {
        &mut self.content
    }

    /// Rebuild local state if the store's reference was replaced.
    ///
    /// Returns `true` when the pane was rebuilt.
    pub fn sync_reference(&mut self, store: &DocumentStore) -> bool {
        if store.reference_revision() == self.reference_revision {
            return false;
        }
        self.reference_revision = store.reference_revision();
        self.content = match store.reference() {
            DocumentReference::None => ViewerContent::Empty,
            DocumentReference::Pdf(_) => ViewerContent::Pdf {
                pager: Pager::default(),
                loaded: None,
            },
            DocumentReference::Image(url) => ViewerContent::Image(ImageView::decode(url)),
        };
        debug!(revision = self.reference_revision, "viewer rebuilt");
        true
    }

    /// The renderer finished loading the current PDF.
    pub fn on_pdf_loaded(&mut self, pdf: LoadedPdf) {
        if let ViewerContent::Pdf { pager, loaded } = &mut self.content {
            pager.on_load_success(pdf.page_count());
            *loaded = Some(pdf);
        }
    }

    /// Pagination state, present only for PDFs.
    pub const fn pager(&self) -> Option<&Pager> {
        match &self.content {
            ViewerContent::Pdf { pager, .. } => Some(pager),
            _ => None,
        }
    }

    pub const fn next_page(&mut self) {
        if let ViewerContent::Pdf { pager, .. } = &mut self.content {
            pager.next_page();
        }
    }

    pub const fn prev_page(&mut self) {
        if let ViewerContent::Pdf { pager, .. } = &mut self.content {
            pager.prev_page();
        }
    }

    /// Text of the page currently shown, if the PDF has loaded.
    pub fn current_page_text(&self) -> Option<&str> {
        match &self.content {
            ViewerContent::Pdf {
                pager,
                loaded: Some(pdf),
            } => pdf.page_text(pager.current_page()),
            _ => None,
        }
    }

    /// Build the terminal image protocol for an image view.
    ///
    /// Done lazily before rendering since it needs the terminal picker.
    pub fn prepare_image(&mut self, picker: Option<&Picker>) {
        let Some(picker) = picker else { return };
        if let ViewerContent::Image(view) = &mut self.content
            && view.protocol.is_none()
            && let Some(image) = view.image.clone()
        {
            view.protocol = Some(picker.new_resize_protocol(image));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::encode_data_url;
    use image::{ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    fn png_data_url(width: u32, height: u32) -> String {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, Rgba([9, 9, 9, 255])));
        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png).unwrap();
        encode_data_url("image/png", &buf)
    }

    #[test]
    fn test_sync_is_noop_without_reference_change() {
        let store = DocumentStore::new();
        let mut viewer = ViewerPane::new();
        assert!(!viewer.sync_reference(&store));
        assert!(matches!(viewer.content(), ViewerContent::Empty));
    }

    #[test]
    fn test_pdf_reference_builds_unloaded_pager() {
        let mut store = DocumentStore::new();
        store.select_pdf("file:///doc.pdf");
        let mut viewer = ViewerPane::new();
        assert!(viewer.sync_reference(&store));
        let pager = viewer.pager().unwrap();
        assert!(!pager.is_loaded());
    }

    #[test]
    fn test_pdf_load_resets_pagination() {
        let mut store = DocumentStore::new();
        store.select_pdf("file:///doc.pdf");
        let mut viewer = ViewerPane::new();
        viewer.sync_reference(&store);
        viewer.on_pdf_loaded(LoadedPdf {
            pages: vec!["a".into(), "b".into(), "c".into()],
        });
        viewer.next_page();
        assert_eq!(viewer.current_page_text(), Some("b"));

        // Selecting another document rebuilds the pager.
        store.select_pdf("file:///other.pdf");
        viewer.sync_reference(&store);
        assert_eq!(viewer.pager().unwrap().current_page(), 0);
        assert_eq!(viewer.current_page_text(), None);
    }

    #[test]
    fn test_image_reference_has_no_pager() {
        let mut store = DocumentStore::new();
        store.select_image(png_data_url(4, 3));
        let mut viewer = ViewerPane::new();
        viewer.sync_reference(&store);
        assert!(viewer.pager().is_none());
        match viewer.content() {
            ViewerContent::Image(view) => assert_eq!(view.dimensions(), Some((4, 3))),
            _ => panic!("expected image content"),
        }
    }

    #[test]
    fn test_undecodable_image_keeps_error() {
        let mut store = DocumentStore::new();
        store.select_image("data:image/png;base64,iVBORw0KGgo=");
        let mut viewer = ViewerPane::new();
        viewer.sync_reference(&store);
        match viewer.content() {
            ViewerContent::Image(view) => {
                assert!(view.dimensions().is_none());
                assert!(view.error().is_some());
            }
            _ => panic!("expected image content"),
        }
    }

    #[test]
    fn test_prepare_image_builds_protocol_with_halfblocks() {
        let mut store = DocumentStore::new();
        store.select_image(png_data_url(2, 2));
        let mut viewer = ViewerPane::new();
        viewer.sync_reference(&store);
        let picker = Picker::halfblocks();
        viewer.prepare_image(Some(&picker));
        match viewer.content_mut() {
            ViewerContent::Image(view) => assert!(view.protocol_mut().is_some()),
            _ => panic!("expected image content"),
        }
    }

    #[test]
    fn test_navigation_ignored_for_images() {
        let mut store = DocumentStore::new();
        store.select_image(png_data_url(1, 1));
        let mut viewer = ViewerPane::new();
        viewer.sync_reference(&store);
        viewer.next_page();
        viewer.prev_page();
        assert!(viewer.pager().is_none());
    }
}

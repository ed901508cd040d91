//! Document state store.
//!
//! Single source of truth for the selected document, OCR output, markdown
//! text and viewer visibility. Everything that changes this state goes
//! through one of the named operations below.

use serde::{Deserialize, Serialize};

use crate::reference::DocumentReference;

/// One entry of raw OCR output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OcrResultItem {
    pub content: String,
    /// Corner points of the text region in image pixels, when the OCR
    /// engine reports them.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bbox: Vec<(u32, u32)>,
}

impl OcrResultItem {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            bbox: Vec::new(),
        }
    }
}

/// Output of a successful markdown conversion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Conversion {
    pub markdown: String,
    pub items: Vec<OcrResultItem>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentStore {
    reference: DocumentReference,
    ocr_items: Vec<OcrResultItem>,
    markdown: String,
    viewer_visible: bool,
    /// Bumped on every markdown write that did not come from the editor.
    external_revision: u64,
    /// Bumped whenever the reference is replaced.
    reference_revision: u64,
}

impl Default for DocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentStore {
    pub const fn new() -> Self {
        Self {
            reference: DocumentReference::None,
            ocr_items: Vec::new(),
            markdown: String::new(),
            viewer_visible: true,
            external_revision: 0,
            reference_revision: 0,
        }
    }

    #[must_use]
    pub const fn with_viewer_visible(mut self, visible: bool) -> Self {
        self.viewer_visible = visible;
        self
    }

    pub const fn reference(&self) -> &DocumentReference {
        &self.reference
    }

    pub fn ocr_items(&self) -> &[OcrResultItem] {
        &self.ocr_items
    }

    pub fn markdown(&self) -> &str {
        &self.markdown
    }

    pub const fn viewer_visible(&self) -> bool {
        self.viewer_visible
    }

    pub const fn external_revision(&self) -> u64 {
        self.external_revision
    }

    pub const fn reference_revision(&self) -> u64 {
        self.reference_revision
    }

    /// Replace the active reference with a PDF.
    pub fn select_pdf(&mut self, url: impl Into<String>) {
        self.replace_reference(DocumentReference::Pdf(url.into()));
    }

    /// Replace the active reference with an image.
    pub fn select_image(&mut self, url: impl Into<String>) {
        self.replace_reference(DocumentReference::Image(url.into()));
    }

    fn replace_reference(&mut self, reference: DocumentReference) {
        tracing::debug!(name = %reference.display_name(), "document reference replaced");
        self.reference = reference;
        self.reference_revision += 1;
    }

    /// Install a conversion result: markdown and OCR items are replaced
    /// together.
    pub fn apply_conversion(&mut self, conversion: Conversion) {
        self.ocr_items = conversion.items;
        self.markdown = conversion.markdown;
        self.external_revision += 1;
    }

    /// Record text produced by the editor surface itself.
    ///
    /// Does not bump the external revision, so the editor is not asked to
    /// re-sync its own edit.
    pub fn apply_editor_text(&mut self, text: String) {
        self.markdown = text;
    }

    pub const fn toggle_viewer(&mut self) {
        self.viewer_visible = !self.viewer_visible;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_store_is_empty_with_viewer_visible() {
        let store = DocumentStore::new();
        assert!(store.reference().is_none());
        assert!(store.ocr_items().is_empty());
        assert!(store.markdown().is_empty());
        assert!(store.viewer_visible());
    }

    #[test]
    fn test_selecting_image_clears_pdf() {
        let mut store = DocumentStore::new();
        store.select_pdf("file:///a.pdf");
        store.select_image("data:image/png;base64,AA==");
        assert!(store.reference().is_image());
        assert!(!store.reference().is_pdf());
        assert_eq!(store.reference_revision(), 2);
    }

    #[test]
    fn test_selecting_pdf_clears_image() {
        let mut store = DocumentStore::new();
        store.select_image("data:image/png;base64,AA==");
        store.select_pdf("file:///a.pdf");
        assert_eq!(
            store.reference(),
            &DocumentReference::Pdf("file:///a.pdf".to_string())
        );
    }

    #[test]
    fn test_apply_conversion_replaces_markdown_and_items() {
        let mut store = DocumentStore::new();
        store.apply_conversion(Conversion {
            markdown: "first".to_string(),
            items: vec![OcrResultItem::new("a"), OcrResultItem::new("b")],
        });
        store.apply_conversion(Conversion {
            markdown: "second".to_string(),
            items: vec![OcrResultItem::new("c")],
        });
        assert_eq!(store.markdown(), "second");
        assert_eq!(store.ocr_items(), &[OcrResultItem::new("c")]);
        assert_eq!(store.external_revision(), 2);
    }

    #[test]
    fn test_editor_text_does_not_bump_external_revision() {
        let mut store = DocumentStore::new();
        store.apply_editor_text("typed".to_string());
        assert_eq!(store.markdown(), "typed");
        assert_eq!(store.external_revision(), 0);
    }

    #[test]
    fn test_toggle_viewer_twice_restores() {
        let mut store = DocumentStore::new();
        store.toggle_viewer();
        assert!(!store.viewer_visible());
        store.toggle_viewer();
        assert!(store.viewer_visible());
    }

    #[test]
    fn test_ocr_item_serializes_content_field() {
        let json = serde_json::to_string(&OcrResultItem::new("hello")).unwrap();
        assert_eq!(json, r#"{"content":"hello"}"#);
    }

    #[test]
    fn test_ocr_item_bbox_round_trips_and_defaults() {
        let item = OcrResultItem {
            content: "total".to_string(),
            bbox: vec![(10, 20), (90, 20), (90, 40), (10, 40)],
        };
        let json = serde_json::to_string(&item).unwrap();
        assert_eq!(
            json,
            r#"{"content":"total","bbox":[[10,20],[90,20],[90,40],[10,40]]}"#
        );
        assert_eq!(serde_json::from_str::<OcrResultItem>(&json).unwrap(), item);

        let bare: OcrResultItem = serde_json::from_str(r#"{"content":"x"}"#).unwrap();
        assert!(bare.bbox.is_empty());
    }
}

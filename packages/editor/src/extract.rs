use funnel_document::{EditorDocument, Page, DOCUMENT_VERSION};

/// Build the serializable document for a draft save.
///
/// Pure: the result is a deep copy, so later store edits never reach a
/// document that is already on its way to storage.
pub fn extract_document(pages: &[Page], active_page_id: Option<&str>) -> EditorDocument {
    EditorDocument {
        version: DOCUMENT_VERSION,
        pages: pages.to_vec(),
        active_page_id: active_page_id.map(str::to_string),
    }
}

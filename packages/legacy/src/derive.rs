use crate::{LegacyContent, LegacyError, LegacySnapshotPayload, LegacyStep};
use funnel_document::{EditorDocument, Node, NodeKind, NodeType, Page, PageType};

/// Project a tree document onto the flat step list.
///
/// Pages are walked in order; pages with a custom type are not steps and
/// are skipped. Returns `None` when no page qualifies.
///
/// Pages hydrated from legacy steps carry their stored `order_index` and
/// `step_type`. The indexes are written back as long as they still
/// increase strictly in page order; otherwise every step is renumbered
/// from 0. A stored `step_type` is written back while it still classifies
/// as the page's current type.
pub fn derive_legacy_payload_from_document(doc: &EditorDocument) -> Option<LegacySnapshotPayload> {
    let pages: Vec<&Page> = doc
        .pages
        .iter()
        .filter(|page| {
            if page.page_type.is_custom() {
                tracing::debug!(page_id = %page.id, page_type = %page.page_type, "Skipping unclassifiable page");
                return false;
            }
            true
        })
        .collect();

    if pages.is_empty() {
        return None;
    }

    let stored_order = stored_order_indexes(&pages);
    if stored_order.is_none() {
        tracing::debug!("Renumbering legacy steps from 0");
    }

    let steps = pages
        .iter()
        .enumerate()
        .map(|(position, page)| LegacyStep {
            id: page.id.clone(),
            order_index: stored_order
                .as_ref()
                .map_or(position as u32, |order| order[position]),
            step_type: step_type_for(page),
            content: extract_content(&page.canvas_root),
        })
        .collect();

    Some(LegacySnapshotPayload::new(steps))
}

// Stored indexes, only when every page has one and they strictly increase.
fn stored_order_indexes(pages: &[&Page]) -> Option<Vec<u32>> {
    let order: Vec<u32> = pages
        .iter()
        .map(|page| page.legacy_origin.as_ref().map(|origin| origin.order_index))
        .collect::<Option<_>>()?;

    order.windows(2).all(|pair| pair[0] < pair[1]).then_some(order)
}

fn step_type_for(page: &Page) -> String {
    match &page.legacy_origin {
        Some(origin) if PageType::from(origin.step_type.as_str()) == page.page_type => {
            origin.step_type.clone()
        }
        _ => page.page_type.to_string(),
    }
}

/// Like [`derive_legacy_payload_from_document`], for callers that must have a payload
pub fn require_legacy_payload(doc: &EditorDocument) -> Result<LegacySnapshotPayload, LegacyError> {
    derive_legacy_payload_from_document(doc).ok_or(LegacyError::NoClassifiableSteps)
}

/// Each field comes from the first node of its type, pre-order
fn extract_content(root: &Node) -> LegacyContent {
    let mut content = LegacyContent::default();

    if let Some(NodeKind::Heading(props)) = first_kind(root, NodeType::Heading) {
        content.headline = props.headline.clone();
    }
    if let Some(NodeKind::Paragraph(props)) = first_kind(root, NodeType::Paragraph) {
        content.subheadline = props.text.clone();
    }
    if let Some(NodeKind::OptionGrid(props)) = first_kind(root, NodeType::OptionGrid) {
        content.question = props.question.clone();
        content.options = props.options.iter().map(|o| o.label.clone()).collect();
    }
    if let Some(NodeKind::Video(props)) = first_kind(root, NodeType::Video) {
        content.media_url = props.url.clone();
    }
    if let Some(NodeKind::Calendar(props)) = first_kind(root, NodeType::Calendar) {
        content.calendar_url = props.url.clone();
    }
    if let Some(NodeKind::Button(props)) = first_kind(root, NodeType::Button) {
        content.button_label = props.label.clone();
    }

    content
}

fn first_kind(root: &Node, node_type: NodeType) -> Option<&NodeKind> {
    root.find_first(node_type).map(|node| &node.kind)
}

use crate::{LegacyContent, LegacyStep};
use funnel_document::{
    instantiate_page, ButtonProps, CalendarProps, ChoiceOption, EditorDocument, HeadingProps,
    IdGenerator, LegacyOrigin, Node, NodeKind, NodeType, OptionGridProps, Page, ParagraphProps,
    TemplateCatalog, VideoProps,
};
use std::collections::HashSet;

/// Build a tree document from flat legacy steps.
///
/// One page per step, ordered by `order_index`. Each page starts from the
/// default template of the step's type (the blank template for types the
/// vocabulary does not know) and the step's content is written into the
/// matching nodes. Each page remembers the step's `order_index` and
/// `step_type` spelling as its [`LegacyOrigin`].
pub fn create_legacy_editor_document(steps: &[LegacyStep], ids: &mut IdGenerator) -> EditorDocument {
    let catalog = TemplateCatalog::builtin();

    let mut ordered: Vec<&LegacyStep> = steps.iter().collect();
    ordered.sort_by_key(|step| step.order_index);

    let mut used_ids = HashSet::new();
    let pages = ordered
        .into_iter()
        .map(|step| {
            let page = hydrate_step(step, &catalog, ids);
            claim_page_id(page, step, &mut used_ids)
        })
        .collect();

    EditorDocument::new(pages)
}

fn hydrate_step(step: &LegacyStep, catalog: &TemplateCatalog, ids: &mut IdGenerator) -> Page {
    let page_type = step.page_type();
    let template = if page_type.is_custom() {
        tracing::warn!(
            step_id = %step.id,
            step_type = %step.step_type,
            "Unrecognized legacy step type, using blank template"
        );
        catalog.blank()
    } else {
        catalog.default_for(&page_type)
    };

    let mut page = instantiate_page(template, ids);
    page.page_type = page_type;
    page.legacy_origin = Some(LegacyOrigin {
        order_index: step.order_index,
        step_type: step.step_type.clone(),
    });
    write_content(&mut page.canvas_root, &step.content, ids);
    page
}

// Keep the legacy step id so the forward adapter reproduces it.
fn claim_page_id(mut page: Page, step: &LegacyStep, used_ids: &mut HashSet<String>) -> Page {
    if !step.id.is_empty() && used_ids.insert(step.id.clone()) {
        page.id = step.id.clone();
    } else {
        tracing::warn!(
            step_id = %step.id,
            page_id = %page.id,
            "Legacy step id is empty or repeated, using a generated id"
        );
    }
    page
}

fn write_content(root: &mut Node, content: &LegacyContent, ids: &mut IdGenerator) {
    write_field(root, ids, NodeType::Heading, content.headline.is_some(), |kind| {
        if let NodeKind::Heading(HeadingProps { headline, .. }) = kind {
            *headline = content.headline.clone();
        }
    });

    write_field(root, ids, NodeType::Paragraph, content.subheadline.is_some(), |kind| {
        if let NodeKind::Paragraph(ParagraphProps { text, .. }) = kind {
            *text = content.subheadline.clone();
        }
    });

    let options: Vec<ChoiceOption> = content
        .options
        .iter()
        .map(|label| ChoiceOption::new(ids.new_id("option"), label.clone()))
        .collect();
    let has_question = content.question.is_some() || !options.is_empty();
    write_field(root, ids, NodeType::OptionGrid, has_question, |kind| {
        if let NodeKind::OptionGrid(OptionGridProps {
            question,
            options: slot,
            ..
        }) = kind
        {
            *question = content.question.clone();
            *slot = options;
        }
    });

    write_field(root, ids, NodeType::Video, content.media_url.is_some(), |kind| {
        if let NodeKind::Video(VideoProps { url, .. }) = kind {
            *url = content.media_url.clone();
        }
    });

    write_field(root, ids, NodeType::Calendar, content.calendar_url.is_some(), |kind| {
        if let NodeKind::Calendar(CalendarProps { url, .. }) = kind {
            *url = content.calendar_url.clone();
        }
    });

    write_field(root, ids, NodeType::Button, content.button_label.is_some(), |kind| {
        if let NodeKind::Button(ButtonProps { label, .. }) = kind {
            *label = content.button_label.clone();
        }
    });
}

/// Write a field into the first node of `node_type`. When the template has
/// no such node and the field carries a value, a node is appended to the
/// first section so the value is not lost.
fn write_field<F>(root: &mut Node, ids: &mut IdGenerator, node_type: NodeType, present: bool, write: F)
where
    F: FnOnce(&mut NodeKind),
{
    if let Some(node) = root.find_first_mut(node_type) {
        write(&mut node.kind);
        return;
    }
    if !present {
        return;
    }

    let mut kind = NodeKind::empty(node_type);
    write(&mut kind);
    let node = Node::new(ids.new_id(node_type.as_str()), kind);

    let parent_id = root
        .find_first(NodeType::Section)
        .map(|section| section.id.clone())
        .unwrap_or_else(|| root.id.clone());

    if let Err(e) = root.insert_child(&parent_id, usize::MAX, node) {
        tracing::warn!(
            node_type = node_type.as_str(),
            error = %e,
            "Could not place legacy content field"
        );
    }
}

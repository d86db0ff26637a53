//! # Template Factory
//!
//! Builds fresh page trees from a closed catalog of named templates.
//!
//! A [`NodeTemplate`] is a blueprint without ids. Every call to
//! [`create_nodes`] deep-copies the blueprint and draws brand new ids, so a
//! template can be instantiated any number of times without two nodes ever
//! sharing an id or a subtree.

use crate::{
    ButtonProps, CalendarProps, ChoiceOption, ContainerProps, EditorDocument, HeadingProps,
    IdGenerator, InputProps, Node, NodeKind, OptionGridProps, Page, PageType, ParagraphProps,
    VideoProps,
};

/// Name of the generic fallback template
pub const BLANK_TEMPLATE: &str = "blank";

/// Id-less blueprint of a subtree
#[derive(Debug, Clone, PartialEq)]
pub struct NodeTemplate {
    pub kind: NodeKind,
    pub children: Vec<NodeTemplate>,
}

impl NodeTemplate {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            children: Vec::new(),
        }
    }

    pub fn child(mut self, child: NodeTemplate) -> Self {
        self.children.push(child);
        self
    }
}

/// Instantiate a blueprint with all-new ids
pub fn create_nodes(template: &NodeTemplate, ids: &mut IdGenerator) -> Node {
    let id = ids.new_id(template.kind.type_name());
    Node {
        id,
        kind: fresh_kind(&template.kind, ids),
        children: template
            .children
            .iter()
            .map(|child| create_nodes(child, ids))
            .collect(),
    }
}

/// Deep copy of an existing subtree with all-new ids
pub fn clone_with_fresh_ids(node: &Node, ids: &mut IdGenerator) -> Node {
    let id = ids.new_id(node.kind.type_name());
    Node {
        id,
        kind: fresh_kind(&node.kind, ids),
        children: node
            .children
            .iter()
            .map(|child| clone_with_fresh_ids(child, ids))
            .collect(),
    }
}

// Option ids are identities too.
fn fresh_kind(kind: &NodeKind, ids: &mut IdGenerator) -> NodeKind {
    match kind {
        NodeKind::OptionGrid(props) => {
            let mut props = props.clone();
            for option in &mut props.options {
                option.id = ids.new_id("option");
            }
            NodeKind::OptionGrid(props)
        }
        other => other.clone(),
    }
}

/// Named page template, tagged with the page type it produces
#[derive(Debug, Clone)]
pub struct PageTemplate {
    pub name: &'static str,
    pub label: &'static str,
    pub category: PageType,
    pub page_name: &'static str,
    pub root: NodeTemplate,
}

/// The closed set of page templates
#[derive(Debug, Clone)]
pub struct TemplateCatalog {
    templates: Vec<PageTemplate>,
    blank: PageTemplate,
}

impl TemplateCatalog {
    pub fn builtin() -> Self {
        Self {
            templates: vec![
                PageTemplate {
                    name: "welcome-hero",
                    label: "Welcome with video",
                    category: PageType::Welcome,
                    page_name: "Welcome",
                    root: page_root(vec![
                        heading("Welcome"),
                        paragraph("Tell visitors what they are about to get"),
                        NodeTemplate::new(NodeKind::Video(VideoProps::default())),
                        button("Get started"),
                    ]),
                },
                PageTemplate {
                    name: "welcome-minimal",
                    label: "Welcome",
                    category: PageType::Welcome,
                    page_name: "Welcome",
                    root: page_root(vec![
                        heading("Welcome"),
                        paragraph("Tell visitors what they are about to get"),
                        button("Get started"),
                    ]),
                },
                PageTemplate {
                    name: "question-options",
                    label: "Multiple choice question",
                    category: PageType::Question,
                    page_name: "Question",
                    root: page_root(vec![
                        heading("Quick question"),
                        option_grid(
                            "Which option describes you best?",
                            &["Option A", "Option B", "Option C"],
                        ),
                        button("Continue"),
                    ]),
                },
                PageTemplate {
                    name: "capture-contact",
                    label: "Contact details",
                    category: PageType::Question,
                    page_name: "Your details",
                    root: page_root(vec![
                        heading("Where should we reach you?"),
                        NodeTemplate::new(NodeKind::TextInput(input("Name", "name"))),
                        NodeTemplate::new(NodeKind::EmailInput(input("Email", "email"))),
                        NodeTemplate::new(NodeKind::PhoneInput(input("Phone", "phone"))),
                        button("Submit"),
                    ]),
                },
                PageTemplate {
                    name: "booking-calendar",
                    label: "Book a call",
                    category: PageType::Booking,
                    page_name: "Booking",
                    root: page_root(vec![
                        heading("Book your call"),
                        paragraph("Pick a time that works for you"),
                        NodeTemplate::new(NodeKind::Calendar(CalendarProps::default())),
                    ]),
                },
                PageTemplate {
                    name: "thank-you",
                    label: "Thank you",
                    category: PageType::ThankYou,
                    page_name: "Thank you",
                    root: page_root(vec![
                        heading("You're all set"),
                        paragraph("We'll be in touch shortly"),
                    ]),
                },
            ],
            blank: PageTemplate {
                name: BLANK_TEMPLATE,
                label: "Blank page",
                category: PageType::Custom(BLANK_TEMPLATE.to_string()),
                page_name: "Page",
                root: page_root(Vec::new()),
            },
        }
    }

    pub fn get(&self, name: &str) -> Option<&PageTemplate> {
        self.iter().find(|t| t.name == name)
    }

    /// First template of a category, or the blank template
    pub fn default_for(&self, page_type: &PageType) -> &PageTemplate {
        self.templates
            .iter()
            .find(|t| &t.category == page_type)
            .unwrap_or(&self.blank)
    }

    pub fn blank(&self) -> &PageTemplate {
        &self.blank
    }

    pub fn iter(&self) -> impl Iterator<Item = &PageTemplate> {
        self.templates.iter().chain(std::iter::once(&self.blank))
    }
}

impl Default for TemplateCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Create a page from a template
pub fn instantiate_page(template: &PageTemplate, ids: &mut IdGenerator) -> Page {
    Page::new(
        ids.new_id("page"),
        template.page_name,
        template.category.clone(),
        create_nodes(&template.root, ids),
    )
}

/// Document for a funnel opened for the first time: one welcome page
pub fn default_document(ids: &mut IdGenerator) -> EditorDocument {
    let catalog = TemplateCatalog::builtin();
    let page = instantiate_page(catalog.default_for(&PageType::Welcome), ids);
    EditorDocument::new(vec![page])
}

fn page_root(content: Vec<NodeTemplate>) -> NodeTemplate {
    let section = content
        .into_iter()
        .fold(NodeTemplate::new(NodeKind::Section(ContainerProps::default())), NodeTemplate::child);
    NodeTemplate::new(NodeKind::Frame(ContainerProps::default())).child(section)
}

fn heading(text: &str) -> NodeTemplate {
    NodeTemplate::new(NodeKind::Heading(HeadingProps {
        headline: Some(text.to_string()),
        level: Some(1),
        ..Default::default()
    }))
}

fn paragraph(text: &str) -> NodeTemplate {
    NodeTemplate::new(NodeKind::Paragraph(ParagraphProps {
        text: Some(text.to_string()),
        ..Default::default()
    }))
}

fn button(label: &str) -> NodeTemplate {
    NodeTemplate::new(NodeKind::Button(ButtonProps {
        label: Some(label.to_string()),
        ..Default::default()
    }))
}

fn input(label: &str, field_name: &str) -> InputProps {
    InputProps {
        label: Some(label.to_string()),
        field_name: Some(field_name.to_string()),
        required: Some(true),
        ..Default::default()
    }
}

fn option_grid(question: &str, labels: &[&str]) -> NodeTemplate {
    NodeTemplate::new(NodeKind::OptionGrid(OptionGridProps {
        question: Some(question.to_string()),
        options: labels
            .iter()
            .map(|label| ChoiceOption::new(String::new(), *label))
            .collect(),
        ..Default::default()
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NodeType;
    use std::collections::HashSet;

    #[test]
    fn test_repeated_instantiation_never_reuses_ids() {
        let catalog = TemplateCatalog::builtin();
        let template = catalog.get("question-options").unwrap();
        let mut ids = IdGenerator::from_seed("t");

        let a = instantiate_page(template, &mut ids);
        let b = instantiate_page(template, &mut ids);

        let mut seen = HashSet::new();
        for id in a.canvas_root.ids().into_iter().chain(b.canvas_root.ids()) {
            assert!(seen.insert(id.clone()), "duplicate id {}", id);
        }
        assert_ne!(a.id, b.id);

        // Same shape, different identities
        assert_eq!(a.canvas_root.children.len(), b.canvas_root.children.len());
    }

    #[test]
    fn test_option_ids_are_generated() {
        let catalog = TemplateCatalog::builtin();
        let mut ids = IdGenerator::from_seed("t");
        let page = instantiate_page(catalog.get("question-options").unwrap(), &mut ids);

        let grid = page.canvas_root.find_first(NodeType::OptionGrid).unwrap();
        match &grid.kind {
            NodeKind::OptionGrid(props) => {
                assert_eq!(props.options.len(), 3);
                assert!(props.options.iter().all(|o| o.id.starts_with("option-t-")));
            }
            other => panic!("expected option grid, got {:?}", other),
        }
    }

    #[test]
    fn test_default_for_every_category() {
        let catalog = TemplateCatalog::builtin();

        assert_eq!(catalog.default_for(&PageType::Welcome).name, "welcome-hero");
        assert_eq!(catalog.default_for(&PageType::Question).name, "question-options");
        assert_eq!(catalog.default_for(&PageType::Booking).name, "booking-calendar");
        assert_eq!(catalog.default_for(&PageType::ThankYou).name, "thank-you");
        assert_eq!(
            catalog.default_for(&PageType::Custom("upsell".to_string())).name,
            BLANK_TEMPLATE
        );
        assert!(catalog.get(BLANK_TEMPLATE).is_some());
    }

    #[test]
    fn test_clone_with_fresh_ids_keeps_props() {
        let mut ids = IdGenerator::from_seed("t");
        let original = create_nodes(&page_root(vec![heading("Hi")]), &mut ids);
        let copy = clone_with_fresh_ids(&original, &mut ids);

        assert_ne!(original.id, copy.id);
        let a = original.find_first(NodeType::Heading).unwrap();
        let b = copy.find_first(NodeType::Heading).unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(a.kind, b.kind);
    }

    #[test]
    fn test_default_document_has_one_active_page() {
        let doc = default_document(&mut IdGenerator::from_seed("t"));

        assert_eq!(doc.pages.len(), 1);
        assert_eq!(doc.pages[0].page_type, PageType::Welcome);
        assert_eq!(doc.active_page_id.as_deref(), Some(doc.pages[0].id.as_str()));
        assert!(doc.validate().is_ok());
    }
}

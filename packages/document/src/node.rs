//! # Nodes
//!
//! A [`Node`] is one typed element of a page's visual tree. Its props are a
//! tagged union keyed by the node type: every known type decodes into its
//! own props struct, and anything else is kept verbatim in
//! [`NodeKind::Unknown`] so documents written by newer builders survive a
//! load/save cycle.
//!
//! On the wire a node is always `{id, type, props, children}`.

use crate::visitor::{IdCollector, Visitor};
use crate::DocumentError;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

/// Open key/value bag, as stored on the wire
pub type Props = Map<String, Value>;

/// Closed vocabulary of node types this engine understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    Frame,
    Section,
    Heading,
    Paragraph,
    Button,
    TextInput,
    EmailInput,
    PhoneInput,
    OptionGrid,
    Video,
    Calendar,
}

impl NodeType {
    pub const ALL: [NodeType; 11] = [
        NodeType::Frame,
        NodeType::Section,
        NodeType::Heading,
        NodeType::Paragraph,
        NodeType::Button,
        NodeType::TextInput,
        NodeType::EmailInput,
        NodeType::PhoneInput,
        NodeType::OptionGrid,
        NodeType::Video,
        NodeType::Calendar,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            NodeType::Frame => "frame",
            NodeType::Section => "section",
            NodeType::Heading => "heading",
            NodeType::Paragraph => "paragraph",
            NodeType::Button => "button",
            NodeType::TextInput => "text_input",
            NodeType::EmailInput => "email_input",
            NodeType::PhoneInput => "phone_input",
            NodeType::OptionGrid => "option_grid",
            NodeType::Video => "video",
            NodeType::Calendar => "calendar",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == value)
    }

    /// Whether nodes of this type may hold children
    pub fn is_container(self) -> bool {
        matches!(self, NodeType::Frame | NodeType::Section)
    }
}

/// Props shared by frames and sections
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerProps {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,

    #[serde(flatten)]
    pub extra: Props,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadingProps {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headline: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<u8>,

    #[serde(flatten)]
    pub extra: Props,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParagraphProps {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(flatten)]
    pub extra: Props,
}

/// Call-to-action button
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ButtonProps {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(flatten)]
    pub extra: Props,
}

/// Props for text, email and phone inputs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputProps {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,

    #[serde(flatten)]
    pub extra: Props,
}

/// One selectable answer in an option grid
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChoiceOption {
    #[serde(default)]
    pub id: String,
    pub label: String,

    #[serde(flatten)]
    pub extra: Props,
}

impl ChoiceOption {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            extra: Props::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionGridProps {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,

    #[serde(default)]
    pub options: Vec<ChoiceOption>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multi_select: Option<bool>,

    #[serde(flatten)]
    pub extra: Props,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoProps {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub autoplay: Option<bool>,

    #[serde(flatten)]
    pub extra: Props,
}

/// Embedded booking calendar
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarProps {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,

    #[serde(flatten)]
    pub extra: Props,
}

/// Node type together with its typed props
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Frame(ContainerProps),
    Section(ContainerProps),
    Heading(HeadingProps),
    Paragraph(ParagraphProps),
    Button(ButtonProps),
    TextInput(InputProps),
    EmailInput(InputProps),
    PhoneInput(InputProps),
    OptionGrid(OptionGridProps),
    Video(VideoProps),
    Calendar(CalendarProps),

    /// A type this engine does not know, kept as raw data
    Unknown { node_type: String, props: Props },
}

impl NodeKind {
    pub fn node_type(&self) -> Option<NodeType> {
        Some(match self {
            NodeKind::Frame(_) => NodeType::Frame,
            NodeKind::Section(_) => NodeType::Section,
            NodeKind::Heading(_) => NodeType::Heading,
            NodeKind::Paragraph(_) => NodeType::Paragraph,
            NodeKind::Button(_) => NodeType::Button,
            NodeKind::TextInput(_) => NodeType::TextInput,
            NodeKind::EmailInput(_) => NodeType::EmailInput,
            NodeKind::PhoneInput(_) => NodeType::PhoneInput,
            NodeKind::OptionGrid(_) => NodeType::OptionGrid,
            NodeKind::Video(_) => NodeType::Video,
            NodeKind::Calendar(_) => NodeType::Calendar,
            NodeKind::Unknown { .. } => return None,
        })
    }

    /// Wire name of the node type
    pub fn type_name(&self) -> &str {
        match self {
            NodeKind::Unknown { node_type, .. } => node_type.as_str(),
            _ => self.node_type().map(NodeType::as_str).unwrap_or_default(),
        }
    }

    /// Unknown nodes may hold children, since we cannot tell otherwise.
    pub fn is_container(&self) -> bool {
        self.node_type().map(NodeType::is_container).unwrap_or(true)
    }

    /// Empty props for a known type
    pub fn empty(node_type: NodeType) -> Self {
        match node_type {
            NodeType::Frame => NodeKind::Frame(ContainerProps::default()),
            NodeType::Section => NodeKind::Section(ContainerProps::default()),
            NodeType::Heading => NodeKind::Heading(HeadingProps::default()),
            NodeType::Paragraph => NodeKind::Paragraph(ParagraphProps::default()),
            NodeType::Button => NodeKind::Button(ButtonProps::default()),
            NodeType::TextInput => NodeKind::TextInput(InputProps::default()),
            NodeType::EmailInput => NodeKind::EmailInput(InputProps::default()),
            NodeType::PhoneInput => NodeKind::PhoneInput(InputProps::default()),
            NodeType::OptionGrid => NodeKind::OptionGrid(OptionGridProps::default()),
            NodeType::Video => NodeKind::Video(VideoProps::default()),
            NodeType::Calendar => NodeKind::Calendar(CalendarProps::default()),
        }
    }

    /// Strictly decode props for a known type
    pub fn decode(node_type: NodeType, props: Props) -> Result<Self, serde_json::Error> {
        let value = Value::Object(props);

        Ok(match node_type {
            NodeType::Frame => NodeKind::Frame(serde_json::from_value(value)?),
            NodeType::Section => NodeKind::Section(serde_json::from_value(value)?),
            NodeType::Heading => NodeKind::Heading(serde_json::from_value(value)?),
            NodeType::Paragraph => NodeKind::Paragraph(serde_json::from_value(value)?),
            NodeType::Button => NodeKind::Button(serde_json::from_value(value)?),
            NodeType::TextInput => NodeKind::TextInput(serde_json::from_value(value)?),
            NodeType::EmailInput => NodeKind::EmailInput(serde_json::from_value(value)?),
            NodeType::PhoneInput => NodeKind::PhoneInput(serde_json::from_value(value)?),
            NodeType::OptionGrid => NodeKind::OptionGrid(serde_json::from_value(value)?),
            NodeType::Video => NodeKind::Video(serde_json::from_value(value)?),
            NodeType::Calendar => NodeKind::Calendar(serde_json::from_value(value)?),
        })
    }

    /// Decode raw wire data, never losing it.
    ///
    /// Props that do not fit the typed shape of a known type are kept as
    /// [`NodeKind::Unknown`].
    pub fn from_raw(node_type: &str, props: Props) -> Self {
        let Some(known) = NodeType::parse(node_type) else {
            return NodeKind::Unknown {
                node_type: node_type.to_string(),
                props,
            };
        };

        match Self::decode(known, props.clone()) {
            Ok(kind) => kind,
            Err(e) => {
                tracing::warn!(node_type, error = %e, "Props do not match node type, keeping raw data");
                NodeKind::Unknown {
                    node_type: node_type.to_string(),
                    props,
                }
            }
        }
    }

    /// Props as a raw key/value bag
    pub fn props(&self) -> Props {
        match self {
            NodeKind::Frame(p) | NodeKind::Section(p) => encode(p),
            NodeKind::Heading(p) => encode(p),
            NodeKind::Paragraph(p) => encode(p),
            NodeKind::Button(p) => encode(p),
            NodeKind::TextInput(p) | NodeKind::EmailInput(p) | NodeKind::PhoneInput(p) => encode(p),
            NodeKind::OptionGrid(p) => encode(p),
            NodeKind::Video(p) => encode(p),
            NodeKind::Calendar(p) => encode(p),
            NodeKind::Unknown { props, .. } => props.clone(),
        }
    }

    /// Shallow-merge `partial` into the props.
    ///
    /// Returns whether anything changed. On a typed decode failure the props
    /// are left untouched.
    pub fn merge_props(&mut self, partial: &Props) -> Result<bool, DocumentError> {
        let mut props = self.props();
        for (key, value) in partial {
            props.insert(key.clone(), value.clone());
        }

        let next = match self.node_type() {
            Some(node_type) => Self::decode(node_type, props).map_err(|e| {
                DocumentError::InvalidProps {
                    node_type: node_type.as_str().to_string(),
                    reason: e.to_string(),
                }
            })?,
            None => NodeKind::Unknown {
                node_type: self.type_name().to_string(),
                props,
            },
        };

        if next == *self {
            return Ok(false);
        }

        *self = next;
        Ok(true)
    }
}

fn encode<T: Serialize>(props: &T) -> Props {
    match serde_json::to_value(props) {
        Ok(Value::Object(map)) => map,
        _ => Props::new(),
    }
}

/// One element of a page tree
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawNode")]
pub struct Node {
    pub id: String,
    pub kind: NodeKind,
    pub children: Vec<Node>,
}

#[derive(Deserialize)]
struct RawNode {
    id: String,
    #[serde(rename = "type")]
    node_type: String,
    #[serde(default)]
    props: Props,
    #[serde(default)]
    children: Vec<Node>,
}

impl From<RawNode> for Node {
    fn from(raw: RawNode) -> Self {
        Self {
            id: raw.id,
            kind: NodeKind::from_raw(&raw.node_type, raw.props),
            children: raw.children,
        }
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Node", 4)?;
        state.serialize_field("id", &self.id)?;
        state.serialize_field("type", self.kind.type_name())?;
        state.serialize_field("props", &self.kind.props())?;
        state.serialize_field("children", &self.children)?;
        state.end()
    }
}

impl Node {
    pub fn new(id: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            kind,
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }

    pub fn node_type(&self) -> Option<NodeType> {
        self.kind.node_type()
    }

    pub fn find(&self, id: &str) -> Option<&Node> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }

    pub fn find_mut(&mut self, id: &str) -> Option<&mut Node> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter_mut().find_map(|child| child.find_mut(id))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.find(id).is_some()
    }

    /// First node of the given type in pre-order
    pub fn find_first(&self, node_type: NodeType) -> Option<&Node> {
        if self.node_type() == Some(node_type) {
            return Some(self);
        }
        self.children
            .iter()
            .find_map(|child| child.find_first(node_type))
    }

    pub fn find_first_mut(&mut self, node_type: NodeType) -> Option<&mut Node> {
        if self.node_type() == Some(node_type) {
            return Some(self);
        }
        self.children
            .iter_mut()
            .find_map(|child| child.find_first_mut(node_type))
    }

    /// Detach a descendant (never `self`) and return it with its subtree
    pub fn remove_descendant(&mut self, id: &str) -> Option<Node> {
        if let Some(pos) = self.children.iter().position(|c| c.id == id) {
            return Some(self.children.remove(pos));
        }
        self.children
            .iter_mut()
            .find_map(|child| child.remove_descendant(id))
    }

    /// Insert `node` under `parent_id`, clamping `index` to the child count
    pub fn insert_child(
        &mut self,
        parent_id: &str,
        index: usize,
        node: Node,
    ) -> Result<(), DocumentError> {
        let parent = self
            .find_mut(parent_id)
            .ok_or_else(|| DocumentError::ParentNotFound(parent_id.to_string()))?;

        if !parent.kind.is_container() {
            return Err(DocumentError::NotAContainer(parent_id.to_string()));
        }

        let index = index.min(parent.children.len());
        parent.children.insert(index, node);
        Ok(())
    }

    /// All ids in this subtree, pre-order
    pub fn ids(&self) -> Vec<String> {
        let mut collector = IdCollector::default();
        collector.visit_node(self);
        collector.node_ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_typed_props_keep_extra_keys() {
        let node: Node = serde_json::from_value(json!({
            "id": "h1",
            "type": "heading",
            "props": { "headline": "Hi", "color": "#333" },
            "children": []
        }))
        .unwrap();

        match &node.kind {
            NodeKind::Heading(props) => {
                assert_eq!(props.headline.as_deref(), Some("Hi"));
                assert_eq!(props.extra.get("color"), Some(&json!("#333")));
            }
            other => panic!("expected heading, got {:?}", other),
        }

        let back = serde_json::to_value(&node).unwrap();
        assert_eq!(back["props"]["color"], json!("#333"));
        assert_eq!(back["type"], json!("heading"));
    }

    #[test]
    fn test_unknown_type_is_preserved() {
        let raw = json!({
            "id": "x1",
            "type": "countdown_timer",
            "props": { "deadline": "2026-01-01", "style": { "size": 3 } },
            "children": []
        });

        let node: Node = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(node.node_type(), None);
        assert_eq!(node.kind.type_name(), "countdown_timer");
        assert_eq!(serde_json::to_value(&node).unwrap(), raw);
    }

    #[test]
    fn test_mistyped_props_fall_back_to_unknown() {
        let node: Node = serde_json::from_value(json!({
            "id": "h1",
            "type": "heading",
            "props": { "headline": 42 }
        }))
        .unwrap();

        assert!(matches!(node.kind, NodeKind::Unknown { .. }));
        assert_eq!(node.kind.type_name(), "heading");
        assert_eq!(node.kind.props().get("headline"), Some(&json!(42)));
    }

    #[test]
    fn test_merge_props_is_shallow() {
        let mut kind = NodeKind::Heading(HeadingProps {
            headline: Some("Hi".to_string()),
            level: Some(1),
            extra: Props::new(),
        });

        let mut partial = Props::new();
        partial.insert("headline".to_string(), json!("Hello"));
        partial.insert("align".to_string(), json!("center"));

        assert!(kind.merge_props(&partial).unwrap());

        match &kind {
            NodeKind::Heading(props) => {
                assert_eq!(props.headline.as_deref(), Some("Hello"));
                assert_eq!(props.level, Some(1));
                assert_eq!(props.extra.get("align"), Some(&json!("center")));
            }
            other => panic!("expected heading, got {:?}", other),
        }

        // Same values again: nothing changes
        assert!(!kind.merge_props(&partial).unwrap());
    }

    #[test]
    fn test_merge_props_rejects_bad_types() {
        let mut kind = NodeKind::empty(NodeType::Heading);
        let before = kind.clone();

        let mut partial = Props::new();
        partial.insert("level".to_string(), json!("big"));

        assert!(matches!(
            kind.merge_props(&partial),
            Err(DocumentError::InvalidProps { .. })
        ));
        assert_eq!(kind, before);
    }

    #[test]
    fn test_remove_and_insert() {
        let mut root = Node::new("root", NodeKind::empty(NodeType::Frame)).with_children(vec![
            Node::new("s1", NodeKind::empty(NodeType::Section))
                .with_children(vec![Node::new("p1", NodeKind::empty(NodeType::Paragraph))]),
        ]);

        let removed = root.remove_descendant("p1").unwrap();
        assert_eq!(removed.id, "p1");
        assert!(!root.contains("p1"));

        root.insert_child("s1", 10, removed).unwrap();
        assert_eq!(root.find("s1").unwrap().children[0].id, "p1");

        let err = root
            .insert_child("p1", 0, Node::new("p2", NodeKind::empty(NodeType::Paragraph)))
            .unwrap_err();
        assert_eq!(err, DocumentError::NotAContainer("p1".to_string()));
    }
}

//! # Funnel Document
//!
//! Tree model for funnel pages.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ EditorDocument                              │
//! │  version, activePageId                      │
//! │  pages: [Page, Page, ...]   (step order)    │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ Page: id, name, type, canvasRoot            │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ Node: id, kind (typed props), children      │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! Nodes own their children exclusively, so a document is always a forest
//! of trees. Node ids are unique across the whole document.
//!
//! New subtrees are produced by the template factory ([`create_nodes`],
//! [`TemplateCatalog`]) which always draws fresh ids from an
//! [`IdGenerator`].

mod error;
mod id_generator;
mod node;
mod page;
mod template;
mod visitor;

pub use error::DocumentError;
pub use id_generator::IdGenerator;
pub use node::{
    ButtonProps, CalendarProps, ChoiceOption, ContainerProps, HeadingProps, InputProps, Node,
    NodeKind, NodeType, OptionGridProps, ParagraphProps, Props, VideoProps,
};
pub use page::{EditorDocument, LegacyOrigin, Page, PageType, DOCUMENT_VERSION};
pub use template::{
    clone_with_fresh_ids, create_nodes, default_document, instantiate_page, NodeTemplate,
    PageTemplate, TemplateCatalog, BLANK_TEMPLATE,
};
pub use visitor::{walk_document, walk_node, walk_page, IdCollector, Visitor};

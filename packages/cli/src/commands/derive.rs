use anyhow::Result;
use clap::Args;
use colored::Colorize;
use funnel_document::EditorDocument;
use funnel_legacy::require_legacy_payload;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct DeriveArgs {
    /// Tree document JSON file
    pub input: PathBuf,

    /// Write the payload here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn derive(args: DeriveArgs) -> Result<()> {
    let document: EditorDocument = super::read_json(&args.input)?;
    if let Err(e) = document.validate() {
        eprintln!("{} {}", "⚠️".yellow(), e);
    }

    let payload = require_legacy_payload(&document)?;
    eprintln!(
        "{} Derived {} legacy steps from {} pages",
        "✓".green(),
        payload.len(),
        document.pages.len()
    );

    super::emit_json(&payload, args.output.as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use funnel_document::{Node, NodeKind, NodeType, Page, PageType};

    #[test]
    fn test_derive_refuses_unclassifiable_document() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("doc.json");
        let doc = EditorDocument::new(vec![Page::new(
            "p1",
            "Decoration",
            PageType::from("banner"),
            Node::new("root", NodeKind::empty(NodeType::Frame)),
        )]);
        std::fs::write(&input, serde_json::to_string(&doc).unwrap()).unwrap();

        let result = derive(DeriveArgs {
            input,
            output: None,
        });

        assert!(result.is_err());
    }
}

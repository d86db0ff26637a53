use crate::config::Config;
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use funnel_document::IdGenerator;
use funnel_legacy::{create_legacy_editor_document, parse_legacy_steps};
use funnel_workspace::{FunnelId, FunnelStorage, JsonFileStorage};
use std::path::{Path, PathBuf};

#[derive(Debug, Args)]
pub struct MigrateArgs {
    /// JSON file with legacy steps (array or {"steps": [...]})
    pub input: PathBuf,

    /// Write the document here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Also store the document as this funnel's draft
    #[arg(long)]
    pub funnel: Option<String>,
}

pub async fn migrate(args: MigrateArgs, cwd: &Path, config: &Config) -> Result<()> {
    let content = std::fs::read_to_string(&args.input)
        .with_context(|| format!("Cannot read {}", args.input.display()))?;
    let steps = parse_legacy_steps(&content)?;

    let document = create_legacy_editor_document(&steps, &mut IdGenerator::new());
    eprintln!(
        "{} Migrated {} legacy steps into {} pages",
        "✓".green(),
        steps.len(),
        document.pages.len()
    );

    if let Some(funnel) = args.funnel {
        let funnel_id = FunnelId::new(funnel)?;
        let storage = JsonFileStorage::new(config.storage_dir(cwd));
        storage.write_draft(&funnel_id, &document).await?;
        eprintln!("{} Stored as draft of {}", "✓".green(), funnel_id);
    }

    super::emit_json(&document, args.output.as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use funnel_document::EditorDocument;

    #[tokio::test]
    async fn test_migrate_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("steps.json");
        let output = dir.path().join("doc.json");
        std::fs::write(
            &input,
            r#"[{"id":"s1","order_index":0,"step_type":"welcome","content":{"headline":"Hi"}}]"#,
        )
        .unwrap();

        migrate(
            MigrateArgs {
                input,
                output: Some(output.clone()),
                funnel: Some("migrated".to_string()),
            },
            dir.path(),
            &Config::default(),
        )
        .await
        .unwrap();

        let doc: EditorDocument = super::super::read_json(&output).unwrap();
        assert_eq!(doc.pages[0].id, "s1");

        let storage = JsonFileStorage::new(Config::default().storage_dir(dir.path()));
        let draft = storage
            .read_draft(&FunnelId::new("migrated").unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(draft.document, doc);
    }
}

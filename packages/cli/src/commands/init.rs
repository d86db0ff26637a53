use crate::config::{Config, DEFAULT_CONFIG_NAME};
use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use funnel_document::{instantiate_page, EditorDocument, IdGenerator, PageType, TemplateCatalog};
use funnel_workspace::{FunnelId, FunnelStorage, JsonFileStorage};
use std::fs;
use std::path::Path;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Funnel id (letters, digits, '-' and '_')
    pub funnel_id: String,

    /// Template for the first page (see `funnel templates`)
    #[arg(short, long)]
    pub template: Option<String>,

    /// Overwrite an existing draft
    #[arg(short, long)]
    pub force: bool,
}

pub async fn init(args: InitArgs, cwd: &Path, config: &Config) -> Result<()> {
    let funnel_id = FunnelId::new(args.funnel_id.clone())?;
    let storage = JsonFileStorage::new(config.storage_dir(cwd));

    // Check if a draft already exists
    if storage.read_draft(&funnel_id).await?.is_some() && !args.force {
        println!(
            "{} Funnel {} already has a draft",
            "⚠️".yellow(),
            funnel_id.as_str().bright_white()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    let catalog = TemplateCatalog::builtin();
    let template = match &args.template {
        Some(name) => catalog
            .get(name)
            .ok_or_else(|| anyhow!("Unknown template: {} (run `funnel templates`)", name))?,
        None => catalog.default_for(&PageType::Welcome),
    };

    println!("{}", "📝 Creating funnel...".bright_blue().bold());

    let page = instantiate_page(template, &mut IdGenerator::new());
    let document = EditorDocument::new(vec![page]);
    storage.write_draft(&funnel_id, &document).await?;
    println!(
        "  {} Draft {} with one {} page",
        "✓".green(),
        funnel_id,
        template.name
    );

    // Create config if missing
    let config_path = cwd.join(DEFAULT_CONFIG_NAME);
    if !config_path.exists() {
        let config_json = serde_json::to_string_pretty(config)?;
        fs::write(&config_path, config_json + "\n")?;
        println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);
    }

    println!();
    println!("{}", "✨ Funnel ready!".green().bold());
    println!("  Draft stored in {}", storage.root().display());

    Ok(())
}

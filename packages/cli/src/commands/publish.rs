use crate::config::Config;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use funnel_workspace::{FunnelId, FunnelSession, HydrationSource, JsonFileStorage};
use std::path::Path;
use std::sync::Arc;

#[derive(Debug, Args)]
pub struct PublishArgs {
    /// Funnel to publish
    pub funnel_id: String,
}

pub async fn publish(args: PublishArgs, cwd: &Path, config: &Config) -> Result<()> {
    let funnel_id = FunnelId::new(args.funnel_id)?;
    let storage = Arc::new(JsonFileStorage::new(config.storage_dir(cwd)));

    let session = FunnelSession::open(funnel_id, storage, config.session_options()).await?;
    match session.source() {
        HydrationSource::Draft => {}
        HydrationSource::LegacySteps => println!(
            "{} No draft yet, publishing the migrated legacy steps",
            "⚠️".yellow()
        ),
        HydrationSource::Default => println!(
            "{} No draft yet, publishing the default document",
            "⚠️".yellow()
        ),
    }

    println!("{}", "🚀 Publishing...".bright_blue().bold());
    let snapshot = session.publish().await?;

    for (position, step) in snapshot.legacy().steps().iter().enumerate() {
        println!(
            "  {} {:>2}. {:<10} {}",
            "✓".green(),
            position + 1,
            step.step_type,
            step.content.headline.as_deref().unwrap_or("")
        );
    }

    println!();
    println!(
        "✨ {} {} at {}",
        "Published".green().bold(),
        session.funnel_id(),
        snapshot.published_at().to_rfc3339()
    );

    Ok(())
}

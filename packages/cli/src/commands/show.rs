use crate::config::Config;
use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use funnel_workspace::{FunnelId, FunnelStatus, FunnelStorage, JsonFileStorage};
use std::path::Path;

#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Funnel to inspect
    pub funnel_id: String,
}

pub async fn show(args: ShowArgs, cwd: &Path, config: &Config) -> Result<()> {
    let funnel_id = FunnelId::new(args.funnel_id)?;
    let storage = JsonFileStorage::new(config.storage_dir(cwd));

    let draft = storage.read_draft(&funnel_id).await?;
    let published = storage.read_published(&funnel_id).await?;
    let legacy_steps = storage.read_legacy_steps(&funnel_id).await?;

    if draft.is_none() && published.is_none() && legacy_steps.is_none() {
        return Err(anyhow!("Funnel not found: {}", funnel_id));
    }

    let status = storage.read_status(&funnel_id).await?;
    let status_label = match status {
        FunnelStatus::Draft => status.to_string().yellow(),
        FunnelStatus::Published => status.to_string().green(),
    };
    println!("{} {}", funnel_id.as_str().bright_white().bold(), status_label);

    match &draft {
        Some(draft) => {
            println!("  Draft updated {}", draft.updated_at.to_rfc3339());
            let active = draft.document.active_page_id.as_deref();
            for (index, page) in draft.document.pages.iter().enumerate() {
                let marker = if Some(page.id.as_str()) == active { "▸" } else { " " };
                println!(
                    "  {} {:>2}. {:<24} {:<12} {}",
                    marker,
                    index + 1,
                    page.name,
                    page.page_type.to_string().cyan(),
                    page.id.dimmed()
                );
            }
        }
        None => println!("  No draft saved"),
    }

    if let Some(steps) = &legacy_steps {
        println!("  {} legacy steps on record", steps.len());
    }

    match &published {
        Some(snapshot) => println!(
            "  Published {} ({} steps live)",
            snapshot.published_at().to_rfc3339(),
            snapshot.legacy().len()
        ),
        None => println!("  Never published"),
    }

    Ok(())
}

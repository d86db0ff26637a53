pub mod derive;
pub mod init;
pub mod migrate;
pub mod publish;
pub mod show;
pub mod templates;

pub use derive::{derive, DeriveArgs};
pub use init::{init, InitArgs};
pub use migrate::{migrate, MigrateArgs};
pub use publish::{publish, PublishArgs};
pub use show::{show, ShowArgs};
pub use templates::templates;

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;

/// Pretty JSON to `output`, or stdout when there is none
pub(crate) fn emit_json<T: Serialize>(value: &T, output: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    match output {
        Some(path) => std::fs::write(path, json + "\n")
            .with_context(|| format!("Cannot write {}", path.display())),
        None => {
            println!("{}", json);
            Ok(())
        }
    }
}

pub(crate) fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Cannot read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Invalid JSON in {}", path.display()))
}

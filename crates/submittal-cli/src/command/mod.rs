//! Command handlers.

mod assemble;
mod document;
mod health;

pub use assemble::{AssembleArgs, assemble};
pub use document::{
    CatalogArgs, DeleteArgs, UpdateArgs, UploadArgs, catalog, delete, update, upload,
};
pub use health::health;
use serde::Serialize;

use crate::config::{Command, Services};

/// Runs a command against the configured services.
pub async fn execute(command: &Command, services: &Services) -> anyhow::Result<()> {
    match command {
        Command::Assemble(args) => assemble(args, services).await,
        Command::Upload(args) => upload(args, services).await,
        Command::Update(args) => update(args, services).await,
        Command::Catalog(args) => catalog(args, services).await,
        Command::Delete(args) => delete(args, services).await,
        Command::Health => health(services).await,
    }
}

/// Writes a value to stdout as pretty JSON.
fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

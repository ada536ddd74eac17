//! Prompts command handler.

use clap::Args;
use grounded_core::config::AppConfig;
use grounded_prompt::{list_prompts, load_prompt};
use serde_json::json;

/// List prompt definitions in .grounded/prompts
#[derive(Args, Debug)]
pub struct PromptsCommand {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl PromptsCommand {
    pub fn execute(&self, config: &AppConfig) -> anyhow::Result<()> {
        let ids = list_prompts(&config.workspace)?;
        tracing::debug!("Found {} prompt definitions", ids.len());

        let mut entries = Vec::with_capacity(ids.len());
        for id in ids {
            match load_prompt(&config.workspace, &id) {
                Ok(definition) => entries.push(json!({
                    "id": definition.id,
                    "title": definition.title,
                    "description": definition.description,
                })),
                Err(e) => tracing::warn!("Skipping prompt '{}': {}", id, e),
            }
        }

        if self.json {
            println!("{}", serde_json::to_string_pretty(&entries)?);
        } else if entries.is_empty() {
            eprintln!("No prompt definitions in {:?}", config.grounded_dir().join("prompts"));
        } else {
            for entry in &entries {
                println!(
                    "{}\t{}",
                    entry["id"].as_str().unwrap_or_default(),
                    entry["title"].as_str().unwrap_or_default()
                );
            }
        }

        Ok(())
    }
}

//! Configuration file commands.

use std::path::Path;

use clap::Subcommand;
use console::style;

use az_core::config::AppConfig;
use az_core::error::{AzError, AzResult};

use crate::OutputFormat;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show the effective configuration (API key masked).
    Show,
    /// Print the configuration file path.
    Path,
    /// Write a default configuration file.
    Init {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}

pub fn run(
    config: &AppConfig,
    config_path: &Path,
    action: ConfigAction,
    format: OutputFormat,
) -> AzResult<()> {
    match action {
        ConfigAction::Show => {
            let masked = masked(config);
            match format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&masked)?);
                }
                OutputFormat::Text => {
                    let rendered = toml::to_string_pretty(&masked)
                        .map_err(|e| AzError::Serialization(e.to_string()))?;
                    println!("{rendered}");
                }
            }
        }
        ConfigAction::Path => {
            println!("{}", config_path.display());
        }
        ConfigAction::Init { force } => {
            if config_path.exists() && !force {
                return Err(AzError::Config(format!(
                    "{} already exists (use --force to overwrite)",
                    config_path.display()
                )));
            }
            AppConfig::default().save_to_file(config_path)?;
            println!(
                "  {} {}",
                style("Wrote").green().bold(),
                config_path.display()
            );
        }
    }

    Ok(())
}

/// Copy of `config` with the API key reduced to its last four characters.
fn masked(config: &AppConfig) -> AppConfig {
    let mut copy = config.clone();
    copy.client.api_key = copy.client.api_key.as_deref().map(mask_key);
    copy
}

fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 4 {
        "****".to_string()
    } else {
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("****{tail}")
    }
}

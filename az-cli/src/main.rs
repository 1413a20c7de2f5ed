//! Arifzyn CLI - Command-line interface for the Arifzyn feature API.
//!
//! Lists the server's endpoint catalog and invokes features from the
//! terminal. JSON results are printed; binary results (images, audio,
//! downloads) can be written to a file.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::debug;

use az_core::config::{AppConfig, AuthScheme};
use az_core::error::AzResult;
use az_core::logging;

/// Arifzyn - feature API client.
#[derive(Parser)]
#[command(
    name = "arifzyn",
    version,
    about = "Arifzyn feature API client CLI",
    long_about = "A command-line interface for the Arifzyn feature API.\n\
                  Browse the endpoint catalog and call features by path."
)]
struct Cli {
    /// Path to the configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging (debug level).
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format (text, json).
    #[arg(short = 'f', long, global = true, default_value = "text")]
    format: OutputFormat,

    /// API key (overrides config).
    #[arg(long, global = true, env = "ARIFZYN_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// How the API key is sent: query, header_api_key, header_bearer (overrides config).
    #[arg(long, global = true, env = "ARIFZYN_AUTH_SCHEME")]
    auth_scheme: Option<AuthScheme>,

    /// API base URL (overrides config).
    #[arg(long, global = true, env = "ARIFZYN_BASE_URL")]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// JSON output for scripting.
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Call a catalog feature by path (e.g. /ai/animediff).
    Call {
        /// Feature path as listed in the catalog.
        path: String,
        #[command(flatten)]
        params: commands::call::ParamArgs,
        /// Write binary responses to this file.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Call an arbitrary path with an explicit HTTP method.
    Request {
        /// HTTP method: GET, POST, PUT, DELETE, PATCH.
        method: az_api::HttpMethod,
        /// Path relative to the base URL.
        path: String,
        #[command(flatten)]
        params: commands::call::ParamArgs,
        /// Write binary responses to this file.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List the features in a category.
    List {
        /// Category name (case-sensitive).
        category: String,
    },
    /// List the catalog's categories.
    Categories,
    /// List every feature in the catalog.
    Endpoints,
    /// Inspect or create the configuration file.
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

#[tokio::main]
async fn main() -> AzResult<()> {
    let cli = Cli::parse();

    let config_path = match cli.config {
        Some(path) => path,
        None => AppConfig::default_config_path()?,
    };
    let mut config = if config_path.exists() {
        AppConfig::load_from_file(&config_path)?
    } else {
        AppConfig::default()
    };

    if let Some(key) = cli.api_key {
        config.client.api_key = Some(key);
    }
    if let Some(scheme) = cli.auth_scheme {
        config.client.auth_scheme = Some(scheme);
    }
    if let Some(url) = cli.base_url {
        config.client.base_url = url;
    }

    // Initialize logging
    let log_level = if cli.verbose {
        "debug".to_string()
    } else {
        config.logging.level.clone()
    };
    let _guard = match config.effective_log_dir() {
        Ok(dir) => Some(logging::init_logging(&log_level, &dir, config.logging.json_output)?),
        Err(_) => {
            logging::init_console_logging(&log_level);
            None
        }
    };

    debug!("Arifzyn CLI v{}", az_core::constants::APP_VERSION);

    // Dispatch to command handlers
    match cli.command {
        Commands::Call { path, params, output } => {
            commands::call::run(&config, &path, None, params, output, cli.format).await
        }
        Commands::Request { method, path, params, output } => {
            commands::call::run(&config, &path, Some(method), params, output, cli.format).await
        }
        Commands::List { category } => {
            commands::catalog::list(&config, &category, cli.format).await
        }
        Commands::Categories => commands::catalog::categories(&config, cli.format).await,
        Commands::Endpoints => commands::catalog::endpoints(&config, cli.format).await,
        Commands::Config { action } => {
            commands::config::run(&config, &config_path, action, cli.format)
        }
    }
}

//! Endpoint catalog commands.

use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, ContentArrangement, Table};
use console::style;

use az_api::EndpointDescriptor;
use az_core::config::AppConfig;
use az_core::error::AzResult;

use crate::OutputFormat;

pub async fn list(config: &AppConfig, category: &str, format: OutputFormat) -> AzResult<()> {
    let client = super::create_feature_client(config)?;
    let endpoints = client.list(category).await?;

    if endpoints.is_empty() {
        if let OutputFormat::Json = format {
            println!("[]");
        } else {
            println!("  No features in category {}.", style(category).bold());
        }
        return Ok(());
    }

    print_endpoints(&endpoints, format)
}

pub async fn categories(config: &AppConfig, format: OutputFormat) -> AzResult<()> {
    let client = super::create_feature_client(config)?;
    let categories = client.categories().await?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&categories)?);
        }
        OutputFormat::Text => {
            println!("{}", style("Categories").bold().underlined());
            for category in &categories {
                let count = client.list(category).await?.len();
                println!("  {:<20} {}", category, style(format!("{count} features")).dim());
            }
        }
    }

    Ok(())
}

pub async fn endpoints(config: &AppConfig, format: OutputFormat) -> AzResult<()> {
    let client = super::create_feature_client(config)?;
    let endpoints = client.endpoints().await?;
    print_endpoints(&endpoints, format)
}

fn print_endpoints(endpoints: &[EndpointDescriptor], format: OutputFormat) -> AzResult<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(endpoints)?);
        }
        OutputFormat::Text => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .apply_modifier(UTF8_ROUND_CORNERS)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["Category", "Name", "Method", "Path", "Parameters"]);

            for endpoint in endpoints {
                let name = if endpoint.error {
                    format!("{} (broken)", endpoint.name)
                } else {
                    endpoint.name.clone()
                };
                table.add_row(vec![
                    endpoint.category.clone(),
                    super::truncate(&name, 32),
                    endpoint.method.to_uppercase(),
                    endpoint.path.clone(),
                    endpoint.parameters.join(", "),
                ]);
            }

            println!("{table}");
            println!("  {} features", endpoints.len());
        }
    }

    Ok(())
}

//! Feature invocation commands.

use std::path::PathBuf;

use clap::Args;
use console::style;

use az_api::{HttpMethod, NormalizedResponse, Params};
use az_core::config::AppConfig;
use az_core::error::{AzError, AzResult};

use crate::OutputFormat;

/// Request parameters shared by `call` and `request`.
#[derive(Args, Debug, Default)]
pub struct ParamArgs {
    /// Parameter as key=value (repeatable). Values are sent as strings.
    #[arg(short = 'p', long = "param", value_name = "KEY=VALUE")]
    pub params: Vec<String>,

    /// Parameters as a JSON object, merged before --param values.
    #[arg(short = 'd', long = "data", value_name = "JSON")]
    pub data: Option<String>,
}

impl ParamArgs {
    /// Merge `--data` and `--param` into one parameter map.
    pub fn into_params(self) -> AzResult<Params> {
        let mut params = match self.data {
            Some(raw) => match serde_json::from_str::<serde_json::Value>(&raw)? {
                serde_json::Value::Object(map) => map,
                _ => return Err(AzError::Config("--data must be a JSON object".into())),
            },
            None => Params::new(),
        };

        for pair in self.params {
            let (key, value) = pair.split_once('=').ok_or_else(|| {
                AzError::Config(format!("invalid --param {pair:?}, expected KEY=VALUE"))
            })?;
            if key.is_empty() {
                return Err(AzError::Config(format!("invalid --param {pair:?}, empty key")));
            }
            params.insert(key.to_string(), serde_json::Value::String(value.to_string()));
        }

        Ok(params)
    }
}

pub async fn run(
    config: &AppConfig,
    path: &str,
    method: Option<HttpMethod>,
    params: ParamArgs,
    output: Option<PathBuf>,
    format: OutputFormat,
) -> AzResult<()> {
    let client = super::create_feature_client(config)?;
    let params = params.into_params()?;

    let response = match method {
        Some(method) => client.call_method(path, method, &params).await?,
        None => client.call(path, &params).await?,
    };

    match response {
        NormalizedResponse::Json(envelope) => match format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&envelope)?);
            }
            OutputFormat::Text => {
                let status = if envelope.is_success() {
                    style("OK").green().bold()
                } else {
                    style("FAIL").red().bold()
                };
                println!("  {} status={} creator={}", status, envelope.status, envelope.creator);
                match &envelope.result {
                    Some(result) => println!("{}", serde_json::to_string_pretty(result)?),
                    None => println!("  {}", style("(no result)").dim()),
                }
            }
        },
        NormalizedResponse::Binary(bytes) => {
            let size = bytes.len() as u64;
            let saved_to = match output {
                Some(ref file) => {
                    std::fs::write(file, &bytes)?;
                    Some(file.display().to_string())
                }
                None => None,
            };
            match format {
                OutputFormat::Json => {
                    println!(
                        "{}",
                        serde_json::json!({ "binary": true, "bytes": size, "saved_to": saved_to })
                    );
                }
                OutputFormat::Text => match saved_to {
                    Some(file) => println!(
                        "  {} {} to {}",
                        style("Saved").green().bold(),
                        super::format_bytes(size),
                        file
                    ),
                    None => println!(
                        "  Binary response ({}). Use --output FILE to save it.",
                        super::format_bytes(size)
                    ),
                },
            }
        }
    }

    Ok(())
}

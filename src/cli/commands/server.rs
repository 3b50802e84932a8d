use clap::Subcommand;

use crate::cli::client::{envelope_data, ApiClient};
use crate::cli::utils::{output_envelope, output_success};
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum ServerCommands {
    #[command(about = "Check server health status from API /health endpoint")]
    Health,

    #[command(about = "Show server information from API root endpoint")]
    Info,
}

pub async fn handle(cmd: ServerCommands, client: &ApiClient, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        ServerCommands::Health => {
            let envelope = client.get("/health").await?;
            if matches!(output_format, OutputFormat::Json) {
                return output_envelope(&envelope);
            }

            let data = envelope_data(&envelope);
            let status = data.get("status").and_then(|s| s.as_str()).unwrap_or("unknown");
            output_success(
                &output_format,
                &format!("{} is {}", client.base_url(), status),
                None,
            )?;
            if let Some(collections) = data.get("collections").and_then(|c| c.as_object()) {
                for (collection, count) in collections {
                    println!("  {:<24} {}", collection, count);
                }
            }
            Ok(())
        }
        ServerCommands::Info => {
            let envelope = client.get("/").await?;
            if matches!(output_format, OutputFormat::Json) {
                return output_envelope(&envelope);
            }

            let data = envelope_data(&envelope);
            let field = |name: &str| data.get(name).and_then(|v| v.as_str()).unwrap_or("-").to_string();
            println!("Name: {}", field("name"));
            println!("Version: {}", field("version"));
            println!("URL: {}", client.base_url());
            if let Some(endpoints) = data.get("endpoints").and_then(|e| e.as_object()) {
                println!("Endpoints:");
                for (name, path) in endpoints {
                    println!("  {:<10} {}", name, path.as_str().unwrap_or(""));
                }
            }
            Ok(())
        }
    }
}

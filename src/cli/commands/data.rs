use clap::Subcommand;
use reqwest::Method;
use serde_json::Value;
use tokio::io::AsyncReadExt;

use crate::cli::client::{envelope_data, ApiClient};
use crate::cli::utils::{output_envelope, output_records, output_success};
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum DataCommands {
    #[command(about = "List records in a collection")]
    List {
        #[arg(help = "Collection name (e.g. schools, class-subjects)")]
        collection: String,
        #[arg(long, help = "Maximum number of records")]
        limit: Option<u64>,
        #[arg(long, help = "Records to skip")]
        offset: Option<u64>,
        #[arg(long, help = "Sort order, e.g. \"name desc\"")]
        order: Option<String>,
    },

    #[command(about = "Get a single record")]
    Get {
        #[arg(help = "Collection name")]
        collection: String,
        #[arg(help = "Record ID")]
        id: i64,
    },

    #[command(about = "Create record from stdin")]
    Create {
        #[arg(help = "Collection name")]
        collection: String,
    },

    #[command(about = "Update record from stdin (fields are merged)")]
    Update {
        #[arg(help = "Collection name")]
        collection: String,
        #[arg(help = "Record ID to update")]
        id: i64,
    },

    #[command(about = "Delete a record")]
    Delete {
        #[arg(help = "Collection name")]
        collection: String,
        #[arg(help = "Record ID to delete")]
        id: i64,
    },

    #[command(about = "Find records with a JSON filter (argument or stdin)")]
    Find {
        #[arg(help = "Collection name")]
        collection: String,
        #[arg(help = "Filter JSON, e.g. '{\"where\":{\"school_id\":1}}'")]
        filter: Option<String>,
    },
}

pub async fn handle(cmd: DataCommands, client: &ApiClient, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        DataCommands::List { collection, limit, offset, order } => {
            let mut query = url::form_urlencoded::Serializer::new(String::new());
            if let Some(limit) = limit { query.append_pair("limit", &limit.to_string()); }
            if let Some(offset) = offset { query.append_pair("offset", &offset.to_string()); }
            if let Some(order) = &order { query.append_pair("order", order); }
            let query = query.finish();

            let path = if query.is_empty() {
                format!("/api/{}", collection)
            } else {
                format!("/api/{}?{}", collection, query)
            };
            let envelope = client.get(&path).await?;
            show_records(&output_format, &envelope)
        }
        DataCommands::Get { collection, id } => {
            let envelope = client.get(&format!("/api/{}/{}", collection, id)).await?;
            show_record(&output_format, &envelope)
        }
        DataCommands::Create { collection } => {
            let body = read_stdin_json().await?;
            let envelope = client.request(Method::POST, &format!("/api/{}", collection), Some(body)).await?;
            if let OutputFormat::Text = output_format {
                let id = envelope_data(&envelope).get("id").cloned().unwrap_or(Value::Null);
                output_success(&output_format, &format!("Created {} record {}", collection, id), None)?;
            }
            show_record(&output_format, &envelope)
        }
        DataCommands::Update { collection, id } => {
            let body = read_stdin_json().await?;
            let envelope = client
                .request(Method::PATCH, &format!("/api/{}/{}", collection, id), Some(body))
                .await?;
            show_record(&output_format, &envelope)
        }
        DataCommands::Delete { collection, id } => {
            let envelope = client
                .request(Method::DELETE, &format!("/api/{}/{}", collection, id), None)
                .await?;
            match output_format {
                OutputFormat::Json => output_envelope(&envelope),
                OutputFormat::Text => output_success(&output_format, &format!("Deleted {} record {}", collection, id), None),
            }
        }
        DataCommands::Find { collection, filter } => {
            let body = match filter {
                Some(raw) => serde_json::from_str(&raw).map_err(|e| anyhow::anyhow!("Invalid filter JSON: {}", e))?,
                None => read_stdin_json().await?,
            };
            let envelope = client
                .request(Method::POST, &format!("/api/{}/find", collection), Some(body))
                .await?;
            show_records(&output_format, &envelope)
        }
    }
}

fn show_records(output_format: &OutputFormat, envelope: &Value) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => output_envelope(envelope),
        OutputFormat::Text => output_records(envelope_data(envelope)),
    }
}

fn show_record(output_format: &OutputFormat, envelope: &Value) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => output_envelope(envelope),
        OutputFormat::Text => {
            println!("{}", serde_json::to_string_pretty(envelope_data(envelope))?);
            Ok(())
        }
    }
}

async fn read_stdin_json() -> anyhow::Result<Value> {
    let mut input = String::new();
    tokio::io::stdin().read_to_string(&mut input).await?;
    if input.trim().is_empty() {
        anyhow::bail!("Expected a JSON object on stdin");
    }
    serde_json::from_str(&input).map_err(|e| anyhow::anyhow!("Invalid JSON on stdin: {}", e))
}

//! loadreply CLI.
//!
//! `loadreply extract` prints the reference found in some text.
//! `loadreply process` runs one email through the whole pipeline.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio::io::AsyncReadExt;

use loadreply_lib::state::{apply_env_overrides, load_config, load_config_from};
use loadreply_lib::{extract_reference, EmailContent, FixtureLookupProvider, Pipeline};

#[derive(Parser)]
#[command(name = "loadreply")]
#[command(about = "Find the load reference in a carrier email and draft the reply")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract the load reference from text and print the result as JSON
    Extract {
        /// Text to scan (read from stdin when omitted)
        text: Option<String>,
    },

    /// Run one email through extraction, lookup, and reply formatting
    Process {
        /// Email subject
        #[arg(long)]
        subject: Option<String>,

        /// Email body (read from stdin when neither --body nor --body-file is given)
        #[arg(long, conflicts_with = "body_file")]
        body: Option<String>,

        /// Read the email body from a file
        #[arg(long)]
        body_file: Option<PathBuf>,

        /// Sender, e.g. "Jane Doe <jane@carrier.com>"
        #[arg(long)]
        from: Option<String>,

        /// Email as JSON ({"subject", "body", "from"}); "-" reads stdin
        #[arg(long, conflicts_with_all = ["subject", "body", "body_file", "from"])]
        input: Option<String>,

        /// Answer lookups from a JSON array of load records
        #[arg(long)]
        fixture: Option<PathBuf>,

        /// Configuration file path (default: ~/.loadreply/config.json)
        #[arg(short, long, env = "LOADREPLY_CONFIG")]
        config: Option<PathBuf>,

        /// Print the full processing report as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Extract { text } => {
            let text = match text {
                Some(text) => text,
                None => read_stdin().await?,
            };
            let result = extract_reference(&text);
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Commands::Process {
            subject,
            body,
            body_file,
            from,
            input,
            fixture,
            config,
            json,
        } => {
            let mut config = match &config {
                Some(path) => load_config_from(path)?,
                None => load_config()?,
            };
            apply_env_overrides(&mut config);

            let mut pipeline = Pipeline::from_config(&config)
                .context("Failed to set up the processing pipeline")?;
            if let Some(path) = &fixture {
                let provider = FixtureLookupProvider::load(path)?;
                pipeline = pipeline.with_provider(Arc::new(provider));
            }

            let email = match input {
                Some(source) => read_email_json(&source).await?,
                None => {
                    let body = match (body, body_file) {
                        (Some(body), _) => body,
                        (None, Some(path)) => std::fs::read_to_string(&path)
                            .with_context(|| format!("Failed to read {}", path.display()))?,
                        (None, None) => read_stdin().await?,
                    };
                    EmailContent {
                        subject: subject.unwrap_or_default(),
                        body,
                        from,
                    }
                }
            };

            let report = pipeline.process(&email).await;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("Subject: {}\n\n{}", report.reply.subject, report.reply.body);
            }
        }
    }

    Ok(())
}

async fn read_stdin() -> anyhow::Result<String> {
    let mut buf = String::new();
    tokio::io::stdin()
        .read_to_string(&mut buf)
        .await
        .context("Failed to read stdin")?;
    Ok(buf)
}

async fn read_email_json(source: &str) -> anyhow::Result<EmailContent> {
    let content = if source == "-" {
        read_stdin().await?
    } else {
        std::fs::read_to_string(Path::new(source))
            .with_context(|| format!("Failed to read {}", source))?
    };
    serde_json::from_str(&content).with_context(|| format!("Invalid email JSON in {}", source))
}

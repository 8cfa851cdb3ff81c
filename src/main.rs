use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use listing_poster::api::{AppState, create_router};
use listing_poster::config::CONFIG;
use listing_poster::data_models::PromptRequest;
use listing_poster::extractor::ListingExtractor;
use listing_poster::generator::SummaryGenerator;

#[derive(Parser, Debug)]
#[command(name = "listing-poster", about = "Turn a property listing into a customer-ready summary")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the page and the JSON API.
    Serve {
        /// Overrides BIND_ADDR.
        #[arg(long)]
        addr: Option<String>,
        #[arg(long, default_value = "static")]
        static_dir: PathBuf,
    },
    /// Extract description and photos from a listing URL.
    Extract { url: String },
    /// Generate a summary from a description.
    Generate {
        #[arg(long, conflicts_with = "file", required_unless_present = "file")]
        description: Option<String>,
        /// Read the description from a file.
        #[arg(long)]
        file: Option<PathBuf>,
        /// Listing URL; adds the link section to the summary.
        #[arg(long)]
        url: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    let cli = Cli::parse();
    tracing::debug!(?cli, "parsed cli");

    match cli.command {
        Command::Serve { addr, static_dir } => serve(addr, static_dir).await,
        Command::Extract { url } => extract(&url).await,
        Command::Generate {
            description,
            file,
            url,
        } => generate(description, file, url).await,
    }
}

async fn serve(addr: Option<String>, static_dir: PathBuf) -> Result<()> {
    let extractor = ListingExtractor::from_config(&CONFIG).context("Failed to build extractor")?;
    let generator = SummaryGenerator::from_config(&CONFIG).context("Failed to build generator")?;
    if CONFIG.api_key.is_none() {
        tracing::warn!("LLM_API_KEY is not set, summary generation will fail");
    }

    let app = create_router(
        Arc::new(AppState {
            extractor,
            generator,
        }),
        static_dir,
    );

    let addr = addr.unwrap_or_else(|| CONFIG.bind_addr.clone());
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("listening on http://{addr}");
    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}

async fn extract(url: &str) -> Result<()> {
    let extractor = ListingExtractor::from_config(&CONFIG).context("Failed to build extractor")?;
    let result = extractor.extract(url).await;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

async fn generate(
    description: Option<String>,
    file: Option<PathBuf>,
    url: Option<String>,
) -> Result<()> {
    let description = match (description, file) {
        (Some(d), _) => d,
        (None, Some(path)) => std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        (None, None) => anyhow::bail!("pass --description or --file"),
    };
    if description.trim().is_empty() {
        anyhow::bail!("description is empty");
    }

    let generator = SummaryGenerator::from_config(&CONFIG).context("Failed to build generator")?;
    let result = generator
        .generate(&PromptRequest::new(description, url))
        .await
        .context("Generation failed, check the API balance or network")?;
    println!("{}", result.text);
    Ok(())
}

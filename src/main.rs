//! Sumi-Harvest main entry point
//!
//! This is the command-line interface for the Sumi-Harvest site harvester.

use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use std::path::PathBuf;
use sumi_harvest::collab::{DirectoryStore, DocumentStore, MemoryStore, StoredObject};
use sumi_harvest::config::{load_config_with_hash, Config};
use sumi_harvest::output::{
    format_markdown_summary, print_summary, render_objects, HarvestSummary, SUMMARY_KEY,
};
use sumi_harvest::DocumentPipeline;
use tracing_subscriber::EnvFilter;

/// Sumi-Harvest: a polite site harvester
///
/// Sumi-Harvest crawls a site from its seed URLs while respecting robots.txt,
/// converts every page to Markdown and writes one document per page.
#[derive(Parser, Debug)]
#[command(name = "sumi-harvest")]
#[command(version = "1.0.0")]
#[command(about = "A polite site harvester", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Rendering service endpoint, overriding the config file
    #[arg(long, env = "RENDER_SERVICE_URL")]
    render_service_url: Option<String>,

    /// Only list the URLs that would be harvested
    #[arg(long)]
    urls_only: bool,

    /// Run the harvest but keep documents in memory instead of writing them
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (mut config, config_hash) = match load_config_with_hash(&cli.config) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (cfg, hash)
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    if let Some(url) = cli.render_service_url {
        config.fetch.render_service_url = Some(url);
    }
    if cli.urls_only {
        config.crawl.return_only_urls = true;
    }

    handle_harvest(config, config_hash, cli.dry_run).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sumi_harvest=info,warn"),
            1 => EnvFilter::new("sumi_harvest=debug,info"),
            2 => EnvFilter::new("sumi_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Runs the pipeline and hands the documents to the destination store
async fn handle_harvest(config: Config, config_hash: String, dry_run: bool) -> anyhow::Result<()> {
    let started_at = Utc::now();
    let seeds = config.crawl.seed_urls();
    let directory = config.output.directory.clone();
    let urls_only = config.crawl.return_only_urls;

    tracing::info!(
        "Harvesting {} seed URLs in {:?} mode (depth {}, cap {})",
        seeds.len(),
        config.crawl.mode,
        config.crawl.max_depth,
        config.crawl.max_total_links
    );

    let pipeline = DocumentPipeline::new(config)?.on_progress(|progress| {
        tracing::debug!(
            "{:?} {}/{} {}",
            progress.status,
            progress.current,
            progress.total,
            progress.current_document_url.as_deref().unwrap_or("")
        );
    });

    let documents = pipeline.run().await.context("harvest run failed")?;

    if urls_only {
        for document in &documents {
            println!("{}", document.source_url());
        }
        return Ok(());
    }

    let summary = HarvestSummary::from_documents(&documents, seeds, config_hash, started_at);
    let mut objects = render_objects(&documents);
    objects.push(StoredObject {
        key: SUMMARY_KEY.to_string(),
        bytes: format_markdown_summary(&summary).into_bytes(),
    });

    let store: Box<dyn DocumentStore> = if dry_run {
        tracing::info!("Dry run: keeping {} objects in memory", objects.len());
        Box::new(MemoryStore::new())
    } else {
        Box::new(DirectoryStore::new(&directory))
    };
    store
        .put(objects)
        .await
        .with_context(|| format!("failed to store documents in {}", directory))?;

    print_summary(&summary);
    Ok(())
}

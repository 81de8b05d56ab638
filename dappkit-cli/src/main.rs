//! dappkit CLI
//!
//! Runs the API server and exercises the configured stores from a terminal.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use dappkit_api::{ApiConfig, ApiServer};
use dappkit_core::constants::DEFAULT_API_PORT;
use dappkit_core::traits::{ContentStore, KeyValueStore};
use dappkit_core::types::{ContentId, LookupKey};
use dappkit_kv::StaticTable;

/// dappkit - IPFS and key-lookup backend for the dApp starter kit
#[derive(Parser)]
#[command(name = "dappkit")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the API server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value_t = DEFAULT_API_PORT)]
        port: u16,
        /// Bind address
        #[arg(short, long, default_value = "0.0.0.0")]
        bind: String,
    },

    /// Add a JSON file to the configured content store
    Add {
        /// JSON file to add
        file: PathBuf,
    },

    /// Fetch a JSON metadata document by CID
    Metadata {
        /// Content identifier
        cid: String,
    },

    /// Look up a key in the configured key store
    Lookup {
        /// Key to look up
        key: String,
        /// Use this JSON object file instead of the configured store
        #[arg(short, long)]
        table: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        "dappkit=debug,info"
    } else {
        "dappkit=info,warn"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Commands::Serve { port, bind } => cmd_serve(port, &bind).await,
        Commands::Add { file } => cmd_add(&file).await,
        Commands::Metadata { cid } => cmd_metadata(&cid).await,
        Commands::Lookup { key, table } => cmd_lookup(&key, table.as_deref()).await,
    }
}

/// Run API server
async fn cmd_serve(port: u16, bind: &str) -> Result<()> {
    println!("{}", "🚀 Starting dappkit API server...".cyan().bold());
    println!("   {} http://{}:{}", "Listening on:".green(), bind, port);
    println!("   {} http://{}:{}/health", "Health check:".dimmed(), bind, port);
    println!("\n   Press Ctrl+C to stop.\n");

    let server = ApiServer::from_config(ApiConfig::from_env())
        .await
        .context("Failed to configure backends")?;

    let addr: SocketAddr = format!("{}:{}", bind, port).parse()?;
    server.run(addr).await?;

    Ok(())
}

/// Add a JSON file
async fn cmd_add(file: &Path) -> Result<()> {
    println!("{} {}", "📦 Adding:".cyan().bold(), file.display());

    let raw = std::fs::read_to_string(file).context("Failed to read file")?;
    let value: serde_json::Value = serde_json::from_str(&raw).context("File is not valid JSON")?;

    let store = ApiConfig::from_env().content_store()?;
    let receipt = store
        .add(serde_json::to_string(&value)?)
        .await
        .context("Failed to add to IPFS")?;

    println!("\n{}", "✅ Added:".green().bold());
    println!("{}", serde_json::to_string_pretty(&receipt)?);

    if store.backend_name() == "memory" {
        println!(
            "\n{}",
            "⚠️  IPFS_API_URL is not set; content was only stored in memory.".yellow()
        );
    }

    Ok(())
}

/// Fetch metadata by CID
async fn cmd_metadata(cid: &str) -> Result<()> {
    println!("{} {}", "🔍 Fetching:".cyan().bold(), cid);

    let cid = ContentId::parse(cid)?;
    let store = ApiConfig::from_env().content_store()?;

    let metadata = store
        .fetch_metadata(&cid)
        .await
        .context("Failed to fetch metadata")?;

    println!("{}", serde_json::to_string_pretty(&metadata)?);
    Ok(())
}

/// Look up a key
async fn cmd_lookup(key: &str, table: Option<&Path>) -> Result<()> {
    let key = LookupKey::parse(key)?;

    let value = match table {
        Some(path) => {
            let table = StaticTable::from_file(path)
                .await
                .context("Failed to load lookup table")?;
            table.get(&key).await?
        }
        None => {
            let store = ApiConfig::from_env().key_store().await?;
            store.get(&key).await?
        }
    };

    match value {
        Some(value) => println!("{}", serde_json::to_string_pretty(&value)?),
        None => {
            eprintln!("{} {}", "No value for".yellow(), key);
            println!("{{}}");
        }
    }

    Ok(())
}

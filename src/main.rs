//! MetaKB - Metadata-Tagged Knowledge Base CLI
//!
//! Command-line front end for ingesting documents into knowledge bases and
//! searching them through the registered knowledge tools.
//!
//! Usage:
//!   metakb ingest research_archive ./docs    # Tag and store documents
//!   metakb search research_archive "query"   # Print retrieved context
//!   metakb kbs                               # List knowledge bases
//!   metakb tools                             # Print tool definitions

use anyhow::Result;
use clap::{Parser, Subcommand};
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use metakb::services::knowledge::{FtsRetriever, IngestPipeline, KnowledgeStore};
use metakb::services::metadata::SchemaRegistry;
use metakb::services::tools::{default_registry, SEARCH_KNOWLEDGE_TOOL_NAME};
use metakb::storage::config::ConfigService;
use metakb::storage::database::Database;

#[derive(Parser)]
#[command(
    name = "metakb",
    version,
    about = "Metadata-tagged knowledge bases with full-text search"
)]
struct Cli {
    /// Path to the config file (defaults to ~/.metakb/config.json)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ingest a directory of documents into a knowledge base
    Ingest {
        /// Knowledge base name
        kb: String,
        /// Directory containing document files
        dir: PathBuf,
    },
    /// Search a knowledge base and print the formatted context
    Search {
        /// Knowledge base name
        kb: String,
        /// Natural-language query
        query: String,
        /// Override the configured result count
        #[arg(long)]
        top_k: Option<usize>,
    },
    /// List knowledge bases
    Kbs,
    /// Print registered tool definitions as JSON
    Tools,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        "metakb=debug"
    } else {
        "metakb=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    let config_service = match &cli.config {
        Some(path) => ConfigService::with_path(path.clone())?,
        None => ConfigService::new()?,
    };
    let config = config_service.get_config_clone();

    let database = Arc::new(Database::new()?);
    let store = KnowledgeStore::new(database)?;

    // Make sure every configured knowledge base exists
    for kb in &config.knowledge_bases {
        store.create_knowledge_base(&kb.name, &kb.description, kb.schema.as_deref())?;
    }

    match cli.command {
        Commands::Ingest { kb, dir } => {
            let registry = Arc::new(SchemaRegistry::from_config(&config)?);
            let pipeline = IngestPipeline::new(store, registry);
            let report = pipeline.ingest_dir(&kb, &dir)?;

            println!(
                "Ingested {} document(s) into '{}' ({} unchanged, {} failed)",
                report.ingested,
                kb,
                report.skipped,
                report.failed.len()
            );
            for (path, error) in &report.failed {
                println!("  failed {}: {}", path, error);
            }
        }
        Commands::Search { kb, query, top_k } => {
            let top_k = top_k.unwrap_or(config.search_tool.top_k);
            let retriever = Arc::new(FtsRetriever::new(
                store.clone(),
                top_k,
                config.search_tool.score_threshold,
            ));
            let registry = default_registry(store, retriever)?;

            let result = registry
                .execute(
                    SEARCH_KNOWLEDGE_TOOL_NAME,
                    json!({ "database": kb, "query": query }),
                )
                .await?;

            match result["context"].as_str() {
                Some(context) => println!("{}", context),
                None => println!("{}", serde_json::to_string_pretty(&result)?),
            }
        }
        Commands::Kbs => {
            for kb in store.list_knowledge_bases()? {
                let schema = kb.schema_name.as_deref().unwrap_or("-");
                println!(
                    "{}  docs={}  schema={}  {}",
                    kb.name, kb.doc_count, schema, kb.description
                );
            }
        }
        Commands::Tools => {
            let retriever = Arc::new(FtsRetriever::from_config(
                store.clone(),
                &config.search_tool,
            ));
            let registry = default_registry(store, retriever)?;
            println!("{}", serde_json::to_string_pretty(&registry.definitions())?);
        }
    }

    Ok(())
}

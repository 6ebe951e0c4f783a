//! docpipe CLI: process a document, fetch a stored entry, list a thread.
//! Config from env (.env supported): REDIS_URL, MEMORY_KEY_PREFIX, LOG_FILE, RUST_LOG.

mod collaborators;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use uuid::Uuid;

use collaborators::{EmailProcessor, ExtensionClassifier, JsonProcessor, PdfProcessor};
use dispatch::Dispatcher;
use docpipe_core::logger::init_tracing;
use docpipe_core::{DispatchRequest, FileInput};
use shared_memory::{MemoryConfig, SharedMemory};

#[derive(Parser)]
#[command(name = "docpipe")]
#[command(about = "Document dispatch pipeline: process, get, thread", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify and process one document, then print the outcome.
    /// Provide a FILE path, or --json / --email text.
    Process {
        /// Path of a file to process (its extension drives the classification hint).
        file: Option<PathBuf>,
        /// Raw JSON text to process.
        #[arg(long)]
        json: Option<String>,
        /// Raw email text to process.
        #[arg(long)]
        email: Option<String>,
        /// Conversation thread to group the stored entry under.
        #[arg(long)]
        thread: Option<String>,
    },
    /// Print a stored context entry by id. Only useful with the Redis
    /// backend; the in-process map does not outlive the command.
    Get { id: Uuid },
    /// Print every entry in a conversation thread (full scan over the store).
    Thread { id: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let log_file =
        std::env::var("LOG_FILE").unwrap_or_else(|_| "logs/docpipe.log".to_string());
    init_tracing(&log_file)?;

    let cli = Cli::parse();
    let memory = Arc::new(SharedMemory::from_config(&MemoryConfig::from_env()).await);

    match cli.command {
        Commands::Process {
            file,
            json,
            email,
            thread,
        } => handle_process(memory, file, json, email, thread).await,
        Commands::Get { id } => handle_get(memory, id).await,
        Commands::Thread { id } => handle_thread(memory, &id).await,
    }
}

async fn handle_process(
    memory: Arc<SharedMemory>,
    file: Option<PathBuf>,
    json: Option<String>,
    email: Option<String>,
    thread: Option<String>,
) -> Result<()> {
    let mut request = DispatchRequest::default();
    if let Some(path) = file {
        let content = std::fs::read(&path)
            .with_context(|| format!("read input file {}", path.display()))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        request.file = Some(FileInput { name, content });
    }
    request.json_text = json;
    request.email_text = email;
    request.thread_id = thread;

    let dispatcher = Dispatcher::new(
        Arc::new(ExtensionClassifier),
        Arc::new(JsonProcessor),
        Arc::new(EmailProcessor),
        Arc::new(PdfProcessor),
        memory,
    );

    let outcome = dispatcher.handle(request).await?;
    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(())
}

async fn handle_get(memory: Arc<SharedMemory>, id: Uuid) -> Result<()> {
    match memory.get(id).await? {
        Some(entry) => println!("{}", serde_json::to_string_pretty(&entry)?),
        None => println!("No entry with id {}.", id),
    }
    Ok(())
}

async fn handle_thread(memory: Arc<SharedMemory>, thread_id: &str) -> Result<()> {
    let entries = memory.entries_by_thread(thread_id).await?;
    if entries.is_empty() {
        println!("No entries in thread {}.", thread_id);
        return Ok(());
    }
    println!("{} entries in thread {}:", entries.len(), thread_id);
    for entry in &entries {
        println!("{}", serde_json::to_string_pretty(entry)?);
    }
    Ok(())
}

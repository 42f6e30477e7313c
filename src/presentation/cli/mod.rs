mod ask;
mod build;
mod chat;
pub mod format;
mod inspect;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::AppConfig;

#[derive(Parser, Debug)]
#[command(
    name = "hswa-assistant",
    version,
    about = "Question answering over the Health and Safety at Work Act 2015, with page citations"
)]
pub struct Cli {
    /// Directory holding the persisted vector index
    #[arg(long, global = true)]
    pub index_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Extract, chunk and embed the Act, then save the vector index
    Build(BuildArgs),
    /// Interactive console chat
    Chat,
    /// Answer one or more questions and exit
    Ask(AskArgs),
    /// Show the chunks retrieved for a query without calling the LLM
    Inspect(InspectArgs),
    /// Serve the web chat UI
    Serve(ServeArgs),
}

#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Path to the Act PDF
    #[arg(long)]
    pub pdf: Option<PathBuf>,

    /// Maximum chunk length in characters
    #[arg(long)]
    pub chunk_size: Option<usize>,

    /// Characters shared between consecutive chunks
    #[arg(long)]
    pub chunk_overlap: Option<usize>,
}

#[derive(Args, Debug)]
pub struct AskArgs {
    /// Questions to answer; the built-in sample questions are used when empty
    pub questions: Vec<String>,
}

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Queries to run; a few built-in queries are used when empty
    pub queries: Vec<String>,

    /// Number of chunks to show per query
    #[arg(long, short = 'k', default_value_t = 3)]
    pub k: usize,
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    #[arg(long)]
    pub host: Option<String>,

    #[arg(long)]
    pub port: Option<u16>,
}

impl Cli {
    /// Applies command-line overrides on top of the environment configuration.
    pub fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(index_dir) = &self.index_dir {
            config.index_dir = index_dir.clone();
        }

        match &self.command {
            Commands::Build(args) => {
                if let Some(pdf) = &args.pdf {
                    config.pdf_path = pdf.clone();
                }
                if let Some(size) = args.chunk_size {
                    config.chunking.chunk_size = size;
                }
                if let Some(overlap) = args.chunk_overlap {
                    config.chunking.chunk_overlap = overlap;
                }
            }
            Commands::Serve(args) => {
                if let Some(host) = &args.host {
                    config.server.host = host.clone();
                }
                if let Some(port) = args.port {
                    config.server.port = port;
                }
            }
            Commands::Chat | Commands::Ask(_) | Commands::Inspect(_) => {}
        }
    }
}

pub async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = AppConfig::from_env()?;
    cli.apply_overrides(&mut config);

    match cli.command {
        Commands::Build(_) => build::run(&config).await,
        Commands::Chat => chat::run(config).await,
        Commands::Ask(args) => ask::run(config, args.questions).await,
        Commands::Inspect(args) => inspect::run(&config, args.queries, args.k).await,
        Commands::Serve(_) => serve(config).await,
    }
}

async fn serve(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    use crate::infrastructure::AppContainer;
    use crate::presentation::http::HttpServer;

    let host = config.server.host.clone();
    let port = config.server.port;
    let container = AppContainer::new(config).await?;

    let server = HttpServer::new(
        container.chat_handler.clone(),
        container.search_handler.clone(),
        container.info_handler.clone(),
        host,
        port,
    );
    server.run().await
}

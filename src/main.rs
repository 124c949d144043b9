use clap::{Parser, Subcommand};
use ollama_rag::Result;
use ollama_rag::commands::{chat, embed, init_config, list_models, search, show_config};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ollama-rag")]
#[command(about = "Chat, embeddings, and local similarity search against an Ollama server")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show or initialize the configuration
    Config {
        /// Write a default config file if none exists
        #[arg(long)]
        init: bool,
    },
    /// Send a chat prompt and print the model's answer
    Chat {
        /// The user prompt
        prompt: String,
        /// Optional system prompt
        #[arg(long)]
        system: Option<String>,
        /// Model to use instead of the configured chat model
        #[arg(long)]
        model: Option<String>,
        /// Print the answer incrementally as it streams
        #[arg(long)]
        stream: bool,
    },
    /// Create an embedding for a text and print the record as JSON
    Embed {
        /// The text to embed
        text: String,
        /// Record id attached to the embedding
        #[arg(long, default_value = "0")]
        id: String,
        /// Model to use instead of the configured embedding model
        #[arg(long)]
        model: Option<String>,
    },
    /// List models available on the server
    Models,
    /// Rank document files by similarity to a query
    Search {
        /// The question to search with
        query: String,
        /// Document files to index
        #[arg(required = true)]
        documents: Vec<PathBuf>,
        /// Maximum number of results
        #[arg(long, default_value_t = 3)]
        top: usize,
        /// Minimum similarity score for a document to match
        #[arg(long, default_value_t = 0.0)]
        min_score: f32,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Config { init } => {
            if init {
                init_config()?;
            } else {
                show_config()?;
            }
        }
        Commands::Chat {
            prompt,
            system,
            model,
            stream,
        } => {
            chat(&prompt, system, model, stream)?;
        }
        Commands::Embed { text, id, model } => {
            embed(&text, &id, model)?;
        }
        Commands::Models => {
            list_models()?;
        }
        Commands::Search {
            query,
            documents,
            top,
            min_score,
        } => {
            search(&query, &documents, top, min_score)?;
        }
    }

    Ok(())
}

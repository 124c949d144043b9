use anyhow::{Context, Result};
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

use crate::RagError;
use crate::client::{EmbeddingQuery, Message, OllamaClient, Query};
use crate::config::Config;
use crate::store::MemoryVectorStore;

/// Print the resolved configuration as TOML
#[inline]
pub fn show_config() -> Result<()> {
    let config = Config::load_default()?;
    let rendered = toml::to_string_pretty(&config).context("Failed to render configuration")?;

    println!("# {}", config.config_file_path().display());
    print!("{rendered}");
    Ok(())
}

/// Write a default config file if none exists yet
#[inline]
pub fn init_config() -> Result<()> {
    let config = Config::load_default()?;
    let path = config.config_file_path();

    if path.exists() {
        println!("Configuration already exists at {}", path.display());
        return Ok(());
    }

    config.save()?;
    println!("Wrote default configuration to {}", path.display());
    Ok(())
}

/// Send a chat prompt and print the model's answer
#[inline]
pub fn chat(
    prompt: &str,
    system: Option<String>,
    model: Option<String>,
    stream: bool,
) -> Result<()> {
    let config = Config::load_default()?;
    let client = OllamaClient::new(&config)?;
    let model = model.unwrap_or_else(|| config.ollama.chat_model.clone());

    info!("Sending chat prompt to model {}", model);

    let mut messages = Vec::new();
    if let Some(system) = system {
        messages.push(Message::new("system", &system));
    }
    messages.push(Message::new("user", prompt));

    let query = Query {
        model,
        messages,
        ..Default::default()
    };

    if stream {
        client.chat_stream(query, |event| {
            print!("{}", event.message.content);
            std::io::stdout().flush().map_err(RagError::from)?;
            Ok(())
        })?;
        println!();
    } else {
        let answer = client.chat(query)?;
        println!("{}", answer.message.content);
    }

    Ok(())
}

/// Create an embedding for a text and print the record as JSON
#[inline]
pub fn embed(text: &str, id: &str, model: Option<String>) -> Result<()> {
    let config = Config::load_default()?;
    let client = OllamaClient::new(&config)?;
    let model = model.unwrap_or_else(|| config.ollama.embedding_model.clone());

    let record = client.create_embedding(
        EmbeddingQuery {
            model,
            prompt: text.to_string(),
        },
        id,
    )?;

    info!(
        "Created embedding {} with {} dimensions",
        record.id,
        record.embedding.len()
    );
    println!(
        "{}",
        serde_json::to_string_pretty(&record).context("Failed to render record")?
    );
    Ok(())
}

/// List the models installed on the server
#[inline]
pub fn list_models() -> Result<()> {
    let config = Config::load_default()?;
    let client = OllamaClient::new(&config)?;

    let models = client.list_models()?;
    if models.is_empty() {
        println!("No models installed");
        return Ok(());
    }

    for model in models {
        match model.size {
            Some(size) => println!("{} ({:.1} GB)", model.name, size as f64 / 1e9),
            None => println!("{}", model.name),
        }
    }
    Ok(())
}

/// Embed document files into an in-memory store, then rank them against
/// the query
#[inline]
pub fn search(query: &str, documents: &[PathBuf], top: usize, min_score: f32) -> Result<()> {
    let config = Config::load_default()?;
    let client = OllamaClient::new(&config)?;
    let model = &config.ollama.embedding_model;

    let mut store = MemoryVectorStore::new();
    for path in documents {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read document: {}", path.display()))?;

        let record = client.create_embedding(
            EmbeddingQuery {
                model: model.clone(),
                prompt: text,
            },
            &path.display().to_string(),
        )?;
        info!(
            "Indexed {} ({} dimensions)",
            record.id,
            record.embedding.len()
        );
        store.upsert(record);
    }

    let question = client.create_embedding(
        EmbeddingQuery {
            model: model.clone(),
            prompt: query.to_string(),
        },
        "question",
    )?;

    let hits = store.search_top_n(&question.embedding, min_score, top);
    if hits.is_empty() {
        println!("No documents scored at or above {min_score}");
        return Ok(());
    }

    for hit in hits {
        println!("{:.4}  {}", hit.score, hit.record.id);
    }
    Ok(())
}


mod stream;
pub mod types;

pub use types::{
    Answer, EmbeddingQuery, Function, FunctionCall, Message, ModelDetails, ModelInfo, Options,
    Parameters, Property, Query, Tool, ToolCall,
};

use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use crate::config::Config;
use crate::store::VectorRecord;
use crate::{RagError, Result};

const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

const CHAT_ENDPOINT: &str = "/api/chat";
const EMBEDDINGS_ENDPOINT: &str = "/api/embeddings";
const TAGS_ENDPOINT: &str = "/api/tags";

/// Blocking HTTP client for an Ollama-compatible inference server
///
/// Transport faults are never retried internally; callers own any retry
/// policy. Timeouts are the agent's job, configured via [`with_timeout`].
///
/// [`with_timeout`]: OllamaClient::with_timeout
#[derive(Debug, Clone)]
pub struct OllamaClient {
    base_url: Url,
    agent: ureq::Agent,
    auth_header: Option<(String, String)>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    embedding: Vec<f32>,
}

#[derive(Debug, Deserialize)]
struct ModelsResponse {
    models: Vec<ModelInfo>,
}

fn build_agent(timeout: Duration) -> ureq::Agent {
    // Status handling stays with the client: a streamed body has to be
    // drained before the status decides the call's outcome.
    ureq::Agent::config_builder()
        .timeout_global(Some(timeout))
        .http_status_as_error(false)
        .build()
        .into()
}

impl OllamaClient {
    /// Create a client from a loaded configuration
    ///
    /// Picks up the server URL and, when both halves are set, the custom
    /// auth header pair.
    #[inline]
    pub fn new(config: &Config) -> Result<Self> {
        let base_url = config
            .ollama
            .server_url()
            .map_err(|e| RagError::Config(e.to_string()))?;

        let mut client = Self {
            base_url,
            agent: build_agent(Duration::from_secs(DEFAULT_TIMEOUT_SECONDS)),
            auth_header: None,
        };
        if let Some((name, value)) = config.auth.header_pair() {
            client = client.with_auth_header(name, value);
        }
        Ok(client)
    }

    /// Create a client pointing at a server URL such as
    /// `http://localhost:11434`
    #[inline]
    pub fn from_url(url: &str) -> Result<Self> {
        let base_url = Url::parse(url)
            .map_err(|e| RagError::Config(format!("Invalid server URL '{url}': {e}")))?;

        Ok(Self {
            base_url,
            agent: build_agent(Duration::from_secs(DEFAULT_TIMEOUT_SECONDS)),
            auth_header: None,
        })
    }

    /// Replace the transport timeout (default 30 seconds)
    #[inline]
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.agent = build_agent(timeout);
        self
    }

    /// Attach a custom header to every outbound request
    ///
    /// Intended for bearer-token-style authentication through a reverse
    /// proxy. The header is only attached when both name and value are
    /// non-empty.
    #[inline]
    #[must_use]
    pub fn with_auth_header(mut self, name: &str, value: &str) -> Self {
        if !name.is_empty() && !value.is_empty() {
            self.auth_header = Some((name.to_string(), value.to_string()));
        }
        self
    }

    /// Send a chat completion request and wait for the complete answer
    ///
    /// A non-success HTTP status is a [`RagError::Status`] fault; a body
    /// that cannot be parsed is a [`RagError::Json`] fault.
    #[inline]
    pub fn chat(&self, mut query: Query) -> Result<Answer> {
        query.stream = false;

        debug!("Sending chat request for model {}", query.model);

        let body = serde_json::to_string(&query)?;
        let mut response = self.send_post(CHAT_ENDPOINT, &body)?;

        let status = response.status();
        if !status.is_success() {
            warn!("Chat request failed with status {}", status);
            return Err(RagError::Status(status.as_u16()));
        }

        let text = response
            .body_mut()
            .read_to_string()
            .map_err(|e| RagError::Transport(format!("Failed to read chat response: {e}")))?;

        let answer: Answer = serde_json::from_str(&text)?;
        debug!(
            "Chat completed with {} bytes of content",
            answer.message.content.len()
        );
        Ok(answer)
    }

    /// Send a streaming chat request, invoking `on_chunk` for every event
    ///
    /// Events are dispatched strictly in arrival order; the returned
    /// answer is the assembled aggregate. Returning `Err` from the
    /// callback cancels the stream and that error becomes the call's
    /// result. No partial aggregate is returned on any failure path, so
    /// real-time consumption must happen in the callback.
    ///
    /// The HTTP status is checked after the stream is drained: a server
    /// can stream a normal-looking body and still report a non-success
    /// status, which is surfaced as [`RagError::Status`] even when every
    /// line decoded cleanly. The response body is released on every exit
    /// path.
    #[inline]
    pub fn chat_stream<F>(&self, mut query: Query, mut on_chunk: F) -> Result<Answer>
    where
        F: FnMut(Answer) -> Result<()>,
    {
        query.stream = true;

        debug!("Starting streaming chat request for model {}", query.model);

        let body = serde_json::to_string(&query)?;
        let response = self.send_post(CHAT_ENDPOINT, &body)?;

        let status = response.status();
        let reader = response.into_body().into_reader();

        let answer = stream::collect_stream(reader, &mut on_chunk)?;

        if !status.is_success() {
            warn!("Stream drained cleanly but server reported status {}", status);
            return Err(RagError::Status(status.as_u16()));
        }

        debug!(
            "Streaming chat completed with {} bytes of content",
            answer.message.content.len()
        );
        Ok(answer)
    }

    /// Create an embedding for a prompt and package it as a vector record
    /// under the given id
    #[inline]
    pub fn create_embedding(&self, query: EmbeddingQuery, id: &str) -> Result<VectorRecord> {
        debug!(
            "Creating embedding for prompt (length: {})",
            query.prompt.len()
        );

        let body = serde_json::to_string(&query)?;
        let mut response = self.send_post(EMBEDDINGS_ENDPOINT, &body)?;

        let status = response.status();
        if !status.is_success() {
            warn!("Embedding request failed with status {}", status);
            return Err(RagError::Status(status.as_u16()));
        }

        let text = response
            .body_mut()
            .read_to_string()
            .map_err(|e| RagError::Transport(format!("Failed to read embedding response: {e}")))?;

        let parsed: EmbeddingResponse = serde_json::from_str(&text)?;
        debug!(
            "Received embedding with {} dimensions",
            parsed.embedding.len()
        );

        Ok(VectorRecord {
            id: id.to_string(),
            text: query.prompt,
            embedding: parsed.embedding,
        })
    }

    /// Check that the server is reachable
    #[inline]
    pub fn ping(&self) -> Result<()> {
        debug!("Pinging server at {}", self.base_url);
        self.list_models()?;
        debug!("Server ping successful");
        Ok(())
    }

    /// List the models available on the server
    #[inline]
    pub fn list_models(&self) -> Result<Vec<ModelInfo>> {
        let mut response = self.send_get(TAGS_ENDPOINT)?;

        let status = response.status();
        if !status.is_success() {
            warn!("Model listing failed with status {}", status);
            return Err(RagError::Status(status.as_u16()));
        }

        let text = response
            .body_mut()
            .read_to_string()
            .map_err(|e| RagError::Transport(format!("Failed to read models response: {e}")))?;

        let parsed: ModelsResponse = serde_json::from_str(&text)?;
        debug!("Found {} models", parsed.models.len());
        Ok(parsed.models)
    }

    fn endpoint_url(&self, endpoint: &str) -> Result<Url> {
        self.base_url
            .join(endpoint)
            .map_err(|e| RagError::Config(format!("Failed to build URL for {endpoint}: {e}")))
    }

    fn send_post(&self, endpoint: &str, body: &str) -> Result<ureq::http::Response<ureq::Body>> {
        let url = self.endpoint_url(endpoint)?;

        let mut request = self
            .agent
            .post(url.as_str())
            .header("Content-Type", "application/json");
        if let Some((name, value)) = &self.auth_header {
            request = request.header(name.as_str(), value.as_str());
        }

        request
            .send(body)
            .map_err(|e| RagError::Transport(format!("Request to {url} failed: {e}")))
    }

    fn send_get(&self, endpoint: &str) -> Result<ureq::http::Response<ureq::Body>> {
        let url = self.endpoint_url(endpoint)?;

        let mut request = self.agent.get(url.as_str());
        if let Some((name, value)) = &self.auth_header {
            request = request.header(name.as_str(), value.as_str());
        }

        request
            .call()
            .map_err(|e| RagError::Transport(format!("Request to {url} failed: {e}")))
    }
}

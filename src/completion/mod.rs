//! Hosted language-model completion.
//!
//! - [`openai`]: OpenAI-compatible chat-completions client over HTTP

pub mod openai;

use async_trait::async_trait;
use thiserror::Error;

pub use openai::OpenAiClient;

#[derive(Error, Debug)]
pub enum CompletionError {
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Completion service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Completion response had no message content")]
    EmptyResponse,
}

/// Sends a single prompt to a language model and returns its text.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// One completion call: one user prompt in, the raw model text out.
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError>;

    /// Model identifier, for logging.
    fn model(&self) -> &str;
}

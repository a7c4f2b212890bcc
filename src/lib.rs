//! admissions-prompt-relay: prompt-template relay to a hosted chat model.
//!
//! Each HTTP route fills a fixed college-admissions prompt template with
//! fields from the request body, sends the prompt to an OpenAI-compatible
//! chat-completion service, and returns the model's text unmodified.

pub mod completion;
pub mod config;
pub mod prompt;
pub mod routes;
pub mod server;

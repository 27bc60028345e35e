//! Text Generation Backends
//!
//! The creature description comes from an LLM reached through the
//! [`LlmBackend`] trait, so tests can swap in a scripted backend.
//!
//! # Available Backends
//!
//! - **Ollama**: local LLM server (default)
//!
//! # Usage
//!
//! ```ignore
//! use summoner_core::backend::{LlmBackend, LlmRequest, OllamaBackend};
//!
//! let backend = OllamaBackend::new("localhost", 11434);
//! let request = LlmRequest::new("Describe a creature", "llama3.2");
//! let response = backend.send(&request).await?;
//! ```

mod ollama;
mod traits;

pub use ollama::OllamaBackend;
pub use traits::{LlmBackend, LlmRequest, LlmResponse};

//! Creature Generator
//!
//! Turns the player's offerings into a creature description. The call runs
//! under an explicit deadline and never fails: on timeout, transport error
//! or an empty reply the fixed summoning-error text is returned instead.

use std::sync::Arc;
use std::time::Duration;

use crate::backend::{LlmBackend, LlmRequest};
use crate::messages::{message, MessageKey};

/// Describes the summoned creature from the player's offerings
#[derive(Clone)]
pub struct CreatureGenerator {
    backend: Arc<dyn LlmBackend>,
    model: String,
    timeout: Duration,
}

impl CreatureGenerator {
    /// Create a generator using `backend` and `model`
    pub fn new(backend: Arc<dyn LlmBackend>, model: impl Into<String>, timeout: Duration) -> Self {
        Self {
            backend,
            model: model.into(),
            timeout,
        }
    }

    /// The description prompt followed by the offerings
    ///
    /// Commas inside an offering become spaces so the list stays unambiguous.
    pub fn build_prompt(responses: &[String]) -> String {
        let offerings = responses
            .iter()
            .map(|response| response.replace(',', " "))
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "{}{}",
            message(MessageKey::CreatureDescriptionPrompt),
            offerings
        )
    }

    /// The text used when generation fails
    pub fn fallback() -> &'static str {
        message(MessageKey::SummoningError)
    }

    /// Generate a description, falling back on timeout or failure
    pub async fn generate(&self, responses: &[String]) -> String {
        let request = LlmRequest::new(Self::build_prompt(responses), self.model.clone());

        match tokio::time::timeout(self.timeout, self.backend.send(&request)).await {
            Ok(Ok(response)) if !response.content.trim().is_empty() => {
                tracing::info!(
                    backend = self.backend.name(),
                    model = %response.model,
                    duration_ms = ?response.duration_ms,
                    "Creature described"
                );
                response.content
            }
            Ok(Ok(_)) => {
                tracing::warn!(backend = self.backend.name(), "Empty creature description");
                Self::fallback().to_string()
            }
            Ok(Err(e)) => {
                tracing::warn!(
                    backend = self.backend.name(),
                    error = %e,
                    "Creature description failed"
                );
                Self::fallback().to_string()
            }
            Err(_) => {
                tracing::warn!(
                    backend = self.backend.name(),
                    timeout_secs = self.timeout.as_secs_f64(),
                    "Creature description timed out"
                );
                Self::fallback().to_string()
            }
        }
    }
}

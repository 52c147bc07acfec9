//! Location Change Detector
//!
//! Decides whether a candidate scene takes place somewhere new. The answer
//! drives background regeneration, so anything short of an explicit "true"
//! keeps the current background.

use std::sync::Arc;

use crate::application::dto::ScenePayload;
use crate::application::ports::outbound::{ChatMessage, LlmPort, LlmRequest};
use crate::application::services::llm::prompt_builder::build_location_change_prompt;
use crate::domain::entities::Scene;

pub struct LocationChangeDetector<L: LlmPort + ?Sized> {
    llm: Arc<L>,
}

impl<L: LlmPort + ?Sized> LocationChangeDetector<L> {
    pub fn new(llm: Arc<L>) -> Self {
        Self { llm }
    }

    /// The opening scene always counts as a change of location
    pub async fn has_location_changed(
        &self,
        previous: Option<&Scene>,
        choice: Option<&str>,
        candidate: &ScenePayload,
    ) -> bool {
        let Some(previous) = previous else {
            return true;
        };

        let request = LlmRequest::new(vec![ChatMessage::user(build_location_change_prompt(
            previous, choice, candidate,
        ))])
        .with_system_prompt("You are a strict classifier. Reply with true or false only.")
        .with_temperature(0.0)
        .with_max_tokens(Some(5));

        match self.llm.generate(request).await {
            Ok(response) => {
                let changed = parse_verdict(&response.content);
                tracing::debug!(
                    verdict = %response.content.trim(),
                    changed,
                    "Location change classified"
                );
                changed
            }
            Err(e) => {
                tracing::warn!("Location change check failed, keeping background: {}", e);
                false
            }
        }
    }
}

/// Only the literal `true` counts
fn parse_verdict(content: &str) -> bool {
    content.trim().eq_ignore_ascii_case("true")
}

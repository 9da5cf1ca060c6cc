//! Bridges rig's `CompletionModel` trait to our `FreeFormResponder` trait.

use async_trait::async_trait;
use rig::completion::{AssistantContent, CompletionModel};

use crate::error::LlmError;
use crate::llm::responder::FreeFormResponder;
use crate::policy;
use crate::transcript::{Turn, render_turns};

/// Wraps any rig completion model as a `FreeFormResponder`.
pub struct RigResponder<M> {
    model: M,
    provider: &'static str,
    model_name: String,
}

impl<M> RigResponder<M> {
    pub fn new(model: M, provider: &'static str, model_name: &str) -> Self {
        Self {
            model,
            provider,
            model_name: model_name.to_string(),
        }
    }
}

#[async_trait]
impl<M: CompletionModel> FreeFormResponder for RigResponder<M> {
    async fn generate(
        &self,
        policy: &str,
        transcript: &[Turn],
        latest_user_message: &str,
    ) -> Result<String, LlmError> {
        let history = render_turns(transcript);
        let prompt = policy::free_form_prompt(&history, latest_user_message);

        let response = self
            .model
            .completion_request(prompt)
            .preamble(policy.to_string())
            .send()
            .await
            .map_err(|e| LlmError::RequestFailed {
                provider: self.provider.to_string(),
                reason: e.to_string(),
            })?;

        match response.choice.first() {
            AssistantContent::Text(text) => Ok(text.text),
            other => Err(LlmError::InvalidResponse {
                provider: self.provider.to_string(),
                reason: format!("expected text content, got {:?}", other),
            }),
        }
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}

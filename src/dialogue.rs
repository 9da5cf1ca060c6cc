//! Turn-by-turn orchestration: routes each user turn to the active flow or to
//! the free-form responder.

use std::sync::Arc;

use crate::error::Result;
use crate::flow::{FlowCatalog, FlowSession};
use crate::llm::FreeFormResponder;
use crate::transcript::Transcript;

/// Everything a channel gathered for one turn.
#[derive(Debug, Clone, Default)]
pub struct TurnInput {
    /// Flow the user picked this turn, if any.
    pub selected_flow: Option<String>,
    /// The user's message this turn, if any.
    pub message: Option<String>,
    /// The user asked to wipe the conversation.
    pub clear_requested: bool,
}

impl TurnInput {
    pub fn message(text: impl Into<String>) -> Self {
        Self {
            message: Some(text.into()),
            ..Self::default()
        }
    }

    pub fn flow_selection(name: impl Into<String>) -> Self {
        Self {
            selected_flow: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn clear() -> Self {
        Self {
            clear_requested: true,
            ..Self::default()
        }
    }

    pub fn with_message(mut self, text: impl Into<String>) -> Self {
        self.message = Some(text.into());
        self
    }
}

/// Drives one conversation turn at a time.
///
/// The controller owns the flow catalog, the responder, and the standing
/// policy. Session and transcript state belong to the caller, so a single
/// controller serves any number of concurrent conversations.
pub struct DialogueController {
    catalog: Arc<FlowCatalog>,
    responder: Arc<dyn FreeFormResponder>,
    policy: String,
}

impl DialogueController {
    pub fn new(
        catalog: Arc<FlowCatalog>,
        responder: Arc<dyn FreeFormResponder>,
        policy: String,
    ) -> Self {
        Self {
            catalog,
            responder,
            policy,
        }
    }

    pub fn catalog(&self) -> &FlowCatalog {
        &self.catalog
    }

    /// Process one user turn.
    ///
    /// Order of precedence: a clear request wipes everything; a new flow
    /// selection (re)starts that flow; then, if a message is present, it is
    /// answered by the active flow or the free-form responder. Returns the
    /// assistant's reply, or `None` when the turn produced no reply (clear,
    /// selection only, or empty message).
    ///
    /// When the responder fails, the user's message stays in the transcript
    /// with no assistant turn; the caller may surface the error and retry.
    pub async fn handle_turn(
        &self,
        input: TurnInput,
        session: &mut FlowSession,
        transcript: &mut Transcript,
    ) -> Result<Option<String>> {
        if input.clear_requested {
            tracing::info!("Clearing conversation state");
            transcript.clear();
            session.reset();
            return Ok(None);
        }

        if let Some(selected) = &input.selected_flow {
            if session.active_flow() != Some(selected.as_str()) {
                session.start(&self.catalog, selected)?;
            }
        }

        let message = match input.message {
            Some(m) if !m.trim().is_empty() => m,
            _ => return Ok(None),
        };

        transcript.push_user(&message);

        if session.is_in_flow() {
            let reply = session.advance(&self.catalog, &message)?;
            transcript.push_assistant(&reply);
            return Ok(Some(reply));
        }

        // Free-form: the responder sees the history up to, but not
        // including, the message it is answering.
        let prior = &transcript.turns()[..transcript.len() - 1];
        let reply = self
            .responder
            .generate(&self.policy, prior, &message)
            .await?;
        tracing::debug!(model = self.responder.model_name(), "Free-form reply generated");
        transcript.push_assistant(&reply);
        Ok(Some(reply))
    }
}

//! Per-conversation flow state: where the user is and what they have told us.

use serde::{Deserialize, Serialize};

use crate::error::FlowError;
use crate::flow::catalog::FlowCatalog;
use crate::flow::definition::CollectedInfo;

/// Message sent when a flow reaches its final step and completes.
pub const CLOSING_MESSAGE: &str =
    "Thank you for providing all the information. Is there anything else I can help you with?";

/// The flow and step a session is currently on.
///
/// A session either has both a flow and a step, or neither. Bundling them
/// keeps the two from drifting apart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivePosition {
    pub flow: String,
    pub step: String,
}

/// Mutable flow state for one conversation.
///
/// Holds no flow definitions itself; every operation takes the catalog so the
/// session stays a small serializable value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FlowSession {
    active: Option<ActivePosition>,
    collected: CollectedInfo,
}

impl FlowSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_in_flow(&self) -> bool {
        self.active.is_some()
    }

    pub fn active_flow(&self) -> Option<&str> {
        self.active.as_ref().map(|p| p.flow.as_str())
    }

    pub fn current_step(&self) -> Option<&str> {
        self.active.as_ref().map(|p| p.step.as_str())
    }

    pub fn collected(&self) -> &CollectedInfo {
        &self.collected
    }

    /// Enter the named flow at its first step.
    ///
    /// Any previously collected info is discarded, including when switching
    /// away from an unfinished flow. Starting over means starting clean.
    pub fn start(&mut self, catalog: &FlowCatalog, name: &str) -> Result<(), FlowError> {
        let flow = catalog.lookup(name)?;
        // Catalogs reject empty flows at build time.
        let first = flow.first_step().ok_or_else(|| FlowError::UnknownStep {
            flow: name.to_string(),
            step: "<first>".to_string(),
        })?;

        self.active = Some(ActivePosition {
            flow: flow.name.to_string(),
            step: first.id.to_string(),
        });
        self.collected.clear();
        tracing::debug!(flow = name, step = first.id, "Started flow");
        Ok(())
    }

    /// Prompt text for the current step, or `None` when no flow is active.
    pub fn current_prompt(&self, catalog: &FlowCatalog) -> Option<String> {
        let position = self.active.as_ref()?;
        let flow = catalog.lookup(&position.flow).ok()?;
        let step = flow.step(&position.step)?;
        Some(step.prompt.resolve(&self.collected))
    }

    /// Record the user's reply to the current step and move to the next one.
    ///
    /// The raw reply is stored whole under every key the step requires. On
    /// an intermediate step the returned string is the next step's prompt;
    /// on the final step the flow completes, state resets, and the closing
    /// message is returned. Lookups happen before any mutation, so a failed
    /// advance leaves the session untouched.
    pub fn advance(&mut self, catalog: &FlowCatalog, reply: &str) -> Result<String, FlowError> {
        let (flow_name, step_id) = match &self.active {
            Some(position) => (position.flow.clone(), position.step.clone()),
            None => return Err(FlowError::NoActiveFlow),
        };

        let flow = catalog.lookup(&flow_name)?;
        let step = flow.step(&step_id).ok_or_else(|| FlowError::UnknownStep {
            flow: flow_name.clone(),
            step: step_id.clone(),
        })?;
        let next = match step.next_step {
            Some(next_id) => {
                let next_step = flow.step(next_id).ok_or_else(|| FlowError::UnknownStep {
                    flow: flow_name.clone(),
                    step: next_id.to_string(),
                })?;
                Some((next_id.to_string(), next_step.prompt))
            }
            None => None,
        };
        let required: Vec<&'static str> = step.required_info.to_vec();

        for key in required {
            self.collected.insert(key.to_string(), reply.to_string());
        }

        match next {
            Some((next_id, prompt)) => {
                let text = prompt.resolve(&self.collected);
                if let Some(position) = self.active.as_mut() {
                    position.step = next_id.clone();
                }
                tracing::debug!(flow = %flow_name, step = %next_id, "Advanced flow");
                Ok(text)
            }
            None => {
                tracing::debug!(flow = %flow_name, "Flow completed");
                self.reset();
                Ok(CLOSING_MESSAGE.to_string())
            }
        }
    }

    /// Leave any active flow and forget everything collected.
    pub fn reset(&mut self) {
        self.active = None;
        self.collected.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> FlowCatalog {
        FlowCatalog::builtin().unwrap()
    }

    #[test]
    fn test_start_enters_first_step_with_clean_state() {
        let catalog = catalog();
        let mut session = FlowSession::new();

        session.start(&catalog, "urgent_care_booking").unwrap();
        assert!(session.is_in_flow());
        assert_eq!(session.active_flow(), Some("urgent_care_booking"));
        assert_eq!(session.current_step(), Some("initial_symptoms"));
        assert!(session.collected().is_empty());
    }

    #[test]
    fn test_start_unknown_flow_fails_and_leaves_session_idle() {
        let catalog = catalog();
        let mut session = FlowSession::new();

        let err = session.start(&catalog, "no_such_flow").unwrap_err();
        assert!(matches!(err, FlowError::UnknownFlow { .. }));
        assert!(!session.is_in_flow());
    }

    #[test]
    fn test_current_prompt_none_when_idle() {
        let catalog = catalog();
        let session = FlowSession::new();
        assert!(session.current_prompt(&catalog).is_none());
    }

    #[test]
    fn test_current_prompt_is_idempotent() {
        let catalog = catalog();
        let mut session = FlowSession::new();
        session.start(&catalog, "post_surgical_recovery").unwrap();

        let first = session.current_prompt(&catalog).unwrap();
        let second = session.current_prompt(&catalog).unwrap();
        assert_eq!(first, second);
        assert_eq!(session.current_step(), Some("verify_procedure"));
    }

    #[test]
    fn test_advance_without_active_flow_fails() {
        let catalog = catalog();
        let mut session = FlowSession::new();
        let err = session.advance(&catalog, "hello").unwrap_err();
        assert!(matches!(err, FlowError::NoActiveFlow));
    }

    #[test]
    fn test_urgent_care_walk_ends_with_closing_message() {
        let catalog = catalog();
        let mut session = FlowSession::new();
        session.start(&catalog, "urgent_care_booking").unwrap();

        let expected_steps = [
            "verify_urgency",
            "collect_patient_info",
            "time_preference",
            "confirmation",
            "final_instructions",
        ];
        for expected in expected_steps {
            session.advance(&catalog, "reply").unwrap();
            assert_eq!(session.current_step(), Some(expected));
        }

        let closing = session.advance(&catalog, "no directions needed").unwrap();
        assert_eq!(closing, CLOSING_MESSAGE);
        assert!(!session.is_in_flow());
        assert!(session.collected().is_empty());
    }

    #[test]
    fn test_every_builtin_flow_walks_to_completion() {
        let catalog = catalog();
        for (_, name) in crate::flow::catalog::FLOW_OPTIONS {
            let mut session = FlowSession::new();
            session.start(&catalog, name).unwrap();

            let steps = catalog.lookup(name).unwrap().steps.len();
            for i in 0..steps {
                let message = session.advance(&catalog, "answer").unwrap();
                if i == steps - 1 {
                    assert_eq!(message, CLOSING_MESSAGE, "flow {name}");
                } else {
                    assert!(!message.is_empty(), "flow {name} step {i}");
                }
            }
            assert!(!session.is_in_flow(), "flow {name} should be complete");
        }
    }

    #[test]
    fn test_reply_stored_under_every_required_key() {
        let catalog = catalog();
        let mut session = FlowSession::new();
        session.start(&catalog, "urgent_care_booking").unwrap();

        session
            .advance(&catalog, "sharp chest pain since this morning")
            .unwrap();

        let collected = session.collected();
        assert_eq!(
            collected.get("symptoms").map(String::as_str),
            Some("sharp chest pain since this morning")
        );
        assert_eq!(
            collected.get("severity").map(String::as_str),
            Some("sharp chest pain since this morning")
        );
    }

    #[test]
    fn test_switching_flows_discards_collected_info() {
        let catalog = catalog();
        let mut session = FlowSession::new();

        session.start(&catalog, "urgent_care_booking").unwrap();
        session.advance(&catalog, "fever").unwrap();
        assert!(!session.collected().is_empty());

        session.start(&catalog, "medication_alerts").unwrap();
        assert_eq!(session.active_flow(), Some("medication_alerts"));
        assert_eq!(session.current_step(), Some("initial_info"));
        assert!(session.collected().is_empty());
    }

    #[test]
    fn test_generated_confirmation_prompt_reflects_replies() {
        let catalog = catalog();
        let mut session = FlowSession::new();
        session.start(&catalog, "medication_alerts").unwrap();

        session.advance(&catalog, "For my mother Jane").unwrap();
        session.advance(&catalog, "Metformin 500mg twice daily").unwrap();
        let summary = session.advance(&catalog, "Email, 15 minutes").unwrap();

        assert!(summary.contains("Medications Schedule: Metformin 500mg twice daily"));
        assert!(summary.contains("Alert Method: Email, 15 minutes"));
        assert!(summary.contains("Would you like to confirm this setup?"));
    }

    #[test]
    fn test_reset_clears_everything() {
        let catalog = catalog();
        let mut session = FlowSession::new();
        session.start(&catalog, "urgent_care_booking").unwrap();
        session.advance(&catalog, "headache").unwrap();

        session.reset();
        assert!(!session.is_in_flow());
        assert!(session.collected().is_empty());
        assert!(session.current_prompt(&catalog).is_none());
    }

    #[test]
    fn test_session_serde_roundtrip_mid_flow() {
        let catalog = catalog();
        let mut session = FlowSession::new();
        session.start(&catalog, "post_surgical_recovery").unwrap();
        session.advance(&catalog, "knee replacement, last Tuesday").unwrap();

        let json = serde_json::to_string(&session).unwrap();
        let mut restored: FlowSession = serde_json::from_str(&json).unwrap();

        assert_eq!(restored.active_flow(), Some("post_surgical_recovery"));
        assert_eq!(restored.current_step(), Some("current_status"));
        assert_eq!(
            restored.collected().get("procedure").map(String::as_str),
            Some("knee replacement, last Tuesday")
        );

        // The restored session keeps walking from where it left off.
        restored.advance(&catalog, "feeling okay").unwrap();
        assert_eq!(restored.current_step(), Some("review_instructions"));
    }
}

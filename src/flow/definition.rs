//! Static building blocks of a conversation flow.

use std::collections::HashMap;

/// Everything a flow has collected so far, keyed by required-info name.
///
/// Values are the user's raw replies. The assistant deliberately does not
/// parse replies into fields; each reply is stored whole under every key the
/// step asks for.
pub type CollectedInfo = HashMap<String, String>;

/// Prompt text for a step.
///
/// Most steps carry a fixed literal. A few assemble their text from what the
/// flow has collected so far, such as the medication alert summary.
#[derive(Debug, Clone, Copy)]
pub enum Prompt {
    Literal(&'static str),
    Generated(fn(&CollectedInfo) -> String),
}

impl Prompt {
    /// Produce the prompt text for the current state of the flow.
    pub fn resolve(&self, collected: &CollectedInfo) -> String {
        match self {
            Prompt::Literal(text) => (*text).to_string(),
            Prompt::Generated(build) => build(collected),
        }
    }
}

/// One step in a flow.
#[derive(Debug, Clone, Copy)]
pub struct StepDefinition {
    pub id: &'static str,
    pub prompt: Prompt,
    /// Keys the user's reply to this step is stored under.
    pub required_info: &'static [&'static str],
    /// The step that follows, or `None` when this step ends the flow.
    pub next_step: Option<&'static str>,
}

/// A named, linear sequence of steps.
#[derive(Debug, Clone)]
pub struct FlowDefinition {
    pub name: &'static str,
    /// Steps in definition order; the first entry is the entry point.
    pub steps: Vec<StepDefinition>,
}

impl FlowDefinition {
    /// The entry-point step, if the flow has any steps at all.
    pub fn first_step(&self) -> Option<&StepDefinition> {
        self.steps.first()
    }

    /// Look up a step by id.
    pub fn step(&self, id: &str) -> Option<&StepDefinition> {
        self.steps.iter().find(|s| s.id == id)
    }
}

//! Guided conversation flows: static definitions, the validated catalog, and
//! per-conversation session state.

pub mod catalog;
pub mod definition;
pub mod session;

pub use catalog::{FLOW_OPTIONS, FlowCatalog};
pub use definition::{CollectedInfo, FlowDefinition, Prompt, StepDefinition};
pub use session::{ActivePosition, CLOSING_MESSAGE, FlowSession};

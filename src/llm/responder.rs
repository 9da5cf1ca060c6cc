//! The seam between the dialogue controller and whatever model backs it.

use async_trait::async_trait;

use crate::error::LlmError;
use crate::transcript::Turn;

/// Produces free-form assistant replies for messages outside any flow.
///
/// Implementations receive the standing policy, the conversation so far (not
/// including the latest message), and the latest user message. Tests inject
/// deterministic stubs; production uses a rig-backed model.
#[async_trait]
pub trait FreeFormResponder: Send + Sync {
    async fn generate(
        &self,
        policy: &str,
        transcript: &[Turn],
        latest_user_message: &str,
    ) -> Result<String, LlmError>;

    /// Name of the underlying model, for logging.
    fn model_name(&self) -> &str;
}

//! Configuration types.

use crate::policy;

/// Assistant configuration.
#[derive(Debug, Clone)]
pub struct AssistantConfig {
    /// Assistant name for identification.
    pub name: String,
    /// Standing instructions sent with every free-form request.
    pub policy: String,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            name: "care-assist".to_string(),
            policy: policy::BASE_POLICY.to_string(),
        }
    }
}

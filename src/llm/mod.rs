//! LLM integration for Care Assist.
//!
//! Supports:
//! - **Gemini**: Direct API access via rig-core
//! - **Anthropic**: Direct API access via rig-core
//!
//! Uses the rig-core crate for HTTP transport and the `RigResponder` to
//! bridge rig's `CompletionModel` trait to our `FreeFormResponder` trait.

pub mod responder;
mod rig_adapter;

pub use responder::FreeFormResponder;
pub use rig_adapter::RigResponder;

use std::str::FromStr;
use std::sync::Arc;

use rig::client::CompletionClient;
use secrecy::ExposeSecret;

use crate::error::{ConfigError, LlmError};

/// Supported LLM backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmBackend {
    Gemini,
    Anthropic,
}

impl FromStr for LlmBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "gemini" => Ok(LlmBackend::Gemini),
            "anthropic" => Ok(LlmBackend::Anthropic),
            other => Err(ConfigError::InvalidValue {
                key: "backend".to_string(),
                message: format!("unknown backend '{}', expected gemini or anthropic", other),
            }),
        }
    }
}

/// Configuration for creating a responder.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub backend: LlmBackend,
    pub api_key: secrecy::SecretString,
    pub model: String,
}

/// Create a free-form responder from configuration.
pub fn create_responder(config: &LlmConfig) -> Result<Arc<dyn FreeFormResponder>, LlmError> {
    match config.backend {
        LlmBackend::Gemini => create_gemini_responder(config),
        LlmBackend::Anthropic => create_anthropic_responder(config),
    }
}

fn create_gemini_responder(config: &LlmConfig) -> Result<Arc<dyn FreeFormResponder>, LlmError> {
    use rig::providers::gemini;

    let client: rig::client::Client<gemini::client::GeminiExt> =
        gemini::Client::new(config.api_key.expose_secret()).map_err(|e| {
            LlmError::RequestFailed {
                provider: "gemini".to_string(),
                reason: format!("Failed to create Gemini client: {}", e),
            }
        })?;

    let model = client.completion_model(&config.model);
    tracing::info!("Using Gemini (model: {})", config.model);
    Ok(Arc::new(RigResponder::new(model, "gemini", &config.model)))
}

fn create_anthropic_responder(config: &LlmConfig) -> Result<Arc<dyn FreeFormResponder>, LlmError> {
    use rig::providers::anthropic;

    let client: rig::client::Client<anthropic::client::AnthropicExt> =
        anthropic::Client::new(config.api_key.expose_secret()).map_err(|e| {
            LlmError::RequestFailed {
                provider: "anthropic".to_string(),
                reason: format!("Failed to create Anthropic client: {}", e),
            }
        })?;

    let model = client.completion_model(&config.model);
    tracing::info!("Using Anthropic (model: {})", config.model);
    Ok(Arc::new(RigResponder::new(
        model,
        "anthropic",
        &config.model,
    )))
}

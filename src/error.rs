//! Error types for Care Assist.

/// Top-level error type for the assistant.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Flow error: {0}")]
    Flow(#[from] FlowError),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Channel error: {0}")]
    Channel(#[from] ChannelError),
}

/// Configuration loading and validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Structural problems in a flow definition, caught when the catalog is built.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Flow '{flow}' has no steps")]
    EmptyFlow { flow: String },

    #[error("Flow '{flow}' defines step '{step}' more than once")]
    DuplicateStep { flow: String, step: String },

    #[error("Flow '{flow}' step '{step}' transitions to unknown step '{target}'")]
    DanglingTransition {
        flow: String,
        step: String,
        target: String,
    },

    #[error("Flow '{flow}' revisits step '{step}'")]
    StepRevisited { flow: String, step: String },

    #[error("Flow '{flow}' step '{step}' is unreachable from the first step")]
    UnreachableStep { flow: String, step: String },
}

/// Errors raised while driving a flow session.
#[derive(Debug, thiserror::Error)]
pub enum FlowError {
    #[error("Unknown flow: {name}")]
    UnknownFlow { name: String },

    #[error("Flow '{flow}' has no step '{step}'")]
    UnknownStep { flow: String, step: String },

    #[error("No active flow to advance")]
    NoActiveFlow,
}

/// LLM provider errors.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("Request to {provider} failed: {reason}")]
    RequestFailed { provider: String, reason: String },

    #[error("Unusable response from {provider}: {reason}")]
    InvalidResponse { provider: String, reason: String },

    #[error("Authentication with {provider} failed")]
    AuthFailed { provider: String },
}

/// Channel I/O errors.
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    #[error("Failed to send on channel '{name}': {reason}")]
    SendFailed { name: String, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, Error>;

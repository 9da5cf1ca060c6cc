use std::sync::Arc;

use care_assist::channels::CliChannel;
use care_assist::config::AssistantConfig;
use care_assist::dialogue::DialogueController;
use care_assist::flow::FlowCatalog;
use care_assist::llm::{LlmBackend, LlmConfig, create_responder};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let backend: LlmBackend = std::env::var("CARE_ASSIST_LLM")
        .unwrap_or_else(|_| "gemini".to_string())
        .parse()?;

    let (key_var, default_model) = match backend {
        LlmBackend::Gemini => ("GEMINI_API_KEY", "gemini-pro"),
        LlmBackend::Anthropic => ("ANTHROPIC_API_KEY", "claude-sonnet-4-20250514"),
    };

    let api_key = std::env::var(key_var).unwrap_or_else(|_| {
        eprintln!("Error: {} not set", key_var);
        eprintln!("  export {}=...", key_var);
        std::process::exit(1);
    });

    let model =
        std::env::var("CARE_ASSIST_MODEL").unwrap_or_else(|_| default_model.to_string());

    let config = AssistantConfig::default();

    eprintln!("🩺 {} v{}", config.name, env!("CARGO_PKG_VERSION"));
    eprintln!("   Model: {}", model);
    eprintln!("   Type a message and press Enter. /flows lists flows, /quit exits.\n");

    let llm_config = LlmConfig {
        backend,
        api_key: secrecy::SecretString::from(api_key),
        model,
    };
    let responder = create_responder(&llm_config)?;

    let catalog = Arc::new(FlowCatalog::builtin()?);

    let controller = Arc::new(DialogueController::new(catalog, responder, config.policy));

    CliChannel::new(controller).run().await?;

    Ok(())
}

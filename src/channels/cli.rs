//! CLI channel — stdin/stdout REPL driving the dialogue controller.

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use uuid::Uuid;

use crate::dialogue::{DialogueController, TurnInput};
use crate::error::{ChannelError, Error};
use crate::flow::{FLOW_OPTIONS, FlowSession};
use crate::transcript::Transcript;

/// A simple CLI channel that reads from stdin and writes to stdout.
///
/// Commands:
/// - `/flows` lists the available flows
/// - `/flow <name>` starts a flow (name or display label)
/// - `/clear` wipes the conversation
/// - `/quit` or `/exit` ends the session
///
/// Anything else is treated as a message for the assistant.
pub struct CliChannel {
    controller: Arc<DialogueController>,
}

impl CliChannel {
    pub fn new(controller: Arc<DialogueController>) -> Self {
        Self { controller }
    }

    pub async fn run(&self) -> Result<(), Error> {
        let conversation_id = Uuid::new_v4();
        tracing::info!(%conversation_id, "CLI session started");

        let mut session = FlowSession::new();
        let mut transcript = Transcript::new();

        let stdin = tokio::io::stdin();
        let reader = BufReader::new(stdin);
        let mut lines = reader.lines();

        eprint!("> ");
        loop {
            let line = match lines.next_line().await.map_err(ChannelError::Io)? {
                Some(line) => line.trim().to_string(),
                None => break, // EOF
            };

            if line.is_empty() {
                eprint!("> ");
                continue;
            }

            let input = match line.as_str() {
                "/quit" | "/exit" => break,
                "/flows" => {
                    for (label, name) in FLOW_OPTIONS {
                        println!("  {} ({})", label, name);
                    }
                    eprint!("> ");
                    continue;
                }
                "/clear" => TurnInput::clear(),
                _ => {
                    if let Some(choice) = line.strip_prefix("/flow ") {
                        match resolve_flow_name(choice.trim()) {
                            Some(name) => TurnInput::flow_selection(name),
                            None => {
                                eprintln!("Unknown flow '{}'. Try /flows.", choice.trim());
                                eprint!("> ");
                                continue;
                            }
                        }
                    } else {
                        TurnInput::message(&line)
                    }
                }
            };

            let started_flow = input.selected_flow.is_some();
            match self
                .controller
                .handle_turn(input, &mut session, &mut transcript)
                .await
            {
                Ok(Some(reply)) => println!("\n{}\n", reply),
                Ok(None) => {
                    // A bare selection prints the flow's opening prompt.
                    if started_flow {
                        if let Some(prompt) = session.current_prompt(self.controller.catalog()) {
                            println!("\n{}\n", prompt);
                        }
                    }
                }
                Err(Error::Llm(e)) => {
                    tracing::error!("LLM request failed: {}", e);
                    eprintln!("Assistant unavailable, please retry.");
                }
                Err(e) => eprintln!("Error: {}", e),
            }
            eprint!("> ");
        }

        tracing::info!(%conversation_id, "CLI session ended");
        Ok(())
    }
}

/// Match a user-typed flow choice against names and display labels.
fn resolve_flow_name(choice: &str) -> Option<&'static str> {
    FLOW_OPTIONS.iter().find_map(|(label, name)| {
        if choice.eq_ignore_ascii_case(name) || choice.eq_ignore_ascii_case(label) {
            Some(*name)
        } else {
            None
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_flow_name_accepts_names_and_labels() {
        assert_eq!(
            resolve_flow_name("urgent_care_booking"),
            Some("urgent_care_booking")
        );
        assert_eq!(
            resolve_flow_name("Urgent Care Booking"),
            Some("urgent_care_booking")
        );
        assert_eq!(
            resolve_flow_name("medication alerts setup"),
            Some("medication_alerts")
        );
        assert_eq!(resolve_flow_name("nope"), None);
    }
}

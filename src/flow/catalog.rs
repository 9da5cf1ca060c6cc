//! The built-in conversation flows and the validated registry that holds them.

use std::collections::{HashMap, HashSet};

use crate::error::{CatalogError, FlowError};
use crate::flow::definition::{CollectedInfo, FlowDefinition, Prompt, StepDefinition};

/// Display label and flow name for each selectable flow, in menu order.
pub const FLOW_OPTIONS: [(&str, &str); 3] = [
    ("Urgent Care Booking", "urgent_care_booking"),
    ("Post-Surgical Recovery", "post_surgical_recovery"),
    ("Medication Alerts Setup", "medication_alerts"),
];

/// Registry of flow definitions, validated at construction.
///
/// Validation rejects empty flows, duplicate step ids, transitions to unknown
/// steps, revisited steps, and steps unreachable from the entry point. A
/// catalog that constructs successfully can be walked without runtime
/// surprises.
#[derive(Debug)]
pub struct FlowCatalog {
    flows: HashMap<&'static str, FlowDefinition>,
}

impl FlowCatalog {
    /// Build a catalog from the given flows, validating each.
    pub fn new(flows: Vec<FlowDefinition>) -> Result<Self, CatalogError> {
        let mut map = HashMap::new();
        for flow in flows {
            validate_flow(&flow)?;
            map.insert(flow.name, flow);
        }
        Ok(Self { flows: map })
    }

    /// The three built-in healthcare flows.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::new(vec![
            urgent_care_booking(),
            post_surgical_recovery(),
            medication_alerts(),
        ])
    }

    /// Look up a flow by name.
    pub fn lookup(&self, name: &str) -> Result<&FlowDefinition, FlowError> {
        self.flows.get(name).ok_or_else(|| FlowError::UnknownFlow {
            name: name.to_string(),
        })
    }

    /// Names of all registered flows.
    pub fn flow_names(&self) -> Vec<&'static str> {
        self.flows.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.flows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flows.is_empty()
    }
}

/// Check one flow's structure before it is admitted to the catalog.
fn validate_flow(flow: &FlowDefinition) -> Result<(), CatalogError> {
    let first = flow.first_step().ok_or_else(|| CatalogError::EmptyFlow {
        flow: flow.name.to_string(),
    })?;

    let mut ids = HashSet::new();
    for step in &flow.steps {
        if !ids.insert(step.id) {
            return Err(CatalogError::DuplicateStep {
                flow: flow.name.to_string(),
                step: step.id.to_string(),
            });
        }
    }

    // Walk the chain from the entry point. Each step may be visited once.
    let mut visited = HashSet::new();
    let mut current = first;
    loop {
        if !visited.insert(current.id) {
            return Err(CatalogError::StepRevisited {
                flow: flow.name.to_string(),
                step: current.id.to_string(),
            });
        }
        match current.next_step {
            Some(target) => {
                current = flow.step(target).ok_or_else(|| {
                    CatalogError::DanglingTransition {
                        flow: flow.name.to_string(),
                        step: current.id.to_string(),
                        target: target.to_string(),
                    }
                })?;
            }
            None => break,
        }
    }

    for step in &flow.steps {
        if !visited.contains(step.id) {
            return Err(CatalogError::UnreachableStep {
                flow: flow.name.to_string(),
                step: step.id.to_string(),
            });
        }
    }

    Ok(())
}

fn urgent_care_booking() -> FlowDefinition {
    FlowDefinition {
        name: "urgent_care_booking",
        steps: vec![
            StepDefinition {
                id: "initial_symptoms",
                prompt: Prompt::Literal(
                    "I understand you need an urgent care appointment. Could you please describe your current symptoms or urgent care needs?",
                ),
                required_info: &["symptoms", "severity"],
                next_step: Some("verify_urgency"),
            },
            StepDefinition {
                id: "verify_urgency",
                prompt: Prompt::Literal(
                    "Based on your symptoms, I'll help schedule an urgent care visit. Do you have any of these severe symptoms: severe pain, difficulty breathing, or high fever?",
                ),
                required_info: &["urgency_level"],
                next_step: Some("collect_patient_info"),
            },
            StepDefinition {
                id: "collect_patient_info",
                prompt: Prompt::Literal(
                    "To schedule your appointment, I'll need:\n- Your full name\n- Date of birth\n- Insurance provider (if any)\nPlease provide these details.",
                ),
                required_info: &["name", "dob", "insurance"],
                next_step: Some("time_preference"),
            },
            StepDefinition {
                id: "time_preference",
                prompt: Prompt::Literal(
                    "We have the following urgent care slots available today:\n- 10:00 AM\n- 11:30 AM\n- 2:00 PM\nWhich time works best for you?",
                ),
                required_info: &["preferred_time"],
                next_step: Some("confirmation"),
            },
            StepDefinition {
                id: "confirmation",
                prompt: Prompt::Literal(
                    "I'll confirm your urgent care appointment for [time] today. Would you like me to proceed with the booking?",
                ),
                required_info: &["confirmation"],
                next_step: Some("final_instructions"),
            },
            StepDefinition {
                id: "final_instructions",
                prompt: Prompt::Literal(
                    "Your appointment is confirmed. Please bring:\n- Photo ID\n- Insurance card\n- List of current medications\n- Mask\nPlease arrive 15 minutes early. Do you need directions to the facility?",
                ),
                required_info: &["needs_directions"],
                next_step: None,
            },
        ],
    }
}

fn post_surgical_recovery() -> FlowDefinition {
    FlowDefinition {
        name: "post_surgical_recovery",
        steps: vec![
            StepDefinition {
                id: "verify_procedure",
                prompt: Prompt::Literal(
                    "To provide accurate recovery instructions, could you confirm which surgical procedure you had and when it was performed?",
                ),
                required_info: &["procedure", "surgery_date"],
                next_step: Some("current_status"),
            },
            StepDefinition {
                id: "current_status",
                prompt: Prompt::Literal(
                    "How are you feeling now? Any specific concerns about your recovery?",
                ),
                required_info: &["current_symptoms", "concerns"],
                next_step: Some("review_instructions"),
            },
            StepDefinition {
                id: "review_instructions",
                prompt: Prompt::Literal(
                    "Let's review your post-surgical care instructions. Which aspect would you like to discuss first:\n- Pain management\n- Wound care\n- Activity restrictions\n- Follow-up appointments",
                ),
                required_info: &["topic_preference"],
                next_step: Some("specific_guidance"),
            },
            StepDefinition {
                id: "specific_guidance",
                prompt: Prompt::Literal(
                    "I'll provide specific guidance for [topic]. What questions do you have about this aspect of your recovery?",
                ),
                required_info: &["understanding"],
                next_step: Some("next_steps"),
            },
            StepDefinition {
                id: "next_steps",
                prompt: Prompt::Literal(
                    "Based on your recovery timeline, here are your next steps. Would you like me to schedule your follow-up appointment?",
                ),
                required_info: &["schedule_followup"],
                next_step: None,
            },
        ],
    }
}

fn medication_alerts() -> FlowDefinition {
    FlowDefinition {
        name: "medication_alerts",
        steps: vec![
            StepDefinition {
                id: "initial_info",
                prompt: Prompt::Literal(
                    "I'll help set up medication alerts. Please provide:\n- Patient's name\n- Your relationship to them\n- Any existing medication schedule",
                ),
                required_info: &["patient_name", "relationship", "current_schedule"],
                next_step: Some("medication_details"),
            },
            StepDefinition {
                id: "medication_details",
                prompt: Prompt::Literal(
                    "For each medication, please provide:\n- Name\n- Dosage\n- Frequency\n- Special instructions",
                ),
                required_info: &["medications"],
                next_step: Some("alert_preferences"),
            },
            StepDefinition {
                id: "alert_preferences",
                prompt: Prompt::Literal(
                    "How would you like to receive alerts?\n- Text message\n- Email\n- Mobile app\nAnd how early would you like to be reminded?",
                ),
                required_info: &["alert_method", "reminder_timing"],
                next_step: Some("confirmation"),
            },
            StepDefinition {
                id: "confirmation",
                prompt: Prompt::Generated(alert_summary_prompt),
                required_info: &["confirm_schedule"],
                next_step: None,
            },
        ],
    }
}

/// Summarize the alert setup collected so far for final confirmation.
fn alert_summary_prompt(info: &CollectedInfo) -> String {
    let method = info.get("alert_method").map(String::as_str).unwrap_or("");
    let timing = info.get("reminder_timing").map(String::as_str).unwrap_or("");
    let medications = info.get("medications").map(String::as_str).unwrap_or("");
    format!(
        "Based on your preferences, I'll set up the following alert schedule:\nAlert Method: {method}\nReminder Timing: {timing} before each medication\nMedications Schedule: {medications}\nWould you like to confirm this setup?"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_validates() {
        let catalog = FlowCatalog::builtin().unwrap();
        assert_eq!(catalog.len(), 3);
        assert!(!catalog.is_empty());
    }

    #[test]
    fn test_builtin_flow_shapes() {
        let catalog = FlowCatalog::builtin().unwrap();

        let urgent = catalog.lookup("urgent_care_booking").unwrap();
        assert_eq!(urgent.steps.len(), 6);
        assert_eq!(urgent.first_step().unwrap().id, "initial_symptoms");

        let recovery = catalog.lookup("post_surgical_recovery").unwrap();
        assert_eq!(recovery.steps.len(), 5);
        assert_eq!(recovery.first_step().unwrap().id, "verify_procedure");

        let alerts = catalog.lookup("medication_alerts").unwrap();
        assert_eq!(alerts.steps.len(), 4);
        assert_eq!(alerts.first_step().unwrap().id, "initial_info");
    }

    #[test]
    fn test_lookup_unknown_flow_fails() {
        let catalog = FlowCatalog::builtin().unwrap();
        let err = catalog.lookup("billing_dispute").unwrap_err();
        assert!(matches!(err, FlowError::UnknownFlow { name } if name == "billing_dispute"));
    }

    #[test]
    fn test_flow_options_all_resolve() {
        let catalog = FlowCatalog::builtin().unwrap();
        for (label, name) in FLOW_OPTIONS {
            assert!(
                catalog.lookup(name).is_ok(),
                "option '{label}' points at missing flow '{name}'"
            );
        }
    }

    #[test]
    fn test_empty_flow_rejected() {
        let err = FlowCatalog::new(vec![FlowDefinition {
            name: "empty",
            steps: vec![],
        }])
        .unwrap_err();
        assert!(matches!(err, CatalogError::EmptyFlow { flow } if flow == "empty"));
    }

    #[test]
    fn test_duplicate_step_rejected() {
        let err = FlowCatalog::new(vec![FlowDefinition {
            name: "dupes",
            steps: vec![
                StepDefinition {
                    id: "a",
                    prompt: Prompt::Literal("one"),
                    required_info: &["x"],
                    next_step: Some("a"),
                },
                StepDefinition {
                    id: "a",
                    prompt: Prompt::Literal("two"),
                    required_info: &["y"],
                    next_step: None,
                },
            ],
        }])
        .unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateStep { step, .. } if step == "a"));
    }

    #[test]
    fn test_dangling_transition_rejected() {
        let err = FlowCatalog::new(vec![FlowDefinition {
            name: "dangling",
            steps: vec![StepDefinition {
                id: "start",
                prompt: Prompt::Literal("hi"),
                required_info: &["x"],
                next_step: Some("nowhere"),
            }],
        }])
        .unwrap_err();
        assert!(
            matches!(err, CatalogError::DanglingTransition { target, .. } if target == "nowhere")
        );
    }

    #[test]
    fn test_cycle_rejected() {
        let err = FlowCatalog::new(vec![FlowDefinition {
            name: "looping",
            steps: vec![
                StepDefinition {
                    id: "a",
                    prompt: Prompt::Literal("one"),
                    required_info: &["x"],
                    next_step: Some("b"),
                },
                StepDefinition {
                    id: "b",
                    prompt: Prompt::Literal("two"),
                    required_info: &["y"],
                    next_step: Some("a"),
                },
            ],
        }])
        .unwrap_err();
        assert!(matches!(err, CatalogError::StepRevisited { step, .. } if step == "a"));
    }

    #[test]
    fn test_unreachable_step_rejected() {
        let err = FlowCatalog::new(vec![FlowDefinition {
            name: "orphaned",
            steps: vec![
                StepDefinition {
                    id: "start",
                    prompt: Prompt::Literal("hi"),
                    required_info: &["x"],
                    next_step: None,
                },
                StepDefinition {
                    id: "island",
                    prompt: Prompt::Literal("lost"),
                    required_info: &["y"],
                    next_step: None,
                },
            ],
        }])
        .unwrap_err();
        assert!(matches!(err, CatalogError::UnreachableStep { step, .. } if step == "island"));
    }

    #[test]
    fn test_alert_summary_includes_collected_values() {
        let mut info = CollectedInfo::new();
        info.insert("alert_method".to_string(), "Text message".to_string());
        info.insert("reminder_timing".to_string(), "30 minutes".to_string());
        info.insert(
            "medications".to_string(),
            "Lisinopril 10mg daily".to_string(),
        );

        let summary = alert_summary_prompt(&info);
        assert!(summary.contains("Alert Method: Text message"));
        assert!(summary.contains("Reminder Timing: 30 minutes before each medication"));
        assert!(summary.contains("Medications Schedule: Lisinopril 10mg daily"));
        assert!(summary.contains("Would you like to confirm this setup?"));
    }

    #[test]
    fn test_alert_summary_tolerates_missing_values() {
        let summary = alert_summary_prompt(&CollectedInfo::new());
        assert!(summary.contains("Alert Method: \n"));
        assert!(summary.contains("Reminder Timing:  before each medication"));
    }
}

//! Realization of dispatch outcomes as user-facing lines.

use crate::dispatch::result::Resolution;

/// Spoken line for an utterance nothing could handle.
pub const UNRECOGNIZED_LINE: &str =
    "I'm not sure how to help with that. Could you try rephrasing?";

/// Spoken line when input is rejected before dispatch.
pub const REJECTED_LINE: &str = "I didn't understand that clearly. Could you please repeat?";

/// What came of executing a resolved intent.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecReport {
    pub success: bool,
    pub message: String,
}

impl ExecReport {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Executes resolved intents. Implementations own their side effects;
/// the session layer never needs to know what an intent actually does.
pub trait ActionExecutor {
    fn execute(&mut self, resolution: &Resolution) -> ExecReport;
}

/// Template-based executor: realizes each stock intent as a spoken
/// confirmation without touching the outside world. Useful as the
/// console fallback and in tests.
#[derive(Debug, Default)]
pub struct TemplateRealizer;

impl TemplateRealizer {
    fn with_binding(
        resolution: &Resolution,
        label: &str,
        line: impl FnOnce(&str) -> String,
    ) -> ExecReport {
        match resolution.binding(label) {
            Some(value) => ExecReport::ok(line(value)),
            None => ExecReport::failed(format!("No {} specified.", label.replace('_', " "))),
        }
    }
}

impl ActionExecutor for TemplateRealizer {
    fn execute(&mut self, resolution: &Resolution) -> ExecReport {
        match resolution.intent.as_str() {
            "open_app" => {
                Self::with_binding(resolution, "app_name", |app| format!("Opening {app}."))
            }
            "play_youtube" => Self::with_binding(resolution, "search_term", |term| {
                format!("Playing {term} on YouTube.")
            }),
            "set_reminder" => match (resolution.binding("task"), resolution.binding("time")) {
                (Some(task), Some(time)) => {
                    ExecReport::ok(format!("Reminder set: {task} at {time}."))
                }
                _ => ExecReport::failed("Reminder needs both a task and a time."),
            },
            "send_message" => Self::with_binding(resolution, "contact_name", |contact| {
                format!("Sending a message to {contact}.")
            }),
            "make_call" => Self::with_binding(resolution, "contact_name", |contact| {
                format!("Calling {contact}.")
            }),
            "get_weather" => Self::with_binding(resolution, "location", |location| {
                format!("Fetching the weather for {location}.")
            }),
            "get_news" => Self::with_binding(resolution, "topic", |topic| {
                format!("Fetching the latest news about {topic}.")
            }),
            "general_chat" => ExecReport::ok("At your service."),
            other => ExecReport::failed(format!("No handler for intent '{other}'.")),
        }
    }
}

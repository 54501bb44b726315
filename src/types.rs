//! Type definitions shared between the history connector, its host and the
//! replay CLI.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// =============================================================================
// Host Reports
// =============================================================================

/// Numeric error code delivered to the host
///
/// Serialized as `0` / `1` so reports keep the host wire shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum ErrorCode {
    /// History manipulation is not supported by the platform (code 0)
    UnsupportedCapability,
    /// A platform call raised an error when invoked (code 1)
    InvocationFailure,
}

impl From<ErrorCode> for u8 {
    fn from(code: ErrorCode) -> Self {
        match code {
            ErrorCode::UnsupportedCapability => 0,
            ErrorCode::InvocationFailure => 1,
        }
    }
}

impl TryFrom<u8> for ErrorCode {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ErrorCode::UnsupportedCapability),
            1 => Ok(ErrorCode::InvocationFailure),
            other => Err(format!("unknown error code: {}", other)),
        }
    }
}

/// Error report handed to the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorReport {
    pub code: ErrorCode,
    pub name: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_url: Option<String>,
}

impl ErrorReport {
    pub fn unsupported(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::UnsupportedCapability,
            name: name.into(),
            message: message.into(),
            current_url: None,
        }
    }

    pub fn invocation(
        name: impl Into<String>,
        message: impl Into<String>,
        current_url: impl Into<String>,
    ) -> Self {
        Self {
            code: ErrorCode::InvocationFailure,
            name: name.into(),
            message: message.into(),
            current_url: Some(current_url.into()),
        }
    }
}

/// Navigation event relayed to the host on every platform `popstate`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationEvent {
    /// State of the newly current entry (`null` when the entry has none)
    pub state: Value,
    pub current_url: String,
}

/// Event delivered by the platform when the active entry changes
#[derive(Debug, Clone, PartialEq)]
pub struct PopStateEvent {
    pub state: Value,
}

// =============================================================================
// Link Widget
// =============================================================================

/// Bound model of a navigation link
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LinkState {
    pub text: String,
    pub href: String,
}

impl LinkState {
    pub fn new(text: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            href: href.into(),
        }
    }

    /// Link to a view mounted under `context_path`
    pub fn for_view(caption: impl Into<String>, context_path: &str, view: &str) -> Self {
        Self {
            text: caption.into(),
            href: format!("{}/{}", context_path.trim_end_matches('/'), view),
        }
    }
}

// =============================================================================
// Host Events
// =============================================================================

/// Everything a host can observe from the connector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum HostEvent {
    Error(ErrorReport),
    Popstate(NavigationEvent),
    Click,
}

// =============================================================================
// Replay Script
// =============================================================================

/// One line of a replay script
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    Push {
        #[serde(default)]
        state: Value,
        #[serde(default)]
        url: Option<String>,
    },
    Replace {
        #[serde(default)]
        state: Value,
        #[serde(default)]
        url: Option<String>,
    },
    Back,
    Forward,
    Go {
        steps: i32,
    },
    Flush,
    Link {
        text: String,
        href: String,
    },
    Click,
    FailNext {
        name: String,
        message: String,
    },
}

impl Step {
    /// Short op name used in outcomes
    pub fn op(&self) -> &'static str {
        match self {
            Step::Push { .. } => "push",
            Step::Replace { .. } => "replace",
            Step::Back => "back",
            Step::Forward => "forward",
            Step::Go { .. } => "go",
            Step::Flush => "flush",
            Step::Link { .. } => "link",
            Step::Click => "click",
            Step::FailNext { .. } => "fail_next",
        }
    }
}

/// Result of applying one script step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepOutcome {
    pub id: String,
    pub step: usize,
    pub op: String,
    pub success: bool,
    pub location: String,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub events: Vec<HostEvent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub timestamp: String, // ISO 8601 format
}

/// Output format for replay outcomes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output (default)
    #[default]
    Human,
    /// One JSON object per step
    Json,
    /// Errors only
    Quiet,
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn error_report_serializes_numeric_code() {
        let report = ErrorReport::invocation("SecurityError", "denied", "https://example.com/a");
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(
            value,
            json!({
                "code": 1,
                "name": "SecurityError",
                "message": "denied",
                "currentUrl": "https://example.com/a"
            })
        );
    }

    #[test]
    fn unsupported_report_omits_current_url() {
        let report = ErrorReport::unsupported("Unsupported Browser", "no pushState");
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["code"], json!(0));
        assert!(value.get("currentUrl").is_none());
    }

    #[test]
    fn error_code_rejects_unknown_values() {
        assert!(serde_json::from_value::<ErrorCode>(json!(2)).is_err());
        assert_eq!(
            serde_json::from_value::<ErrorCode>(json!(0)).unwrap(),
            ErrorCode::UnsupportedCapability
        );
    }

    #[test]
    fn link_state_for_view_joins_context_path() {
        assert_eq!(LinkState::for_view("Home", "/app", "home").href, "/app/home");
        assert_eq!(LinkState::for_view("Home", "/app/", "home").href, "/app/home");
        assert_eq!(LinkState::for_view("Home", "", "home").href, "/home");
    }

    #[test]
    fn step_parses_tagged_json() {
        let step: Step = serde_json::from_str(r#"{"op":"push","state":"{\"x\":1}","url":"/b"}"#)
            .unwrap();
        assert_eq!(
            step,
            Step::Push {
                state: json!("{\"x\":1}"),
                url: Some("/b".to_string())
            }
        );

        let step: Step = serde_json::from_str(r#"{"op":"go","steps":-2}"#).unwrap();
        assert_eq!(step, Step::Go { steps: -2 });
        assert_eq!(step.op(), "go");
    }

    #[test]
    fn push_step_defaults_to_null_state_and_no_url() {
        let step: Step = serde_json::from_str(r#"{"op":"push"}"#).unwrap();
        assert_eq!(
            step,
            Step::Push {
                state: Value::Null,
                url: None
            }
        );
    }

    #[test]
    fn host_event_is_tagged() {
        let value = serde_json::to_value(HostEvent::Click).unwrap();
        assert_eq!(value, json!({"event": "click"}));
    }
}

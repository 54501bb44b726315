//! Output formatting for the pushstate CLI
//!
//! Formats step outcomes for terminal display.
//! Supports human-readable, JSON and quiet output.

use crate::error::Result;
use crate::types::{HostEvent, OutputFormat, StepOutcome};

// =============================================================================
// Output Formatter
// =============================================================================

/// Formats step outcomes for display
pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    /// Create a new formatter with the given format
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Format and print a step outcome
    pub fn print_outcome(&self, outcome: &StepOutcome) -> Result<()> {
        if outcome.success {
            let output = self.format_success(outcome)?;
            if !output.is_empty() {
                print_success(&output);
            }
        } else {
            let output = self.format_error(outcome)?;
            print_error(&output);
        }
        Ok(())
    }

    /// Format a successful step
    fn format_success(&self, outcome: &StepOutcome) -> Result<String> {
        Ok(match self.format {
            OutputFormat::Human => format_human(outcome),
            OutputFormat::Json => serde_json::to_string(outcome)?,
            OutputFormat::Quiet => String::new(),
        })
    }

    /// Format a step that reported an error
    fn format_error(&self, outcome: &StepOutcome) -> Result<String> {
        let error_msg = outcome.error.as_deref().unwrap_or("Unknown error");
        Ok(match self.format {
            OutputFormat::Human => format_human(outcome),
            OutputFormat::Json => serde_json::to_string(outcome)?,
            OutputFormat::Quiet => format!("step {}: {}", outcome.step, error_msg),
        })
    }
}

// =============================================================================
// Specialized Formatters
// =============================================================================

/// Format a step outcome for human-readable output
pub fn format_human(outcome: &StepOutcome) -> String {
    let status = if outcome.success { "ok" } else { "error" };
    let mut output = format!(
        "[{}] {} {} -> {}",
        outcome.step, outcome.op, status, outcome.location
    );

    for event in &outcome.events {
        output.push('\n');
        output.push_str(&format!("    {}", format_event(event)));
    }

    output
}

/// One-line description of a host event
pub fn format_event(event: &HostEvent) -> String {
    match event {
        HostEvent::Error(report) => {
            let code: u8 = report.code.into();
            match &report.current_url {
                Some(url) => format!(
                    "error {} {}: {} (at {})",
                    code, report.name, report.message, url
                ),
                None => format!("error {} {}: {}", code, report.name, report.message),
            }
        }
        HostEvent::Popstate(navigation) => {
            format!("popstate {} @ {}", navigation.state, navigation.current_url)
        }
        HostEvent::Click => "click".to_string(),
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Print a success message to stdout
pub fn print_success(message: &str) {
    println!("{}", message);
}

/// Print an error message to stderr
pub fn print_error(message: &str) {
    eprintln!("{}", message);
}

// =============================================================================
// Tests
// =============================================================================

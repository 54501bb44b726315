//! Replay step implementations
//!
//! Each command module handles:
//! - Validating the step arguments
//! - Applying the step to the session
//!
//! [`CommandContext::run`] turns a step into a command, executes it and
//! collects what the host observed into a [`StepOutcome`].

pub mod click;
pub mod fail_next;
pub mod flush;
pub mod history;
pub mod link;
pub mod push;
pub mod replace;
pub mod utils;

pub use click::ClickCommand;
pub use fail_next::FailNextCommand;
pub use flush::FlushCommand;
pub use history::back::BackCommand;
pub use history::forward::ForwardCommand;
pub use history::go::GoCommand;
pub use link::LinkCommand;
pub use push::PushCommand;
pub use replace::ReplaceCommand;

use crate::commands::utils::current_timestamp;
use crate::error::Result;
use crate::session::Session;
use crate::types::{HostEvent, Step, StepOutcome};
use uuid::Uuid;

pub trait Execute {
    fn execute(&self, ctx: &CommandContext) -> Result<()>;
}

/// Build the command for a script step
pub fn command_for(step: Step) -> Box<dyn Execute> {
    match step {
        Step::Push { state, url } => Box::new(PushCommand::new(state, url)),
        Step::Replace { state, url } => Box::new(ReplaceCommand::new(state, url)),
        Step::Back => Box::new(BackCommand::default()),
        Step::Forward => Box::new(ForwardCommand::default()),
        Step::Go { steps } => Box::new(GoCommand::new(steps)),
        Step::Flush => Box::new(FlushCommand::default()),
        Step::Link { text, href } => Box::new(LinkCommand::new(text, href)),
        Step::Click => Box::new(ClickCommand::default()),
        Step::FailNext { name, message } => Box::new(FailNextCommand::new(name, message)),
    }
}

pub struct CommandContext {
    pub session: Session,
}

impl CommandContext {
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    /// Apply `step` and report what the host observed while it ran
    pub fn run(&self, index: usize, step: Step) -> Result<StepOutcome> {
        let op = step.op().to_string();
        // Events raised at session start are reported with the first step
        command_for(step).execute(self)?;

        let events = self.session.host().drain();
        let error = events.iter().find_map(|event| match event {
            HostEvent::Error(report) => Some(format!("{}: {}", report.name, report.message)),
            _ => None,
        });

        Ok(StepOutcome {
            id: Uuid::new_v4().to_string(),
            step: index,
            op,
            success: error.is_none(),
            location: self.session.location(),
            events,
            error,
            timestamp: current_timestamp(),
        })
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use serde_json::json;

    fn context() -> CommandContext {
        let config = Config {
            start_url: "https://example.com/a".to_string(),
            ..Default::default()
        };
        CommandContext::new(Session::new(&config).unwrap())
    }

    #[test]
    fn run_reports_location_after_step() {
        let ctx = context();
        let outcome = ctx
            .run(
                1,
                Step::Push {
                    state: json!("{\"x\":1}"),
                    url: Some("/b".to_string()),
                },
            )
            .unwrap();

        assert!(outcome.success);
        assert_eq!(outcome.step, 1);
        assert_eq!(outcome.op, "push");
        assert_eq!(outcome.location, "https://example.com/b");
        assert!(outcome.events.is_empty());
    }

    #[test]
    fn run_marks_step_failed_on_error_report() {
        let ctx = context();
        ctx.run(
            1,
            Step::FailNext {
                name: "SecurityError".to_string(),
                message: "denied".to_string(),
            },
        )
        .unwrap();
        let outcome = ctx
            .run(
                2,
                Step::Replace {
                    state: json!(null),
                    url: None,
                },
            )
            .unwrap();

        assert!(!outcome.success);
        assert_eq!(outcome.error.as_deref(), Some("SecurityError: denied"));
        assert_eq!(outcome.events.len(), 1);
    }

    #[test]
    fn traversal_events_arrive_on_flush() {
        let ctx = context();
        ctx.run(
            1,
            Step::Push {
                state: json!("{\"n\":1}"),
                url: Some("/b".to_string()),
            },
        )
        .unwrap();

        let back = ctx.run(2, Step::Back).unwrap();
        assert!(back.events.is_empty());
        assert_eq!(back.location, "https://example.com/b");

        let flush = ctx.run(3, Step::Flush).unwrap();
        assert_eq!(flush.location, "https://example.com/a");
        assert_eq!(
            flush.events,
            vec![HostEvent::Popstate(crate::types::NavigationEvent {
                state: json!(null),
                current_url: "https://example.com/a".to_string(),
            })]
        );
    }
}

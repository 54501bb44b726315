//! Click command implementation
//!
//! Activates the navigation link. The link must have been rendered by a
//! `link` step first.

use crate::commands::{CommandContext, Execute};
use crate::error::{HistoryError, Result};
use crate::link::{ClickEvent, Container};

#[derive(Default)]
pub struct ClickCommand {}

impl Execute for ClickCommand {
    fn execute(&self, ctx: &CommandContext) -> Result<()> {
        let link = ctx.session.link();
        if !ctx.session.host().container().contains(link.anchor().id()) {
            return Err(HistoryError::InvalidArguments(
                "link has not been rendered; add a link step before clicking".to_string(),
            ));
        }

        let event = ClickEvent::new();
        link.click(&event);
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::LinkCommand;
    use crate::config::Config;
    use crate::session::Session;
    use crate::types::HostEvent;

    fn context() -> CommandContext {
        CommandContext::new(Session::new(&Config::default()).unwrap())
    }

    #[test]
    fn click_requires_rendered_link() {
        let ctx = context();
        assert!(ClickCommand::default().execute(&ctx).is_err());
    }

    #[test]
    fn click_pushes_link_target() {
        let ctx = context();
        LinkCommand::new("Docs".to_string(), "/docs".to_string())
            .execute(&ctx)
            .unwrap();
        ClickCommand::default().execute(&ctx).unwrap();

        assert_eq!(ctx.session.location(), "https://example.com/docs");
        assert_eq!(ctx.session.host().events(), vec![HostEvent::Click]);
    }

    #[test]
    fn link_rejects_empty_href() {
        let ctx = context();
        assert!(
            LinkCommand::new("Docs".to_string(), " ".to_string())
                .execute(&ctx)
                .is_err()
        );
    }
}

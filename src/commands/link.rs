//! Link command implementation
//!
//! Updates the link model and re-renders the anchor.

use crate::commands::utils::validate_not_empty;
use crate::commands::{CommandContext, Execute};
use crate::error::Result;
use crate::types::LinkState;

pub struct LinkCommand {
    pub text: String,
    pub href: String,
}

impl LinkCommand {
    pub fn new(text: String, href: String) -> Self {
        Self { text, href }
    }
}

impl Execute for LinkCommand {
    fn execute(&self, ctx: &CommandContext) -> Result<()> {
        validate_not_empty("href", &self.href)?;

        ctx.session
            .host()
            .set_link_state(LinkState::new(self.text.clone(), self.href.clone()));
        ctx.session.link().on_state_change();
        Ok(())
    }
}

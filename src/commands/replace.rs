//! Replace command implementation

use crate::commands::{CommandContext, Execute};
use crate::error::Result;
use serde_json::Value;

#[derive(Debug, Clone)]
pub struct ReplaceCommand {
    pub state: Value,
    pub url: Option<String>,
}

impl ReplaceCommand {
    pub fn new(state: Value, url: Option<String>) -> Self {
        Self { state, url }
    }
}

impl Execute for ReplaceCommand {
    fn execute(&self, ctx: &CommandContext) -> Result<()> {
        ctx.session
            .sync()
            .replace_state(self.state.clone(), self.url.as_deref());
        Ok(())
    }
}

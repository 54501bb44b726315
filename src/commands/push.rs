//! Push command implementation
//!
//! Hands the raw state payload to the synchronization layer, exactly as a host
//! would send it: textual JSON is decoded there, anything else passes through.

use crate::commands::{CommandContext, Execute};
use crate::error::Result;
use serde_json::Value;

#[derive(Debug, Clone)]
pub struct PushCommand {
    pub state: Value,
    pub url: Option<String>,
}

impl PushCommand {
    pub fn new(state: Value, url: Option<String>) -> Self {
        Self { state, url }
    }
}

impl Execute for PushCommand {
    fn execute(&self, ctx: &CommandContext) -> Result<()> {
        ctx.session
            .sync()
            .push_state(self.state.clone(), self.url.as_deref());
        Ok(())
    }
}

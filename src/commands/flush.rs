//! Flush command implementation
//!
//! Runs queued traversals, which is when the platform fires `popstate`.

use crate::commands::{CommandContext, Execute};
use crate::error::Result;

#[derive(Default)]
pub struct FlushCommand {}

impl Execute for FlushCommand {
    fn execute(&self, ctx: &CommandContext) -> Result<()> {
        let fired = ctx.session.platform().flush();
        tracing::debug!(fired, "flushed pending traversals");
        Ok(())
    }
}

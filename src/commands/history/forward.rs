use crate::commands::{CommandContext, Execute};
use crate::error::Result;

#[derive(Default)]
pub struct ForwardCommand {}

impl Execute for ForwardCommand {
    fn execute(&self, ctx: &CommandContext) -> Result<()> {
        ctx.session.extension().forward();
        Ok(())
    }
}

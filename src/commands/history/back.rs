use crate::commands::{CommandContext, Execute};
use crate::error::Result;

#[derive(Default)]
pub struct BackCommand {}

impl Execute for BackCommand {
    fn execute(&self, ctx: &CommandContext) -> Result<()> {
        ctx.session.extension().back();
        Ok(())
    }
}

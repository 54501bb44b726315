use crate::commands::{CommandContext, Execute};
use crate::error::Result;

pub struct GoCommand {
    pub steps: i32,
}

impl GoCommand {
    pub fn new(steps: i32) -> Self {
        Self { steps }
    }
}

impl Execute for GoCommand {
    fn execute(&self, ctx: &CommandContext) -> Result<()> {
        ctx.session.extension().go(self.steps);
        Ok(())
    }
}

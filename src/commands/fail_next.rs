//! Fail-next command implementation
//!
//! Makes the next push or replace raise the given platform error.

use crate::commands::utils::validate_not_empty;
use crate::commands::{CommandContext, Execute};
use crate::error::{PlatformError, Result};

pub struct FailNextCommand {
    pub name: String,
    pub message: String,
}

impl FailNextCommand {
    pub fn new(name: String, message: String) -> Self {
        Self { name, message }
    }
}

impl Execute for FailNextCommand {
    fn execute(&self, ctx: &CommandContext) -> Result<()> {
        validate_not_empty("error name", &self.name)?;

        ctx.session
            .platform()
            .fail_next(PlatformError::new(self.name.clone(), self.message.clone()));
        Ok(())
    }
}

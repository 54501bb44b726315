use crate::error::{HistoryError, Result};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

pub fn validate_not_empty(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(HistoryError::InvalidArguments(format!(
            "{} cannot be empty",
            field
        )));
    }

    Ok(())
}

pub fn current_timestamp() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_default()
}

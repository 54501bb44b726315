//! Replay script reader
//!
//! Scripts are newline-delimited JSON, one [`Step`] per line. Blank lines and
//! lines starting with `#` are skipped.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use crate::error::{HistoryError, Result};
use crate::types::Step;

/// Comment marker for script lines
const COMMENT_PREFIX: char = '#';

/// A parsed step with its 1-based line number
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptLine {
    pub line: usize,
    pub step: Step,
}

/// Read a script from `path`, or from stdin when `path` is `-`
pub fn read_script(path: &Path) -> Result<Vec<ScriptLine>> {
    if path.as_os_str() == "-" {
        let stdin = io::stdin();
        parse_script(stdin.lock())
    } else {
        let file = File::open(path)?;
        parse_script(BufReader::new(file))
    }
}

/// Parse every step of a script
pub fn parse_script<R: BufRead>(reader: R) -> Result<Vec<ScriptLine>> {
    let mut steps = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = line?;
        let trimmed = line.trim();

        if trimmed.is_empty() || trimmed.starts_with(COMMENT_PREFIX) {
            continue;
        }

        let step = serde_json::from_str::<Step>(trimmed).map_err(|err| {
            HistoryError::InvalidScript {
                line: line_no,
                reason: err.to_string(),
            }
        })?;
        steps.push(ScriptLine {
            line: line_no,
            step,
        });
    }

    Ok(steps)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Cursor;

    #[test]
    fn parse_script_skips_blank_and_comment_lines() {
        let script = "# navigate\n\n{\"op\":\"push\",\"state\":\"{}\",\"url\":\"/b\"}\n  \n{\"op\":\"back\"}\n";
        let steps = parse_script(Cursor::new(script)).unwrap();

        assert_eq!(
            steps,
            vec![
                ScriptLine {
                    line: 3,
                    step: Step::Push {
                        state: json!("{}"),
                        url: Some("/b".to_string())
                    }
                },
                ScriptLine {
                    line: 5,
                    step: Step::Back
                },
            ]
        );
    }

    #[test]
    fn parse_script_reports_line_of_malformed_step() {
        let script = "{\"op\":\"back\"}\n{\"op\":\"teleport\"}\n";
        let err = parse_script(Cursor::new(script)).unwrap_err();

        assert!(matches!(err, HistoryError::InvalidScript { line: 2, .. }));
    }

    #[test]
    fn parse_script_rejects_missing_fields() {
        let err = parse_script(Cursor::new("{\"op\":\"go\"}")).unwrap_err();
        assert!(matches!(err, HistoryError::InvalidScript { line: 1, .. }));
    }

    #[test]
    fn read_script_fails_for_missing_file() {
        let err = read_script(Path::new("/nonexistent/pushstate-script.ndjson")).unwrap_err();
        assert!(matches!(err, HistoryError::IoError(_)));
    }
}

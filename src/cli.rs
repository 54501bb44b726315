//! CLI argument parsing using clap
//!
//! Defines all commands and their arguments.

use std::path::PathBuf;

use crate::types::OutputFormat;
use clap::{Args, Parser, Subcommand};

/// pushstate - replay navigation scripts against a simulated session history
#[derive(Debug, Parser)]
#[command(name = "pushstate")]
#[command(
    author,
    version,
    about = "pushstate - replay navigation scripts against a simulated session history",
    long_about = None,
    after_help = "SCRIPT FORMAT:\n  One JSON object per line, selected by \"op\":\n    {\"op\":\"push\",\"state\":\"{\\\"x\\\":1}\",\"url\":\"/b\"}\n    {\"op\":\"replace\",\"state\":null,\"url\":\"/a\"}\n    {\"op\":\"back\"}  {\"op\":\"forward\"}  {\"op\":\"go\",\"steps\":-2}\n    {\"op\":\"flush\"}                       deliver pending popstate events\n    {\"op\":\"link\",\"text\":\"Home\",\"href\":\"/home\"}\n    {\"op\":\"click\"}\n    {\"op\":\"fail_next\",\"name\":\"SecurityError\",\"message\":\"denied\"}\n  Blank lines and lines starting with '#' are skipped.\n\nENVIRONMENT VARIABLES:\n  PUSHSTATE_START_URL   Location of the first history entry\n  PUSHSTATE_USER_AGENT  User agent reported by the simulated browser\n  PUSHSTATE_LOG         Log filter (default: warn)\n\nEXAMPLES:\n  pushstate replay nav.ndjson\n  cat nav.ndjson | pushstate replay - -o json\n  pushstate --unsupported replay nav.ndjson"
)]
pub struct Cli {
    /// Location of the first history entry (overrides PUSHSTATE_START_URL)
    #[arg(long, global = true)]
    pub start_url: Option<String>,

    /// User agent reported by the simulated browser (overrides PUSHSTATE_USER_AGENT)
    #[arg(long, global = true)]
    pub user_agent: Option<String>,

    /// Simulate a browser without pushState/replaceState
    #[arg(long, global = true)]
    pub unsupported: bool,

    /// Simulate a browser without event listener support
    #[arg(long, global = true)]
    pub no_event_listeners: bool,

    /// Output format: human (plain text), json (one object per step), quiet (errors only)
    #[arg(short, long, global = true, value_enum, default_value = "human")]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Replay a navigation script
    #[command(
        about = "Replay a navigation script",
        long_about = "Replay a newline-delimited JSON navigation script and print what the host observes after each step.\n\nUSAGE:\n  pushstate replay [OPTIONS] <SCRIPT>\n\nARGUMENTS:\n  <SCRIPT>  Script file, or - for stdin\n\nEXAMPLES:\n  pushstate replay nav.ndjson\n  pushstate replay - -o json < nav.ndjson"
    )]
    Replay(ReplayArgs),

    /// Show version information
    #[command(about = "Show version information")]
    Version,
}

#[derive(Debug, Args)]
pub struct ReplayArgs {
    /// Script file, or - for stdin
    pub script: PathBuf,
}

// =============================================================================
// Parse Functions
// =============================================================================

/// Parse command line arguments
pub fn parse() -> Cli {
    Cli::parse()
}

/// Parse command line arguments from iterator (for testing)
pub fn parse_from<I, T>(iter: I) -> Cli
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::parse_from(iter)
}

// =============================================================================
// Tests
// =============================================================================

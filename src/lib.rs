//! pushstate Library
//!
//! Keeps a host's navigation state in sync with the platform's session-history
//! stack: outbound push/replace with an idempotence guard and error reporting,
//! inbound `popstate` relays, traversal, and a link widget that navigates by
//! pushing history entries. The platform and the host are injected, so the
//! whole connector runs against [`MemoryHistory`] as well as a real browser
//! binding.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod extension;
pub mod host;
pub mod link;
pub mod location;
pub mod memory;
pub mod navigator;
pub mod output;
pub mod platform;
pub mod proxy;
pub mod replay;
pub mod session;
pub mod sync;
pub mod types;

// Re-exports for convenience
pub use cli::{Cli, Commands};
pub use config::Config;
pub use error::{HistoryError, PlatformError, Result};
pub use extension::{ErrorEvent, ErrorKind, HistoryExtension, ListenerId, PopState};
pub use host::{NavigationHost, RecordingHost};
pub use link::{ClickEvent, Container, LinkHost, NavigationLink};
pub use memory::{Capabilities, MemoryHistory};
pub use navigator::{FragmentStateManager, NavigationStateManager, Navigator, PathStateManager};
pub use output::OutputFormatter;
pub use platform::PlatformHistory;
pub use proxy::NavigationProxy;
pub use session::Session;
pub use sync::HistoryStateSync;
pub use types::{ErrorCode, ErrorReport, LinkState, NavigationEvent, OutputFormat};

// =============================================================================
// Main Entry Point
// =============================================================================

/// Run the CLI with parsed arguments
pub fn run(cli: Cli) -> Result<()> {
    // 1. Handle version separately (doesn't need a session)
    let args = match cli.command {
        Commands::Version => {
            println!("pushstate {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        Commands::Replay(args) => args,
    };

    // 2. Load configuration, apply flag overrides
    let mut config = config::load_config();
    if let Some(start_url) = cli.start_url {
        config.start_url = start_url;
    }
    if let Some(user_agent) = cli.user_agent {
        config.user_agent = user_agent;
    }
    if cli.unsupported {
        config.capabilities.push_state = false;
        config.capabilities.replace_state = false;
    }
    if cli.no_event_listeners {
        config.capabilities.event_listeners = false;
    }
    if location::origin(&config.start_url).is_none() {
        return Err(HistoryError::InvalidArguments(format!(
            "start url must be absolute: {}",
            config.start_url
        )));
    }

    // 3. Read the script before touching the session
    let script = replay::read_script(&args.script)?;

    // 4. Replay every step
    let ctx = commands::CommandContext::new(Session::new(&config)?);
    let formatter = OutputFormatter::new(cli.output);
    let mut failed = 0;
    for line in script {
        let outcome = ctx.run(line.line, line.step)?;
        if !outcome.success {
            failed += 1;
        }
        formatter.print_outcome(&outcome)?;
    }

    // 5. Return result
    if failed == 0 {
        Ok(())
    } else {
        Err(HistoryError::CommandFailed(format!(
            "{} step(s) reported errors",
            failed
        )))
    }
}

/// Execute the CLI and handle errors
pub fn execute() -> i32 {
    // 1. Parse CLI arguments
    let cli = cli::parse();

    // 2. Call run()
    match run(cli) {
        Ok(()) => 0,
        Err(e) => {
            // 3. Handle errors, print to stderr
            eprintln!("Error: {}", e);

            // 4. Return appropriate exit code
            e.exit_code()
        }
    }
}

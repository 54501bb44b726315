//! Session history traversal commands
//!
//! Traversals are routed through the history extension, so they are dropped
//! once the platform reported missing history support:
//! - back: Go back in history
//! - forward: Go forward in history
//! - go: Move a number of entries

pub mod back;
pub mod forward;
pub mod go;

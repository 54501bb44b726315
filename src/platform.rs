//! The platform's session-history facility
//!
//! Abstracts the browser's single global history stack and document location
//! so the synchronization logic can run against any implementation.

use std::rc::Rc;

use serde_json::Value;

use crate::error::PlatformError;
use crate::types::PopStateEvent;

/// Callback invoked on every `popstate` firing
pub type PopStateListener = Rc<dyn Fn(&PopStateEvent)>;

/// Session history operations exposed by the platform
pub trait PlatformHistory {
    /// Whether a push-state operation is available
    fn supports_push_state(&self) -> bool;

    /// Whether a replace-state operation is available
    fn supports_replace_state(&self) -> bool;

    /// User-agent string, used for diagnostics
    fn user_agent(&self) -> String;

    /// Add an entry on top of the current one, dropping any forward entries
    fn push_state(&self, state: Value, title: &str, url: Option<&str>)
    -> Result<(), PlatformError>;

    /// Overwrite the current entry
    fn replace_state(
        &self,
        state: Value,
        title: &str,
        url: Option<&str>,
    ) -> Result<(), PlatformError>;

    fn back(&self);

    fn forward(&self);

    /// Traverse `delta` entries; negative values go backwards
    fn go(&self, delta: i32);

    /// Current document location
    fn location(&self) -> String;

    /// Subscribe to `popstate`.
    ///
    /// Returns `false` when the platform cannot register event listeners; the
    /// listener is dropped in that case.
    fn add_popstate_listener(&self, listener: PopStateListener) -> bool;
}

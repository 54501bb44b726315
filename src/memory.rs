//! In-memory session history
//!
//! A complete [`PlatformHistory`] that keeps its entries in memory. Traversals
//! are queued like the browser's asynchronous history tasks and applied by
//! [`MemoryHistory::flush`], which is when `popstate` fires.

use std::cell::RefCell;
use std::collections::VecDeque;

use serde_json::Value;

use crate::error::PlatformError;
use crate::location;
use crate::platform::{PlatformHistory, PopStateListener};
use crate::types::PopStateEvent;

// =============================================================================
// Constants
// =============================================================================

/// User agent reported when none is configured
pub const DEFAULT_USER_AGENT: &str = concat!("pushstate/", env!("CARGO_PKG_VERSION"));

// =============================================================================
// Types
// =============================================================================

/// One entry of the session history stack
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub state: Value,
    pub title: String,
    pub url: String,
}

/// Which history features the platform exposes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub push_state: bool,
    pub replace_state: bool,
    pub event_listeners: bool,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            push_state: true,
            replace_state: true,
            event_listeners: true,
        }
    }
}

/// A call made against the platform, in invocation order
#[derive(Debug, Clone, PartialEq)]
pub enum PlatformCall {
    PushState {
        state: Value,
        title: String,
        url: Option<String>,
    },
    ReplaceState {
        state: Value,
        title: String,
        url: Option<String>,
    },
    Back,
    Forward,
    Go(i32),
}

#[derive(Debug)]
struct Inner {
    entries: Vec<HistoryEntry>,
    index: usize,
    pending: VecDeque<i32>,
    calls: Vec<PlatformCall>,
    fail_next: Option<PlatformError>,
}

/// In-memory session history for a single document
pub struct MemoryHistory {
    inner: RefCell<Inner>,
    listeners: RefCell<Vec<PopStateListener>>,
    capabilities: Capabilities,
    user_agent: String,
}

// =============================================================================
// Construction
// =============================================================================

impl MemoryHistory {
    /// New history whose only entry is `start_url` with a `null` state
    pub fn new(start_url: impl Into<String>) -> Self {
        Self::with_capabilities(start_url, Capabilities::default())
    }

    pub fn with_capabilities(start_url: impl Into<String>, capabilities: Capabilities) -> Self {
        Self {
            inner: RefCell::new(Inner {
                entries: vec![HistoryEntry {
                    state: Value::Null,
                    title: String::new(),
                    url: start_url.into(),
                }],
                index: 0,
                pending: VecDeque::new(),
                calls: Vec::new(),
                fail_next: None,
            }),
            listeners: RefCell::new(Vec::new()),
            capabilities,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

// =============================================================================
// Inspection & Control
// =============================================================================

impl MemoryHistory {
    /// All entries of the stack, oldest first
    pub fn entries(&self) -> Vec<HistoryEntry> {
        self.inner.borrow().entries.clone()
    }

    /// Index of the current entry
    pub fn index(&self) -> usize {
        self.inner.borrow().index
    }

    pub fn current_entry(&self) -> HistoryEntry {
        let inner = self.inner.borrow();
        inner.entries[inner.index].clone()
    }

    /// Every call made against this history so far
    pub fn calls(&self) -> Vec<PlatformCall> {
        self.inner.borrow().calls.clone()
    }

    /// Number of traversals waiting for [`flush`](Self::flush)
    pub fn pending_traversals(&self) -> usize {
        self.inner.borrow().pending.len()
    }

    /// Make the next push or replace raise `error`
    pub fn fail_next(&self, error: PlatformError) {
        self.inner.borrow_mut().fail_next = Some(error);
    }

    /// Apply queued traversals, firing one `popstate` per applied traversal.
    ///
    /// Returns the number of `popstate` events fired.
    pub fn flush(&self) -> usize {
        let mut fired = 0;
        loop {
            let state = {
                let mut inner = self.inner.borrow_mut();
                let Some(delta) = inner.pending.pop_front() else {
                    break;
                };
                let target = inner.index as i64 + delta as i64;
                if target < 0 || target >= inner.entries.len() as i64 {
                    tracing::debug!(delta, "dropping out-of-range traversal");
                    continue;
                }
                inner.index = target as usize;
                inner.entries[inner.index].state.clone()
            };
            self.fire_popstate(state);
            fired += 1;
        }
        fired
    }

    /// Fire `popstate` with `state` at the current location
    pub fn fire_popstate(&self, state: Value) {
        let listeners = self.listeners.borrow().clone();
        let event = PopStateEvent { state };
        for listener in listeners {
            listener(&event);
        }
    }

    fn record(&self, call: PlatformCall) {
        self.inner.borrow_mut().calls.push(call);
    }

    fn queue_traversal(&self, delta: i32) {
        if delta == 0 {
            tracing::debug!("ignoring zero-step traversal");
            return;
        }
        self.inner.borrow_mut().pending.push_back(delta);
    }

    /// Shared checks for push and replace; returns the resolved target URL
    fn prepare_write(
        &self,
        operation: &str,
        supported: bool,
        url: Option<&str>,
    ) -> Result<String, PlatformError> {
        let mut inner = self.inner.borrow_mut();

        if let Some(error) = inner.fail_next.take() {
            return Err(error);
        }

        if !supported {
            return Err(PlatformError::new(
                "TypeError",
                format!("history.{} is not a function", operation),
            ));
        }

        let current = &inner.entries[inner.index].url;
        let target = match url {
            Some(url) => location::resolve(current, url),
            None => current.clone(),
        };

        let current_origin = location::origin(current);
        if current_origin.is_some() && location::origin(&target) != current_origin {
            return Err(PlatformError::new(
                "SecurityError",
                format!(
                    "Failed to execute '{}' on 'History': A history state object with URL '{}' \
                     cannot be created in a document with origin '{}'",
                    operation,
                    target,
                    current_origin.unwrap_or_default()
                ),
            ));
        }

        Ok(target)
    }
}

// =============================================================================
// PlatformHistory
// =============================================================================

impl PlatformHistory for MemoryHistory {
    fn supports_push_state(&self) -> bool {
        self.capabilities.push_state
    }

    fn supports_replace_state(&self) -> bool {
        self.capabilities.replace_state
    }

    fn user_agent(&self) -> String {
        self.user_agent.clone()
    }

    fn push_state(
        &self,
        state: Value,
        title: &str,
        url: Option<&str>,
    ) -> Result<(), PlatformError> {
        self.record(PlatformCall::PushState {
            state: state.clone(),
            title: title.to_string(),
            url: url.map(str::to_string),
        });
        let target = self.prepare_write("pushState", self.capabilities.push_state, url)?;

        let mut inner = self.inner.borrow_mut();
        let keep = inner.index + 1;
        inner.entries.truncate(keep);
        inner.entries.push(HistoryEntry {
            state,
            title: title.to_string(),
            url: target,
        });
        inner.index = keep;
        Ok(())
    }

    fn replace_state(
        &self,
        state: Value,
        title: &str,
        url: Option<&str>,
    ) -> Result<(), PlatformError> {
        self.record(PlatformCall::ReplaceState {
            state: state.clone(),
            title: title.to_string(),
            url: url.map(str::to_string),
        });
        let target = self.prepare_write("replaceState", self.capabilities.replace_state, url)?;

        let mut inner = self.inner.borrow_mut();
        let index = inner.index;
        inner.entries[index] = HistoryEntry {
            state,
            title: title.to_string(),
            url: target,
        };
        Ok(())
    }

    fn back(&self) {
        self.record(PlatformCall::Back);
        self.queue_traversal(-1);
    }

    fn forward(&self) {
        self.record(PlatformCall::Forward);
        self.queue_traversal(1);
    }

    fn go(&self, delta: i32) {
        self.record(PlatformCall::Go(delta));
        self.queue_traversal(delta);
    }

    fn location(&self) -> String {
        let inner = self.inner.borrow();
        inner.entries[inner.index].url.clone()
    }

    fn add_popstate_listener(&self, listener: PopStateListener) -> bool {
        if !self.capabilities.event_listeners {
            return false;
        }
        self.listeners.borrow_mut().push(listener);
        true
    }
}

// =============================================================================
// Tests
// =============================================================================

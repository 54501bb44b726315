//! Host-side history extension
//!
//! The application-facing API: listener registries for popstate and error
//! events, state pushes from structured values, and traversal. Once the
//! platform has reported missing history support, further calls are dropped.

use std::cell::{Cell, OnceCell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

use serde_json::Value;

use crate::error::{HistoryError, Result};
use crate::host::NavigationHost;
use crate::platform::PlatformHistory;
use crate::proxy::NavigationProxy;
use crate::sync::HistoryStateSync;
use crate::types::{ErrorCode, ErrorReport, NavigationEvent};

// =============================================================================
// Events
// =============================================================================

/// A state was popped off the history stack
#[derive(Debug, Clone, PartialEq)]
pub struct PopState {
    state: Value,
    address: String,
}

impl PopState {
    /// State of the now-current entry
    pub fn state(&self) -> &Value {
        &self.state
    }

    /// The state as a string map.
    ///
    /// Empty unless the state is a JSON object; non-string members are rendered
    /// as JSON.
    pub fn state_as_map(&self) -> BTreeMap<String, String> {
        match &self.state {
            Value::Object(members) => members
                .iter()
                .map(|(key, value)| {
                    let value = match value {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    };
                    (key.clone(), value)
                })
                .collect(),
            _ => BTreeMap::new(),
        }
    }

    /// Address as it reads in the location bar
    pub fn address(&self) -> &str {
        &self.address
    }
}

/// What kind of client-side error occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// History manipulation is unsupported by the platform
    Unsupported,
    /// A history call failed when executed
    MethodInvoke,
}

/// A client-side error.
///
/// Listeners call [`cancel`](Self::cancel) once they have dealt with it;
/// uncancelled events surface as [`HistoryError::UnhandledClientError`].
#[derive(Debug)]
pub struct ErrorEvent {
    report: ErrorReport,
    cancelled: Cell<bool>,
}

impl ErrorEvent {
    fn new(report: ErrorReport) -> Self {
        Self {
            report,
            cancelled: Cell::new(false),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self.report.code {
            ErrorCode::UnsupportedCapability => ErrorKind::Unsupported,
            ErrorCode::InvocationFailure => ErrorKind::MethodInvoke,
        }
    }

    pub fn error_name(&self) -> &str {
        &self.report.name
    }

    pub fn message(&self) -> &str {
        &self.report.message
    }

    /// Address when the error occurred, if known
    pub fn address(&self) -> Option<&str> {
        self.report.current_url.as_deref()
    }

    pub fn report(&self) -> &ErrorReport {
        &self.report
    }

    pub fn cancel(&self) {
        self.cancelled.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }
}

pub type PopStateListener = Rc<dyn Fn(&PopState)>;
pub type ErrorListener = Rc<dyn Fn(&ErrorEvent)>;

/// Handle returned when registering a listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

// =============================================================================
// Listener Registry
// =============================================================================

#[derive(Default)]
struct Registry {
    next_id: Cell<u64>,
    pop_listeners: RefCell<Vec<(ListenerId, PopStateListener)>>,
    error_listeners: RefCell<Vec<(ListenerId, ErrorListener)>>,
    unsupported: Cell<bool>,
    unhandled: RefCell<Vec<HistoryError>>,
}

impl Registry {
    fn next_id(&self) -> ListenerId {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        ListenerId(id)
    }

    fn fire_pop_state(&self, event: &PopState) {
        let listeners: Vec<PopStateListener> = self
            .pop_listeners
            .borrow()
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        for listener in listeners {
            listener(event);
        }
    }

    fn fire_error(&self, event: &ErrorEvent) -> Result<()> {
        let listeners: Vec<ErrorListener> = self
            .error_listeners
            .borrow()
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        for listener in listeners {
            listener(event);
        }

        if event.kind() == ErrorKind::Unsupported {
            self.unsupported.set(true);
        }

        if event.is_cancelled() {
            Ok(())
        } else {
            Err(HistoryError::UnhandledClientError {
                name: event.error_name().to_string(),
                message: event.message().to_string(),
            })
        }
    }
}

impl NavigationHost for Registry {
    fn error(&self, report: ErrorReport) {
        let event = ErrorEvent::new(report);
        if let Err(err) = self.fire_error(&event) {
            tracing::error!(%err, "client error was not handled by any listener");
            self.unhandled.borrow_mut().push(err);
        }
    }

    fn popstate(&self, event: NavigationEvent) {
        self.fire_pop_state(&PopState {
            state: event.state,
            address: event.current_url,
        });
    }
}

// =============================================================================
// History Extension
// =============================================================================

struct Attached {
    sync: Rc<HistoryStateSync>,
    proxy: NavigationProxy,
}

/// Application-facing control over the session history
#[derive(Default)]
pub struct HistoryExtension {
    registry: Rc<Registry>,
    attached: OnceCell<Attached>,
    attaching: Cell<bool>,
}

impl HistoryExtension {
    pub fn new() -> Self {
        Self::default()
    }

    /// A new extension attached to `platform` with its listeners in place
    pub fn with_listeners(
        platform: Rc<dyn PlatformHistory>,
        pop_state: PopStateListener,
        error: ErrorListener,
    ) -> Result<Self> {
        let extension = Self::new();
        extension.add_pop_state_listener(pop_state);
        extension.add_error_listener(error);
        extension.extend(platform)?;
        Ok(extension)
    }

    /// Attach to `platform` and return the synchronization layer.
    ///
    /// Only the first call attaches; later calls return the existing layer.
    /// Listeners run while attaching (the capability report), and an `extend`
    /// from one of them fails with [`HistoryError::AttachInProgress`].
    pub fn extend(&self, platform: Rc<dyn PlatformHistory>) -> Result<Rc<HistoryStateSync>> {
        if let Some(attached) = self.attached.get() {
            tracing::warn!("history extension is already attached; ignoring extend");
            return Ok(Rc::clone(&attached.sync));
        }
        if self.attaching.replace(true) {
            tracing::warn!("extend called while attaching; ignoring");
            return Err(HistoryError::AttachInProgress);
        }

        let host: Rc<dyn NavigationHost> = self.registry.clone();
        let sync = Rc::new(HistoryStateSync::new(Rc::clone(&platform), host));
        let attached = self.attached.get_or_init(|| Attached {
            sync,
            proxy: NavigationProxy::new(platform),
        });
        self.attaching.set(false);
        Ok(Rc::clone(&attached.sync))
    }

    /// The synchronization layer, once attached
    pub fn sync(&self) -> Option<Rc<HistoryStateSync>> {
        self.attached.get().map(|attached| Rc::clone(&attached.sync))
    }

    /// Current document location, once attached
    pub fn location(&self) -> Option<String> {
        self.attached
            .get()
            .map(|attached| attached.sync.platform().location())
    }

    /// Whether the platform reported missing history support
    pub fn is_unsupported(&self) -> bool {
        self.registry.unsupported.get()
    }

    pub fn back(&self) {
        self.call_function("back", |attached| attached.proxy.back());
    }

    pub fn forward(&self) {
        self.call_function("forward", |attached| attached.proxy.forward());
    }

    /// Negative values go backwards, positive values go forwards
    pub fn go(&self, steps: i32) {
        self.call_function("go", |attached| attached.proxy.go(steps));
    }

    /// Push `next_state`, the state the application is about to enter
    pub fn push_state(&self, next_state: &Value, next_url: Option<&str>) -> Result<()> {
        let encoded = encode_state(next_state)?;
        self.call_function("pushState", |attached| {
            attached.sync.push_state(encoded, next_url)
        });
        Ok(())
    }

    pub fn push_state_map(
        &self,
        next_state: &BTreeMap<String, String>,
        next_url: Option<&str>,
    ) -> Result<()> {
        self.push_state(&serde_json::to_value(next_state)?, next_url)
    }

    /// Replace the current entry with `new_state`
    pub fn replace_state(&self, new_state: &Value, new_url: Option<&str>) -> Result<()> {
        let encoded = encode_state(new_state)?;
        self.call_function("replaceState", |attached| {
            attached.sync.replace_state(encoded, new_url)
        });
        Ok(())
    }

    pub fn replace_state_map(
        &self,
        new_state: &BTreeMap<String, String>,
        new_url: Option<&str>,
    ) -> Result<()> {
        self.replace_state(&serde_json::to_value(new_state)?, new_url)
    }

    pub fn add_pop_state_listener(&self, listener: PopStateListener) -> ListenerId {
        let id = self.registry.next_id();
        self.registry.pop_listeners.borrow_mut().push((id, listener));
        id
    }

    /// Returns `true` if the listener was found and removed
    pub fn remove_pop_state_listener(&self, id: ListenerId) -> bool {
        let mut listeners = self.registry.pop_listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(listener_id, _)| *listener_id != id);
        listeners.len() != before
    }

    pub fn add_error_listener(&self, listener: ErrorListener) -> ListenerId {
        let id = self.registry.next_id();
        self.registry.error_listeners.borrow_mut().push((id, listener));
        id
    }

    /// Returns `true` if the listener was found and removed
    pub fn remove_error_listener(&self, id: ListenerId) -> bool {
        let mut listeners = self.registry.error_listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(listener_id, _)| *listener_id != id);
        listeners.len() != before
    }

    /// Errors no listener cancelled since the last call
    pub fn take_unhandled_errors(&self) -> Vec<HistoryError> {
        std::mem::take(&mut *self.registry.unhandled.borrow_mut())
    }

    fn call_function(&self, name: &str, call: impl FnOnce(&Attached)) {
        if self.registry.unsupported.get() {
            tracing::warn!(
                function = name,
                "pushState is unsupported by the client browser; ignoring call"
            );
            return;
        }
        match self.attached.get() {
            Some(attached) => call(attached),
            None => {
                tracing::warn!(function = name, "history extension is not attached; ignoring call")
            }
        }
    }
}

/// States travel to the connector as JSON text
fn encode_state(state: &Value) -> Result<Value> {
    Ok(Value::String(serde_json::to_string(state)?))
}

// =============================================================================
// Tests
// =============================================================================

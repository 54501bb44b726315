//! History state synchronization
//!
//! Applies the host's push/replace requests to the platform history stack and
//! relays platform `popstate` notifications back to the host.
//!
//! - pushes to the current location are skipped
//! - textual states that parse as JSON are decoded, everything else passes through
//! - platform errors are reported to the host, never returned to the caller

use std::rc::{Rc, Weak};

use serde_json::Value;

use crate::host::NavigationHost;
use crate::location;
use crate::platform::PlatformHistory;
use crate::types::{ErrorReport, NavigationEvent, PopStateEvent};

// =============================================================================
// Constants
// =============================================================================

/// Error name reported when push/replace support is missing
pub const UNSUPPORTED_ERROR_NAME: &str = "Unsupported Browser";

// =============================================================================
// History State Sync
// =============================================================================

/// Keeps the platform's history stack in sync with the host's desired state
pub struct HistoryStateSync {
    platform: Rc<dyn PlatformHistory>,
    host: Rc<dyn NavigationHost>,
}

impl HistoryStateSync {
    /// Attach to `platform`, reporting to `host`.
    ///
    /// Reports a missing push/replace capability once, then installs the
    /// `popstate` relay if the platform supports event listeners.
    pub fn new(platform: Rc<dyn PlatformHistory>, host: Rc<dyn NavigationHost>) -> Self {
        if !platform.supports_push_state() || !platform.supports_replace_state() {
            host.error(ErrorReport::unsupported(
                UNSUPPORTED_ERROR_NAME,
                format!(
                    "history.pushState and/or history.replaceState not supported by the user's browser: {}",
                    platform.user_agent()
                ),
            ));
        }

        // The platform owns the relay, so the relay must not own the platform
        let relay_platform: Weak<dyn PlatformHistory> = Rc::downgrade(&platform);
        let relay_host = Rc::clone(&host);
        let installed = platform.add_popstate_listener(Rc::new(move |event: &PopStateEvent| {
            let Some(platform) = relay_platform.upgrade() else {
                return;
            };
            relay_host.popstate(NavigationEvent {
                state: event.state.clone(),
                current_url: platform.location(),
            });
        }));
        if !installed {
            tracing::debug!("platform has no event listener support; popstate will not be relayed");
        }

        Self { platform, host }
    }

    pub fn platform(&self) -> &Rc<dyn PlatformHistory> {
        &self.platform
    }

    /// Push a new entry unless `url` already is the current location
    pub fn push_state(&self, raw_state: Value, url: Option<&str>) {
        self.push_state_titled(raw_state, "", url);
    }

    /// [`push_state`](Self::push_state) with an explicit entry title
    pub fn push_state_titled(&self, raw_state: Value, title: &str, url: Option<&str>) {
        let current = self.platform.location();
        if location::prospective_url(&current, url).as_deref() == Some(current.as_str()) {
            tracing::debug!(url = %current, "already at location, skipping push");
            return;
        }

        let state = decode_state(raw_state);
        tracing::debug!(?url, "pushState");
        if let Err(err) = self.platform.push_state(state, title, url) {
            self.report_failure(err.name, err.message);
        }
    }

    /// Replace the current entry, even when `url` is the current location
    pub fn replace_state(&self, raw_state: Value, url: Option<&str>) {
        let state = decode_state(raw_state);
        tracing::debug!(?url, "replaceState");
        if let Err(err) = self.platform.replace_state(state, "", url) {
            self.report_failure(err.name, err.message);
        }
    }

    fn report_failure(&self, name: String, message: String) {
        let current_url = self.platform.location();
        tracing::debug!(%name, %message, %current_url, "history call failed");
        self.host.error(ErrorReport::invocation(name, message, current_url));
    }
}

/// Decode a textual JSON state, passing anything else through unchanged
pub fn decode_state(raw_state: Value) -> Value {
    match raw_state {
        Value::String(text) => match serde_json::from_str(&text) {
            Ok(decoded) => decoded,
            Err(_) => Value::String(text),
        },
        other => other,
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PlatformError;
    use crate::host::RecordingHost;
    use crate::memory::{Capabilities, MemoryHistory, PlatformCall};
    use crate::types::ErrorCode;
    use serde_json::json;
    use std::cell::RefCell;

    fn setup(start: &str) -> (Rc<MemoryHistory>, Rc<RecordingHost>, HistoryStateSync) {
        setup_with(start, Capabilities::default())
    }

    fn setup_with(
        start: &str,
        capabilities: Capabilities,
    ) -> (Rc<MemoryHistory>, Rc<RecordingHost>, HistoryStateSync) {
        let platform = Rc::new(
            MemoryHistory::with_capabilities(start, capabilities).with_user_agent("TestAgent/1.0"),
        );
        let host = Rc::new(RecordingHost::new());
        let sync = HistoryStateSync::new(platform.clone(), host.clone());
        (platform, host, sync)
    }

    #[test]
    fn push_to_current_location_is_skipped() {
        let (platform, host, sync) = setup("https://example.com/a");

        sync.push_state(json!("{\"x\":1}"), Some("/a"));

        assert!(platform.calls().is_empty());
        assert!(host.events().is_empty());
        assert_eq!(platform.entries().len(), 1);
    }

    #[test]
    fn push_to_new_location_decodes_state() {
        let (platform, host, sync) = setup("https://example.com/a");

        sync.push_state(json!("{\"x\":1}"), Some("/b"));

        assert_eq!(
            platform.calls(),
            vec![PlatformCall::PushState {
                state: json!({"x": 1}),
                title: String::new(),
                url: Some("/b".to_string()),
            }]
        );
        assert_eq!(platform.location(), "https://example.com/b");
        assert!(host.events().is_empty());
    }

    #[test]
    fn push_without_url_is_never_skipped() {
        let (platform, _host, sync) = setup("https://example.com/a");

        sync.push_state(Value::Null, None);

        assert_eq!(platform.calls().len(), 1);
        assert_eq!(platform.entries().len(), 2);
    }

    #[test]
    fn push_with_absolute_current_url_is_skipped() {
        let (platform, _host, sync) = setup("https://example.com/a");

        sync.push_state(Value::Null, Some("https://example.com/a"));

        assert!(platform.calls().is_empty());
    }

    #[test]
    fn replace_to_current_location_is_applied() {
        let (platform, host, sync) = setup("https://example.com/a");

        sync.replace_state(json!("{\"x\":1}"), Some("/a"));

        assert_eq!(
            platform.calls(),
            vec![PlatformCall::ReplaceState {
                state: json!({"x": 1}),
                title: String::new(),
                url: Some("/a".to_string()),
            }]
        );
        assert_eq!(platform.current_entry().state, json!({"x": 1}));
        assert!(host.events().is_empty());
    }

    #[test]
    fn undecodable_state_passes_through() {
        let (platform, host, sync) = setup("https://example.com/a");

        sync.push_state(json!("not json {"), Some("/b"));
        sync.replace_state(json!({"already": "structured"}), None);

        assert_eq!(
            platform.entries()[1].state,
            json!({"already": "structured"})
        );
        match &platform.calls()[0] {
            PlatformCall::PushState { state, .. } => assert_eq!(state, &json!("not json {")),
            other => panic!("unexpected call: {:?}", other),
        }
        assert!(host.events().is_empty());
    }

    #[test]
    fn decode_state_handles_scalars() {
        assert_eq!(decode_state(json!("42")), json!(42));
        assert_eq!(decode_state(json!("\"quoted\"")), json!("quoted"));
        assert_eq!(decode_state(json!("object")), json!("object"));
        assert_eq!(decode_state(json!("")), json!(""));
        assert_eq!(decode_state(Value::Null), Value::Null);
    }

    #[test]
    fn push_failure_is_reported_once_with_location() {
        let (platform, host, sync) = setup("https://example.com/a");
        platform.fail_next(PlatformError::new("DataCloneError", "state is not cloneable"));

        sync.push_state(json!("{}"), Some("/b"));

        assert_eq!(
            host.errors(),
            vec![ErrorReport {
                code: ErrorCode::InvocationFailure,
                name: "DataCloneError".to_string(),
                message: "state is not cloneable".to_string(),
                current_url: Some("https://example.com/a".to_string()),
            }]
        );
        assert_eq!(platform.entries().len(), 1);
    }

    #[test]
    fn cross_origin_push_is_reported_not_propagated() {
        let (platform, host, sync) = setup("https://example.com/a");

        sync.push_state(Value::Null, Some("https://other.org/b"));

        let errors = host.errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].name, "SecurityError");
        assert_eq!(errors[0].current_url.as_deref(), Some("https://example.com/a"));
        assert_eq!(platform.location(), "https://example.com/a");
    }

    #[test]
    fn replace_failure_is_reported() {
        let (platform, host, sync) = setup("https://example.com/a");
        platform.fail_next(PlatformError::new("SecurityError", "denied"));

        sync.replace_state(Value::Null, Some("/a"));

        let errors = host.errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].code, ErrorCode::InvocationFailure);
    }

    #[test]
    fn missing_capability_is_reported_once_at_construction() {
        let (platform, host, sync) = setup_with(
            "https://example.com/a",
            Capabilities {
                replace_state: false,
                ..Default::default()
            },
        );

        let errors = host.errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].code, ErrorCode::UnsupportedCapability);
        assert_eq!(errors[0].name, UNSUPPORTED_ERROR_NAME);
        assert!(errors[0].message.contains("TestAgent/1.0"));
        assert_eq!(errors[0].current_url, None);

        // The popstate relay is still installed
        platform.fire_popstate(json!("s"));
        assert_eq!(host.navigations().len(), 1);

        // Later calls fail through the normal error path
        sync.replace_state(Value::Null, None);
        assert_eq!(host.errors().len(), 2);
        assert_eq!(host.errors()[1].code, ErrorCode::InvocationFailure);
    }

    #[test]
    fn supported_platform_reports_nothing_at_construction() {
        let (_platform, host, _sync) = setup("https://example.com/a");
        assert!(host.events().is_empty());
    }

    #[test]
    fn popstate_is_relayed_in_order_with_location() {
        let (platform, host, sync) = setup("https://example.com/a");
        sync.push_state(json!("{\"n\":1}"), Some("/b"));
        sync.push_state(json!("{\"n\":2}"), Some("/c"));

        platform.back();
        platform.back();
        platform.forward();
        assert_eq!(platform.flush(), 3);

        assert_eq!(
            host.navigations(),
            vec![
                NavigationEvent {
                    state: json!({"n": 1}),
                    current_url: "https://example.com/b".to_string(),
                },
                NavigationEvent {
                    state: Value::Null,
                    current_url: "https://example.com/a".to_string(),
                },
                NavigationEvent {
                    state: json!({"n": 1}),
                    current_url: "https://example.com/b".to_string(),
                },
            ]
        );
    }

    #[test]
    fn identical_popstates_are_not_coalesced() {
        let (platform, host, _sync) = setup("https://example.com/a");

        for _ in 0..3 {
            platform.fire_popstate(json!("same"));
        }

        assert_eq!(host.navigations().len(), 3);
    }

    /// Host that pushes the address it was just told about, like a router
    /// re-syncing on every popstate
    struct ResyncingHost {
        inner: RecordingHost,
        sync: RefCell<Option<Rc<HistoryStateSync>>>,
    }

    impl NavigationHost for ResyncingHost {
        fn error(&self, report: ErrorReport) {
            self.inner.error(report);
        }

        fn popstate(&self, event: NavigationEvent) {
            let sync = self.sync.borrow().clone();
            if let Some(sync) = sync {
                sync.push_state(event.state.clone(), Some(&event.current_url));
            }
            self.inner.popstate(event);
        }
    }

    #[test]
    fn push_from_popstate_handler_is_skipped() {
        let platform = Rc::new(MemoryHistory::new("https://example.com/a"));
        let host = Rc::new(ResyncingHost {
            inner: RecordingHost::new(),
            sync: RefCell::new(None),
        });
        let sync = Rc::new(HistoryStateSync::new(platform.clone(), host.clone()));
        *host.sync.borrow_mut() = Some(Rc::clone(&sync));

        sync.push_state(json!("{\"n\":1}"), Some("/b"));
        platform.back();
        assert_eq!(platform.flush(), 1);

        assert_eq!(platform.calls().len(), 2);
        assert_eq!(platform.entries().len(), 2);
        assert_eq!(platform.location(), "https://example.com/a");
        assert_eq!(host.inner.navigations().len(), 1);
        assert!(host.inner.errors().is_empty());

        // Break the test-only host -> sync link
        host.sync.borrow_mut().take();
    }

    #[test]
    fn dropping_the_sync_releases_the_platform() {
        let platform = Rc::new(MemoryHistory::new("https://example.com/a"));
        let host = Rc::new(RecordingHost::new());
        let sync = HistoryStateSync::new(platform.clone(), host.clone());
        let weak_platform = Rc::downgrade(&platform);
        let weak_host = Rc::downgrade(&host);

        drop(sync);
        drop(platform);
        drop(host);

        assert!(weak_platform.upgrade().is_none());
        assert!(weak_host.upgrade().is_none());
    }

    #[test]
    fn popstate_is_not_relayed_without_event_support() {
        let (platform, host, _sync) = setup_with(
            "https://example.com/a",
            Capabilities {
                event_listeners: false,
                ..Default::default()
            },
        );

        platform.fire_popstate(json!("s"));
        assert!(host.events().is_empty());
    }
}

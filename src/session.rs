//! A simulated browsing session
//!
//! Wires an in-memory history, the history extension, a recording host and a
//! navigation link together the way a page would at load time.

use std::rc::Rc;

use crate::config::Config;
use crate::error::Result;
use crate::extension::{ErrorEvent, HistoryExtension, PopState};
use crate::host::RecordingHost;
use crate::link::NavigationLink;
use crate::memory::MemoryHistory;
use crate::platform::PlatformHistory;
use crate::sync::HistoryStateSync;
use crate::types::{HostEvent, NavigationEvent};

pub struct Session {
    platform: Rc<MemoryHistory>,
    extension: HistoryExtension,
    sync: Rc<HistoryStateSync>,
    host: Rc<RecordingHost>,
    link: NavigationLink,
}

impl Session {
    pub fn new(config: &Config) -> Result<Self> {
        let platform = Rc::new(
            MemoryHistory::with_capabilities(config.start_url.clone(), config.capabilities)
                .with_user_agent(config.user_agent.clone()),
        );
        let host = Rc::new(RecordingHost::new());
        let extension = HistoryExtension::new();

        let sink = Rc::clone(&host);
        extension.add_pop_state_listener(Rc::new(move |event: &PopState| {
            sink.record(HostEvent::Popstate(NavigationEvent {
                state: event.state().clone(),
                current_url: event.address().to_string(),
            }));
        }));

        let sink = Rc::clone(&host);
        extension.add_error_listener(Rc::new(move |event: &ErrorEvent| {
            sink.record(HostEvent::Error(event.report().clone()));
            event.cancel();
        }));

        let sync = extension.extend(platform.clone())?;
        let link = NavigationLink::new(host.clone(), Rc::clone(&sync));

        Ok(Self {
            platform,
            extension,
            sync,
            host,
            link,
        })
    }

    pub fn platform(&self) -> &MemoryHistory {
        &self.platform
    }

    pub fn extension(&self) -> &HistoryExtension {
        &self.extension
    }

    pub fn sync(&self) -> &HistoryStateSync {
        &self.sync
    }

    pub fn host(&self) -> &RecordingHost {
        &self.host
    }

    pub fn link(&self) -> &NavigationLink {
        &self.link
    }

    pub fn location(&self) -> String {
        self.platform.location()
    }
}

// =============================================================================
// Tests
// =============================================================================

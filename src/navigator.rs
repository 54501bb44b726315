//! Navigation state managers
//!
//! Bridge a view navigator to the history stack. The navigation state (a view
//! name plus optional parameters, e.g. `users/42`) is kept either in the URL
//! path under a root or in a `#!` fragment.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use serde_json::Value;

use crate::error::Result;
use crate::extension::{HistoryExtension, PopState};
use crate::location;

/// Prefix marking a navigation state inside the URL fragment
pub const FRAGMENT_PREFIX: &str = "!";

/// Something that can switch the application to a navigation state
pub trait Navigator {
    fn navigate_to(&self, state: &str);
}

/// Reads and writes the navigation state kept in the browser location
pub trait NavigationStateManager {
    /// Current navigation state
    fn state(&self) -> String;

    /// Record a new navigation state as a history entry
    fn set_state(&self, state: &str) -> Result<()>;

    fn set_navigator(&self, navigator: Rc<dyn Navigator>);
}

fn listen(extension: &HistoryExtension, on_pop: impl Fn(&PopState) + 'static) {
    extension.add_pop_state_listener(Rc::new(on_pop));
}

// =============================================================================
// Path State Manager
// =============================================================================

/// Stores the state in the URL path, e.g. `host/<root>/users/42`
pub struct PathStateManager {
    extension: Rc<HistoryExtension>,
    url_root: String,
    state: RefCell<Option<String>>,
    query: RefCell<Option<String>>,
    navigator: RefCell<Option<Rc<dyn Navigator>>>,
}

impl PathStateManager {
    pub fn attach(extension: Rc<HistoryExtension>, url_root: impl Into<String>) -> Rc<Self> {
        let manager = Rc::new(Self {
            extension: Rc::clone(&extension),
            url_root: url_root.into(),
            state: RefCell::new(None),
            query: RefCell::new(None),
            navigator: RefCell::new(None),
        });

        let weak: Weak<Self> = Rc::downgrade(&manager);
        listen(&extension, move |event| {
            if let Some(manager) = weak.upgrade() {
                manager.pop_state(event);
            }
        });
        manager
    }

    fn pop_state(&self, event: &PopState) {
        let state = self.parse_state(event.address());
        *self.state.borrow_mut() = Some(state.clone());
        let navigator = self.navigator.borrow().clone();
        if let Some(navigator) = navigator {
            navigator.navigate_to(&state);
        }
    }

    /// State encoded in the path of `address`; remembers the query
    fn parse_state(&self, address: &str) -> String {
        let Some(parts) = location::split(address) else {
            tracing::warn!(address, "could not parse a navigation state: not an absolute URL");
            return String::new();
        };

        let Some(rest) = parts.path.strip_prefix(self.url_root.as_str()) else {
            tracing::warn!(
                address,
                url_root = %self.url_root,
                "address does not start with the url root"
            );
            return String::new();
        };

        *self.query.borrow_mut() = parts.query.map(str::to_string);
        rest.strip_prefix('/').unwrap_or(rest).to_string()
    }
}

impl NavigationStateManager for PathStateManager {
    fn state(&self) -> String {
        if let Some(state) = self.state.borrow().as_ref() {
            return state.clone();
        }

        let parsed = match self.extension.location() {
            Some(address) => self.parse_state(&address),
            None => {
                tracing::warn!("could not parse a navigation state: extension is not attached");
                String::new()
            }
        };
        *self.state.borrow_mut() = Some(parsed.clone());
        parsed
    }

    fn set_state(&self, state: &str) -> Result<()> {
        *self.state.borrow_mut() = Some(state.to_string());
        let url = match self.query.borrow().as_deref() {
            Some(query) => format!("{}/{}?{}", self.url_root, state, query),
            None => format!("{}/{}", self.url_root, state),
        };
        self.extension.push_state(&Value::Null, Some(&url))
    }

    fn set_navigator(&self, navigator: Rc<dyn Navigator>) {
        *self.navigator.borrow_mut() = Some(navigator);
    }
}

// =============================================================================
// Fragment State Manager
// =============================================================================

/// Stores the state in the URL fragment, e.g. `host/app#!users/42`
pub struct FragmentStateManager {
    extension: Rc<HistoryExtension>,
    last_address: RefCell<Option<String>>,
    navigator: RefCell<Option<Rc<dyn Navigator>>>,
}

impl FragmentStateManager {
    pub fn attach(extension: Rc<HistoryExtension>) -> Rc<Self> {
        let manager = Rc::new(Self {
            last_address: RefCell::new(extension.location()),
            extension: Rc::clone(&extension),
            navigator: RefCell::new(None),
        });

        let weak: Weak<Self> = Rc::downgrade(&manager);
        listen(&extension, move |event| {
            if let Some(manager) = weak.upgrade() {
                manager.pop_state(event);
            }
        });
        manager
    }

    fn pop_state(&self, event: &PopState) {
        *self.last_address.borrow_mut() = Some(event.address().to_string());
        let navigator = self.navigator.borrow().clone();
        if let Some(navigator) = navigator {
            navigator.navigate_to(&parse_fragment_state(event.address()));
        }
    }
}

/// State held in a `#!state` fragment; empty without the prefix
pub fn parse_fragment_state(address: &str) -> String {
    location::split(address)
        .and_then(|parts| parts.fragment)
        .and_then(|fragment| fragment.strip_prefix(FRAGMENT_PREFIX))
        .unwrap_or_default()
        .to_string()
}

impl NavigationStateManager for FragmentStateManager {
    fn state(&self) -> String {
        self.last_address
            .borrow()
            .as_deref()
            .map(parse_fragment_state)
            .unwrap_or_default()
    }

    fn set_state(&self, state: &str) -> Result<()> {
        let base = self
            .last_address
            .borrow()
            .clone()
            .or_else(|| self.extension.location());
        let Some(base) = base else {
            tracing::warn!("could not create url: no current address");
            return Ok(());
        };

        let without_fragment = base.split('#').next().unwrap_or_default();
        let address = format!("{}#{}{}", without_fragment, FRAGMENT_PREFIX, state);
        self.extension.push_state(&Value::Null, Some(&address))?;
        *self.last_address.borrow_mut() = Some(address);
        Ok(())
    }

    fn set_navigator(&self, navigator: Rc<dyn Navigator>) {
        *self.navigator.borrow_mut() = Some(navigator);
    }
}

// =============================================================================
// Tests
// =============================================================================

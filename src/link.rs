//! Navigation link widget
//!
//! An anchor that pushes its target onto the history stack instead of letting
//! the platform perform a full page navigation.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use serde_json::Value;
use uuid::Uuid;

use crate::sync::HistoryStateSync;
use crate::types::LinkState;

/// State marker pushed for link activations
pub const LINK_STATE_MARKER: &str = "object";

// =============================================================================
// Element Model
// =============================================================================

/// Identity of a rendered node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(Uuid);

impl NodeId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An anchor element
#[derive(Debug)]
pub struct Anchor {
    id: NodeId,
    text: RefCell<String>,
    href: RefCell<String>,
}

impl Anchor {
    fn new() -> Self {
        Self {
            id: NodeId::new(),
            text: RefCell::new(String::new()),
            href: RefCell::new(String::new()),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn text(&self) -> String {
        self.text.borrow().clone()
    }

    pub fn href(&self) -> String {
        self.href.borrow().clone()
    }
}

/// An element that can hold anchors
pub trait Container {
    fn contains(&self, node: NodeId) -> bool;

    /// Append `anchor` as the last child
    fn append_child(&self, anchor: Rc<Anchor>);
}

/// In-memory container.
///
/// Appending a node that is already a child moves it to the end, like the DOM.
#[derive(Debug, Default)]
pub struct ElementContainer {
    children: RefCell<Vec<Rc<Anchor>>>,
}

impl ElementContainer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn children(&self) -> Vec<Rc<Anchor>> {
        self.children.borrow().clone()
    }

    pub fn child_count(&self) -> usize {
        self.children.borrow().len()
    }
}

impl Container for ElementContainer {
    fn contains(&self, node: NodeId) -> bool {
        self.children.borrow().iter().any(|child| child.id == node)
    }

    fn append_child(&self, anchor: Rc<Anchor>) {
        let mut children = self.children.borrow_mut();
        children.retain(|child| child.id != anchor.id);
        children.push(anchor);
    }
}

/// A click on the link
#[derive(Debug, Default)]
pub struct ClickEvent {
    default_prevented: Cell<bool>,
}

impl ClickEvent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prevent_default(&self) {
        self.default_prevented.set(true);
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented.get()
    }
}

// =============================================================================
// Link Host
// =============================================================================

/// Host side of a navigation link
pub trait LinkHost {
    /// The link was activated
    fn on_click(&self);

    /// Current link model
    fn state(&self) -> LinkState;

    /// Element the anchor renders into
    fn element(&self) -> Rc<dyn Container>;
}

// =============================================================================
// Navigation Link
// =============================================================================

pub struct NavigationLink {
    anchor: Rc<Anchor>,
    container: Rc<dyn Container>,
    host: Rc<dyn LinkHost>,
    sync: Rc<HistoryStateSync>,
}

impl NavigationLink {
    pub fn new(host: Rc<dyn LinkHost>, sync: Rc<HistoryStateSync>) -> Self {
        Self {
            anchor: Rc::new(Anchor::new()),
            container: host.element(),
            host,
            sync,
        }
    }

    pub fn anchor(&self) -> &Anchor {
        &self.anchor
    }

    /// Push the anchor's target, suppress the default navigation, tell the host
    pub fn click(&self, event: &ClickEvent) {
        let text = self.anchor.text();
        let href = self.anchor.href();
        tracing::debug!(%href, "link activated");

        self.sync.push_state_titled(
            Value::String(LINK_STATE_MARKER.to_string()),
            &text,
            Some(&href),
        );
        event.prevent_default();
        self.host.on_click();
    }

    /// Re-render from the host's link model
    pub fn on_state_change(&self) {
        let LinkState { text, href } = self.host.state();
        *self.anchor.text.borrow_mut() = text;
        *self.anchor.href.borrow_mut() = href;

        if !self.container.contains(self.anchor.id) {
            self.container.append_child(Rc::clone(&self.anchor));
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

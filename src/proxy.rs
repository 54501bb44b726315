//! Pass-through history traversal

use std::rc::Rc;

use crate::platform::PlatformHistory;

/// Delegates `back`, `forward` and `go` straight to the platform.
///
/// Traversals only schedule a navigation, so there is nothing to report.
pub struct NavigationProxy {
    platform: Rc<dyn PlatformHistory>,
}

impl NavigationProxy {
    pub fn new(platform: Rc<dyn PlatformHistory>) -> Self {
        Self { platform }
    }

    pub fn back(&self) {
        self.platform.back();
    }

    pub fn forward(&self) {
        self.platform.forward();
    }

    /// Negative `steps` go backwards, positive go forwards
    pub fn go(&self, steps: i32) {
        self.platform.go(steps);
    }
}

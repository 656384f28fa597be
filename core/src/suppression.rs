//! Typed-character suppression window.
//!
//! When contracted input injects a word, the host echoes every injected
//! character back as if the user typed it. A "speak typed characters"
//! announcer would then repeat the word letter by letter. The handler arms
//! this window with the number of injected characters; the announcer asks
//! `should_suppress()` for each echoed character and stays silent while the
//! window is open.
//!
//! The handle is shared by cloning. It is a hint for a single-threaded event
//! loop, not a lock.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Window {
    remaining: usize,
    armed_at: Instant,
}

/// Shared handle to the suppression window.
#[derive(Debug, Clone)]
pub struct TypedCharacterSuppression {
    window: Rc<RefCell<Option<Window>>>,
    timeout: Duration,
}

impl TypedCharacterSuppression {
    /// Create a closed window; armed windows expire after `timeout`.
    pub fn new(timeout: Duration) -> Self {
        Self {
            window: Rc::new(RefCell::new(None)),
            timeout,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Open the window for `count` characters, stamped now.
    pub fn arm(&self, count: usize) {
        self.arm_at(count, Instant::now());
    }

    /// Open the window for `count` characters, stamped `at`.
    pub fn arm_at(&self, count: usize, at: Instant) {
        *self.window.borrow_mut() = Some(Window {
            remaining: count,
            armed_at: at,
        });
    }

    /// Characters left in the window, ignoring expiry.
    pub fn pending(&self) -> usize {
        self.window.borrow().map(|w| w.remaining).unwrap_or(0)
    }

    /// When the window was last armed, if it is open.
    pub fn armed_at(&self) -> Option<Instant> {
        self.window.borrow().map(|w| w.armed_at)
    }

    pub fn should_suppress(&self) -> bool {
        self.should_suppress_at(Instant::now())
    }

    /// Consume one character from the window if it is open at `now`.
    ///
    /// Expired or exhausted windows are closed and report false.
    pub fn should_suppress_at(&self, now: Instant) -> bool {
        let mut slot = self.window.borrow_mut();
        let Some(mut window) = *slot else {
            return false;
        };
        let expired = now.saturating_duration_since(window.armed_at) > self.timeout;
        if expired || window.remaining == 0 {
            *slot = None;
            return false;
        }
        window.remaining -= 1;
        *slot = (window.remaining > 0).then_some(window);
        true
    }

    /// Close the window.
    pub fn clear(&self) {
        *self.window.borrow_mut() = None;
    }
}

impl Default for TypedCharacterSuppression {
    fn default() -> Self {
        Self::new(Duration::from_millis(200))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_consumes_exactly_count_characters() {
        let s = TypedCharacterSuppression::new(Duration::from_secs(1));
        let t0 = Instant::now();
        s.arm_at(2, t0);
        assert_eq!(s.pending(), 2);
        assert!(s.should_suppress_at(t0));
        assert!(s.should_suppress_at(t0));
        assert!(!s.should_suppress_at(t0));
        assert_eq!(s.pending(), 0);
    }

    #[test]
    fn test_expired_window_closes() {
        let s = TypedCharacterSuppression::new(Duration::from_millis(50));
        let t0 = Instant::now();
        s.arm_at(3, t0);
        assert!(!s.should_suppress_at(t0 + Duration::from_millis(51)));
        assert_eq!(s.armed_at(), None);
    }

    #[test]
    fn test_clones_share_the_window() {
        let handler_side = TypedCharacterSuppression::default();
        let announcer_side = handler_side.clone();
        handler_side.arm(1);
        assert!(announcer_side.should_suppress());
        assert_eq!(handler_side.pending(), 0);
    }

    #[test]
    fn test_rearming_replaces_window() {
        let s = TypedCharacterSuppression::new(Duration::from_secs(1));
        let t0 = Instant::now();
        s.arm_at(5, t0);
        s.arm_at(1, t0);
        assert_eq!(s.pending(), 1);
        s.clear();
        assert!(!s.should_suppress_at(t0));
    }
}

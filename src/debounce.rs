//! Edge filter for the key input.
//!
//! Pure logic, no hardware dependencies. Consumes raw sampled levels
//! plus a monotonic timestamp, produces settled press/release events.
//! Transitions arriving inside the settle window are coalesced with the
//! prior accepted edge of the same kind; a sustained level is accepted
//! as soon as its window expires, so no real transition is ever lost.

use crate::config::MorseConfig;

/// Direction of a settled transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Edge {
    Press,
    Release,
}

/// A settled key transition.
///
/// Produced by [`Debouncer::accept`], consumed immediately by the
/// encoder. Never retained.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimingEvent {
    pub edge: Edge,
    pub at_ms: u64,
}

/// Key input debouncer with independent press and release windows.
#[derive(Debug)]
pub struct Debouncer {
    press_window_ms: u32,
    release_window_ms: u32,

    settled: bool,
    last_press_ms: Option<u64>,
    last_release_ms: Option<u64>,
}

impl Debouncer {
    /// Create a debouncer with the configured settle windows.
    ///
    /// The settled level starts released.
    pub fn new(cfg: &MorseConfig) -> Self {
        Self {
            press_window_ms: cfg.press_debounce_ms,
            release_window_ms: cfg.release_debounce_ms,
            settled: false,
            last_press_ms: None,
            last_release_ms: None,
        }
    }

    /// Current settled level (true = pressed).
    #[inline]
    pub fn settled_level(&self) -> bool {
        self.settled
    }

    /// Feed one raw sample.
    ///
    /// Returns a settled event only when the level differs from the
    /// settled state and at least the kind's window has elapsed since
    /// the last accepted edge of that kind.
    pub fn accept(&mut self, raw_level: bool, now_ms: u64) -> Option<TimingEvent> {
        if raw_level == self.settled {
            return None;
        }

        let (window_ms, last_accepted) = if raw_level {
            (self.press_window_ms, self.last_press_ms)
        } else {
            (self.release_window_ms, self.last_release_ms)
        };

        if let Some(last) = last_accepted {
            if now_ms.saturating_sub(last) < u64::from(window_ms) {
                // Inside the settle window: coalesce, retry while held
                return None;
            }
        }

        self.settled = raw_level;
        let edge = if raw_level {
            self.last_press_ms = Some(now_ms);
            Edge::Press
        } else {
            self.last_release_ms = Some(now_ms);
            Edge::Release
        };

        Some(TimingEvent { edge, at_ms: now_ms })
    }
}

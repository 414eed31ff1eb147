//! Lock-free key edge handoff.
//!
//! An interrupt handler that catches a button edge cannot run the
//! protocol logic in place. It records the edge here and the polled
//! transmit loop picks it up on its next pass. Holds a single pending
//! edge; a newer edge before pickup replaces the older one, and the
//! counter keeps the overwrite visible.
//!
//! # Usage
//!
//! ```ignore
//! static KEY_EDGE: EdgeLatch = EdgeLatch::new();
//!
//! // In ISR:
//! KEY_EDGE.record(Edge::Press, now_ms);
//!
//! // In main loop:
//! if let Some(edge) = KEY_EDGE.take() {
//!     node.on_raw_edge(edge);
//! }
//! ```

use core::sync::atomic::{AtomicBool, AtomicU32, AtomicU8, Ordering};

use crate::debounce::Edge;

/// A key edge captured out of band.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LatchedEdge {
    pub edge: Edge,
    pub at_ms: u32,
}

/// Single-slot atomic edge mailbox.
///
/// Writer side is wait-free and safe from interrupt context. Reader
/// side consumes with [`take`](EdgeLatch::take).
pub struct EdgeLatch {
    /// True while an edge is waiting to be taken.
    armed: AtomicBool,

    /// Edge polarity (0 = release, 1 = press).
    edge: AtomicU8,

    /// Capture timestamp in milliseconds.
    at_ms: AtomicU32,

    /// Total edges recorded since boot (never cleared).
    count: AtomicU32,
}

impl EdgeLatch {
    /// Create an empty latch.
    pub const fn new() -> Self {
        Self {
            armed: AtomicBool::new(false),
            edge: AtomicU8::new(0),
            at_ms: AtomicU32::new(0),
            count: AtomicU32::new(0),
        }
    }

    /// Record an edge, replacing any pending one.
    ///
    /// Payload is stored before the armed flag so a reader that
    /// observes the flag also observes the matching edge.
    #[inline]
    pub fn record(&self, edge: Edge, at_ms: u32) {
        self.edge.store(edge_to_u8(edge), Ordering::Release);
        self.at_ms.store(at_ms, Ordering::Release);
        self.count.fetch_add(1, Ordering::Relaxed);
        self.armed.store(true, Ordering::Release);
    }

    /// Take the pending edge, if any, disarming the latch.
    #[inline]
    pub fn take(&self) -> Option<LatchedEdge> {
        if !self.armed.load(Ordering::Acquire) {
            return None;
        }
        let edge = edge_from_u8(self.edge.load(Ordering::Acquire));
        let at_ms = self.at_ms.load(Ordering::Acquire);
        self.armed.store(false, Ordering::Release);
        Some(LatchedEdge { edge, at_ms })
    }

    /// Check whether an edge is pending without consuming it.
    #[inline]
    pub fn is_armed(&self) -> bool {
        self.armed.load(Ordering::Acquire)
    }

    /// Get total edges recorded since boot.
    #[inline]
    pub fn count(&self) -> u32 {
        self.count.load(Ordering::Relaxed)
    }

    /// Drop any pending edge.
    ///
    /// Note: this disarms the latch but does NOT reset the counter.
    #[inline]
    pub fn clear(&self) {
        self.armed.store(false, Ordering::Release);
    }
}

impl Default for EdgeLatch {
    fn default() -> Self {
        Self::new()
    }
}

#[inline]
fn edge_to_u8(edge: Edge) -> u8 {
    match edge {
        Edge::Release => 0,
        Edge::Press => 1,
    }
}

#[inline]
fn edge_from_u8(value: u8) -> Edge {
    match value {
        1 => Edge::Press,
        _ => Edge::Release,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latch_basic() {
        let latch = EdgeLatch::new();

        assert!(!latch.is_armed());
        assert_eq!(latch.take(), None);
        assert_eq!(latch.count(), 0);

        latch.record(Edge::Press, 120);

        assert!(latch.is_armed());
        assert_eq!(
            latch.take(),
            Some(LatchedEdge {
                edge: Edge::Press,
                at_ms: 120
            })
        );
        assert!(!latch.is_armed());
        assert_eq!(latch.count(), 1);

        // Second take finds nothing
        assert_eq!(latch.take(), None);
    }

    #[test]
    fn test_newer_edge_replaces_pending() {
        let latch = EdgeLatch::new();

        latch.record(Edge::Press, 100);
        latch.record(Edge::Release, 130);

        let taken = latch.take();
        assert_eq!(
            taken,
            Some(LatchedEdge {
                edge: Edge::Release,
                at_ms: 130
            })
        );
        // Both records counted even though one was lost
        assert_eq!(latch.count(), 2);
    }

    #[test]
    fn test_clear_preserves_count() {
        let latch = EdgeLatch::new();

        latch.record(Edge::Press, 5);
        latch.clear();

        assert!(!latch.is_armed());
        assert_eq!(latch.take(), None);
        assert_eq!(latch.count(), 1); // Count preserved
    }

    #[test]
    fn test_cross_thread_handoff() {
        use std::sync::Arc;
        use std::thread;

        let latch = Arc::new(EdgeLatch::new());
        let writer = Arc::clone(&latch);

        let handle = thread::spawn(move || {
            for i in 0..100u32 {
                writer.record(Edge::Press, i);
                while writer.is_armed() {
                    thread::yield_now();
                }
            }
        });

        let mut taken = 0u32;
        while taken < 100 {
            if let Some(edge) = latch.take() {
                assert_eq!(edge.edge, Edge::Press);
                assert_eq!(edge.at_ms, taken);
                taken += 1;
            } else {
                thread::yield_now();
            }
        }

        handle.join().unwrap();
        assert_eq!(latch.count(), 100);
    }
}

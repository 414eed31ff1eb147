//! Deferred logging for the keying and decoding loops.
//!
//! ```text
//! Poll loop               LogStream            Drain side
//! ─────────               ─────────            ──────────
//!
//! link_info!() ─────────▶ [L0][L1][L2] ──────▶ serial / console
//! non-blocking            lock-free            blocking ok
//!                         ring buffer
//! ```
//!
//! The transmit and receive loops run on a fixed poll cadence and must
//! never stall on serial output. They format into a fixed buffer and
//! push here; whoever owns the console drains at leisure. Messages are
//! dropped, and counted, when the ring is full.

use core::cell::UnsafeCell;
use core::sync::atomic::{AtomicU32, Ordering};

/// Maximum message length.
pub const MAX_MSG_LEN: usize = 64;

/// Log buffer size (number of entries).
pub const LOG_BUFFER_SIZE: usize = 64;

/// Log level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum LogLevel {
    Error = 0,
    Warn = 1,
    Info = 2,
    Debug = 3,
}

impl LogLevel {
    /// Convert to string for output.
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warn => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
        }
    }
}

/// A single log entry.
#[derive(Clone, Copy)]
pub struct LogEntry {
    /// Timestamp in milliseconds.
    pub at_ms: u64,
    /// Log level.
    pub level: LogLevel,
    /// Message length.
    pub len: u8,
    /// Message bytes (not null-terminated).
    pub msg: [u8; MAX_MSG_LEN],
}

impl LogEntry {
    /// View the message as text.
    pub fn message(&self) -> &str {
        core::str::from_utf8(&self.msg[..self.len as usize]).unwrap_or("")
    }
}

impl Default for LogEntry {
    fn default() -> Self {
        Self {
            at_ms: 0,
            level: LogLevel::Info,
            len: 0,
            msg: [0; MAX_MSG_LEN],
        }
    }
}

/// Lock-free log stream (SPSC: one producer loop, one drain side).
///
/// - Push never blocks (drops message if full)
/// - Drain runs elsewhere at leisure
///
/// The single-producer contract is what makes the plain load on the
/// write index sound; do not push from two contexts at once.
pub struct LogStream<const N: usize = LOG_BUFFER_SIZE> {
    entries: UnsafeCell<[LogEntry; N]>,
    write_idx: AtomicU32,
    read_idx: AtomicU32,
    dropped: AtomicU32,
}

// SAFETY: Single producer writes entries then publishes via a Release
// store of write_idx; the single consumer Acquire-loads write_idx before
// reading, so it only reads published slots.
unsafe impl<const N: usize> Sync for LogStream<N> {}
unsafe impl<const N: usize> Send for LogStream<N> {}

impl<const N: usize> LogStream<N> {
    const MASK: usize = N - 1;

    /// Create a new empty log stream.
    pub const fn new() -> Self {
        assert!(N.is_power_of_two(), "Log buffer size must be power of 2");

        Self {
            entries: UnsafeCell::new(
                [LogEntry {
                    at_ms: 0,
                    level: LogLevel::Info,
                    len: 0,
                    msg: [0; MAX_MSG_LEN],
                }; N],
            ),
            write_idx: AtomicU32::new(0),
            read_idx: AtomicU32::new(0),
            dropped: AtomicU32::new(0),
        }
    }

    /// Push a log entry (never blocks).
    ///
    /// Returns `true` if the message was queued, `false` if dropped
    /// (ring full). A dropped push does not consume a slot.
    #[inline]
    pub fn push(&self, at_ms: u64, level: LogLevel, msg: &[u8]) -> bool {
        let write = self.write_idx.load(Ordering::Relaxed);
        let read = self.read_idx.load(Ordering::Acquire);

        if write.wrapping_sub(read) >= N as u32 {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            return false;
        }

        let idx = (write as usize) & Self::MASK;

        // SAFETY: The slot at write is not visible to the consumer until
        // the Release store below, and we are the only producer.
        unsafe {
            let entry = &mut (*self.entries.get())[idx];
            entry.at_ms = at_ms;
            entry.level = level;
            entry.len = msg.len().min(MAX_MSG_LEN) as u8;
            entry.msg[..entry.len as usize].copy_from_slice(&msg[..entry.len as usize]);
        }

        self.write_idx.store(write.wrapping_add(1), Ordering::Release);
        true
    }

    /// Drain the next log entry.
    ///
    /// Returns `None` if no entries are available.
    #[inline]
    pub fn drain(&self) -> Option<LogEntry> {
        let read = self.read_idx.load(Ordering::Relaxed);
        let write = self.write_idx.load(Ordering::Acquire);

        if read == write {
            return None;
        }

        let idx = (read as usize) & Self::MASK;

        // SAFETY: Single consumer, and the Acquire load above ordered
        // this read after the producer's writes to the slot.
        let entry = unsafe { (*self.entries.get())[idx] };

        self.read_idx.store(read.wrapping_add(1), Ordering::Release);
        Some(entry)
    }

    /// Drain everything into a text sink, one line per entry.
    ///
    /// Returns the number of entries rendered. Formatting errors from
    /// the sink stop the drain early.
    pub fn drain_to(&self, out: &mut impl core::fmt::Write) -> usize {
        let mut count = 0;
        while let Some(entry) = self.drain() {
            if writeln!(
                out,
                "[{}ms] {} {}",
                entry.at_ms,
                entry.level.as_str(),
                entry.message()
            )
            .is_err()
            {
                break;
            }
            count += 1;
        }
        count
    }

    /// Get count of dropped messages.
    #[inline]
    pub fn dropped(&self) -> u32 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Reset dropped counter (e.g., after reporting).
    #[inline]
    pub fn reset_dropped(&self) {
        self.dropped.store(0, Ordering::Relaxed);
    }

    /// Check if there are entries to drain.
    #[inline]
    pub fn has_entries(&self) -> bool {
        let read = self.read_idx.load(Ordering::Relaxed);
        let write = self.write_idx.load(Ordering::Acquire);
        read != write
    }

    /// Get number of entries waiting to be drained.
    #[inline]
    pub fn pending(&self) -> u32 {
        let read = self.read_idx.load(Ordering::Relaxed);
        let write = self.write_idx.load(Ordering::Acquire);
        write.wrapping_sub(read)
    }
}

impl<const N: usize> Default for LogStream<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Format a message into a buffer.
///
/// Returns the number of bytes written. Output beyond the buffer is
/// truncated, not an error.
#[inline]
pub fn format_to_buffer(buf: &mut [u8], args: core::fmt::Arguments<'_>) -> usize {
    use core::fmt::Write;

    struct BufWriter<'a> {
        buf: &'a mut [u8],
        pos: usize,
    }

    impl<'a> Write for BufWriter<'a> {
        fn write_str(&mut self, s: &str) -> core::fmt::Result {
            let bytes = s.as_bytes();
            let remaining = self.buf.len() - self.pos;
            let to_write = bytes.len().min(remaining);
            self.buf[self.pos..self.pos + to_write].copy_from_slice(&bytes[..to_write]);
            self.pos += to_write;
            Ok(())
        }
    }

    let mut writer = BufWriter { buf, pos: 0 };
    let _ = core::fmt::write(&mut writer, args);
    writer.pos
}

/// Non-blocking log macro for the poll loops.
///
/// # Example
///
/// ```ignore
/// link_log!(LogLevel::Info, LOG_STREAM, now_ms, "Sent: {}", symbol);
/// ```
#[macro_export]
macro_rules! link_log {
    ($level:expr, $stream:expr, $at_ms:expr, $($arg:tt)*) => {{
        let mut buf = [0u8; $crate::logging::MAX_MSG_LEN];
        let len = $crate::logging::format_to_buffer(&mut buf, format_args!($($arg)*));
        $stream.push($at_ms, $level, &buf[..len]);
    }};
}

/// Info-level log.
#[macro_export]
macro_rules! link_info {
    ($stream:expr, $at_ms:expr, $($arg:tt)*) => {
        $crate::link_log!($crate::logging::LogLevel::Info, $stream, $at_ms, $($arg)*)
    };
}

/// Warning-level log.
#[macro_export]
macro_rules! link_warn {
    ($stream:expr, $at_ms:expr, $($arg:tt)*) => {
        $crate::link_log!($crate::logging::LogLevel::Warn, $stream, $at_ms, $($arg)*)
    };
}

/// Error-level log.
#[macro_export]
macro_rules! link_error {
    ($stream:expr, $at_ms:expr, $($arg:tt)*) => {
        $crate::link_log!($crate::logging::LogLevel::Error, $stream, $at_ms, $($arg)*)
    };
}

/// Debug-level log.
#[macro_export]
macro_rules! link_debug {
    ($stream:expr, $at_ms:expr, $($arg:tt)*) => {
        $crate::link_log!($crate::logging::LogLevel::Debug, $stream, $at_ms, $($arg)*)
    };
}

//! Mock implementations of the hardware seams.
//!
//! In-memory doubles for tests and for running the whole pipeline on a
//! host: a recording output channel, a byte-only wire channel, a
//! loopback wire, a recording display, and a scripted key. All storage
//! is bounded; none of this requires an allocator.

use core::cell::RefCell;
use core::convert::Infallible;

use embedded_io::{ErrorType, Read, ReadReady, Write};
use heapless::{Deque, String, Vec};

use crate::display::DisplayDriver;
use crate::io::{KeyInput, OutputChannel};

/// One recorded output-channel primitive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChannelOp {
    Tone(u32, u32),
    Level(bool),
    Byte(u8),
    Pace(u32),
}

/// Output channel that records every primitive it is asked to render.
#[derive(Default)]
pub struct RecordingChannel {
    ops: Vec<ChannelOp, 256>,
}

impl RecordingChannel {
    pub fn new() -> Self {
        Self { ops: Vec::new() }
    }

    /// Everything emitted so far, in order.
    pub fn ops(&self) -> &[ChannelOp] {
        &self.ops
    }

    /// Just the wire bytes, in order.
    pub fn sent_bytes(&self) -> Vec<u8, 256> {
        let mut bytes = Vec::new();
        for op in &self.ops {
            if let ChannelOp::Byte(b) = op {
                let _ = bytes.push(*b);
            }
        }
        bytes
    }

    pub fn clear(&mut self) {
        self.ops.clear();
    }
}

impl OutputChannel for RecordingChannel {
    fn emit_tone(&mut self, freq_hz: u32, duration_ms: u32) {
        let _ = self.ops.push(ChannelOp::Tone(freq_hz, duration_ms));
    }

    fn emit_level(&mut self, on: bool) {
        let _ = self.ops.push(ChannelOp::Level(on));
    }

    fn emit_symbol_byte(&mut self, byte: u8) {
        let _ = self.ops.push(ChannelOp::Byte(byte));
    }

    fn pace(&mut self, duration_ms: u32) {
        let _ = self.ops.push(ChannelOp::Pace(duration_ms));
    }
}

/// Output channel that forwards wire bytes and treats time as virtual.
///
/// Tones, indicator levels, and pacing render as nothing, which lets a
/// scripted run step through timestamps without real sleeps.
pub struct WireChannel<W> {
    wire: W,
}

impl<W: Write> WireChannel<W> {
    pub fn new(wire: W) -> Self {
        Self { wire }
    }
}

impl<W: Write> OutputChannel for WireChannel<W> {
    fn emit_tone(&mut self, _freq_hz: u32, _duration_ms: u32) {}

    fn emit_level(&mut self, _on: bool) {}

    fn emit_symbol_byte(&mut self, byte: u8) {
        let _ = self.wire.write_all(&[byte]);
    }

    fn pace(&mut self, _duration_ms: u32) {}
}

/// Loopback wire capacity in bytes.
pub const WIRE_CAPACITY: usize = 1024;

/// In-memory serial wire connecting a transmit node to a receive node.
///
/// Implements the byte-stream traits on `&LoopbackWire`, so one wire
/// can sit between a writer and a reader without being owned by either.
/// Overflow behaves like a saturated FIFO: excess bytes are lost.
pub struct LoopbackWire {
    queue: RefCell<Deque<u8, WIRE_CAPACITY>>,
}

impl LoopbackWire {
    pub const fn new() -> Self {
        Self {
            queue: RefCell::new(Deque::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.queue.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.borrow().is_empty()
    }
}

impl Default for LoopbackWire {
    fn default() -> Self {
        Self::new()
    }
}

impl ErrorType for LoopbackWire {
    type Error = Infallible;
}

impl ErrorType for &LoopbackWire {
    type Error = Infallible;
}

impl Write for &LoopbackWire {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Infallible> {
        let mut queue = self.queue.borrow_mut();
        for &b in buf {
            let _ = queue.push_back(b);
        }
        // Report the whole buffer consumed even when saturated
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Infallible> {
        Ok(())
    }
}

impl Read for &LoopbackWire {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Infallible> {
        let mut queue = self.queue.borrow_mut();
        let mut n = 0;
        while n < buf.len() {
            match queue.pop_front() {
                Some(b) => {
                    buf[n] = b;
                    n += 1;
                }
                None => break,
            }
        }
        Ok(n)
    }
}

impl ReadReady for &LoopbackWire {
    fn read_ready(&mut self) -> Result<bool, Infallible> {
        Ok(!self.queue.borrow().is_empty())
    }
}

impl Write for LoopbackWire {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Infallible> {
        (&mut &*self).write(buf)
    }

    fn flush(&mut self) -> Result<(), Infallible> {
        Ok(())
    }
}

impl Read for LoopbackWire {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Infallible> {
        (&mut &*self).read(buf)
    }
}

impl ReadReady for LoopbackWire {
    fn read_ready(&mut self) -> Result<bool, Infallible> {
        Ok(!self.queue.borrow().is_empty())
    }
}

/// One recorded display-driver call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DisplayCall {
    Clear,
    SetCursor(u8, u8),
    Print(String<64>),
}

impl DisplayCall {
    /// Build a `Print` record. Text longer than the record capacity is
    /// not expected from the buffer and records as empty.
    pub fn print(text: &str) -> Self {
        let mut s = String::new();
        let _ = s.push_str(text);
        DisplayCall::Print(s)
    }
}

/// Display driver that records calls instead of driving glass.
pub struct MockDisplay {
    calls: Vec<DisplayCall, 256>,
    available: bool,
}

impl MockDisplay {
    /// A display whose `init` succeeds.
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            available: true,
        }
    }

    /// A display whose `init` fails, for degrade-path tests.
    pub fn unavailable() -> Self {
        Self {
            calls: Vec::new(),
            available: false,
        }
    }

    /// Every driver call since construction, in order.
    pub fn calls(&self) -> &[DisplayCall] {
        &self.calls
    }
}

impl Default for MockDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplayDriver for MockDisplay {
    fn init(&mut self) -> bool {
        self.available
    }

    fn clear(&mut self) {
        let _ = self.calls.push(DisplayCall::Clear);
    }

    fn set_cursor(&mut self, col: u8, row: u8) {
        let _ = self.calls.push(DisplayCall::SetCursor(col, row));
    }

    fn print(&mut self, text: &str) {
        let _ = self.calls.push(DisplayCall::print(text));
    }
}

/// Key that follows a fixed press schedule.
///
/// Each `(from_ms, to_ms)` pair is a half-open interval during which
/// the key reads pressed.
pub struct ScriptedKey<'a> {
    schedule: &'a [(u64, u64)],
}

impl<'a> ScriptedKey<'a> {
    pub fn new(schedule: &'a [(u64, u64)]) -> Self {
        Self { schedule }
    }
}

impl KeyInput for ScriptedKey<'_> {
    fn level(&mut self, now_ms: u64) -> bool {
        self.schedule
            .iter()
            .any(|&(from, to)| now_ms >= from && now_ms < to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loopback_preserves_byte_order() {
        let wire = LoopbackWire::new();

        let mut tx = &wire;
        tx.write_all(b".-C").unwrap();
        assert_eq!(wire.len(), 3);

        let mut rx = &wire;
        assert!(rx.read_ready().unwrap());
        let mut buf = [0u8; 8];
        let n = rx.read(&mut buf).unwrap();
        assert_eq!(&buf[..n], b".-C");
        assert!(!rx.read_ready().unwrap());
    }

    #[test]
    fn test_loopback_reader_sees_writes_interleaved() {
        let wire = LoopbackWire::new();
        let mut tx = &wire;
        let mut rx = &wire;
        let mut buf = [0u8; 4];

        tx.write_all(b".").unwrap();
        let n = rx.read(&mut buf).unwrap();
        assert_eq!(&buf[..n], b".");

        tx.write_all(b"-W").unwrap();
        let n = rx.read(&mut buf).unwrap();
        assert_eq!(&buf[..n], b"-W");
    }

    #[test]
    fn test_empty_wire_reads_zero() {
        let wire = LoopbackWire::new();
        let mut rx = &wire;
        let mut buf = [0u8; 4];
        assert_eq!(rx.read(&mut buf).unwrap(), 0);
    }

    #[test]
    fn test_scripted_key_intervals_are_half_open() {
        let mut key = ScriptedKey::new(&[(100, 300), (500, 600)]);

        assert!(!key.level(99));
        assert!(key.level(100));
        assert!(key.level(299));
        assert!(!key.level(300));
        assert!(key.level(550));
        assert!(!key.level(600));
    }

    #[test]
    fn test_recording_channel_collects_bytes() {
        let mut ch = RecordingChannel::new();
        ch.emit_level(true);
        ch.emit_symbol_byte(b'.');
        ch.pace(250);
        ch.emit_symbol_byte(b'C');

        assert_eq!(ch.sent_bytes().as_slice(), b".C");
        assert_eq!(ch.ops().len(), 4);
    }

    #[test]
    fn test_wire_channel_forwards_only_bytes() {
        let wire = LoopbackWire::new();
        let mut ch = WireChannel::new(&wire);

        ch.emit_level(true);
        ch.emit_tone(800, 250);
        ch.emit_symbol_byte(b'-');
        ch.pace(250);

        assert_eq!(wire.len(), 1);
    }
}

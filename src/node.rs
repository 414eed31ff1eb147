//! Transmit and receive poll loops.
//!
//! Two node types, one per end of the link:
//! - **TransmitNode**: samples the key, debounces, classifies presses,
//!   renders symbols and gap markers on the output channel
//! - **ReceiveNode**: drains the wire, feeds the accumulator, applies
//!   silence timeouts, forwards letters to the sink
//!
//! Both are caller-clocked: the owner calls `poll(now_ms)` on its own
//! cadence and supplies time. Nothing here sleeps or blocks, so the
//! same code drives real hardware and host tests.

use embedded_io::{Read, ReadReady};

use crate::accumulator::{LetterSink, SymbolAccumulator};
use crate::config::MorseConfig;
use crate::debounce::{Debouncer, Edge, TimingEvent};
use crate::encoder::TransmitEncoder;
use crate::io::{KeyInput, OutputChannel};
use crate::latch::{EdgeLatch, LatchedEdge};
use crate::logging::LogStream;
use crate::symbol::{GapKind, Letter};
use crate::{link_debug, link_info, link_warn};

/// Transmit-side poll loop.
///
/// # Example
///
/// ```ignore
/// static LOG: LogStream = LogStream::new();
///
/// let mut node = TransmitNode::new(cfg, button, channel, Some(&LOG));
/// node.send_sync(clock.now_ms());
///
/// loop {
///     node.poll(clock.now_ms());
///     delay.delay_ms(cfg.tx_poll_ms);
/// }
/// ```
pub struct TransmitNode<'a, K: KeyInput, C: OutputChannel> {
    key: K,
    channel: C,
    debouncer: Debouncer,
    encoder: TransmitEncoder,
    log: Option<&'a LogStream>,
}

impl<'a, K: KeyInput, C: OutputChannel> TransmitNode<'a, K, C> {
    /// Create a transmit node.
    ///
    /// # Arguments
    ///
    /// * `cfg` - Timing and tone configuration
    /// * `key` - Key or button to sample
    /// * `channel` - Where symbols and markers are rendered
    /// * `log` - Optional log stream for keying events
    pub fn new(
        cfg: MorseConfig,
        key: K,
        channel: C,
        log: Option<&'a LogStream>,
    ) -> Self {
        Self {
            key,
            channel,
            debouncer: Debouncer::new(&cfg),
            encoder: TransmitEncoder::new(cfg),
            log,
        }
    }

    /// Run one poll pass: sample the key, then either handle the edge
    /// or account for the silence.
    ///
    /// Gap markers are only considered on passes without a key event,
    /// so an edge and a gap never land in the same pass.
    pub fn poll(&mut self, now_ms: u64) {
        let raw = self.key.level(now_ms);
        if let Some(event) = self.debouncer.accept(raw, now_ms) {
            self.on_event(event);
        } else {
            self.on_quiet(now_ms);
        }
    }

    /// Feed an edge captured out of band (e.g. by an interrupt via
    /// [`EdgeLatch`]). Runs the same debounce and classification path
    /// as a sampled transition.
    pub fn on_raw_edge(&mut self, edge: LatchedEdge) {
        let raw = edge.edge == Edge::Press;
        if let Some(event) = self.debouncer.accept(raw, u64::from(edge.at_ms)) {
            self.on_event(event);
        }
    }

    /// Take a pending edge from the latch, if any, and process it.
    pub fn service_latch(&mut self, latch: &EdgeLatch) {
        if let Some(edge) = latch.take() {
            self.on_raw_edge(edge);
        }
    }

    /// Transmit the configured sync preamble.
    pub fn send_sync(&mut self, now_ms: u64) {
        if let Some(log) = self.log {
            link_info!(log, now_ms, "Transmitting sync pattern...");
        }
        self.encoder.send_sync(&mut self.channel);
        if let Some(log) = self.log {
            link_info!(log, now_ms, "Sync pattern transmitted");
        }
    }

    /// Get the keying encoder state.
    pub fn encoder(&self) -> &TransmitEncoder {
        &self.encoder
    }

    /// Get the output channel.
    pub fn channel(&self) -> &C {
        &self.channel
    }

    /// Get the output channel mutably.
    pub fn channel_mut(&mut self) -> &mut C {
        &mut self.channel
    }

    // --- Private methods ---

    fn on_event(&mut self, event: TimingEvent) {
        match event.edge {
            Edge::Press => self.encoder.on_press(event.at_ms),
            Edge::Release => {
                match self.encoder.on_release(event.at_ms, &mut self.channel) {
                    Some(sym) => {
                        if let Some(log) = self.log {
                            link_info!(log, event.at_ms, "Sent: {}", sym.as_char());
                        }
                    }
                    None => {
                        if let Some(log) = self.log {
                            link_debug!(log, event.at_ms, "Press too long, dropped");
                        }
                    }
                }
            }
        }
    }

    fn on_quiet(&mut self, now_ms: u64) {
        match self.encoder.on_idle_tick(now_ms, &mut self.channel) {
            Some(GapKind::InterCharacter) => {
                if let Some(log) = self.log {
                    link_info!(log, now_ms, "CHAR GAP");
                }
            }
            Some(GapKind::InterWord) => {
                if let Some(log) = self.log {
                    link_info!(log, now_ms, "WORD GAP");
                }
            }
            _ => {}
        }
    }
}

/// Receive-side poll loop.
///
/// # Example
///
/// ```ignore
/// let mut node = ReceiveNode::new(cfg, serial, display, Some(&LOG));
///
/// loop {
///     node.poll(clock.now_ms());
///     delay.delay_ms(cfg.rx_poll_ms);
/// }
/// ```
pub struct ReceiveNode<'a, R, S>
where
    R: Read + ReadReady,
    S: LetterSink,
{
    wire: R,
    acc: SymbolAccumulator,
    sink: S,
    log: Option<&'a LogStream>,
}

impl<'a, R, S> ReceiveNode<'a, R, S>
where
    R: Read + ReadReady,
    S: LetterSink,
{
    /// Create a receive node.
    pub fn new(cfg: MorseConfig, wire: R, sink: S, log: Option<&'a LogStream>) -> Self {
        Self {
            wire,
            acc: SymbolAccumulator::new(cfg),
            sink,
            log,
        }
    }

    /// Run one poll pass: drain whatever the wire has, then give the
    /// accumulator its chance to time out a pending character or word.
    pub fn poll(&mut self, now_ms: u64) {
        let mut buf = [0u8; 16];
        while matches!(self.wire.read_ready(), Ok(true)) {
            match self.wire.read(&mut buf) {
                Ok(0) | Err(_) => break,
                Ok(n) => {
                    for &byte in &buf[..n] {
                        let mut tap = TapSink {
                            inner: &mut self.sink,
                            log: self.log,
                            at_ms: now_ms,
                        };
                        self.acc.on_byte(byte, now_ms, &mut tap);
                    }
                }
            }
        }

        let mut tap = TapSink {
            inner: &mut self.sink,
            log: self.log,
            at_ms: now_ms,
        };
        self.acc.poll_timeouts(now_ms, &mut tap);
    }

    /// Get the decoder state.
    pub fn accumulator(&self) -> &SymbolAccumulator {
        &self.acc
    }

    /// Get the letter sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Get the letter sink mutably.
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Tear down, keeping the sink.
    pub fn into_sink(self) -> S {
        self.sink
    }
}

/// Logs each letter as it passes through to the real sink.
struct TapSink<'s, S: LetterSink> {
    inner: &'s mut S,
    log: Option<&'s LogStream>,
    at_ms: u64,
}

impl<'s, S: LetterSink> LetterSink for TapSink<'s, S> {
    fn push_letter(&mut self, letter: Letter) {
        if let Some(log) = self.log {
            match letter {
                Letter::Alpha(c) => link_info!(log, self.at_ms, "Decoded: {}", c),
                Letter::Space => link_info!(log, self.at_ms, "Detected: SPACE"),
                Letter::Unrecognized => {
                    link_warn!(log, self.at_ms, "Invalid letter detected")
                }
            }
        }
        self.inner.push_letter(letter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::mock::{LoopbackWire, RecordingChannel, ScriptedKey};
    use crate::logging::LogLevel;
    use embedded_io::Write;
    use heapless::Vec;

    fn drain_messages(log: &LogStream) -> std::vec::Vec<(LogLevel, String)> {
        let mut out = std::vec::Vec::new();
        while let Some(entry) = log.drain() {
            out.push((entry.level, String::from(entry.message())));
        }
        out
    }

    #[test]
    fn test_transmit_single_dot_then_gaps() {
        static LOG: LogStream = LogStream::new();

        let key = ScriptedKey::new(&[(0, 200)]);
        let node_cfg = MorseConfig::default();
        let mut node =
            TransmitNode::new(node_cfg, key, RecordingChannel::new(), Some(&LOG));

        let mut now = 0u64;
        while now <= 2600 {
            node.poll(now);
            now += 10;
        }

        assert_eq!(node.channel().sent_bytes().as_slice(), b".CW");
        assert!(!node.encoder().in_word());

        let messages = drain_messages(&LOG);
        let texts: std::vec::Vec<&str> =
            messages.iter().map(|(_, m)| m.as_str()).collect();
        assert_eq!(texts, ["Sent: .", "CHAR GAP", "WORD GAP"]);
    }

    #[test]
    fn test_transmit_overlong_press_logged_not_sent() {
        static LOG: LogStream = LogStream::new();

        let key = ScriptedKey::new(&[(0, 900)]);
        let mut node = TransmitNode::new(
            MorseConfig::default(),
            key,
            RecordingChannel::new(),
            Some(&LOG),
        );

        let mut now = 0u64;
        while now <= 1000 {
            node.poll(now);
            now += 10;
        }

        assert!(node.channel().ops().is_empty());

        let messages = drain_messages(&LOG);
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].0, LogLevel::Debug);
        assert_eq!(messages[0].1, "Press too long, dropped");
    }

    #[test]
    fn test_latched_edges_drive_encoder() {
        let latch = EdgeLatch::new();
        let key = ScriptedKey::new(&[]);
        let mut node =
            TransmitNode::new(MorseConfig::default(), key, RecordingChannel::new(), None);

        latch.record(Edge::Press, 100);
        node.service_latch(&latch);
        latch.record(Edge::Release, 400);
        node.service_latch(&latch);

        assert_eq!(node.channel().sent_bytes().as_slice(), b"-");

        // Duplicate edge is absorbed by the debouncer
        latch.record(Edge::Release, 450);
        node.service_latch(&latch);
        assert_eq!(node.channel().sent_bytes().as_slice(), b"-");
    }

    #[test]
    fn test_send_sync_renders_pattern() {
        let key = ScriptedKey::new(&[]);
        let mut node =
            TransmitNode::new(MorseConfig::default(), key, RecordingChannel::new(), None);

        node.send_sync(0);
        assert_eq!(node.channel().sent_bytes().as_slice(), b"...---...");
    }

    #[test]
    fn test_receive_explicit_markers() {
        static LOG: LogStream = LogStream::new();

        let wire = LoopbackWire::new();
        {
            let mut tx = &wire;
            tx.write_all(b".-C").unwrap();
        }

        let sink: Vec<Letter, 8> = Vec::new();
        let mut node = ReceiveNode::new(MorseConfig::default(), &wire, sink, Some(&LOG));
        node.poll(0);

        assert_eq!(node.sink().as_slice(), &[Letter::Alpha('A')]);

        let messages = drain_messages(&LOG);
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].1, "Decoded: A");
    }

    #[test]
    fn test_receive_timeouts_decode_and_space() {
        static LOG: LogStream = LogStream::new();

        let wire = LoopbackWire::new();
        {
            let mut tx = &wire;
            tx.write_all(b".").unwrap();
        }

        let sink: Vec<Letter, 8> = Vec::new();
        let mut node = ReceiveNode::new(MorseConfig::default(), &wire, sink, Some(&LOG));

        node.poll(0);
        assert!(node.sink().is_empty());

        // Character times out
        node.poll(800);
        assert_eq!(node.sink().as_slice(), &[Letter::Alpha('E')]);

        // Word times out
        node.poll(2600);
        assert_eq!(
            node.sink().as_slice(),
            &[Letter::Alpha('E'), Letter::Space]
        );

        let messages = drain_messages(&LOG);
        let texts: std::vec::Vec<&str> =
            messages.iter().map(|(_, m)| m.as_str()).collect();
        assert_eq!(texts, ["Decoded: E", "Detected: SPACE"]);
    }

    #[test]
    fn test_receive_unknown_pattern_is_forwarded_and_logged() {
        static LOG: LogStream = LogStream::new();

        let wire = LoopbackWire::new();
        {
            let mut tx = &wire;
            tx.write_all(b"......C").unwrap();
        }

        let sink: Vec<Letter, 8> = Vec::new();
        let mut node = ReceiveNode::new(MorseConfig::default(), &wire, sink, Some(&LOG));
        node.poll(0);

        assert_eq!(node.sink().as_slice(), &[Letter::Unrecognized]);

        let messages = drain_messages(&LOG);
        assert_eq!(messages[0].0, LogLevel::Warn);
        assert_eq!(messages[0].1, "Invalid letter detected");
    }
}

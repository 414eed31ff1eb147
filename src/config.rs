//! Timing and hardware configuration.
//!
//! Every tunable lives here and is supplied once at construction time.
//! The state machines never read globals; they borrow a [`MorseConfig`]
//! and consume caller-provided timestamps.

/// Maximum number of symbols in one character sequence.
pub const MAX_SEQUENCE_LEN: usize = 32;

/// Maximum number of characters retained in the message log.
pub const MAX_MESSAGE_LEN: usize = 128;

/// Width of the visible display window, in characters.
pub const DISPLAY_WIDTH: usize = 16;

/// Pin roles for a deployment.
///
/// The crate never touches registers; these numbers exist so a board
/// integration can wire its HAL adapters from one place.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PinAssignment {
    /// Key/button input (active low, external pull-up).
    pub button: u8,
    /// Transmit indicator LED.
    pub led: u8,
    /// Speaker / piezo output.
    pub speaker: u8,
    /// Serial symbol stream TX.
    pub uart_tx: u8,
    /// Serial symbol stream RX.
    pub uart_rx: u8,
    /// Display bus SDA.
    pub sda: u8,
    /// Display bus SCL.
    pub scl: u8,
}

impl Default for PinAssignment {
    fn default() -> Self {
        Self {
            button: 16,
            led: 15,
            speaker: 21,
            uart_tx: 0,
            uart_rx: 1,
            sda: 4,
            scl: 5,
        }
    }
}

/// Morse timing configuration.
///
/// Defaults are the classic slow-operator profile: 250 ms dot ceiling,
/// 750 ms dash ceiling, gaps at 250/750/1750 ms. All thresholds are
/// inclusive upper bounds.
#[derive(Clone, Copy, Debug)]
pub struct MorseConfig {
    /// Longest press classified as a dot, in milliseconds.
    pub dot_max_ms: u32,

    /// Longest press classified as a dash. Anything longer is dropped.
    pub dash_max_ms: u32,

    /// Longest silence that stays inside a character.
    pub intra_char_gap_ms: u32,

    /// Longest silence that still separates characters (not words).
    pub inter_char_gap_ms: u32,

    /// Silence longer than this separates words.
    pub word_gap_ms: u32,

    /// Minimum spacing between accepted press edges.
    pub press_debounce_ms: u32,

    /// Minimum spacing between accepted release edges.
    pub release_debounce_ms: u32,

    /// Sidetone frequency for a dot.
    pub dot_freq_hz: u32,

    /// Sidetone frequency for a dash.
    pub dash_freq_hz: u32,

    /// Tone duration for a dot.
    pub dot_tone_ms: u32,

    /// Tone duration for a dash.
    pub dash_tone_ms: u32,

    /// Preamble pattern sent by `send_sync` (dots and dashes only).
    pub sync_pattern: &'static str,

    /// Transmit-side poll interval hint for the caller's loop.
    pub tx_poll_ms: u32,

    /// Receive-side poll interval hint for the caller's loop.
    pub rx_poll_ms: u32,

    /// Pin roles for board integration.
    pub pins: PinAssignment,
}

impl Default for MorseConfig {
    fn default() -> Self {
        Self {
            dot_max_ms: 250,
            dash_max_ms: 750,
            intra_char_gap_ms: 250,
            inter_char_gap_ms: 750,
            word_gap_ms: 1750,
            press_debounce_ms: 50,
            release_debounce_ms: 100,
            dot_freq_hz: 800,
            dash_freq_hz: 400,
            dot_tone_ms: 250,
            dash_tone_ms: 750,
            sync_pattern: "...---...",
            tx_poll_ms: 10,
            rx_poll_ms: 5,
            pins: PinAssignment::default(),
        }
    }
}

impl MorseConfig {
    /// Check the orderings the state machines rely on.
    ///
    /// - `dot_max_ms < dash_max_ms`
    /// - `intra_char_gap_ms < inter_char_gap_ms < word_gap_ms`
    /// - both poll intervals strictly below the intra-character gap,
    ///   so a poll loop cannot step over a gap boundary unseen
    /// - sync pattern non-empty, dots and dashes only
    pub fn is_valid(&self) -> bool {
        if self.dot_max_ms == 0 || self.dot_max_ms >= self.dash_max_ms {
            return false;
        }
        if self.intra_char_gap_ms >= self.inter_char_gap_ms
            || self.inter_char_gap_ms >= self.word_gap_ms
        {
            return false;
        }
        if self.tx_poll_ms == 0
            || self.rx_poll_ms == 0
            || self.tx_poll_ms >= self.intra_char_gap_ms
            || self.rx_poll_ms >= self.intra_char_gap_ms
        {
            return false;
        }
        if self.sync_pattern.is_empty() {
            return false;
        }
        self.sync_pattern.bytes().all(|b| b == b'.' || b == b'-')
    }
}

//! Transmit-side keying encoder.
//!
//! Pure logic, no hardware dependencies. Consumes debounced key events
//! plus caller time, produces tokens on an [`OutputChannel`]. Fully
//! testable on host.
//!
//! Timing rules:
//! - press ≤ `dot_max_ms` keys a dot, ≤ `dash_max_ms` a dash, longer
//!   presses are dropped without a token
//! - every symbol is followed by one intra-character pacing gap
//! - while idle inside a word, a grown gap announces the character
//!   boundary exactly once and the word boundary ends the word

use crate::config::MorseConfig;
use crate::io::OutputChannel;
use crate::symbol::{GapKind, Symbol, Token};

/// FSM state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    Idle,
    Pressing,
}

/// Press/release classifier and gap scheduler.
pub struct TransmitEncoder {
    cfg: MorseConfig,

    state: State,
    press_start_ms: u64,
    last_release_ms: u64,

    // Gap episode tracking
    in_word: bool,
    char_gap_sent: bool,
}

impl TransmitEncoder {
    /// Create a new encoder with the given configuration.
    pub fn new(cfg: MorseConfig) -> Self {
        Self {
            cfg,
            state: State::Idle,
            press_start_ms: 0,
            last_release_ms: 0,
            in_word: false,
            char_gap_sent: false,
        }
    }

    /// Get current configuration.
    pub fn config(&self) -> &MorseConfig {
        &self.cfg
    }

    /// Key went down.
    ///
    /// Pressing while already pressing is a no-op; the debouncer should
    /// never produce it.
    pub fn on_press(&mut self, now_ms: u64) {
        if self.state == State::Pressing {
            return;
        }
        self.press_start_ms = now_ms;
        self.state = State::Pressing;
    }

    /// Key came up. Classifies the press and renders the symbol.
    ///
    /// Returns the classified symbol, or `None` for a press beyond the
    /// dash ceiling, which transmits nothing. Either way the release
    /// opens a fresh gap episode and keeps the word running.
    pub fn on_release(
        &mut self,
        now_ms: u64,
        out: &mut impl OutputChannel,
    ) -> Option<Symbol> {
        if self.state != State::Pressing {
            return None;
        }
        self.state = State::Idle;

        let duration = now_ms.saturating_sub(self.press_start_ms);
        let symbol = Symbol::classify_press(duration, &self.cfg);

        if let Some(sym) = symbol {
            out.emit(Token::from(sym), &self.cfg);
            out.emit(Token::Gap(GapKind::IntraCharacter), &self.cfg);
        }

        self.last_release_ms = now_ms;
        self.in_word = true;
        self.char_gap_sent = false;

        symbol
    }

    /// Advance idle time. Call once per poll while no key event landed.
    ///
    /// Emits the boundary token a grown silence has earned: the
    /// character gap at most once per episode, the word gap once,
    /// ending the word. Returns what was emitted, if anything.
    pub fn on_idle_tick(
        &mut self,
        now_ms: u64,
        out: &mut impl OutputChannel,
    ) -> Option<GapKind> {
        if self.state == State::Pressing || !self.in_word {
            return None;
        }

        let gap = now_ms.saturating_sub(self.last_release_ms);
        match GapKind::classify(gap, &self.cfg) {
            GapKind::InterWord => {
                out.emit(Token::Gap(GapKind::InterWord), &self.cfg);
                self.in_word = false;
                Some(GapKind::InterWord)
            }
            GapKind::InterCharacter => {
                if self.char_gap_sent {
                    None
                } else {
                    out.emit(Token::Gap(GapKind::InterCharacter), &self.cfg);
                    self.char_gap_sent = true;
                    Some(GapKind::InterCharacter)
                }
            }
            GapKind::IntraCharacter | GapKind::Noise => None,
        }
    }

    /// Transmit the configured sync preamble.
    ///
    /// Plays the pattern as ordinary symbols with intra-character
    /// pacing. Leaves the keying state untouched.
    pub fn send_sync(&mut self, out: &mut impl OutputChannel) {
        for c in self.cfg.sync_pattern.chars() {
            if let Some(sym) = Symbol::from_char(c) {
                out.emit(Token::from(sym), &self.cfg);
                out.emit(Token::Gap(GapKind::IntraCharacter), &self.cfg);
            }
        }
    }

    /// Check if a press is in flight.
    #[inline]
    pub fn is_pressing(&self) -> bool {
        self.state == State::Pressing
    }

    /// Check if a word is still open.
    #[inline]
    pub fn in_word(&self) -> bool {
        self.in_word
    }

    /// Reset to idle, forgetting any open word.
    pub fn reset(&mut self) {
        self.state = State::Idle;
        self.press_start_ms = 0;
        self.last_release_ms = 0;
        self.in_word = false;
        self.char_gap_sent = false;
    }
}

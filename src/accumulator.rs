//! Module: accumulator
//!
//! Purpose: Receive-side state machine. Assembles dot/dash bytes into a
//! bounded symbol sequence and decides character and word boundaries.
//!
//! Architecture:
//! - Pure and caller-clocked: bytes arrive via `on_byte`, time advances
//!   via `poll_timeouts`. No I/O, no logging, no internal clock.
//! - Three framing styles coexist on one wire and all are honored:
//!   canonical markers (`C`/`W`), legacy single-byte markers (`H` while
//!   mid-character, `O` while mid-word, leftovers of senders that put
//!   the literal words "CHAR GAP" and "WORD GAP" on the stream), and
//!   silence inference for senders that frame nothing at all.
//! - Any byte outside the token alphabet is a decoding no-op, which is
//!   what lets free-text diagnostics share the stream.
//!
//! Safety: Safe. No unsafe blocks.

use crate::config::MorseConfig;
use crate::symbol::{GapKind, Letter, Symbol, SymbolSequence, Token};
use crate::table;

/// Downstream consumer of decoded letters.
pub trait LetterSink {
    fn push_letter(&mut self, letter: Letter);
}

impl<const N: usize> LetterSink for heapless::Vec<Letter, N> {
    fn push_letter(&mut self, letter: Letter) {
        let _ = self.push(letter);
    }
}

/// Receive-side symbol accumulator.
///
/// `InCharacter` and `InWord` are independent flags: a node is usually
/// mid-character and mid-word at once, and a word keeps running across
/// several characters until a word boundary lands.
pub struct SymbolAccumulator {
    cfg: MorseConfig,

    seq: SymbolSequence,
    in_character: bool,
    in_word: bool,
    space_emitted: bool,

    last_signal_ms: u64,
    last_event_ms: u64,
}

impl SymbolAccumulator {
    pub fn new(cfg: MorseConfig) -> Self {
        Self {
            cfg,
            seq: SymbolSequence::new(),
            in_character: false,
            in_word: false,
            space_emitted: false,
            last_signal_ms: 0,
            last_event_ms: 0,
        }
    }

    /// Feed one wire byte.
    ///
    /// Decoded letters, including unrecognized ones, go to `sink`.
    pub fn on_byte(&mut self, byte: u8, now_ms: u64, sink: &mut impl LetterSink) {
        match byte {
            b'.' => self.on_symbol(Symbol::Dot, now_ms),
            b'-' => self.on_symbol(Symbol::Dash, now_ms),
            b'C' | b'c' => self.on_char_marker(now_ms, sink),
            b'W' | b'w' => self.on_word_marker(now_ms, sink),
            // Legacy partial markers. Neither counts as wire activity,
            // so neither refreshes the event clock.
            b'H' if self.in_character => self.decode_and_clear(sink),
            b'O' if self.in_word => {
                if !self.space_emitted {
                    sink.push_letter(Letter::Space);
                    self.space_emitted = true;
                }
                self.in_word = false;
            }
            // Free text sharing the stream
            _ => {}
        }
    }

    /// Feed one pre-parsed token.
    ///
    /// Same machine as [`on_byte`](Self::on_byte); intra-character and
    /// noise gaps carry no receive-side meaning.
    pub fn on_token(&mut self, token: Token, now_ms: u64, sink: &mut impl LetterSink) {
        match token {
            Token::Dot => self.on_symbol(Symbol::Dot, now_ms),
            Token::Dash => self.on_symbol(Symbol::Dash, now_ms),
            Token::Gap(GapKind::InterCharacter) => self.on_char_marker(now_ms, sink),
            Token::Gap(GapKind::InterWord) => self.on_word_marker(now_ms, sink),
            Token::Gap(_) => {}
        }
    }

    /// Run the silence-inference checks. Call once per poll iteration.
    ///
    /// A character older than the inter-character gap is force-decoded;
    /// a word with no activity past the word gap gets its space. This
    /// is what keeps a sender that never frames anything decodable.
    pub fn poll_timeouts(&mut self, now_ms: u64, sink: &mut impl LetterSink) {
        if self.in_character
            && now_ms.saturating_sub(self.last_signal_ms) > u64::from(self.cfg.inter_char_gap_ms)
        {
            if !self.seq.is_empty() {
                let letter = table::decode(&self.seq);
                sink.push_letter(letter);
                self.seq.clear();
            }
            self.in_character = false;
        }

        if self.in_word
            && !self.space_emitted
            && now_ms.saturating_sub(self.last_event_ms) > u64::from(self.cfg.word_gap_ms)
        {
            sink.push_letter(Letter::Space);
            self.space_emitted = true;
            self.in_word = false;
        }
    }

    /// True while a character is being assembled.
    #[inline]
    pub fn in_character(&self) -> bool {
        self.in_character
    }

    /// True while inside a word (cleared by a word boundary).
    #[inline]
    pub fn in_word(&self) -> bool {
        self.in_word
    }

    /// Symbols accumulated for the current character.
    #[inline]
    pub fn pending_symbols(&self) -> usize {
        self.seq.len()
    }

    // --- Private methods ---

    fn on_symbol(&mut self, symbol: Symbol, now_ms: u64) {
        if !self.in_character {
            self.seq.clear();
            self.in_character = true;
        }
        // A fresh symbol opens a new gap episode
        self.space_emitted = false;

        // Push past the bound drops the symbol, keeps the character
        let _ = self.seq.push(symbol);

        self.last_signal_ms = now_ms;
        self.last_event_ms = now_ms;
        self.in_word = true;
    }

    fn on_char_marker(&mut self, now_ms: u64, sink: &mut impl LetterSink) {
        if self.in_character && !self.seq.is_empty() {
            self.decode_and_clear(sink);
        }
        // Even an ignored marker is wire activity
        self.last_event_ms = now_ms;
    }

    fn on_word_marker(&mut self, now_ms: u64, sink: &mut impl LetterSink) {
        if self.in_word && !self.space_emitted {
            sink.push_letter(Letter::Space);
            self.in_word = false;
            self.space_emitted = true;
        }
        self.last_event_ms = now_ms;
    }

    fn decode_and_clear(&mut self, sink: &mut impl LetterSink) {
        if !self.seq.is_empty() {
            let letter = table::decode(&self.seq);
            sink.push_letter(letter);
            self.seq.clear();
            self.in_character = false;
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

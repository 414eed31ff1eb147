//! Hardware-facing seams.
//!
//! The state machines never touch pins or ports. Everything physical
//! goes through the two traits here; adapters over `embedded-hal` and
//! `embedded-io` live in [`gpio`], host-side doubles in [`mock`].

pub mod gpio;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

use crate::config::MorseConfig;
use crate::symbol::{GapKind, Symbol, Token};

/// Rendering side of the transmit path.
///
/// Implementations provide four primitives; [`emit`](OutputChannel::emit)
/// composes them per token. Emission is blocking by design, acting as
/// the transmit rate limiter.
pub trait OutputChannel {
    /// Play a tone.
    fn emit_tone(&mut self, freq_hz: u32, duration_ms: u32);

    /// Drive the transmit indicator.
    fn emit_level(&mut self, on: bool);

    /// Put one byte on the serial symbol stream.
    fn emit_symbol_byte(&mut self, byte: u8);

    /// Hold silence for pacing.
    fn pace(&mut self, duration_ms: u32);

    /// Render one symbol: indicator up, tone, indicator down, wire byte.
    fn emit_symbol(&mut self, symbol: Symbol, cfg: &MorseConfig) {
        self.emit_level(true);
        self.emit_tone(symbol.freq_hz(cfg), symbol.tone_ms(cfg));
        self.emit_level(false);
        self.emit_symbol_byte(symbol.as_char() as u8);
    }

    /// Render one token.
    ///
    /// Symbols carry the full tone/indicator/byte envelope. An
    /// intra-character gap is pacing silence only. Boundary gaps are
    /// marker bytes. Noise gaps render as nothing.
    fn emit(&mut self, token: Token, cfg: &MorseConfig) {
        match token {
            Token::Dot => self.emit_symbol(Symbol::Dot, cfg),
            Token::Dash => self.emit_symbol(Symbol::Dash, cfg),
            Token::Gap(GapKind::IntraCharacter) => self.pace(cfg.intra_char_gap_ms),
            Token::Gap(GapKind::InterCharacter) => self.emit_symbol_byte(b'C'),
            Token::Gap(GapKind::InterWord) => self.emit_symbol_byte(b'W'),
            Token::Gap(GapKind::Noise) => {}
        }
    }
}

/// Raw key level source for the transmit node.
///
/// Returns the instantaneous pressed level; debouncing happens behind
/// this seam, not in front of it.
pub trait KeyInput {
    fn level(&mut self, now_ms: u64) -> bool;
}

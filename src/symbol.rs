//! Module: symbol
//!
//! Purpose: Core data model for Morse signalling. Symbols, bounded
//! symbol sequences, gap classification, and the token alphabet shared
//! by the transmit and receive state machines.
//!
//! Architecture:
//! - Classification is pure: duration in, category out. Thresholds come
//!   from a borrowed [`MorseConfig`], never from globals.
//! - All thresholds are inclusive upper bounds.
//! - A press longer than the dash ceiling classifies to nothing and the
//!   encoder drops it. This is deliberate, not an oversight.
//!
//! Safety: Safe. No unsafe blocks. Copy types plus one bounded Vec.

use heapless::Vec;

use crate::config::{MorseConfig, MAX_SEQUENCE_LEN};

/// An elementary Morse symbol.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Symbol {
    Dot,
    Dash,
}

impl Symbol {
    /// Classify a press duration.
    ///
    /// `d ≤ dot_max_ms` is a dot, `dot_max_ms < d ≤ dash_max_ms` is a
    /// dash, anything longer is no symbol at all.
    #[inline]
    pub fn classify_press(duration_ms: u64, cfg: &MorseConfig) -> Option<Symbol> {
        if duration_ms <= u64::from(cfg.dot_max_ms) {
            Some(Symbol::Dot)
        } else if duration_ms <= u64::from(cfg.dash_max_ms) {
            Some(Symbol::Dash)
        } else {
            None
        }
    }

    /// Wire character for this symbol.
    #[inline]
    pub const fn as_char(self) -> char {
        match self {
            Symbol::Dot => '.',
            Symbol::Dash => '-',
        }
    }

    /// Parse a wire character.
    #[inline]
    pub const fn from_char(c: char) -> Option<Symbol> {
        match c {
            '.' => Some(Symbol::Dot),
            '-' => Some(Symbol::Dash),
            _ => None,
        }
    }

    /// Sidetone frequency for this symbol.
    #[inline]
    pub fn freq_hz(self, cfg: &MorseConfig) -> u32 {
        match self {
            Symbol::Dot => cfg.dot_freq_hz,
            Symbol::Dash => cfg.dash_freq_hz,
        }
    }

    /// Sidetone duration for this symbol.
    #[inline]
    pub fn tone_ms(self, cfg: &MorseConfig) -> u32 {
        match self {
            Symbol::Dot => cfg.dot_tone_ms,
            Symbol::Dash => cfg.dash_tone_ms,
        }
    }
}

/// Classification of a silence interval.
///
/// Derived from elapsed time at the moment of inspection, never stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GapKind {
    /// Shorter than the intra-character spacing. Carries no meaning.
    Noise,
    /// Spacing between symbols of one character.
    IntraCharacter,
    /// End of a character.
    InterCharacter,
    /// Space between words.
    InterWord,
}

impl GapKind {
    /// Classify a silence duration against the configured gap ladder.
    #[inline]
    pub fn classify(gap_ms: u64, cfg: &MorseConfig) -> GapKind {
        if gap_ms <= u64::from(cfg.intra_char_gap_ms) {
            GapKind::Noise
        } else if gap_ms <= u64::from(cfg.inter_char_gap_ms) {
            GapKind::IntraCharacter
        } else if gap_ms <= u64::from(cfg.word_gap_ms) {
            GapKind::InterCharacter
        } else {
            GapKind::InterWord
        }
    }
}

/// A decoded character heading for the display.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Letter {
    /// An uppercase ASCII letter, A through Z by construction.
    Alpha(char),
    /// A word boundary.
    Space,
    /// A sequence that matched nothing in the table.
    Unrecognized,
}

impl Letter {
    /// Rendering used by the message log.
    #[inline]
    pub const fn as_char(self) -> char {
        match self {
            Letter::Alpha(c) => c,
            Letter::Space => ' ',
            Letter::Unrecognized => '?',
        }
    }
}

/// The unit passed between encoder, channel, and accumulator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Token {
    Dot,
    Dash,
    Gap(GapKind),
}

impl From<Symbol> for Token {
    #[inline]
    fn from(s: Symbol) -> Self {
        match s {
            Symbol::Dot => Token::Dot,
            Symbol::Dash => Token::Dash,
        }
    }
}

impl Token {
    /// Byte this token puts on the wire, if any.
    ///
    /// Intra-character gaps are pure pacing and noise gaps carry no
    /// meaning; neither is framed.
    #[inline]
    pub const fn wire_byte(self) -> Option<u8> {
        match self {
            Token::Dot => Some(b'.'),
            Token::Dash => Some(b'-'),
            Token::Gap(GapKind::InterCharacter) => Some(b'C'),
            Token::Gap(GapKind::InterWord) => Some(b'W'),
            Token::Gap(GapKind::IntraCharacter) | Token::Gap(GapKind::Noise) => None,
        }
    }

    /// Parse a canonical wire byte.
    ///
    /// Only the four canonical bytes map back. Legacy marker bytes and
    /// free text are the accumulator's business, not the token's.
    #[inline]
    pub const fn from_wire_byte(byte: u8) -> Option<Token> {
        match byte {
            b'.' => Some(Token::Dot),
            b'-' => Some(Token::Dash),
            b'C' | b'c' => Some(Token::Gap(GapKind::InterCharacter)),
            b'W' | b'w' => Some(Token::Gap(GapKind::InterWord)),
            _ => None,
        }
    }

    /// The symbol carried by this token, if it is one.
    #[inline]
    pub const fn symbol(self) -> Option<Symbol> {
        match self {
            Token::Dot => Some(Symbol::Dot),
            Token::Dash => Some(Symbol::Dash),
            Token::Gap(_) => None,
        }
    }
}

/// Bounded sequence of symbols forming one character.
///
/// Owned exclusively by whichever state machine is assembling the
/// character. Cleared at boundaries, never reallocated. Pushing past
/// [`MAX_SEQUENCE_LEN`] drops the excess symbol silently.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SymbolSequence {
    symbols: Vec<Symbol, MAX_SEQUENCE_LEN>,
}

impl SymbolSequence {
    /// Create an empty sequence.
    pub const fn new() -> Self {
        Self { symbols: Vec::new() }
    }

    /// Build a sequence from a dot/dash pattern string.
    ///
    /// Returns `None` on a foreign character or an overlong pattern.
    pub fn from_pattern(pattern: &str) -> Option<Self> {
        let mut seq = Self::new();
        for c in pattern.chars() {
            let sym = Symbol::from_char(c)?;
            if !seq.push(sym) {
                return None;
            }
        }
        Some(seq)
    }

    /// Append a symbol. Returns `false` if the sequence is full and the
    /// symbol was dropped.
    #[inline]
    pub fn push(&mut self, symbol: Symbol) -> bool {
        self.symbols.push(symbol).is_ok()
    }

    /// Reset without reallocating.
    #[inline]
    pub fn clear(&mut self) {
        self.symbols.clear();
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[Symbol] {
        &self.symbols
    }

    /// Compare against a dot/dash pattern string.
    pub fn matches(&self, pattern: &str) -> bool {
        if self.symbols.len() != pattern.len() {
            return false;
        }
        self.symbols
            .iter()
            .zip(pattern.chars())
            .all(|(s, c)| s.as_char() == c)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> MorseConfig {
        MorseConfig::default()
    }

    #[test]
    fn test_classify_press_dot_range() {
        let cfg = cfg();
        assert_eq!(Symbol::classify_press(1, &cfg), Some(Symbol::Dot));
        assert_eq!(Symbol::classify_press(100, &cfg), Some(Symbol::Dot));
        assert_eq!(Symbol::classify_press(250, &cfg), Some(Symbol::Dot));
    }

    #[test]
    fn test_classify_press_dash_range() {
        let cfg = cfg();
        assert_eq!(Symbol::classify_press(251, &cfg), Some(Symbol::Dash));
        assert_eq!(Symbol::classify_press(500, &cfg), Some(Symbol::Dash));
        assert_eq!(Symbol::classify_press(750, &cfg), Some(Symbol::Dash));
    }

    #[test]
    fn test_classify_press_overlong_is_dropped() {
        let cfg = cfg();
        assert_eq!(Symbol::classify_press(751, &cfg), None);
        assert_eq!(Symbol::classify_press(10_000, &cfg), None);
    }

    #[test]
    fn test_classify_gap_ladder() {
        let cfg = cfg();
        assert_eq!(GapKind::classify(100, &cfg), GapKind::Noise);
        assert_eq!(GapKind::classify(250, &cfg), GapKind::Noise);
        assert_eq!(GapKind::classify(251, &cfg), GapKind::IntraCharacter);
        assert_eq!(GapKind::classify(750, &cfg), GapKind::IntraCharacter);
        assert_eq!(GapKind::classify(751, &cfg), GapKind::InterCharacter);
        assert_eq!(GapKind::classify(1750, &cfg), GapKind::InterCharacter);
        assert_eq!(GapKind::classify(1751, &cfg), GapKind::InterWord);
    }

    #[test]
    fn test_token_wire_bytes() {
        assert_eq!(Token::Dot.wire_byte(), Some(b'.'));
        assert_eq!(Token::Dash.wire_byte(), Some(b'-'));
        assert_eq!(Token::Gap(GapKind::InterCharacter).wire_byte(), Some(b'C'));
        assert_eq!(Token::Gap(GapKind::InterWord).wire_byte(), Some(b'W'));
        assert_eq!(Token::Gap(GapKind::IntraCharacter).wire_byte(), None);
        assert_eq!(Token::Gap(GapKind::Noise).wire_byte(), None);
    }

    #[test]
    fn test_token_from_wire_byte() {
        assert_eq!(Token::from_wire_byte(b'.'), Some(Token::Dot));
        assert_eq!(Token::from_wire_byte(b'-'), Some(Token::Dash));
        assert_eq!(
            Token::from_wire_byte(b'c'),
            Some(Token::Gap(GapKind::InterCharacter))
        );
        assert_eq!(
            Token::from_wire_byte(b'w'),
            Some(Token::Gap(GapKind::InterWord))
        );
        assert_eq!(Token::from_wire_byte(b'X'), None);
        assert_eq!(Token::from_wire_byte(b'\n'), None);
    }

    #[test]
    fn test_sequence_push_bound() {
        let mut seq = SymbolSequence::new();
        for _ in 0..MAX_SEQUENCE_LEN {
            assert!(seq.push(Symbol::Dot));
        }
        assert_eq!(seq.len(), MAX_SEQUENCE_LEN);

        // Excess is dropped, length stays pinned
        assert!(!seq.push(Symbol::Dash));
        assert_eq!(seq.len(), MAX_SEQUENCE_LEN);
    }

    #[test]
    fn test_sequence_matches_pattern() {
        let seq = SymbolSequence::from_pattern(".-").unwrap();
        assert!(seq.matches(".-"));
        assert!(!seq.matches("._"));
        assert!(!seq.matches("."));
        assert!(!seq.matches(".--"));
    }

    #[test]
    fn test_sequence_clear_keeps_capacity() {
        let mut seq = SymbolSequence::from_pattern("...---...").unwrap();
        assert_eq!(seq.len(), 9);
        seq.clear();
        assert!(seq.is_empty());
        assert!(seq.push(Symbol::Dot));
    }

    #[test]
    fn test_from_pattern_rejects_foreign_chars() {
        assert!(SymbolSequence::from_pattern(".x-").is_none());
    }

    #[test]
    fn test_letter_rendering() {
        assert_eq!(Letter::Alpha('Q').as_char(), 'Q');
        assert_eq!(Letter::Space.as_char(), ' ');
        assert_eq!(Letter::Unrecognized.as_char(), '?');
    }

    #[test]
    fn test_symbol_tone_parameters() {
        let cfg = cfg();
        assert_eq!(Symbol::Dot.freq_hz(&cfg), 800);
        assert_eq!(Symbol::Dash.freq_hz(&cfg), 400);
        assert_eq!(Symbol::Dot.tone_ms(&cfg), 250);
        assert_eq!(Symbol::Dash.tone_ms(&cfg), 750);
    }
}

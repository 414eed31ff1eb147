//! Static Morse symbol table, A through Z.
//!
//! Read-only for the lifetime of the process. Lookup is a linear scan
//! over 26 entries; at this scale anything cleverer costs more than it
//! saves.

use crate::symbol::{Letter, SymbolSequence};

/// Canonical dot/dash patterns, indexed by letter offset from 'A'.
pub const MORSE_CODE: [&str; 26] = [
    ".-",   // A
    "-...", // B
    "-.-.", // C
    "-..",  // D
    ".",    // E
    "..-.", // F
    "--.",  // G
    "....", // H
    "..",   // I
    ".---", // J
    "-.-",  // K
    ".-..", // L
    "--",   // M
    "-.",   // N
    "---",  // O
    ".--.", // P
    "--.-", // Q
    ".-.",  // R
    "...",  // S
    "-",    // T
    "..-",  // U
    "...-", // V
    ".--",  // W
    "-..-", // X
    "-.--", // Y
    "--..", // Z
];

/// Decode an accumulated sequence.
///
/// Exact match only. An empty sequence and any pattern outside the
/// table both decode to [`Letter::Unrecognized`].
pub fn decode(seq: &SymbolSequence) -> Letter {
    if seq.is_empty() {
        return Letter::Unrecognized;
    }

    for (i, pattern) in MORSE_CODE.iter().enumerate() {
        if seq.matches(pattern) {
            return Letter::Alpha((b'A' + i as u8) as char);
        }
    }
    Letter::Unrecognized
}

/// Canonical pattern for a letter, if it has one.
///
/// Accepts either case. Space and punctuation have no pattern.
pub fn pattern_for(letter: char) -> Option<&'static str> {
    let upper = letter.to_ascii_uppercase();
    if upper.is_ascii_uppercase() {
        Some(MORSE_CODE[(upper as u8 - b'A') as usize])
    } else {
        None
    }
}

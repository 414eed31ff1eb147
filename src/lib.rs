//! # morse-link
//!
//! Timing-based Morse transmit and receive core with portable hardware
//! seams.
//!
//! ## Architecture
//!
//! The protocol logic is pure and caller-clocked: components take
//! `now_ms` from whoever drives them and never sleep, block, or
//! allocate. Hardware enters only through small traits ([`KeyInput`],
//! [`OutputChannel`], [`DisplayDriver`]) that real pins, serial ports
//! and displays implement at the edge, and mocks implement in tests.
//!
//! Transmit path: key edges → [`Debouncer`] → [`TransmitEncoder`] →
//! [`OutputChannel`] (tone + level + wire byte).
//!
//! Receive path: wire bytes → [`SymbolAccumulator`] → letters →
//! [`DisplayBuffer`] or any other [`LetterSink`].

#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod symbol;
pub mod table;
pub mod debounce;
pub mod encoder;
pub mod accumulator;
pub mod display;
pub mod io;
pub mod latch;
pub mod logging;
pub mod node;

pub use accumulator::{LetterSink, SymbolAccumulator};
pub use config::{MorseConfig, PinAssignment};
pub use debounce::{Debouncer, Edge, TimingEvent};
pub use display::{DisplayBuffer, DisplayDriver};
pub use encoder::TransmitEncoder;
pub use io::{KeyInput, OutputChannel};
pub use latch::EdgeLatch;
pub use logging::{LogLevel, LogStream};
pub use node::{ReceiveNode, TransmitNode};
pub use symbol::{GapKind, Letter, Symbol, SymbolSequence, Token};

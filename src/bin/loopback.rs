//! Host loopback demo.
//!
//! A scripted key spells a message on the transmit node; the bytes it
//! produces cross an in-memory wire into a receive node driving an
//! emulated 16x2 panel. Time is virtual, nothing sleeps.
//!
//! Run with: `cargo run --bin loopback --features mock`

use morse_link::config::DISPLAY_WIDTH;
use morse_link::io::mock::{LoopbackWire, ScriptedKey, WireChannel};
use morse_link::table;
use morse_link::{
    DisplayBuffer, DisplayDriver, LogStream, MorseConfig, ReceiveNode, TransmitNode,
};

static LOG: LogStream = LogStream::new();

/// Emulated 16x2 character panel.
struct ConsolePanel {
    rows: [String; 2],
    cursor: (usize, usize),
}

impl ConsolePanel {
    fn new() -> Self {
        Self {
            rows: [String::new(), String::new()],
            cursor: (0, 0),
        }
    }
}

impl DisplayDriver for ConsolePanel {
    fn init(&mut self) -> bool {
        true
    }

    fn clear(&mut self) {
        self.rows = [String::new(), String::new()];
        self.cursor = (0, 0);
    }

    fn set_cursor(&mut self, col: u8, row: u8) {
        self.cursor = (col as usize, (row as usize).min(1));
    }

    fn print(&mut self, text: &str) {
        let (col, row) = self.cursor;
        let line = &mut self.rows[row];
        while line.len() < col {
            line.push(' ');
        }
        line.truncate(col);
        line.push_str(text);
        self.cursor.0 = col + text.len();
    }
}

/// Build a press schedule spelling `text`, starting at `start_ms`.
///
/// Holds and gaps sit comfortably inside the default classification
/// bands, away from the thresholds.
fn schedule_for(text: &str, start_ms: u64) -> Vec<(u64, u64)> {
    const DOT_HOLD: u64 = 200;
    const DASH_HOLD: u64 = 600;
    const SYMBOL_GAP: u64 = 300;
    const LETTER_GAP: u64 = 1000;
    const WORD_EXTRA: u64 = 2400;

    let mut presses = Vec::new();
    let mut t = start_ms;
    for c in text.chars() {
        if c == ' ' {
            t += WORD_EXTRA;
            continue;
        }
        if let Some(pattern) = table::pattern_for(c) {
            for s in pattern.chars() {
                let hold = if s == '.' { DOT_HOLD } else { DASH_HOLD };
                presses.push((t, t + hold));
                t += hold + SYMBOL_GAP;
            }
            t += LETTER_GAP - SYMBOL_GAP;
        }
    }
    presses
}

fn main() {
    println!("==== morse-link loopback ====");
    println!();

    let cfg = MorseConfig::default();
    let wire = LoopbackWire::new();

    let schedule = schedule_for("HELLO WORLD", 3000);
    let end_ms = schedule.last().map(|p| p.1).unwrap_or(3000) + 3000;

    let mut tx = TransmitNode::new(
        cfg,
        ScriptedKey::new(&schedule),
        WireChannel::new(&wire),
        Some(&LOG),
    );
    let mut rx = ReceiveNode::new(
        cfg,
        &wire,
        DisplayBuffer::new(ConsolePanel::new()),
        Some(&LOG),
    );

    tx.send_sync(0);

    let mut journal = String::new();
    let mut now = 0u64;
    while now <= end_ms {
        if now % u64::from(cfg.tx_poll_ms) == 0 {
            tx.poll(now);
        }
        if now % u64::from(cfg.rx_poll_ms) == 0 {
            rx.poll(now);
        }
        LOG.drain_to(&mut journal);
        now += 1;
    }
    LOG.drain_to(&mut journal);

    print!("{journal}");
    if LOG.dropped() > 0 {
        println!("({} log lines dropped)", LOG.dropped());
    }

    let display = rx.into_sink();
    let panel = display.driver();
    println!();
    println!("+{}+", "-".repeat(DISPLAY_WIDTH));
    println!("|{:<width$}|", panel.rows[0], width = DISPLAY_WIDTH);
    println!("|{:<width$}|", panel.rows[1], width = DISPLAY_WIDTH);
    println!("+{}+", "-".repeat(DISPLAY_WIDTH));
    println!();
    println!("Decoded message: {:?}", display.message());
}

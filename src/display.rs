//! Message log and its driver seam.
//!
//! [`DisplayBuffer`] keeps a bounded text log of decoded letters and
//! mirrors it onto a two-row character display: a fixed title row and a
//! sliding window over the tail of the message. A driver that fails
//! `init` degrades the buffer to tracking-only; message content is kept
//! either way.

use crate::accumulator::LetterSink;
use crate::config::{DISPLAY_WIDTH, MAX_MESSAGE_LEN};
use crate::symbol::Letter;

/// Title shown on the first display row.
pub const TITLE: &str = "Morse Receiver";

/// External character display, implemented by board integrations.
///
/// `init` is allowed to fail; everything else is assumed best-effort
/// and infallible from the buffer's point of view.
pub trait DisplayDriver {
    fn init(&mut self) -> bool;
    fn clear(&mut self);
    fn set_cursor(&mut self, col: u8, row: u8);
    fn print(&mut self, text: &str);
}

/// Bounded sliding-window message log over a [`DisplayDriver`].
///
/// `append` is the only mutator. At capacity the oldest character is
/// shifted out first, so the retained suffix keeps its order. Every
/// append repaints the display exactly once.
pub struct DisplayBuffer<D: DisplayDriver> {
    driver: D,
    message: heapless::String<MAX_MESSAGE_LEN>,
    available: bool,
}

impl<D: DisplayDriver> DisplayBuffer<D> {
    /// Initialize the driver and show the idle screen.
    ///
    /// A failed init is non-fatal: the buffer still tracks content and
    /// simply skips driver calls.
    pub fn new(mut driver: D) -> Self {
        let available = driver.init();
        if available {
            driver.clear();
            driver.set_cursor(0, 0);
            driver.print(TITLE);
            driver.set_cursor(0, 1);
            driver.print("Waiting...");
        }
        Self {
            driver,
            message: heapless::String::new(),
            available,
        }
    }

    /// Append one letter and repaint.
    pub fn append(&mut self, letter: Letter) {
        if self.message.len() == MAX_MESSAGE_LEN {
            // Message content is ASCII by construction, byte index 1
            // is a character boundary
            let mut shifted: heapless::String<MAX_MESSAGE_LEN> = heapless::String::new();
            let _ = shifted.push_str(&self.message[1..]);
            self.message = shifted;
        }
        let _ = self.message.push(letter.as_char());
        self.render();
    }

    /// Last `width` characters of the message. Pure projection.
    pub fn render_window(&self, width: usize) -> &str {
        let start = self.message.len().saturating_sub(width);
        &self.message[start..]
    }

    /// Full tracked message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Whether the driver came up.
    pub fn is_available(&self) -> bool {
        self.available
    }

    /// Access the underlying driver.
    pub fn driver(&self) -> &D {
        &self.driver
    }

    fn render(&mut self) {
        if !self.available {
            return;
        }
        let start = self.message.len().saturating_sub(DISPLAY_WIDTH);
        self.driver.clear();
        self.driver.set_cursor(0, 0);
        self.driver.print(TITLE);
        self.driver.set_cursor(0, 1);
        self.driver.print(&self.message[start..]);
    }
}

impl<D: DisplayDriver> LetterSink for DisplayBuffer<D> {
    fn push_letter(&mut self, letter: Letter) {
        self.append(letter);
    }
}

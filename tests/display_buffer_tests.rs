//! Integration tests for the message display path
//!
//! Letters arriving off the wire end up on a 16x2 panel: title row,
//! sliding message tail, oldest-first eviction, and graceful operation
//! when the panel never came up.

use embedded_io::Write;
use morse_link::config::{DISPLAY_WIDTH, MAX_MESSAGE_LEN};
use morse_link::io::mock::{DisplayCall, LoopbackWire, MockDisplay};
use morse_link::{DisplayBuffer, Letter, MorseConfig, ReceiveNode};

#[test]
fn test_window_tracks_tail() {
    let mut buf = DisplayBuffer::new(MockDisplay::new());
    for c in "HELLO WORLD THIS IS MORSE".chars() {
        let letter = if c == ' ' {
            Letter::Space
        } else {
            Letter::Alpha(c)
        };
        buf.append(letter);
    }

    assert_eq!(buf.message(), "HELLO WORLD THIS IS MORSE");
    assert_eq!(buf.render_window(DISPLAY_WIDTH), "LD THIS IS MORSE");
}

#[test]
fn test_display_shows_decoded_stream() {
    let wire = LoopbackWire::new();
    {
        let mut tx = &wire;
        tx.write_all(b"....C..C").unwrap();
    }

    let mut node = ReceiveNode::new(
        MorseConfig::default(),
        &wire,
        DisplayBuffer::new(MockDisplay::new()),
        None,
    );
    node.poll(0);

    assert_eq!(node.sink().message(), "HI");
    let calls = node.sink().driver().calls();
    assert_eq!(calls.last(), Some(&DisplayCall::print("HI")));
}

#[test]
fn test_unknown_pattern_shows_question_mark() {
    let wire = LoopbackWire::new();
    {
        let mut tx = &wire;
        tx.write_all(b"......CW").unwrap();
    }

    let mut node = ReceiveNode::new(
        MorseConfig::default(),
        &wire,
        DisplayBuffer::new(MockDisplay::new()),
        None,
    );
    node.poll(0);

    assert_eq!(node.sink().message(), "? ");
}

#[test]
fn test_failed_panel_keeps_message() {
    let wire = LoopbackWire::new();
    {
        let mut tx = &wire;
        tx.write_all(b"...C---C...C").unwrap();
    }

    let mut node = ReceiveNode::new(
        MorseConfig::default(),
        &wire,
        DisplayBuffer::new(MockDisplay::unavailable()),
        None,
    );
    node.poll(0);

    assert_eq!(node.sink().message(), "SOS");
    assert!(!node.sink().is_available());
    assert!(node.sink().driver().calls().is_empty());
}

#[test]
fn test_long_transmission_evicts_oldest() {
    let mut buf = DisplayBuffer::new(MockDisplay::new());

    buf.append(Letter::Alpha('Z'));
    for _ in 0..MAX_MESSAGE_LEN {
        buf.append(Letter::Alpha('Q'));
    }

    assert_eq!(buf.message().len(), MAX_MESSAGE_LEN);
    assert!(
        buf.message().chars().all(|c| c == 'Q'),
        "the first letter must have been shifted out"
    );
}

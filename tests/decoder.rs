// Copyright (c) 2025 the termstage contributors. Licensed under Apache License, Version 2.0.

//! End-to-end decoder scenarios exercised at the public API boundary:
//! bracketed-paste safety and the Shift+Enter fallback.

use termstage::event::Event;
use termstage::input::types::Key;
use termstage::input::Decoder;

/// A paste containing what looks like a cursor-clearing escape sequence is
/// delivered whole as one `Paste` event, not interpreted as live input.
#[test]
fn bracketed_paste_is_not_interpreted_as_live_escape_sequences() {
    let mut decoder = Decoder::new();
    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"\x1b[200~");
    bytes.extend_from_slice(b"\x1b[2JX");
    bytes.extend_from_slice(b"\x1b[201~");

    let events = decoder.feed(&bytes);

    let pastes: Vec<&String> = events
        .iter()
        .filter_map(|e| if let Event::Paste(s) = e { Some(s) } else { None })
        .collect();
    assert_eq!(pastes.len(), 1);
    assert_eq!(pastes[0], "\x1b[2JX");

    for event in &events {
        if let Event::Key(k) = event {
            assert_ne!(k.key, Key::Char('X'));
        }
    }
}

/// `\` immediately followed by `\r` decodes as Shift+Enter, not as a
/// literal backslash followed by a plain Enter.
#[test]
fn backslash_enter_decodes_as_shift_enter() {
    let mut decoder = Decoder::new();
    let events = decoder.feed(b"\\\r");

    assert_eq!(events.len(), 1);
    let Event::Key(key) = &events[0] else { panic!("expected a key event, got {:?}", events[0]) };
    assert_eq!(key.key, Key::Enter);
    assert!(key.modifiers.shift);
    assert!(!events.iter().any(|e| matches!(e, Event::Key(k) if k.key == Key::Char('\\'))));
}

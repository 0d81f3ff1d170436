// Copyright (c) 2025 the termstage contributors. Licensed under Apache License, Version 2.0.

//! The byte-stream decoder: turns raw bytes read from stdin into
//! [`Event`]s, one state machine pass at a time.
//!
//! Escape-key disambiguation does not use a fixed timeout. A lone `ESC`
//! byte at the end of a `feed()` call is held as pending state rather than
//! immediately resolved; the runtime loop calls [`Decoder::resolve_pending`]
//! after a short bounded wait with no further input, at which point the
//! pending byte resolves to a plain `Escape` key. When more bytes are
//! already sitting in the same read — the common case, since a terminal
//! emits an entire escape sequence in one burst — the next byte arrives
//! before that wait ever starts and resolves the sequence immediately, so
//! well-formed sequences never pay the wait.

use unicode_segmentation::UnicodeSegmentation;

use crate::event::Event;
use crate::geometry::Pos;
use crate::input::types::{Key, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseKind};

const PASTE_START: &str = "\x1b[200~";
const PASTE_END: &str = "\x1b[201~";

#[derive(Debug)]
enum State {
    Normal,
    /// Saw a lone `ESC`; undecided whether it is a standalone key or the
    /// start of a sequence.
    Escape,
    /// Saw a lone `\`; undecided whether it is a literal backslash or the
    /// start of the `\<Enter>` Shift+Enter fallback (terminals without the
    /// Kitty keyboard protocol have no other way to report Shift+Enter).
    Backslash,
    Csi(String),
    Ss3,
    Paste(String),
}

/// Streaming decoder. Feed it bytes as they are read from stdin; it may hold
/// a partial UTF-8 sequence or an undecided `ESC` across calls.
pub struct Decoder {
    state: State,
    utf8_pending: Vec<u8>,
}

impl Default for Decoder {
    fn default() -> Self { Self::new() }
}

impl Decoder {
    #[must_use]
    pub fn new() -> Self { Self { state: State::Normal, utf8_pending: Vec::new() } }

    /// Decode as much of `bytes` as forms complete events. Anything
    /// ambiguous (a trailing lone `ESC`, a partial UTF-8 sequence, an
    /// unterminated CSI sequence) is retained in internal state for the
    /// next call.
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<Event> {
        let mut out = Vec::new();

        if let State::Paste(_) = self.state {
            self.feed_paste(bytes, &mut out);
            return out;
        }

        let data = if self.utf8_pending.is_empty() {
            bytes.to_vec()
        } else {
            let mut buf = std::mem::take(&mut self.utf8_pending);
            buf.extend_from_slice(bytes);
            buf
        };

        let mut i = 0;
        while i < data.len() {
            let b = data[i];
            match std::mem::replace(&mut self.state, State::Normal) {
                State::Normal => {
                    if b == 0x1b {
                        self.state = State::Escape;
                        i += 1;
                    } else if b == b'\\' {
                        self.state = State::Backslash;
                        i += 1;
                    } else if b < 0x80 {
                        out.push(Event::Key(decode_control(b)));
                        i += 1;
                    } else {
                        let len = utf8_len(b);
                        if i + len <= data.len() {
                            if let Ok(s) = std::str::from_utf8(&data[i..i + len]) {
                                for ch in s.graphemes(true).flat_map(|g| g.chars().take(1)) {
                                    out.push(Event::Key(KeyEvent::plain(Key::Char(ch))));
                                }
                            }
                            i += len;
                        } else {
                            self.utf8_pending = data[i..].to_vec();
                            return out;
                        }
                    }
                }
                State::Escape => {
                    // Check for the bracketed-paste start sequence before
                    // treating '[' as a generic CSI introducer.
                    if data[i..].starts_with(b"[200~") {
                        i += "[200~".len();
                        let remainder = data[i..].to_vec();
                        self.state = State::Paste(String::new());
                        self.feed_paste(&remainder, &mut out);
                        return out;
                    } else if b == b'[' {
                        self.state = State::Csi(String::new());
                        i += 1;
                    } else if b == b'O' {
                        self.state = State::Ss3;
                        i += 1;
                    } else if i + 1 >= data.len() && b == 0x1b {
                        // Two ESCs in a row with nothing after: resolve the
                        // first as a standalone key, keep parsing the second.
                        out.push(Event::Key(KeyEvent::plain(Key::Escape)));
                        self.state = State::Escape;
                        i += 1;
                    } else {
                        // Alt+<char>: ESC immediately followed by a plain byte.
                        // Merge in any ctrl bit decode_control would already
                        // apply, so Alt+Ctrl+<letter> is not silently lost.
                        let base = decode_control(b);
                        let modifiers = KeyModifiers { alt: true, ..base.modifiers };
                        out.push(Event::Key(KeyEvent::new(base.key, modifiers)));
                        i += 1;
                    }
                }
                State::Backslash => {
                    if b == b'\r' || b == b'\n' {
                        out.push(Event::Key(KeyEvent::new(Key::Enter, KeyModifiers { shift: true, ..Default::default() })));
                        i += 1;
                    } else {
                        // Not a Shift+Enter fallback: the backslash was
                        // literal. Deliver it and reprocess this byte fresh
                        // against `State::Normal` (already restored above).
                        out.push(Event::Key(KeyEvent::plain(Key::Char('\\'))));
                    }
                }
                State::Csi(mut params) => {
                    if matches!(b, b'0'..=b'9' | b';' | b'<' | b'?') {
                        params.push(b as char);
                        self.state = State::Csi(params);
                        i += 1;
                    } else {
                        if let Some(event) = finish_csi(&params, b) {
                            out.push(event);
                        }
                        i += 1;
                    }
                }
                State::Ss3 => {
                    if let Some(key) = ss3_key(b) {
                        out.push(Event::Key(KeyEvent::plain(key)));
                    }
                    i += 1;
                }
                State::Paste(_) => unreachable!("paste state is always consumed by feed_paste before re-entering this loop"),
            }
        }
        out
    }

    fn feed_paste(&mut self, bytes: &[u8], out: &mut Vec<Event>) {
        let State::Paste(mut acc) = std::mem::replace(&mut self.state, State::Normal) else {
            unreachable!()
        };
        acc.push_str(&String::from_utf8_lossy(bytes));
        if let Some(idx) = acc.find(PASTE_END) {
            let (text, rest) = acc.split_at(idx);
            out.push(Event::Paste(text.to_string()));
            let remainder = rest[PASTE_END.len()..].as_bytes().to_vec();
            self.state = State::Normal;
            out.extend(self.feed(&remainder));
        } else {
            self.state = State::Paste(acc);
        }
    }

    /// True if a lone `ESC` or a lone `\` is currently held pending
    /// resolution — both are single bytes whose meaning depends on what (if
    /// anything) follows.
    #[must_use]
    pub fn has_pending_escape(&self) -> bool { matches!(self.state, State::Escape | State::Backslash) }

    /// Called by the runtime loop after a bounded wait finds no further
    /// input following a pending byte: resolve a lone `ESC` to
    /// `Key::Escape` and a lone `\` to a literal `Key::Char('\\')`.
    pub fn resolve_pending(&mut self) -> Option<Event> {
        match std::mem::replace(&mut self.state, State::Normal) {
            State::Escape => Some(Event::Key(KeyEvent::plain(Key::Escape))),
            State::Backslash => Some(Event::Key(KeyEvent::plain(Key::Char('\\')))),
            other => {
                self.state = other;
                None
            }
        }
    }

    /// Called by the reader thread when stdin hits EOF: whatever text had
    /// already arrived for an unterminated bracketed paste is still worth
    /// delivering, even without its closing marker.
    pub fn flush_pending_paste(&mut self) -> Option<Event> {
        match std::mem::replace(&mut self.state, State::Normal) {
            State::Paste(acc) if !acc.is_empty() => Some(Event::Paste(acc)),
            _ => None,
        }
    }
}

/// Decode a single ASCII byte into a key and its implied modifiers.
/// 0x01..=0x1A (Ctrl+A through Ctrl+Z) maps to the corresponding lowercase
/// letter with `ctrl` set, matching every other control code's treatment as
/// a plain key rather than a distinct `Key` variant.
fn decode_control(b: u8) -> KeyEvent {
    match b {
        b'\r' | b'\n' => KeyEvent::plain(Key::Enter),
        b'\t' => KeyEvent::plain(Key::Tab),
        0x7f | 0x08 => KeyEvent::plain(Key::Backspace),
        0x01..=0x1a => KeyEvent::new(Key::Char((b | 0x60) as char), KeyModifiers { ctrl: true, ..Default::default() }),
        _ => KeyEvent::plain(Key::Char(b as char)),
    }
}

fn utf8_len(first_byte: u8) -> usize {
    if first_byte & 0b1110_0000 == 0b1100_0000 {
        2
    } else if first_byte & 0b1111_0000 == 0b1110_0000 {
        3
    } else if first_byte & 0b1111_1000 == 0b1111_0000 {
        4
    } else {
        1
    }
}

fn ss3_key(final_byte: u8) -> Option<Key> {
    Some(match final_byte {
        b'A' => Key::Up,
        b'B' => Key::Down,
        b'C' => Key::Right,
        b'D' => Key::Left,
        b'H' => Key::Home,
        b'F' => Key::End,
        b'P' => Key::F(1),
        b'Q' => Key::F(2),
        b'R' => Key::F(3),
        b'S' => Key::F(4),
        _ => return None,
    })
}

fn parse_modifiers(code: u32) -> KeyModifiers {
    let bits = code.saturating_sub(1);
    KeyModifiers { shift: bits & 1 != 0, alt: bits & 2 != 0, ctrl: bits & 4 != 0, super_key: bits & 8 != 0 }
}

/// Finish a CSI sequence given its accumulated parameter bytes and final
/// byte. Handles cursor keys, editing keys, SGR mouse reports, and the
/// Kitty keyboard protocol's `CSI <code>[;<modifiers>]u` form.
fn finish_csi(params: &str, final_byte: u8) -> Option<Event> {
    if let Some(rest) = params.strip_prefix('<') {
        return parse_sgr_mouse(rest, final_byte);
    }

    let mut parts = params.split(';');
    let first = parts.next().unwrap_or("").parse::<u32>().ok();
    let modifiers = parts.next().and_then(|s| s.parse::<u32>().ok()).map(parse_modifiers).unwrap_or_default();

    match final_byte {
        b'A' => Some(Event::Key(KeyEvent::new(Key::Up, modifiers))),
        b'B' => Some(Event::Key(KeyEvent::new(Key::Down, modifiers))),
        b'C' => Some(Event::Key(KeyEvent::new(Key::Right, modifiers))),
        b'D' => Some(Event::Key(KeyEvent::new(Key::Left, modifiers))),
        b'H' => Some(Event::Key(KeyEvent::new(Key::Home, modifiers))),
        b'F' => Some(Event::Key(KeyEvent::new(Key::End, modifiers))),
        b'u' => {
            let codepoint = first?;
            let ch = char::from_u32(codepoint)?;
            let key = match ch {
                '\r' | '\n' => Key::Enter,
                '\t' => Key::Tab,
                '\u{1b}' => Key::Escape,
                '\u{7f}' | '\u{8}' => Key::Backspace,
                other => Key::Char(other),
            };
            Some(Event::Key(KeyEvent::new(key, modifiers)))
        }
        b'~' => {
            let key = match first? {
                1 | 7 => Key::Home,
                2 => Key::Insert,
                3 => Key::Delete,
                4 | 8 => Key::End,
                5 => Key::PageUp,
                6 => Key::PageDown,
                11 => Key::F(1),
                12 => Key::F(2),
                13 => Key::F(3),
                14 => Key::F(4),
                15 => Key::F(5),
                17 => Key::F(6),
                18 => Key::F(7),
                19 => Key::F(8),
                20 => Key::F(9),
                21 => Key::F(10),
                23 => Key::F(11),
                24 => Key::F(12),
                _ => return None,
            };
            Some(Event::Key(KeyEvent::new(key, modifiers)))
        }
        _ => None,
    }
}

/// Parse an SGR mouse report's parameter string (after the `<` already
/// stripped) and its terminating byte (`M` = press/drag/move, `m` =
/// release).
fn parse_sgr_mouse(params: &str, final_byte: u8) -> Option<Event> {
    let mut parts = params.split(';');
    let code: u32 = parts.next()?.parse().ok()?;
    let x: u16 = parts.next()?.parse().ok()?;
    let y: u16 = parts.next()?.parse().ok()?;

    let is_motion = code & 32 != 0;
    let wheel = code & 64 != 0;
    let button_bits = code & 0b11;
    let modifiers = KeyModifiers { shift: code & 4 != 0, alt: code & 8 != 0, ctrl: code & 16 != 0, super_key: false };

    let button = if wheel {
        if button_bits == 0 { MouseButton::WheelUp } else { MouseButton::WheelDown }
    } else {
        match button_bits {
            0 => MouseButton::Left,
            1 => MouseButton::Middle,
            2 => MouseButton::Right,
            _ => MouseButton::None,
        }
    };

    let kind = if wheel {
        MouseKind::Press
    } else if is_motion {
        if button == MouseButton::None { MouseKind::Move } else { MouseKind::Drag }
    } else if final_byte == b'M' {
        MouseKind::Press
    } else {
        MouseKind::Release
    };

    Some(Event::Mouse(MouseEvent {
        kind,
        button,
        pos: Pos::new(x.saturating_sub(1), y.saturating_sub(1)),
        modifiers,
        region: None,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_ascii_decodes_to_char_events() {
        let mut d = Decoder::new();
        let events = d.feed(b"ab");
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], Event::Key(KeyEvent { key: Key::Char('a'), .. })));
    }

    #[test]
    fn arrow_key_csi_sequence() {
        let mut d = Decoder::new();
        let events = d.feed(b"\x1b[A");
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], Event::Key(KeyEvent { key: Key::Up, .. })));
    }

    #[test]
    fn lone_escape_at_end_of_chunk_stays_pending() {
        let mut d = Decoder::new();
        let events = d.feed(b"\x1b");
        assert!(events.is_empty());
        assert!(d.has_pending_escape());
        let resolved = d.resolve_pending();
        assert!(matches!(resolved, Some(Event::Key(KeyEvent { key: Key::Escape, .. }))));
    }

    #[test]
    fn escape_followed_by_bracket_in_same_chunk_resolves_immediately() {
        let mut d = Decoder::new();
        let events = d.feed(b"\x1b[B");
        assert_eq!(events.len(), 1);
        assert!(!d.has_pending_escape());
    }

    #[test]
    fn bracketed_paste_is_delivered_as_one_event_even_with_escapes_inside() {
        let mut d = Decoder::new();
        let input = b"\x1b[200~hello \x1b[A world\x1b[201~x";
        let events = d.feed(input);
        assert!(events.iter().any(|e| matches!(e, Event::Paste(s) if s == "hello \x1b[A world")));
        assert!(events.iter().any(|e| matches!(e, Event::Key(KeyEvent { key: Key::Char('x'), .. }))));
    }

    #[test]
    fn sgr_mouse_click_decodes_position_one_based_to_zero_based() {
        let mut d = Decoder::new();
        let events = d.feed(b"\x1b[<0;10;5M");
        assert_eq!(events.len(), 1);
        let Event::Mouse(m) = &events[0] else { panic!("expected mouse event") };
        assert_eq!(m.pos, Pos::new(9, 4));
        assert_eq!(m.kind, MouseKind::Press);
        assert_eq!(m.button, MouseButton::Left);
    }

    #[test]
    fn kitty_protocol_u_sequence_decodes_shift_enter() {
        let mut d = Decoder::new();
        let events = d.feed(b"\x1b[13;2u");
        assert_eq!(events.len(), 1);
        let Event::Key(k) = &events[0] else { panic!("expected key event") };
        assert_eq!(k.key, Key::Enter);
        assert!(k.modifiers.shift);
    }

    #[test]
    fn backslash_enter_decodes_as_shift_enter_not_a_literal_backslash() {
        let mut d = Decoder::new();
        let events = d.feed(b"\\\r");
        assert_eq!(events.len(), 1);
        let Event::Key(k) = &events[0] else { panic!("expected key event") };
        assert_eq!(k.key, Key::Enter);
        assert!(k.modifiers.shift);
    }

    #[test]
    fn lone_backslash_with_no_follow_up_resolves_as_literal() {
        let mut d = Decoder::new();
        let events = d.feed(b"\\");
        assert!(events.is_empty());
        assert!(d.has_pending_escape());
        let resolved = d.resolve_pending();
        assert!(matches!(resolved, Some(Event::Key(KeyEvent { key: Key::Char('\\'), .. }))));
    }

    #[test]
    fn backslash_followed_by_other_char_is_literal_backslash_then_that_char() {
        let mut d = Decoder::new();
        let events = d.feed(b"\\x");
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], Event::Key(KeyEvent { key: Key::Char('\\'), .. })));
        assert!(matches!(events[1], Event::Key(KeyEvent { key: Key::Char('x'), .. })));
    }

    #[test]
    fn control_byte_decodes_to_ctrl_plus_letter() {
        let mut d = Decoder::new();
        let events = d.feed(&[0x01]);
        assert_eq!(events.len(), 1);
        let Event::Key(k) = &events[0] else { panic!("expected key event") };
        assert_eq!(k.key, Key::Char('a'));
        assert!(k.modifiers.ctrl);
    }

    #[test]
    fn kitty_protocol_u_sequence_decodes_super_modifier() {
        let mut d = Decoder::new();
        // Modifier code 9 = (bits 8) + 1, i.e. Super alone.
        let events = d.feed(b"\x1b[97;9u");
        assert_eq!(events.len(), 1);
        let Event::Key(k) = &events[0] else { panic!("expected key event") };
        assert_eq!(k.key, Key::Char('a'));
        assert!(k.modifiers.super_key);
    }

    #[test]
    fn wide_utf8_character_split_across_feeds_reassembles() {
        let mut d = Decoder::new();
        let bytes = "漢".as_bytes();
        let mut events = d.feed(&bytes[..1]);
        assert!(events.is_empty());
        events = d.feed(&bytes[1..]);
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], Event::Key(KeyEvent { key: Key::Char('漢'), .. })));
    }
}

// Copyright (c) 2025 the termstage contributors. Licensed under Apache License, Version 2.0.

//! End-to-end rendering scenarios exercised at the public API boundary:
//! wide-glyph placement, minimal-diff output, and resize content
//! preservation.

use pretty_assertions::assert_eq;
use termstage::grid::OffscreenBuffer;
use termstage::style::{ColorSupport, Style};
use termstage::terminal::ansi::{cursor_to, flush_diff, style_sgr, RESET_SGR};

/// Writing a wide glyph followed by a narrow one leaves the continuation
/// cell in place and every untouched column blank.
#[test]
fn wide_glyph_occupies_two_columns_and_leaves_a_continuation_cell() {
    let mut buf = OffscreenBuffer::new(20, 1);
    buf.set_cell(0, 0, '漢', Style::default());
    buf.set_cell(2, 0, 'B', Style::default());

    let mut out = String::new();
    flush_diff(&mut out, &buf, ColorSupport::TrueColor);
    buf.commit();

    let left = buf.front_cell(0, 0).unwrap();
    assert_eq!(left.ch, '漢');
    assert_eq!(left.width, 2);
    assert!(!left.continuation);

    let continuation = buf.front_cell(1, 0).unwrap();
    assert_eq!(continuation.width, 0);
    assert!(continuation.continuation);

    let b = buf.front_cell(2, 0).unwrap();
    assert_eq!(b.ch, 'B');
    assert_eq!(b.width, 1);

    for x in 3..20 {
        assert_eq!(buf.front_cell(x, 0).unwrap().ch, ' ');
    }
}

/// Re-rendering "hello" as "hellp" only touches the one cell that actually
/// changed: one cursor move, one glyph, nothing for the unchanged prefix.
#[test]
fn overwriting_one_changed_cell_emits_a_minimal_diff() {
    let mut buf = OffscreenBuffer::new(10, 1);
    for (i, ch) in "hello".chars().enumerate() {
        buf.set_cell(i as u16, 0, ch, Style::default());
    }
    let mut first = String::new();
    flush_diff(&mut first, &buf, ColorSupport::TrueColor);
    buf.commit();

    for (i, ch) in "hellp".chars().enumerate() {
        buf.set_cell(i as u16, 0, ch, Style::default());
    }
    let mut second = String::new();
    flush_diff(&mut second, &buf, ColorSupport::TrueColor);

    let mut expected_move = String::new();
    cursor_to(&mut expected_move, 4, 0);
    assert!(second.starts_with(&expected_move));
    assert!(second.contains(&style_sgr(&Style::default())));
    assert!(second.ends_with(RESET_SGR));
    assert_eq!(second.matches('p').count(), 1);

    // Nothing for the unchanged columns 0..3: no cursor move lands there.
    for col in 0..4u16 {
        let mut unrelated_move = String::new();
        cursor_to(&mut unrelated_move, col, 0);
        assert!(!second.contains(&unrelated_move));
    }
}

/// Shrinking the buffer preserves the overlapping content and space-fills
/// newly exposed rows.
#[test]
fn resize_preserves_overlapping_content() {
    let mut buf = OffscreenBuffer::new(10, 3);
    for (i, ch) in "HELLO".chars().enumerate() {
        buf.set_cell(i as u16, 0, ch, Style::default());
    }
    let mut out = String::new();
    flush_diff(&mut out, &buf, ColorSupport::TrueColor);
    buf.commit();

    buf.resize(5, 5);

    assert_eq!(buf.front_cell(0, 0).unwrap().ch, 'H');
    assert_eq!(buf.front_cell(1, 0).unwrap().ch, 'E');
    assert_eq!(buf.front_cell(2, 0).unwrap().ch, 'L');
    assert_eq!(buf.front_cell(3, 0).unwrap().ch, 'L');
    assert_eq!(buf.front_cell(4, 0).unwrap().ch, 'O');
    for x in 0..5 {
        assert_eq!(buf.front_cell(x, 4).unwrap().ch, ' ');
    }
}

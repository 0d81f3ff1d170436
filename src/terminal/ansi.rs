// Copyright (c) 2025 the termstage contributors. Licensed under Apache License, Version 2.0.

//! ANSI/VT escape sequence builders and the diff writer that turns a dirty
//! rectangle of cells into the smallest sequence of SGR + cursor-move bytes
//! that reproduces it.

use std::fmt::Write as _;

use crate::grid::{Cell, OffscreenBuffer};
use crate::style::{Color, ColorSupport, Style};

pub const ENTER_ALT_SCREEN: &str = "\x1b[?1049h";
pub const LEAVE_ALT_SCREEN: &str = "\x1b[?1049l";
pub const HIDE_CURSOR: &str = "\x1b[?25l";
pub const SHOW_CURSOR: &str = "\x1b[?25h";
pub const ENABLE_MOUSE: &str = "\x1b[?1000h\x1b[?1002h\x1b[?1006h";
pub const DISABLE_MOUSE: &str = "\x1b[?1000l\x1b[?1002l\x1b[?1006l";
pub const ENABLE_BRACKETED_PASTE: &str = "\x1b[?2004h";
pub const DISABLE_BRACKETED_PASTE: &str = "\x1b[?2004l";
pub const CLEAR_SCREEN: &str = "\x1b[2J";
pub const RESET_SGR: &str = "\x1b[0m";

/// Move the cursor to 1-based `(col, row)`.
pub fn cursor_to(out: &mut String, col: u16, row: u16) {
    let _ = write!(out, "\x1b[{};{}H", row + 1, col + 1);
}

/// Wrap `url` around `text` as an OSC 8 hyperlink.
pub fn hyperlink(out: &mut String, url: &str, text: &str) {
    let _ = write!(out, "\x1b]8;;{url}\x1b\\{text}\x1b]8;;\x1b\\");
}

fn push_color_sgr(out: &mut String, color: Color, is_bg: bool) {
    match color {
        Color::Default => {
            out.push_str(if is_bg { "49;" } else { "39;" });
        }
        Color::Basic(b) => {
            let code = if is_bg { b.bg_sgr() } else { b.fg_sgr() };
            let _ = write!(out, "{code};");
        }
        Color::Indexed(i) => {
            let prefix = if is_bg { 48 } else { 38 };
            let _ = write!(out, "{prefix};5;{i};");
        }
        Color::Rgb(r, g, b) => {
            let prefix = if is_bg { 48 } else { 38 };
            let _ = write!(out, "{prefix};2;{r};{g};{b};");
        }
    }
}

/// Build the SGR sequence that switches the terminal's current rendition to
/// `style`, always starting from a full reset so sequences never depend on
/// what rendition happened to be in effect before.
pub fn style_sgr(style: &Style) -> String {
    let mut out = String::from("\x1b[0;");
    if style.attrs.bold { out.push_str("1;"); }
    if style.attrs.dim { out.push_str("2;"); }
    if style.attrs.italic { out.push_str("3;"); }
    if style.attrs.underline { out.push_str("4;"); }
    if style.attrs.blink { out.push_str("5;"); }
    if style.attrs.reverse { out.push_str("7;"); }
    if style.attrs.strikethrough { out.push_str("9;"); }
    push_color_sgr(&mut out, style.fg, false);
    push_color_sgr(&mut out, style.bg, true);
    out.pop(); // trailing ';'
    out.push('m');
    out
}

/// Diffs the buffer's dirty region against what the terminal already shows
/// and appends the minimal byte sequence needed to bring the terminal up to
/// date: cursor jumps only where the run of unchanged cells makes printing
/// through them more expensive than repositioning, and SGR changes only
/// where the style actually differs from the previous cell on the row.
/// `support` degrades every emitted style to what the terminal actually
/// negotiated, so a truecolor `Style` still renders sanely on a 16-color
/// terminal.
pub fn flush_diff(out: &mut String, buffer: &OffscreenBuffer, support: ColorSupport) {
    let Some((x0, y0, x1, y1)) = buffer.dirty().bounds() else { return };

    let mut cursor: Option<(u16, u16)> = None;
    let mut last_style: Option<Style> = None;
    let mut last_link: Option<Option<crate::style::LinkId>> = None;

    for y in y0..=y1 {
        let mut x = x0;
        while x <= x1 {
            let cell = buffer.back_cell(x, y).unwrap_or_default();
            if cell.continuation {
                x += 1;
                continue;
            }
            let front = buffer.front_cell(x, y).unwrap_or_default();
            if cells_equal(&front, &cell) {
                x += cell.width.max(1) as u16;
                continue;
            }
            if cursor != Some((x, y)) {
                cursor_to(out, x, y);
            }
            let degraded = cell.style.degrade(support);
            if last_style != Some(degraded) {
                out.push_str(&style_sgr(&degraded));
                last_style = Some(degraded);
            }
            if last_link != Some(cell.style.link) {
                if last_link.flatten().is_some() {
                    out.push_str("\x1b]8;;\x1b\\");
                }
                if let Some(id) = cell.style.link {
                    let _ = write!(out, "\x1b]8;;{}\x1b\\", buffer.link_url(id));
                }
                last_link = Some(cell.style.link);
            }
            out.push(if cell.ch == '\0' { ' ' } else { cell.ch });
            let advance = cell.width.max(1) as u16;
            cursor = Some((x + advance, y));
            x += advance;
        }
    }
    if last_link.flatten().is_some() {
        out.push_str("\x1b]8;;\x1b\\");
    }
    if last_style.is_some() {
        out.push_str(RESET_SGR);
    }
}

fn cells_equal(a: &Cell, b: &Cell) -> bool {
    a.ch == b.ch && a.style == b.style && a.width == b.width && a.continuation == b.continuation
}

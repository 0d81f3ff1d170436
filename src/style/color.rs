// Copyright (c) 2025 the termstage contributors. Licensed under Apache License, Version 2.0.

//! Color representation and degradation.
//!
//! Four color kinds: the default sentinel, one of the 16 named ANSI
//! indices, an 8-bit palette index, or a 24-bit RGB triple.
//! [`ColorSupport`] records what the detected terminal can actually show;
//! [`Color::degrade`] downgrades a color to fit, stepping down the
//! basic/extended/RGB degradation chain one tier at a time.

/// The 16 named ANSI colors (indices 0-7 normal, 8-15 bright).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::EnumIter)]
pub enum BasicColor {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    BrightBlack,
    BrightRed,
    BrightGreen,
    BrightYellow,
    BrightBlue,
    BrightMagenta,
    BrightCyan,
    BrightWhite,
}

impl BasicColor {
    #[must_use]
    pub fn index(self) -> u8 { self as u8 }

    #[must_use]
    pub fn fg_sgr(self) -> u16 {
        let i = self.index();
        if i < 8 { 30 + u16::from(i) } else { 90 + u16::from(i - 8) }
    }

    #[must_use]
    pub fn bg_sgr(self) -> u16 {
        let i = self.index();
        if i < 8 { 40 + u16::from(i) } else { 100 + u16::from(i - 8) }
    }

    /// The approximate RGB value of this basic color, used for grayscale
    /// degradation and for distance comparisons against 256-palette colors.
    #[must_use]
    pub fn to_rgb(self) -> (u8, u8, u8) {
        use BasicColor::*;
        match self {
            Black => (0, 0, 0),
            Red => (205, 0, 0),
            Green => (0, 205, 0),
            Yellow => (205, 205, 0),
            Blue => (0, 0, 238),
            Magenta => (205, 0, 205),
            Cyan => (0, 205, 205),
            White => (229, 229, 229),
            BrightBlack => (127, 127, 127),
            BrightRed => (255, 0, 0),
            BrightGreen => (0, 255, 0),
            BrightYellow => (255, 255, 0),
            BrightBlue => (92, 92, 255),
            BrightMagenta => (255, 0, 255),
            BrightCyan => (0, 255, 255),
            BrightWhite => (255, 255, 255),
        }
    }
}

/// A color as it appears in a [`crate::style::Style`]. `Default` is the
/// terminal's own default foreground/background, distinct from any basic
/// color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Color {
    #[default]
    Default,
    Basic(BasicColor),
    Indexed(u8),
    Rgb(u8, u8, u8),
}

impl Color {
    #[must_use]
    pub fn rgb(r: u8, g: u8, b: u8) -> Self { Color::Rgb(r, g, b) }

    /// Downgrade this color to fit the given [`ColorSupport`] level.
    ///
    /// Basic colors pass through unchanged except under [`ColorSupport::NoColor`]
    /// or [`ColorSupport::Grayscale`]. Extended (256-index) and RGB colors
    /// downconvert one step at a time: RGB -> 256 -> grayscale -> none.
    #[must_use]
    pub fn degrade(self, support: ColorSupport) -> Color {
        match (self, support) {
            (Color::Default, _) => Color::Default,
            (c, ColorSupport::TrueColor) => c,
            (Color::Basic(_), ColorSupport::Ansi256) => self,
            (Color::Indexed(_), ColorSupport::Ansi256) => self,
            (Color::Rgb(r, g, b), ColorSupport::Ansi256) => Color::Indexed(rgb_to_ansi256(r, g, b)),
            (c, ColorSupport::Grayscale) => Color::Indexed(rgb_to_gray256(c.approx_rgb())),
            (_, ColorSupport::NoColor) => Color::Default,
        }
    }

    /// A best-effort RGB approximation of this color, used for grayscale
    /// degradation and testing; not used for direct rendering.
    #[must_use]
    pub fn approx_rgb(self) -> (u8, u8, u8) {
        match self {
            Color::Default => (0, 0, 0),
            Color::Basic(b) => b.to_rgb(),
            Color::Indexed(i) => ansi256_to_rgb(i),
            Color::Rgb(r, g, b) => (r, g, b),
        }
    }
}

/// The color fidelity the driver detected for the current terminal,
/// established once at [`crate::terminal::driver::TerminalDriver::open`] and
/// never re-checked mid-session (spec §4.1 treats size/capability queries as
/// point-in-time).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorSupport {
    #[default]
    TrueColor,
    Ansi256,
    Grayscale,
    NoColor,
}

impl ColorSupport {
    /// Detect color support from `COLORTERM` and `TERM`, the same
    /// environment signals most ANSI terminals rely on. Falls back to
    /// truecolor when nothing conclusive is found, assuming the best and
    /// letting a user who sees garbled output degrade explicitly.
    #[must_use]
    pub fn detect() -> Self {
        if let Ok(colorterm) = std::env::var("COLORTERM") {
            if colorterm.contains("truecolor") || colorterm.contains("24bit") {
                return ColorSupport::TrueColor;
            }
        }
        match std::env::var("TERM") {
            Ok(term) if term.contains("256color") => ColorSupport::Ansi256,
            Ok(term) if term == "dumb" => ColorSupport::NoColor,
            _ => ColorSupport::TrueColor,
        }
    }
}

/// Convert a 24-bit RGB triple to the nearest of the 256-color palette's 216
/// color cube entries (indices 16-231), using the standard 6x6x6 cube with
/// steps at 0, 95, 135, 175, 215, 255.
#[must_use]
pub fn rgb_to_ansi256(r: u8, g: u8, b: u8) -> u8 {
    const STEPS: [u8; 6] = [0, 95, 135, 175, 215, 255];
    let to_cube = |v: u8| -> u8 {
        STEPS
            .iter()
            .enumerate()
            .min_by_key(|&(_, &s)| (i32::from(s) - i32::from(v)).abs())
            .map(|(i, _)| i as u8)
            .unwrap_or(0)
    };
    let (cr, cg, cb) = (to_cube(r), to_cube(g), to_cube(b));
    16 + 36 * cr + 6 * cg + cb
}

/// Convert an RGB triple to the nearest of the 256-palette's 24 grayscale
/// ramp entries (indices 232-255).
#[must_use]
pub fn rgb_to_gray256(rgb: (u8, u8, u8)) -> u8 {
    let (r, g, b) = rgb;
    let luma = (0.299 * f64::from(r) + 0.587 * f64::from(g) + 0.114 * f64::from(b)) as u32;
    let step = (luma.min(255) * 23) / 255;
    232 + step as u8
}

/// Approximate inverse of [`rgb_to_ansi256`], for grayscale-degradation of
/// already-indexed colors.
#[must_use]
pub fn ansi256_to_rgb(index: u8) -> (u8, u8, u8) {
    const STEPS: [u8; 6] = [0, 95, 135, 175, 215, 255];
    if index < 16 {
        return (0, 0, 0);
    }
    if index >= 232 {
        let level = 8 + (index - 232) * 10;
        return (level, level, level);
    }
    let i = index - 16;
    let r = STEPS[(i / 36) as usize];
    let g = STEPS[((i / 6) % 6) as usize];
    let b = STEPS[(i % 6) as usize];
    (r, g, b)
}

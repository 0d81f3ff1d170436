// Copyright (c) 2025 the termstage contributors. Licensed under Apache License, Version 2.0.

//! Styled-attribute record: foreground/background color plus boolean
//! attributes.

mod color;

pub use color::{ansi256_to_rgb, rgb_to_ansi256, rgb_to_gray256, BasicColor, Color, ColorSupport};

/// Boolean display attributes a [`Style`] may carry. Kept as individual
/// `bool` fields rather than a bitflag type: there are few enough of them
/// that a bitflag would add indirection without buying anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Attrs {
    pub bold: bool,
    pub dim: bool,
    pub italic: bool,
    pub underline: bool,
    pub reverse: bool,
    pub strikethrough: bool,
    pub blink: bool,
}

/// A handle into an [`crate::grid::OffscreenBuffer`]'s interned hyperlink
/// table. Kept as a small `Copy` index rather than the URL itself so
/// [`Style`] (and therefore [`crate::grid::Cell`]) stays `Copy`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LinkId(pub u32);

/// A cell's complete visual style: colors, attributes, and an optional
/// hyperlink target. Equality is structural, and the default value is the
/// "empty" style: default colors, no attributes, no link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Style {
    pub fg: Color,
    pub bg: Color,
    pub attrs: Attrs,
    pub link: Option<LinkId>,
}

impl Style {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    #[must_use]
    pub fn fg(mut self, color: Color) -> Self { self.fg = color; self }

    #[must_use]
    pub fn bg(mut self, color: Color) -> Self { self.bg = color; self }

    #[must_use]
    pub fn bold(mut self) -> Self { self.attrs.bold = true; self }

    #[must_use]
    pub fn dim(mut self) -> Self { self.attrs.dim = true; self }

    #[must_use]
    pub fn italic(mut self) -> Self { self.attrs.italic = true; self }

    #[must_use]
    pub fn underline(mut self) -> Self { self.attrs.underline = true; self }

    #[must_use]
    pub fn reverse(mut self) -> Self { self.attrs.reverse = true; self }

    #[must_use]
    pub fn strikethrough(mut self) -> Self { self.attrs.strikethrough = true; self }

    #[must_use]
    pub fn blink(mut self) -> Self { self.attrs.blink = true; self }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fg == Color::Default && self.bg == Color::Default && self.attrs == Attrs::default()
    }

    /// Downgrade both colors to the given [`ColorSupport`]; attributes are
    /// unaffected since SGR attribute codes have no fidelity tiers.
    #[must_use]
    pub fn degrade(mut self, support: ColorSupport) -> Self {
        self.fg = self.fg.degrade(support);
        self.bg = self.bg.degrade(support);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_style_is_default() {
        assert!(Style::default().is_empty());
        assert!(!Style::new().bold().is_empty());
    }

    #[test]
    fn builder_chains() {
        let s = Style::new().fg(Color::Basic(BasicColor::Red)).bold().underline();
        assert_eq!(s.fg, Color::Basic(BasicColor::Red));
        assert!(s.attrs.bold);
        assert!(s.attrs.underline);
        assert!(!s.attrs.italic);
    }
}

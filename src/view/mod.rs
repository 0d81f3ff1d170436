// Copyright (c) 2025 the termstage contributors. Licensed under Apache License, Version 2.0.

//! The declarative view protocol: [`traits::View`], the flexbox-like layout
//! containers, and the built-in widget set.

pub mod layout;
pub mod text;
pub mod traits;
pub mod widgets;

pub use layout::{Align, Child, HStack, Padding, VStack, ZStack};
pub use text::Text;
pub use traits::View;
pub use widgets::{
    for_each, h_for_each, if_else, if_view, switch, Bordered, BorderStyle, Canvas, Case, Clickable, Empty, Input,
    Link, Spacer,
};

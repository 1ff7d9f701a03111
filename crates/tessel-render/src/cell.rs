#![forbid(unsafe_code)]

//! A single character cell.

use tessel_style::Style;

/// One grid position: a character and the style it is drawn with.
///
/// `style == None` means "terminal default"; it is distinct from
/// `Some(Style::EMPTY)` only in intent, both present identically.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Cell {
    /// The character drawn in this cell.
    pub ch: char,
    /// Attribute sequences wrapped around the character, if any.
    pub style: Option<Style>,
}

impl Cell {
    /// A blank, unstyled cell.
    pub const BLANK: Cell = Cell {
        ch: ' ',
        style: None,
    };

    /// An unstyled cell holding `ch`.
    #[inline]
    pub const fn from_char(ch: char) -> Self {
        Self { ch, style: None }
    }

    /// Builder-style style setter.
    #[inline]
    #[must_use]
    pub fn with_style(mut self, style: Style) -> Self {
        self.style = Some(style);
        self
    }

    /// True for the blank, unstyled cell.
    #[inline]
    pub fn is_blank(&self) -> bool {
        self.ch == ' ' && self.style.is_none()
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::BLANK
    }
}

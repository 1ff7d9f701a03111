//! The [`Style`] value and its fixed code table.

use std::borrow::Cow;

use crate::StyleError;
use crate::color::{Ansi16, Rgb};
use crate::control::sgr;

const FG_TABLE: [&str; 16] = [
    "\x1b[30m", "\x1b[31m", "\x1b[32m", "\x1b[33m", "\x1b[34m", "\x1b[35m", "\x1b[36m",
    "\x1b[37m", "\x1b[90m", "\x1b[91m", "\x1b[92m", "\x1b[93m", "\x1b[94m", "\x1b[95m",
    "\x1b[96m", "\x1b[97m",
];

const BG_TABLE: [&str; 16] = [
    "\x1b[40m", "\x1b[41m", "\x1b[42m", "\x1b[43m", "\x1b[44m", "\x1b[45m", "\x1b[46m",
    "\x1b[47m", "\x1b[100m", "\x1b[101m", "\x1b[102m", "\x1b[103m", "\x1b[104m", "\x1b[105m",
    "\x1b[106m", "\x1b[107m",
];

const FG_RESET: &str = "\x1b[39m";
const BG_RESET: &str = "\x1b[49m";

/// Immutable terminal attribute descriptor.
///
/// Two opaque sequences: [`begin`](Style::begin) turns the attributes on and
/// [`end`](Style::end) turns them off. Palette entries and decorations are
/// `const` and borrow static strings; mixed and true-color styles own
/// their text.
///
/// # Invariants
///
/// - `Style::mix(&[a, b]).begin() == a.begin() + b.begin()` and likewise
///   for `end` (same order, not reversed).
/// - [`Style::EMPTY`] is the identity of mixing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Style {
    begin: Cow<'static, str>,
    end: Cow<'static, str>,
}

impl Style {
    /// No attributes.
    pub const EMPTY: Style = Style::from_static("", "");
    pub const BOLD: Style = Style::from_static("\x1b[1m", "\x1b[22m");
    pub const ITALIC: Style = Style::from_static("\x1b[3m", "\x1b[23m");
    pub const UNDERLINE: Style = Style::from_static("\x1b[4m", "\x1b[24m");
    pub const BLINK: Style = Style::from_static("\x1b[5m", "\x1b[25m");
    pub const INVERSE: Style = Style::from_static("\x1b[7m", "\x1b[27m");
    pub const STRIKETHROUGH: Style = Style::from_static("\x1b[9m", "\x1b[29m");

    /// Build a style from static sequences.
    #[must_use]
    pub const fn from_static(begin: &'static str, end: &'static str) -> Self {
        Self {
            begin: Cow::Borrowed(begin),
            end: Cow::Borrowed(end),
        }
    }

    /// Build a style from arbitrary sequences.
    #[must_use]
    pub fn new(begin: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            begin: Cow::Owned(begin.into()),
            end: Cow::Owned(end.into()),
        }
    }

    /// Palette foreground color.
    #[must_use]
    pub const fn fg(color: Ansi16) -> Self {
        Self::from_static(FG_TABLE[color.as_u8() as usize], FG_RESET)
    }

    /// Palette background color.
    #[must_use]
    pub const fn bg(color: Ansi16) -> Self {
        Self::from_static(BG_TABLE[color.as_u8() as usize], BG_RESET)
    }

    /// True-color foreground.
    #[must_use]
    pub fn fg_rgb(color: impl Into<Rgb>) -> Self {
        let Rgb { r, g, b } = color.into();
        Self {
            begin: Cow::Owned(sgr(&[38, 2, u32::from(r), u32::from(g), u32::from(b)])),
            end: Cow::Borrowed(FG_RESET),
        }
    }

    /// True-color background.
    #[must_use]
    pub fn bg_rgb(color: impl Into<Rgb>) -> Self {
        let Rgb { r, g, b } = color.into();
        Self {
            begin: Cow::Owned(sgr(&[48, 2, u32::from(r), u32::from(g), u32::from(b)])),
            end: Cow::Borrowed(BG_RESET),
        }
    }

    /// True-color foreground from a hex string (see [`Rgb::from_hex`]).
    ///
    /// # Errors
    ///
    /// Returns [`StyleError`] if the input cannot be decoded to three channels.
    pub fn fg_hex(hex: &str) -> Result<Self, StyleError> {
        Rgb::from_hex(hex).map(Self::fg_rgb)
    }

    /// True-color background from a hex string (see [`Rgb::from_hex`]).
    ///
    /// # Errors
    ///
    /// Returns [`StyleError`] if the input cannot be decoded to three channels.
    pub fn bg_hex(hex: &str) -> Result<Self, StyleError> {
        Rgb::from_hex(hex).map(Self::bg_rgb)
    }

    /// Sequence that switches the attributes on.
    #[inline]
    pub fn begin(&self) -> &str {
        &self.begin
    }

    /// Sequence that switches the attributes off.
    #[inline]
    pub fn end(&self) -> &str {
        &self.end
    }

    /// True for a style with no sequences at all.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.begin.is_empty() && self.end.is_empty()
    }

    /// Concatenate styles: begins in argument order, ends in the same order.
    #[must_use]
    pub fn mix<'a>(styles: impl IntoIterator<Item = &'a Style>) -> Style {
        let mut begin = String::new();
        let mut end = String::new();
        let mut only: Option<&Style> = None;
        let mut parts = 0usize;
        for style in styles {
            if style.is_empty() {
                continue;
            }
            parts += 1;
            only = Some(style);
            begin.push_str(&style.begin);
            end.push_str(&style.end);
        }
        match (parts, only) {
            (0, _) => Self::EMPTY,
            // Keep borrowed table entries borrowed.
            (1, Some(style)) => style.clone(),
            _ => Self::new(begin, end),
        }
    }

    /// Mix `self` with `other` (`self` first).
    #[must_use]
    pub fn then(&self, other: &Style) -> Style {
        Self::mix([self, other])
    }

    /// Wrap `text` in this style's sequences.
    #[must_use]
    pub fn paint(&self, text: &str) -> String {
        let mut out = String::with_capacity(self.begin.len() + text.len() + self.end.len());
        out.push_str(&self.begin);
        out.push_str(text);
        out.push_str(&self.end);
        out
    }
}

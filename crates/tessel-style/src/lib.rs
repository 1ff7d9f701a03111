#![forbid(unsafe_code)]

//! Terminal text attributes.
//!
//! A [`Style`] is an opaque pair of escape sequences: `begin` switches the
//! attributes on, `end` switches them off. Styles compose by concatenation
//! (see [`Style::mix`]); nesting semantics are left to the terminal.

pub mod color;
pub mod control;
pub mod style;

pub use color::{Ansi16, Rgb};
pub use style::Style;

use std::fmt;

/// Errors raised while constructing a style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StyleError {
    /// Hex color with a digit count that cannot be normalized to six.
    InvalidHexLength {
        /// Digit count after stripping a leading `#`.
        len: usize,
    },
    /// Hex color containing a non-hexadecimal character.
    InvalidHexDigit {
        /// The offending input, as given.
        input: String,
    },
}

impl fmt::Display for StyleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidHexLength { len } => {
                write!(f, "hex color must have 1, 2, 3 or 6 digits, got {len}")
            }
            Self::InvalidHexDigit { input } => {
                write!(f, "hex color {input:?} contains a non-hex digit")
            }
        }
    }
}

impl std::error::Error for StyleError {}

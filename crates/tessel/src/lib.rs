#![forbid(unsafe_code)]

//! Tessel public facade crate.
//!
//! Re-exports the common types of the layer crates and a small prelude.
//!
//! ```
//! use tessel::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let mut tree = Tree::default();
//!     tree.set_root(Stack::new([Widget::rounded_frame(), Text::raw("hi").into()]).into());
//!     let frame = tree.render(4, 3)?;
//!     assert_eq!(frame.row_text(0), "hi─╮");
//!     Ok(())
//! }
//! ```

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use tessel_core::event::{EventOutcome, KeyCode, KeyEvent, Modifiers};
pub use tessel_core::geometry::{Axis, Position, Sides, SizeBox};

// --- Style re-exports ------------------------------------------------------

pub use tessel_style::{Ansi16, Rgb, Style, StyleError};

// --- Render re-exports -----------------------------------------------------

pub use tessel_render::present::{present_frame, present_lines, write_frame};
pub use tessel_render::{Canvas, CanvasError, Cell, Line, StyledText};

// --- Widget re-exports -----------------------------------------------------

pub use tessel_widgets::widget::{
    Builder, DataBox, Flex, Padding, Positioned, SizedBox, Stack, Text,
};
pub use tessel_widgets::{
    ElementId, Key, Kind, RenderConfig, RenderError, ScopeCtx, ScopeId, ScopeView, Scopes,
    Tree, Value, Widget,
};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for tessel apps.
#[derive(Debug)]
pub enum Error {
    /// Style construction failed.
    Style(StyleError),
    /// Canvas construction or compositing failed.
    Canvas(CanvasError),
    /// A frame could not be rendered.
    Render(RenderError),
    /// I/O failure while writing to the terminal.
    Io(std::io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Style(err) => write!(f, "{err}"),
            Self::Canvas(err) => write!(f, "{err}"),
            Self::Render(err) => write!(f, "{err}"),
            Self::Io(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Style(err) => Some(err),
            Self::Canvas(err) => Some(err),
            Self::Render(err) => Some(err),
            Self::Io(err) => Some(err),
        }
    }
}

impl From<StyleError> for Error {
    fn from(err: StyleError) -> Self {
        Self::Style(err)
    }
}

impl From<CanvasError> for Error {
    fn from(err: CanvasError) -> Self {
        Self::Canvas(err)
    }
}

impl From<RenderError> for Error {
    fn from(err: RenderError) -> Self {
        Self::Render(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

/// Standard result type for tessel APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Builder, Canvas, DataBox, Error, EventOutcome, Flex, KeyCode, KeyEvent, Line, Padding,
        Positioned, Result, ScopeCtx, ScopeView, Sides, SizedBox, Stack, Style, Text, Tree, Value,
        Widget,
    };

    pub use crate::{core, render, style, widgets};
}

pub use tessel_core as core;
pub use tessel_render as render;
pub use tessel_style as style;
pub use tessel_widgets as widgets;

#![forbid(unsafe_code)]

//! Render kernel: cells, canvases, styled lines, and ANSI presentation.

pub mod canvas;
pub mod cell;
pub mod present;
pub mod text;

pub use canvas::Canvas;
pub use cell::Cell;
pub use text::{Line, StyledText};

use std::fmt;

/// Errors raised by canvas construction and compositing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CanvasError {
    /// A canvas must be at least 1x1.
    ZeroSize {
        /// Requested width.
        width: usize,
        /// Requested height.
        height: usize,
    },
    /// An overlay rectangle does not fit inside the destination canvas.
    ///
    /// This always indicates a layout defect upstream: the pasted canvas
    /// was sized or placed outside the space its parent allocated.
    OutOfBounds {
        /// Resolved column of the pasted canvas.
        x: i64,
        /// Resolved row of the pasted canvas.
        y: i64,
        /// Width of the pasted canvas.
        width: u16,
        /// Height of the pasted canvas.
        height: u16,
        /// Width of the destination canvas.
        canvas_width: u16,
        /// Height of the destination canvas.
        canvas_height: u16,
    },
}

impl fmt::Display for CanvasError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroSize { width, height } => {
                write!(f, "canvas dimensions must be positive, got {width}x{height}")
            }
            Self::OutOfBounds {
                x,
                y,
                width,
                height,
                canvas_width,
                canvas_height,
            } => write!(
                f,
                "overlay of {width}x{height} at ({x}, {y}) exceeds {canvas_width}x{canvas_height} canvas"
            ),
        }
    }
}

impl std::error::Error for CanvasError {}

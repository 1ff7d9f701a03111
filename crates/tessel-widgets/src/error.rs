#![forbid(unsafe_code)]

//! Frame-level errors.

use std::fmt;

use tessel_render::CanvasError;

/// Errors that abort a frame.
///
/// A failed frame leaves the tree's change flags and its last successful
/// frame untouched, so the driver can keep showing the previous canvas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// A canvas could not be built or composed. This is a layout defect:
    /// some render object produced content that does not fit the space its
    /// parent allocated.
    Geometry(CanvasError),
    /// `render` was called before a root widget was set.
    NoRoot,
    /// The driver supplied a viewport with a zero dimension.
    Viewport {
        /// Requested width.
        width: u16,
        /// Requested height.
        height: u16,
    },
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Geometry(err) => write!(f, "geometry error: {err}"),
            Self::NoRoot => f.write_str("no root widget has been set"),
            Self::Viewport { width, height } => {
                write!(f, "viewport must be at least 1x1, got {width}x{height}")
            }
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Geometry(err) => Some(err),
            _ => None,
        }
    }
}

impl From<CanvasError> for RenderError {
    fn from(err: CanvasError) -> Self {
        Self::Geometry(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn geometry_wraps_canvas_error() {
        let err = RenderError::from(CanvasError::ZeroSize {
            width: 0,
            height: 1,
        });
        assert!(matches!(err, RenderError::Geometry(_)));
        assert!(err.source().is_some());
        assert!(err.to_string().starts_with("geometry error"));
    }

    #[test]
    fn viewport_message() {
        let err = RenderError::Viewport {
            width: 0,
            height: 24,
        };
        assert_eq!(err.to_string(), "viewport must be at least 1x1, got 0x24");
        assert!(err.source().is_none());
    }
}

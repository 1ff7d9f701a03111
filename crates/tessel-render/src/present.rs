#![forbid(unsafe_code)]

//! Presenter: canvas to ANSI text.
//!
//! Each row is split into maximal runs of cells sharing one style. A styled
//! run is wrapped in that style's `begin` and `end` sequences, so every row
//! leaves the terminal with no attributes switched on. Unstyled runs are
//! emitted bare.
//!
//! Flushing the result to a device is left to the caller:
//!
//! ```
//! use tessel_render::{Canvas, Line};
//! use tessel_render::present::present_lines;
//! use tessel_style::Style;
//!
//! let canvas = Canvas::from_lines(&[Line::raw("a").push(
//!     tessel_render::StyledText::styled("bc", Style::BOLD),
//! )])
//! .unwrap();
//! assert_eq!(present_lines(&canvas), vec!["a\x1b[1mbc\x1b[22m"]);
//! ```

use std::io::{self, Write};

use tessel_style::control::cursor_position;

use crate::canvas::Canvas;
use crate::cell::Cell;

fn push_row(out: &mut String, cells: &[Cell]) {
    let mut rest = cells;
    while let Some(first) = rest.first() {
        let run = rest
            .iter()
            .position(|c| c.style != first.style)
            .unwrap_or(rest.len());
        let (head, tail) = rest.split_at(run);
        match &first.style {
            Some(style) => {
                out.push_str(style.begin());
                out.extend(head.iter().map(|c| c.ch));
                out.push_str(style.end());
            }
            None => out.extend(head.iter().map(|c| c.ch)),
        }
        rest = tail;
    }
}

/// Render every row of `canvas` to a string with inline style sequences.
pub fn present_lines(canvas: &Canvas) -> Vec<String> {
    (0..canvas.height())
        .map(|y| {
            let mut row = String::with_capacity(canvas.width() as usize);
            push_row(&mut row, canvas.row_cells(y));
            row
        })
        .collect()
}

/// Render a whole frame, each row prefixed with an absolute cursor move to
/// column 1 of that row.
pub fn present_frame(canvas: &Canvas) -> String {
    let mut out = String::with_capacity(canvas.size().area() as usize + 8 * canvas.height() as usize);
    for y in 0..canvas.height() {
        out.push_str(&cursor_position(y + 1, 1));
        push_row(&mut out, canvas.row_cells(y));
    }
    out
}

/// Write [`present_frame`] output to `writer` and flush it.
///
/// # Errors
///
/// Propagates any I/O error from the writer.
pub fn write_frame<W: Write>(writer: &mut W, canvas: &Canvas) -> io::Result<()> {
    writer.write_all(present_frame(canvas).as_bytes())?;
    writer.flush()
}

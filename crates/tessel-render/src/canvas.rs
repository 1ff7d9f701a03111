#![forbid(unsafe_code)]

//! Canvas grid storage and compositing.
//!
//! A [`Canvas`] is the paint output of one render object: a fixed-size grid
//! of [`Cell`]s. Compositing never mutates its inputs; [`Canvas::overlay`]
//! returns a fresh canvas, so a child's canvas can be cached and read by
//! several ancestors within a frame.
//!
//! # Layout
//!
//! Cells are stored in row-major order: `index = y * width + x`.
//!
//! # Invariants
//!
//! 1. `width > 0`, `height > 0`
//! 2. `cells.len() == width * height`
//! 3. Width and height never change after creation

use tessel_core::geometry::SizeBox;

use crate::CanvasError;
use crate::cell::Cell;
use crate::text::Line;

/// A 2D grid of character cells.
///
/// # Example
///
/// ```
/// use tessel_render::Canvas;
///
/// let base = Canvas::empty(10, 3).unwrap();
/// let label = Canvas::from_lines(&["hi".into()]).unwrap();
/// // Negative coordinates anchor from the far edge: -1 is flush right.
/// let out = base.overlay(&label, -1, 0).unwrap();
/// assert_eq!(out.row_text(0), "        hi");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    size: SizeBox,
    cells: Vec<Cell>,
}

impl Canvas {
    /// Create a blank canvas.
    ///
    /// # Errors
    ///
    /// [`CanvasError::ZeroSize`] if either dimension is zero.
    pub fn empty(width: u16, height: u16) -> Result<Self, CanvasError> {
        SizeBox::new(width, height)
            .map(Self::blank)
            .ok_or(CanvasError::ZeroSize {
                width: usize::from(width),
                height: usize::from(height),
            })
    }

    /// Create a blank canvas of a size already known to be valid.
    pub fn blank(size: SizeBox) -> Self {
        Self::filled(size, Cell::BLANK)
    }

    /// Create a canvas with every cell set to `cell`.
    pub fn filled(size: SizeBox, cell: Cell) -> Self {
        let len = size.width() as usize * size.height() as usize;
        Self {
            size,
            cells: vec![cell; len],
        }
    }

    /// Build a canvas from rows of styled text.
    ///
    /// Shorter rows are right-padded with blank, unstyled cells to the width
    /// of the longest row. The height is the number of rows.
    ///
    /// # Errors
    ///
    /// [`CanvasError::ZeroSize`] when there are no rows, when every row is
    /// empty, or when a dimension exceeds `u16::MAX`.
    pub fn from_lines(lines: &[Line]) -> Result<Self, CanvasError> {
        let width = lines.iter().map(Line::width).max().unwrap_or(0);
        let height = lines.len();
        let zero = CanvasError::ZeroSize { width, height };
        let (Ok(w), Ok(h)) = (u16::try_from(width), u16::try_from(height)) else {
            return Err(zero);
        };
        let size = SizeBox::new(w, h).ok_or(zero)?;

        let mut cells = Vec::with_capacity(size.area() as usize);
        for line in lines {
            let start = cells.len();
            cells.extend(line.cells());
            cells.resize(start + width, Cell::BLANK);
        }

        Ok(Self { size, cells })
    }

    /// Canvas width in cells.
    #[inline]
    pub const fn width(&self) -> u16 {
        self.size.width()
    }

    /// Canvas height in cells.
    #[inline]
    pub const fn height(&self) -> u16 {
        self.size.height()
    }

    /// Dimensions as a size box.
    #[inline]
    pub const fn size(&self) -> SizeBox {
        self.size
    }

    #[inline]
    fn index(&self, x: u16, y: u16) -> Option<usize> {
        if x < self.width() && y < self.height() {
            Some(y as usize * self.width() as usize + x as usize)
        } else {
            None
        }
    }

    /// Get a reference to the cell at (x, y).
    ///
    /// Returns `None` if coordinates are out of bounds.
    #[inline]
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        self.index(x, y).map(|i| &self.cells[i])
    }

    /// Raw cell slice in row-major order.
    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// The cells of one row.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row_cells(&self, y: u16) -> &[Cell] {
        let start = y as usize * self.width() as usize;
        &self.cells[start..start + self.width() as usize]
    }

    /// Characters of one row, styles dropped. Empty for an out-of-range row.
    pub fn row_text(&self, y: u16) -> String {
        if y >= self.height() {
            return String::new();
        }
        self.row_cells(y).iter().map(|c| c.ch).collect()
    }

    /// All rows as plain text.
    pub fn to_text_lines(&self) -> Vec<String> {
        (0..self.height()).map(|y| self.row_text(y)).collect()
    }

    /// Resolve an overlay coordinate along one dimension.
    ///
    /// Non-negative coordinates are returned unchanged. A negative
    /// coordinate anchors from the far edge:
    /// `outer - inner + coordinate + 1`, so `-1` is flush with the far edge,
    /// `-2` leaves one cell of space, and so on.
    ///
    /// Computed in `i64` so no `i32` input can overflow.
    #[inline]
    pub fn resolve_anchor(outer: u16, inner: u16, coordinate: i32) -> i64 {
        let coordinate = i64::from(coordinate);
        if coordinate < 0 {
            i64::from(outer) - i64::from(inner) + coordinate + 1
        } else {
            coordinate
        }
    }

    /// Paste `other` into a copy of `self` with its top-left corner at
    /// `(x, y)`.
    ///
    /// Cells inside the pasted rectangle are copied from `other` exactly
    /// (character and style, no merging). Cells outside are unchanged.
    /// Negative coordinates are resolved with [`Canvas::resolve_anchor`]
    /// first.
    ///
    /// # Errors
    ///
    /// [`CanvasError::OutOfBounds`] if, after resolution, the rectangle
    /// starts left of or above the canvas or extends past its right or
    /// bottom edge. Nothing is clipped.
    pub fn overlay(&self, other: &Canvas, x: i32, y: i32) -> Result<Canvas, CanvasError> {
        let x = Self::resolve_anchor(self.width(), other.width(), x);
        let y = Self::resolve_anchor(self.height(), other.height(), y);
        let fits = x >= 0
            && y >= 0
            && x + i64::from(other.width()) <= i64::from(self.width())
            && y + i64::from(other.height()) <= i64::from(self.height());
        if !fits {
            tessel_core::trace!(
                x,
                y,
                w = other.width(),
                h = other.height(),
                "overlay rejected"
            );
            return Err(CanvasError::OutOfBounds {
                x,
                y,
                width: other.width(),
                height: other.height(),
                canvas_width: self.width(),
                canvas_height: self.height(),
            });
        }

        let mut out = self.clone();
        // Both fit inside a u16 dimension here.
        let (x, y) = (x as usize, y as usize);
        let (dst_w, src_w) = (self.width() as usize, other.width() as usize);
        for row in 0..other.height() as usize {
            let dst = (y + row) * dst_w + x;
            let src = row * src_w;
            out.cells[dst..dst + src_w].clone_from_slice(&other.cells[src..src + src_w]);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::StyledText;
    use tessel_style::Style;

    fn canvas_from(rows: &[&str]) -> Canvas {
        let lines: Vec<Line> = rows.iter().map(|r| Line::raw(*r)).collect();
        Canvas::from_lines(&lines).unwrap()
    }

    #[test]
    fn empty_is_blank() {
        let canvas = Canvas::empty(4, 2).unwrap();
        assert_eq!(canvas.width(), 4);
        assert_eq!(canvas.height(), 2);
        assert!(canvas.cells().iter().all(Cell::is_blank));
        assert_eq!(canvas.cells().len(), 8);
    }

    #[test]
    fn empty_rejects_zero() {
        assert_eq!(
            Canvas::empty(0, 3),
            Err(CanvasError::ZeroSize {
                width: 0,
                height: 3
            })
        );
        assert!(Canvas::empty(3, 0).is_err());
    }

    #[test]
    fn from_lines_pads_short_rows() {
        let canvas = Canvas::from_lines(&[
            Line::raw("abc"),
            Line::raw("d"),
            Line::styled("ef", Style::BOLD),
        ])
        .unwrap();
        assert_eq!(canvas.width(), 3);
        assert_eq!(canvas.height(), 3);
        assert_eq!(canvas.to_text_lines(), vec!["abc", "d  ", "ef "]);
        assert!(canvas.get(1, 1).unwrap().is_blank());
        assert_eq!(canvas.get(0, 2).unwrap().style, Some(Style::BOLD));
        assert!(canvas.get(2, 2).unwrap().is_blank());
    }

    #[test]
    fn from_lines_rejects_degenerate_input() {
        assert_eq!(
            Canvas::from_lines(&[]),
            Err(CanvasError::ZeroSize {
                width: 0,
                height: 0
            })
        );
        assert!(Canvas::from_lines(&[Line::default(), Line::raw("")]).is_err());
    }

    #[test]
    fn from_lines_keeps_blank_rows() {
        let canvas = Canvas::from_lines(&[Line::raw("x"), Line::default()]).unwrap();
        assert_eq!(canvas.height(), 2);
        assert_eq!(canvas.row_text(1), " ");
    }

    #[test]
    fn overlay_copies_rectangle() {
        let base = canvas_from(&["......", "......", "......"]);
        let patch = Canvas::from_lines(&[Line::from(vec![
            StyledText::raw("a"),
            StyledText::styled("b", Style::INVERSE),
        ])])
        .unwrap();
        let out = base.overlay(&patch, 2, 1).unwrap();
        assert_eq!(out.to_text_lines(), vec!["......", "..ab..", "......"]);
        assert_eq!(out.get(3, 1).unwrap().style, Some(Style::INVERSE));
        assert_eq!(out.get(2, 1).unwrap().style, None);
    }

    #[test]
    fn overlay_replaces_style_instead_of_merging() {
        let base = Canvas::filled(
            SizeBox::new(2, 1).unwrap(),
            Cell::from_char('#').with_style(Style::BOLD),
        );
        let patch = Canvas::empty(1, 1).unwrap();
        let out = base.overlay(&patch, 0, 0).unwrap();
        assert!(out.get(0, 0).unwrap().is_blank());
        assert_eq!(out.get(1, 0).unwrap().style, Some(Style::BOLD));
    }

    #[test]
    fn overlay_leaves_inputs_untouched() {
        let base = canvas_from(&["...."]);
        let patch = canvas_from(&["xx"]);
        let before = base.clone();
        let _ = base.overlay(&patch, 1, 0).unwrap();
        assert_eq!(base, before);
        assert_eq!(patch.row_text(0), "xx");
    }

    #[test]
    fn negative_coordinates_anchor_far_edge() {
        let base = canvas_from(&["......", "......", "......"]);
        let patch = canvas_from(&["xy"]);
        let out = base.overlay(&patch, -1, -1).unwrap();
        assert_eq!(out.row_text(2), "....xy");
        let out = base.overlay(&patch, -2, 0).unwrap();
        assert_eq!(out.row_text(0), "...xy.");
    }

    #[test]
    fn overlay_rejects_overflow() {
        let base = Canvas::empty(5, 2).unwrap();
        let patch = Canvas::empty(2, 1).unwrap();
        // x = width - patch.width + 1
        assert!(matches!(
            base.overlay(&patch, 4, 0),
            Err(CanvasError::OutOfBounds { x: 4, .. })
        ));
        assert!(base.overlay(&patch, 0, 2).is_err());
        assert!(base.overlay(&patch, 3, 1).is_ok());
    }

    #[test]
    fn overlay_rejects_negative_after_resolution() {
        let base = Canvas::empty(3, 3).unwrap();
        let patch = Canvas::empty(2, 2).unwrap();
        // 3 - 2 + (-3) + 1 = -1
        assert!(matches!(
            base.overlay(&patch, -3, 0),
            Err(CanvasError::OutOfBounds { x: -1, .. })
        ));
        let tall = Canvas::empty(1, 4).unwrap();
        assert!(base.overlay(&tall, 0, -1).is_err());
    }

    #[test]
    fn overlay_extreme_coordinates_are_out_of_bounds() {
        let base = Canvas::empty(5, 2).unwrap();
        let patch = Canvas::empty(2, 1).unwrap();
        let max = i64::from(i32::MAX);
        assert!(matches!(
            base.overlay(&patch, i32::MAX, 0),
            Err(CanvasError::OutOfBounds { x, .. }) if x == max
        ));
        assert!(matches!(
            base.overlay(&patch, 0, i32::MAX),
            Err(CanvasError::OutOfBounds { .. })
        ));
        assert!(matches!(
            base.overlay(&patch, i32::MIN, i32::MIN),
            Err(CanvasError::OutOfBounds { .. })
        ));
        assert_eq!(
            Canvas::resolve_anchor(1, 5, i32::MIN),
            i64::from(i32::MIN) - 3
        );
    }

    #[test]
    fn row_text_out_of_range_is_empty() {
        assert_eq!(Canvas::empty(2, 1).unwrap().row_text(5), "");
    }

    mod property {
        use super::*;
        use proptest::prelude::*;

        fn patterned(width: u16, height: u16, seed: u32) -> Canvas {
            let size = SizeBox::new(width, height).unwrap();
            let mut canvas = Canvas::blank(size);
            for (i, cell) in canvas.cells.iter_mut().enumerate() {
                let n = (i as u32).wrapping_mul(31).wrapping_add(seed) % 26;
                cell.ch = char::from_u32('a' as u32 + n).unwrap();
                if n % 3 == 0 {
                    cell.style = Some(Style::BOLD);
                }
            }
            canvas
        }

        proptest! {
            #[test]
            fn empty_dimensions_hold(w in 1u16..120, h in 1u16..60) {
                let canvas = Canvas::empty(w, h).unwrap();
                prop_assert_eq!(canvas.width(), w);
                prop_assert_eq!(canvas.height(), h);
                prop_assert!(canvas.cells().iter().all(Cell::is_blank));
            }

            #[test]
            fn overlay_matches_cellwise(
                bw in 1u16..30,
                bh in 1u16..15,
                aw in 1u16..30,
                ah in 1u16..15,
                fx in 0u16..30,
                fy in 0u16..15,
            ) {
                prop_assume!(aw <= bw && ah <= bh);
                let x = fx % (bw - aw + 1);
                let y = fy % (bh - ah + 1);
                let base = patterned(bw, bh, 7);
                let patch = patterned(aw, ah, 3);
                let out = base.overlay(&patch, i32::from(x), i32::from(y)).unwrap();
                for cy in 0..bh {
                    for cx in 0..bw {
                        let inside = cx >= x && cx < x + aw && cy >= y && cy < y + ah;
                        let expected = if inside {
                            patch.get(cx - x, cy - y)
                        } else {
                            base.get(cx, cy)
                        };
                        prop_assert_eq!(out.get(cx, cy), expected);
                    }
                }
            }

            #[test]
            fn overlay_rejects_past_edges(
                bw in 1u16..30,
                bh in 1u16..15,
                aw in 1u16..30,
                ah in 1u16..15,
                extra in 1u16..5,
            ) {
                let base = Canvas::empty(bw, bh).unwrap();
                let patch = Canvas::empty(aw, ah).unwrap();
                let x = i32::from(bw) - i32::from(aw) + i32::from(extra);
                let y = i32::from(bh) - i32::from(ah) + i32::from(extra);
                if x >= 0 {
                    prop_assert!(base.overlay(&patch, x, 0).is_err());
                }
                if y >= 0 {
                    prop_assert!(base.overlay(&patch, 0, y).is_err());
                }
            }

            #[test]
            fn overlay_any_coordinate_returns(
                x in any::<i32>(),
                y in any::<i32>(),
                aw in 1u16..8,
                ah in 1u16..8,
            ) {
                let base = Canvas::empty(6, 4).unwrap();
                let patch = Canvas::empty(aw, ah).unwrap();
                let rx = Canvas::resolve_anchor(6, aw, x);
                let ry = Canvas::resolve_anchor(4, ah, y);
                let fits = rx >= 0
                    && ry >= 0
                    && rx + i64::from(aw) <= 6
                    && ry + i64::from(ah) <= 4;
                prop_assert_eq!(base.overlay(&patch, x, y).is_ok(), fits);
            }
        }
    }
}

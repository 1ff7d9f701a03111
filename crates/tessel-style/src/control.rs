//! CSI control sequences.
//!
//! Cursor movement and erase helpers for display drivers, built on the same
//! [`csi`] encoder the SGR style table uses.

use std::fmt::Write as _;

/// Encode `ESC [ p1 ; p2 ; ... final`.
///
/// With no parameters the sequence is just `ESC [ final`.
#[must_use]
pub fn csi(final_byte: char, params: &[u32]) -> String {
    let mut out = String::with_capacity(3 + params.len() * 4);
    out.push_str("\x1b[");
    for (i, p) in params.iter().enumerate() {
        if i > 0 {
            out.push(';');
        }
        let _ = write!(out, "{p}");
    }
    out.push(final_byte);
    out
}

/// Encode a Select Graphic Rendition sequence.
#[must_use]
pub fn sgr(params: &[u32]) -> String {
    csi('m', params)
}

/// Erase mode for [`erase_display`] and [`erase_line`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum EraseMode {
    /// From the cursor to the end.
    #[default]
    ToEnd = 0,
    /// From the start to the cursor.
    ToStart = 1,
    /// Everything.
    All = 2,
}

pub fn cursor_up(n: u16) -> String {
    csi('A', &[u32::from(n)])
}

pub fn cursor_down(n: u16) -> String {
    csi('B', &[u32::from(n)])
}

pub fn cursor_forward(n: u16) -> String {
    csi('C', &[u32::from(n)])
}

pub fn cursor_back(n: u16) -> String {
    csi('D', &[u32::from(n)])
}

pub fn cursor_next_line(n: u16) -> String {
    csi('E', &[u32::from(n)])
}

pub fn cursor_previous_line(n: u16) -> String {
    csi('F', &[u32::from(n)])
}

/// Move to column `col` (1-based) on the current row.
pub fn cursor_horizontal_absolute(col: u16) -> String {
    csi('G', &[u32::from(col)])
}

/// Move to `(row, col)`, both 1-based.
pub fn cursor_position(row: u16, col: u16) -> String {
    csi('H', &[u32::from(row), u32::from(col)])
}

pub fn erase_display(mode: EraseMode) -> String {
    csi('J', &[mode as u32])
}

pub fn erase_line(mode: EraseMode) -> String {
    csi('K', &[mode as u32])
}

pub fn scroll_up(n: u16) -> String {
    csi('S', &[u32::from(n)])
}

pub fn scroll_down(n: u16) -> String {
    csi('T', &[u32::from(n)])
}

pub fn save_cursor_position() -> String {
    csi('s', &[])
}

pub fn restore_cursor_position() -> String {
    csi('u', &[])
}

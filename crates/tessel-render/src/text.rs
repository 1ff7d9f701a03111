#![forbid(unsafe_code)]

//! Styled text runs and lines, the input to [`Canvas::from_lines`].
//!
//! Every `char` occupies exactly one cell; no width measurement is done.
//!
//! [`Canvas::from_lines`]: crate::Canvas::from_lines

use tessel_style::Style;

use crate::cell::Cell;

/// A run of characters sharing one style.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct StyledText {
    pub text: String,
    pub style: Option<Style>,
}

impl StyledText {
    /// Unstyled run.
    pub fn raw(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: None,
        }
    }

    /// Styled run.
    pub fn styled(text: impl Into<String>, style: Style) -> Self {
        Self {
            text: text.into(),
            style: Some(style),
        }
    }

    /// Number of cells this run covers.
    #[inline]
    pub fn width(&self) -> usize {
        self.text.chars().count()
    }

    /// Expand into cells.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.text.chars().map(|ch| Cell {
            ch,
            style: self.style.clone(),
        })
    }
}

impl From<&str> for StyledText {
    fn from(text: &str) -> Self {
        Self::raw(text)
    }
}

impl From<String> for StyledText {
    fn from(text: String) -> Self {
        Self::raw(text)
    }
}

/// One row of styled runs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Line {
    pub spans: Vec<StyledText>,
}

impl Line {
    /// A line holding one unstyled run.
    pub fn raw(text: impl Into<String>) -> Self {
        Self {
            spans: vec![StyledText::raw(text)],
        }
    }

    /// A line holding one styled run.
    pub fn styled(text: impl Into<String>, style: Style) -> Self {
        Self {
            spans: vec![StyledText::styled(text, style)],
        }
    }

    /// Append a run (builder-style).
    #[must_use]
    pub fn push(mut self, span: impl Into<StyledText>) -> Self {
        self.spans.push(span.into());
        self
    }

    /// Number of cells this line covers.
    pub fn width(&self) -> usize {
        self.spans.iter().map(StyledText::width).sum()
    }

    /// Expand into cells, left to right.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.spans.iter().flat_map(|span| span.cells())
    }
}

impl From<Vec<StyledText>> for Line {
    fn from(spans: Vec<StyledText>) -> Self {
        Self { spans }
    }
}

impl From<StyledText> for Line {
    fn from(span: StyledText) -> Self {
        Self { spans: vec![span] }
    }
}

impl From<&str> for Line {
    fn from(text: &str) -> Self {
        Self::raw(text)
    }
}

impl From<String> for Line {
    fn from(text: String) -> Self {
        Self::raw(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_counts_chars_not_bytes() {
        assert_eq!(StyledText::raw("héllo").width(), 5);
        let line = Line::raw("ab").push(StyledText::styled("─│", Style::BOLD));
        assert_eq!(line.width(), 4);
    }

    #[test]
    fn cells_carry_run_style() {
        let line = Line::raw("a").push(StyledText::styled("b", Style::ITALIC));
        let cells: Vec<Cell> = line.cells().collect();
        assert_eq!(cells[0], Cell::from_char('a'));
        assert_eq!(cells[1], Cell::from_char('b').with_style(Style::ITALIC));
    }

    #[test]
    fn conversions() {
        assert_eq!(Line::from("x"), Line::raw("x"));
        assert_eq!(Line::from(String::from("x")), Line::raw("x"));
        assert_eq!(
            Line::from(vec![StyledText::raw("a"), StyledText::raw("b")]).width(),
            2
        );
        assert!(Line::default().spans.is_empty());
    }
}

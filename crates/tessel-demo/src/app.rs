#![forbid(unsafe_code)]

//! The demo's widget tree: a header, a bordered panel, a help line.

use tessel::prelude::*;
use tessel::{Ansi16, SizeBox, StyledText};

/// Scope variable holding the counter.
pub const COUNT: &str = "count";

const TITLE: &str = "tessel demo";
const HELP: &str = "↑/↓ change  r reset  q quit";

/// Root widget of the demo.
pub fn counter_app() -> Widget {
    Widget::from(Flex::column([
        Builder::new([COUNT], header).into(),
        DataBox::new(panel)
            .depends_on(["width", "height", COUNT])
            .height(4)
            .into(),
        Text::new([Line::styled(HELP, Style::fg(Ansi16::BrightBlack))]).into(),
    ]))
    .with_var(COUNT, 0)
    .on_key(handle_key)
}

fn header(scope: &ScopeView<'_>) -> Widget {
    let n = scope.get_i64(COUNT).unwrap_or(0);
    let color = if n < 0 { Ansi16::Red } else { Ansi16::Green };
    Text::new([Line::styled(TITLE, Style::BOLD)
        .push("  ")
        .push(StyledText::styled(format!("[{n}]"), Style::fg(color)))])
    .into()
}

/// Rounded border around the counter and the viewport readout.
fn panel(size: SizeBox, scope: &ScopeView<'_>) -> Vec<Line> {
    let (w, h) = (usize::from(size.width()), usize::from(size.height()));
    if w < 2 || h < 2 {
        return Vec::new();
    }
    let inner = w - 2;
    let body = [
        format!(" count: {}", scope.get_i64(COUNT).unwrap_or(0)),
        format!(
            " viewport {}x{}",
            scope.get_u16("width").unwrap_or(0),
            scope.get_u16("height").unwrap_or(0)
        ),
    ];

    let mut lines = Vec::with_capacity(h);
    lines.push(Line::raw(format!("╭{}╮", "─".repeat(inner))));
    for row in 0..h - 2 {
        let text = body.get(row).map(String::as_str).unwrap_or_default();
        let cell: String = text.chars().chain(std::iter::repeat(' ')).take(inner).collect();
        lines.push(Line::raw(format!("│{cell}│")));
    }
    lines.push(Line::raw(format!("╰{}╯", "─".repeat(inner))));
    lines
}

/// Counter key bindings.
pub fn handle_key(event: &KeyEvent, ctx: &mut ScopeCtx<'_>) -> EventOutcome {
    let n = ctx.get_i64(COUNT).unwrap_or(0);
    let next = match event.code {
        KeyCode::Up | KeyCode::Char('+') => n.saturating_add(1),
        KeyCode::Down | KeyCode::Char('-') => n.saturating_sub(1),
        KeyCode::Char('r') => 0,
        _ => return EventOutcome::Ignored,
    };
    ctx.update(COUNT, next);
    EventOutcome::Handled
}

/// Whether the driver should stop.
pub fn is_quit(event: &KeyEvent) -> bool {
    event.is_char('q') || (event.ctrl() && event.is_char('c'))
}

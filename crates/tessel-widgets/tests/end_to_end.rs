#![forbid(unsafe_code)]

//! Whole-frame scenarios: compose, reconcile, re-render.

use tessel_core::event::{EventOutcome, KeyCode, KeyEvent};
use tessel_core::geometry::Sides;
use tessel_render::present::present_lines;
use tessel_render::{Line, StyledText};
use tessel_style::Style;
use tessel_widgets::widget::{Builder, DataBox, Flex, Padding, Positioned, SizedBox, Stack, Text};
use tessel_widgets::{RenderConfig, RenderError, Tree, Value, Widget};

fn bar(width: u16, fill: char) -> Widget {
    SizedBox::fixed(width, 1).fill(fill).into()
}

#[test]
fn padded_row_leaves_trailing_columns_blank() {
    let mut tree = Tree::default();
    tree.set_root(Padding::new(Sides::horizontal(1), Flex::row([bar(3, 'a'), bar(4, 'b')])).into());
    let frame = tree.render(10, 1).unwrap();
    assert_eq!(frame.row_text(0), " aaabbbb  ");
    assert!(frame.get(7, 0).is_some_and(|c| c.ch == 'b'));
    assert!(frame.get(8, 0).is_some_and(|c| c.is_blank()));
    assert!(frame.get(9, 0).is_some_and(|c| c.is_blank()));
}

#[test]
fn frame_with_badge_and_border() {
    let mut tree = Tree::default();
    tree.set_root(
        Stack::new([
            Widget::rounded_frame(),
            Positioned::new(
                -2,
                0,
                Text::new([Line::styled("!", Style::fg_rgb((255, 0, 0)))]),
            )
            .into(),
        ])
        .into(),
    );
    let frame = tree.render(5, 3).unwrap();
    assert_eq!(frame.to_text_lines(), vec!["╭──!╮", "│   │", "╰───╯"]);
    let lines = present_lines(&frame);
    assert!(lines[0].contains('!'));
    assert!(lines[0].contains("\x1b["));
}

#[test]
fn border_follows_viewport_resize() {
    let mut tree = Tree::default();
    tree.set_root(Widget::rounded_frame());
    tree.render(4, 2).unwrap();
    let frame = tree.render(6, 3).unwrap();
    assert_eq!(frame.to_text_lines(), vec!["╭────╮", "│    │", "╰────╯"]);
}

#[test]
fn reconcile_preserves_elements_across_frames() {
    let mut tree = Tree::default();
    let items = |names: &[&str]| -> Widget {
        Flex::column(
            names
                .iter()
                .map(|n| Widget::from(Text::raw(n)).with_key(*n)),
        )
        .into()
    };

    let root = tree.set_root(items(&["one", "two", "three"]));
    let before = tree.children(root).to_vec();
    tree.render(5, 3).unwrap();

    tree.set_root(items(&["three", "one"]));
    let after = tree.children(root).to_vec();
    assert_eq!(after, vec![before[2], before[0]]);
    assert!(!tree.is_mounted(before[1]));

    let frame = tree.render(5, 3).unwrap();
    assert_eq!(frame.to_text_lines(), vec!["three", "one  ", "     "]);
}

#[test]
fn replacing_kind_swaps_render_object() {
    let mut tree = Tree::default();
    let root = tree.set_root(Stack::new([Text::raw("x").into()]).into());
    let old = tree.children(root)[0];
    let old_ro = tree.render_object_of(old).unwrap();
    tree.render(2, 1).unwrap();

    tree.set_root(Stack::new([bar(2, '=')]).into());
    let new = tree.children(root)[0];
    assert_ne!(new, old);
    assert_ne!(tree.render_object_of(new), Some(old_ro));
    assert_eq!(tree.render(2, 1).unwrap().row_text(0), "==");
}

#[test]
fn nested_scopes_shadow_and_update_owner() {
    let mut tree = Tree::default();
    let label = DataBox::new(|_, scope| {
        vec![Line::raw(
            scope.get("label").map(Value::to_string).unwrap_or_default(),
        )]
    })
    .depends_on(["label"])
    .height(1);

    let root = tree.set_root(
        Widget::from(Flex::column([
            label.clone().into(),
            Widget::from(Padding::new(Sides::all(0), label)).with_var("label", "inner"),
        ]))
        .with_var("label", "outer"),
    );
    assert_eq!(
        tree.render(6, 2).unwrap().to_text_lines(),
        vec!["outer ", "inner "]
    );

    let first = tree.children(root)[0];
    let owner = tree.update_var(first, "label", "OUTER");
    assert_eq!(owner, tree.scope_of(root));
    assert_eq!(
        tree.render(6, 2).unwrap().to_text_lines(),
        vec!["OUTER ", "inner "]
    );
}

#[test]
fn counter_builder_driven_by_keys() {
    let mut tree = Tree::default();
    let counter = Widget::from(Builder::new(["count"], |scope| {
        let n = scope.get_i64("count").unwrap_or(0);
        Text::raw(&format!("count: {n}")).into()
    }))
    .with_var("count", 0)
    .on_key(|event, ctx| match event.code {
        KeyCode::Up => {
            let n = ctx.get_i64("count").unwrap_or(0);
            ctx.update("count", n + 1);
            EventOutcome::Handled
        }
        _ => EventOutcome::Ignored,
    });

    let root = tree.set_root(counter);
    assert_eq!(tree.focus_next(), Some(root));
    assert_eq!(tree.render(10, 1).unwrap().row_text(0), "count: 0  ");

    assert!(tree.dispatch_key(&KeyEvent::new(KeyCode::Up)).is_handled());
    assert!(tree.dispatch_key(&KeyEvent::new(KeyCode::Up)).is_handled());
    assert!(!tree.dispatch_key(&KeyEvent::char('q')).is_handled());
    assert_eq!(tree.render(10, 1).unwrap().row_text(0), "count: 2  ");
}

#[test]
fn styled_text_reaches_presenter() {
    let mut tree = Tree::default();
    let bold = Style::BOLD;
    tree.set_root(Text::new([Line::from(vec![StyledText::raw("a"), StyledText::styled("b", bold)])]).into());
    let frame = tree.render(3, 1).unwrap();
    assert_eq!(frame.row_text(0), "ab ");
    let lines = present_lines(&frame);
    assert!(lines[0].starts_with('a'));
    assert!(lines[0].ends_with(' '));
}

#[test]
fn overflow_reports_geometry_error() {
    let mut tree = Tree::new(RenderConfig::default().with_paint_cache(false));
    tree.set_root(DataBox::new(|_, _| vec![Line::raw("wider than box")]).width(4).height(1).into());
    assert!(matches!(tree.render(20, 2), Err(RenderError::Geometry(_))));
    assert!(tree.last_frame().is_none());
}

#[test]
fn keyed_leaf_edit_keeps_every_level() {
    let mut tree = Tree::default();
    let view = |last: &str| -> Widget {
        Widget::from(Padding::new(
            Sides::horizontal(1),
            Widget::from(Flex::row([
                Widget::from(Text::raw("ab")).with_key("head"),
                Widget::from(Text::raw(last)).with_key("tail"),
            ]))
            .with_key("row"),
        ))
        .with_key("pad")
    };

    let root = tree.set_root(view("c"));
    let before = tree.descendants(root);
    let objects: Vec<_> = before.iter().map(|&id| tree.render_object_of(id)).collect();
    assert_eq!(tree.render(8, 1).unwrap().row_text(0), " abc    ");

    assert_eq!(tree.set_root(view("d")), root);
    assert_eq!(tree.descendants(root), before);
    let after: Vec<_> = before.iter().map(|&id| tree.render_object_of(id)).collect();
    assert_eq!(after, objects);
    assert_eq!(tree.render(8, 1).unwrap().row_text(0), " abd    ");

    let [_, _, head, tail] = before.as_slice() else {
        panic!("expected padding, flex and two leaves, got {before:?}");
    };
    assert_eq!(tree.render_object(*head).unwrap().paint_count(), 1);
    assert_eq!(tree.render_object(*tail).unwrap().paint_count(), 2);
}

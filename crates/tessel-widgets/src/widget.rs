#![forbid(unsafe_code)]

//! Widgets: immutable descriptions of what should be on screen.
//!
//! A [`Widget`] is a value object: a [`WidgetKind`] carrying the
//! kind-specific configuration, plus the attributes every kind shares (an
//! optional [`Key`], scope variable overrides, an optional key handler).
//! Widgets are cheap to clone; closures are held behind `Arc` and compare by
//! pointer, so `Widget: PartialEq` holds for every kind.
//!
//! # Example
//!
//! ```
//! use tessel_widgets::widget::{Flex, Padding, SizedBox, Widget};
//! use tessel_core::geometry::Sides;
//!
//! let ui: Widget = Padding::new(
//!     Sides::horizontal(1),
//!     Flex::row([SizedBox::fixed(3, 1).into(), SizedBox::fixed(4, 1).into()]),
//! )
//! .into();
//! assert_eq!(ui.declared_children().len(), 1);
//! ```

use std::fmt;
use std::sync::Arc;

use tessel_core::event::{EventOutcome, KeyEvent};
use tessel_core::geometry::{Axis, SizeBox, Sides};
use tessel_render::Line;
use tessel_style::Style;

use crate::scope::{ScopeCtx, ScopeView, Value};

/// Identity hint used to match children across reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Key(String);

impl Key {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Key {
    fn from(key: &str) -> Self {
        Self(key.to_owned())
    }
}

impl From<String> for Key {
    fn from(key: String) -> Self {
        Self(key)
    }
}

impl From<usize> for Key {
    fn from(key: usize) -> Self {
        Self(key.to_string())
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

macro_rules! shared_fn {
    ($(#[$meta:meta])* $name:ident, $($sig:tt)*) => {
        $(#[$meta])*
        #[derive(Clone)]
        pub struct $name(Arc<$($sig)*>);

        impl PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                Arc::ptr_eq(&self.0, &other.0)
            }
        }

        impl Eq for $name {}

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({:p})", stringify!($name), Arc::as_ptr(&self.0))
            }
        }
    };
}

shared_fn!(
    /// Produces the lines of a [`DataBox`] for its resolved size.
    Renderer,
    dyn Fn(SizeBox, &ScopeView<'_>) -> Vec<Line>
);

shared_fn!(
    /// Produces the single child of a [`Builder`].
    BuildFn,
    dyn Fn(&ScopeView<'_>) -> Widget
);

shared_fn!(
    /// Handles a key event delivered to a focused element or bubbled from a
    /// descendant.
    KeyHandler,
    dyn Fn(&KeyEvent, &mut ScopeCtx<'_>) -> EventOutcome
);

impl Renderer {
    pub fn new(f: impl Fn(SizeBox, &ScopeView<'_>) -> Vec<Line> + 'static) -> Self {
        Self(Arc::new(f))
    }

    pub fn call(&self, size: SizeBox, scope: &ScopeView<'_>) -> Vec<Line> {
        (self.0)(size, scope)
    }
}

impl BuildFn {
    pub fn new(f: impl Fn(&ScopeView<'_>) -> Widget + 'static) -> Self {
        Self(Arc::new(f))
    }

    pub fn call(&self, scope: &ScopeView<'_>) -> Widget {
        (self.0)(scope)
    }
}

impl KeyHandler {
    pub fn new(f: impl Fn(&KeyEvent, &mut ScopeCtx<'_>) -> EventOutcome + 'static) -> Self {
        Self(Arc::new(f))
    }

    pub fn call(&self, event: &KeyEvent, ctx: &mut ScopeCtx<'_>) -> EventOutcome {
        (self.0)(event, ctx)
    }
}

/// Leaf filling its area with one character.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SizedBox {
    pub width: Option<u16>,
    pub height: Option<u16>,
    pub fill: Option<char>,
    pub style: Option<Style>,
}

impl SizedBox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Box with both dimensions fixed.
    pub fn fixed(width: u16, height: u16) -> Self {
        Self::new().width(width).height(height)
    }

    #[must_use]
    pub fn width(mut self, width: u16) -> Self {
        self.width = Some(width);
        self
    }

    #[must_use]
    pub fn height(mut self, height: u16) -> Self {
        self.height = Some(height);
        self
    }

    #[must_use]
    pub fn fill(mut self, ch: char) -> Self {
        self.fill = Some(ch);
        self
    }

    #[must_use]
    pub fn style(mut self, style: Style) -> Self {
        self.style = Some(style);
        self
    }
}

/// Leaf painting fixed lines of styled text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Text {
    pub lines: Vec<Line>,
    pub width: Option<u16>,
    pub height: Option<u16>,
}

impl Text {
    pub fn new(lines: impl IntoIterator<Item = Line>) -> Self {
        Self {
            lines: lines.into_iter().collect(),
            width: None,
            height: None,
        }
    }

    /// Unstyled text, one line per `\n`-separated row.
    pub fn raw(text: &str) -> Self {
        Self::new(text.split('\n').map(Line::raw))
    }

    #[must_use]
    pub fn width(mut self, width: u16) -> Self {
        self.width = Some(width);
        self
    }

    #[must_use]
    pub fn height(mut self, height: u16) -> Self {
        self.height = Some(height);
        self
    }

    /// Extent of the text: longest line by line count.
    pub fn natural_size(&self) -> (usize, usize) {
        let width = self.lines.iter().map(Line::width).max().unwrap_or(0);
        (width, self.lines.len())
    }
}

/// Data-driven leaf whose lines come from a renderer closure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataBox {
    pub renderer: Renderer,
    pub depends_on: Vec<String>,
    pub width: Option<u16>,
    pub height: Option<u16>,
}

impl DataBox {
    pub fn new(renderer: impl Fn(SizeBox, &ScopeView<'_>) -> Vec<Line> + 'static) -> Self {
        Self {
            renderer: Renderer::new(renderer),
            depends_on: Vec::new(),
            width: None,
            height: None,
        }
    }

    /// Repaint whenever one of these scope variables changes.
    #[must_use]
    pub fn depends_on<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.depends_on = names.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn width(mut self, width: u16) -> Self {
        self.width = Some(width);
        self
    }

    #[must_use]
    pub fn height(mut self, height: u16) -> Self {
        self.height = Some(height);
        self
    }
}

/// Insets its child.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Padding {
    pub sides: Sides,
    pub child: Box<Widget>,
}

impl Padding {
    pub fn new(sides: impl Into<Sides>, child: impl Into<Widget>) -> Self {
        Self {
            sides: sides.into(),
            child: Box::new(child.into()),
        }
    }
}

/// Lays children out one after another along an axis.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Flex {
    pub axis: Axis,
    pub children: Vec<Widget>,
}

impl Flex {
    pub fn new(axis: Axis, children: impl IntoIterator<Item = Widget>) -> Self {
        Self {
            axis,
            children: children.into_iter().collect(),
        }
    }

    /// Left to right.
    pub fn row(children: impl IntoIterator<Item = Widget>) -> Self {
        Self::new(Axis::Horizontal, children)
    }

    /// Top to bottom.
    pub fn column(children: impl IntoIterator<Item = Widget>) -> Self {
        Self::new(Axis::Vertical, children)
    }
}

/// Paints every child at the origin, later children on top.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Stack {
    pub children: Vec<Widget>,
}

impl Stack {
    pub fn new(children: impl IntoIterator<Item = Widget>) -> Self {
        Self {
            children: children.into_iter().collect(),
        }
    }
}

/// Places its child at an offset; negative offsets anchor from the far
/// edge the way [`Canvas::overlay`](tessel_render::Canvas::overlay) does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Positioned {
    pub x: i32,
    pub y: i32,
    pub child: Box<Widget>,
}

impl Positioned {
    pub fn new(x: i32, y: i32, child: impl Into<Widget>) -> Self {
        Self {
            x,
            y,
            child: Box::new(child.into()),
        }
    }
}

/// Reactive composite whose single child is rebuilt when a dependency
/// changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Builder {
    pub depends_on: Vec<String>,
    pub build: BuildFn,
}

impl Builder {
    pub fn new<I, S>(depends_on: I, build: impl Fn(&ScopeView<'_>) -> Widget + 'static) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            depends_on: depends_on.into_iter().map(Into::into).collect(),
            build: BuildFn::new(build),
        }
    }
}

/// Concrete widget configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetKind {
    SizedBox(SizedBox),
    Text(Text),
    DataBox(DataBox),
    Padding(Padding),
    Flex(Flex),
    Stack(Stack),
    Positioned(Positioned),
    Builder(Builder),
}

/// Tag of a [`WidgetKind`], shared by the widget, its element and its
/// render object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    SizedBox,
    Text,
    DataBox,
    Padding,
    Flex,
    Stack,
    Positioned,
    Builder,
}

impl Kind {
    pub const fn name(self) -> &'static str {
        match self {
            Self::SizedBox => "sized_box",
            Self::Text => "text",
            Self::DataBox => "data_box",
            Self::Padding => "padding",
            Self::Flex => "flex",
            Self::Stack => "stack",
            Self::Positioned => "positioned",
            Self::Builder => "builder",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl WidgetKind {
    pub fn kind(&self) -> Kind {
        match self {
            Self::SizedBox(_) => Kind::SizedBox,
            Self::Text(_) => Kind::Text,
            Self::DataBox(_) => Kind::DataBox,
            Self::Padding(_) => Kind::Padding,
            Self::Flex(_) => Kind::Flex,
            Self::Stack(_) => Kind::Stack,
            Self::Positioned(_) => Kind::Positioned,
            Self::Builder(_) => Kind::Builder,
        }
    }
}

/// An immutable, comparable UI description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Widget {
    key: Option<Key>,
    variables: Vec<(String, Value)>,
    handler: Option<KeyHandler>,
    config: WidgetKind,
}

impl Widget {
    pub fn new(config: WidgetKind) -> Self {
        Self {
            key: None,
            variables: Vec::new(),
            handler: None,
            config,
        }
    }

    /// Attach an identity key.
    #[must_use]
    pub fn with_key(mut self, key: impl Into<Key>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Declare a local scope variable for this element's subtree.
    #[must_use]
    pub fn with_var(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        let name = name.into();
        let value = value.into();
        match self.variables.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.variables.push((name, value)),
        }
        self
    }

    /// Attach a key handler, making the element focusable.
    #[must_use]
    pub fn on_key(
        mut self,
        handler: impl Fn(&KeyEvent, &mut ScopeCtx<'_>) -> EventOutcome + 'static,
    ) -> Self {
        self.handler = Some(KeyHandler::new(handler));
        self
    }

    /// A data box drawing a rounded border over its whole area.
    pub fn rounded_frame() -> Self {
        DataBox::new(|size, _| rounded_frame_lines(size))
            .depends_on(["width", "height"])
            .into()
    }

    pub fn key(&self) -> Option<&Key> {
        self.key.as_ref()
    }

    pub fn variables(&self) -> &[(String, Value)] {
        &self.variables
    }

    pub fn handler(&self) -> Option<&KeyHandler> {
        self.handler.as_ref()
    }

    pub fn config(&self) -> &WidgetKind {
        &self.config
    }

    pub fn kind(&self) -> Kind {
        self.config.kind()
    }

    /// Children declared directly by this widget. Builders declare none;
    /// their child comes from the build closure.
    pub fn declared_children(&self) -> &[Widget] {
        match &self.config {
            WidgetKind::Padding(p) => std::slice::from_ref(&*p.child),
            WidgetKind::Positioned(p) => std::slice::from_ref(&*p.child),
            WidgetKind::Flex(f) => &f.children,
            WidgetKind::Stack(s) => &s.children,
            WidgetKind::SizedBox(_)
            | WidgetKind::Text(_)
            | WidgetKind::DataBox(_)
            | WidgetKind::Builder(_) => &[],
        }
    }

    /// Whether an element showing `self` may switch to `other` in place.
    ///
    /// Same kind, and equal keys (both absent counts as equal). Positional
    /// matching of unkeyed children happens in the reconciler.
    pub fn can_update(&self, other: &Widget) -> bool {
        (crate::render_object::behavior(self.kind()).can_update)(self, other)
    }
}

macro_rules! impl_into_widget {
    ($($ty:ident),*) => {
        $(
            impl From<$ty> for WidgetKind {
                fn from(config: $ty) -> Self {
                    Self::$ty(config)
                }
            }

            impl From<$ty> for Widget {
                fn from(config: $ty) -> Self {
                    Self::new(WidgetKind::$ty(config))
                }
            }
        )*
    };
}

impl_into_widget!(SizedBox, Text, DataBox, Padding, Flex, Stack, Positioned, Builder);

impl From<WidgetKind> for Widget {
    fn from(config: WidgetKind) -> Self {
        Self::new(config)
    }
}

fn rounded_frame_lines(size: SizeBox) -> Vec<Line> {
    let (w, h) = (usize::from(size.width()), usize::from(size.height()));
    let row = |left: char, fill: char, right: char| -> Line {
        let text: String = match w {
            1 => fill.to_string(),
            _ => std::iter::once(left)
                .chain(std::iter::repeat_n(fill, w - 2))
                .chain(std::iter::once(right))
                .collect(),
        };
        Line::raw(text)
    };
    match h {
        1 => vec![row('─', '─', '─')],
        _ => {
            let mut lines = Vec::with_capacity(h);
            lines.push(row('╭', '─', '╮'));
            lines.extend((0..h - 2).map(|_| row('│', ' ', '│')));
            lines.push(row('╰', '─', '╯'));
            lines
        }
    }
}

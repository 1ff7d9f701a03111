#![forbid(unsafe_code)]

//! Render objects and the per-kind layout/paint dispatch table.
//!
//! Every mounted element owns exactly one [`RenderObject`] of its widget's
//! [`Kind`]. The render object keeps the state that must survive across
//! frames: the last constraints and resolved size, the offset inside the
//! parent, and the last painted canvas.
//!
//! Behavior is looked up per kind in a static table of function pointers
//! ([`behavior`]) instead of through trait objects, so the set of kinds stays
//! closed and every match over it is exhaustive.
//!
//! # Layout rules
//!
//! | kind         | child constraints                     | own size                                  |
//! |--------------|---------------------------------------|-------------------------------------------|
//! | `SizedBox`   | -                                     | fixed, else scope variable, else maximum  |
//! | `Text`       | -                                     | fixed, else text extent                   |
//! | `DataBox`    | -                                     | fixed, else scope variable, else maximum  |
//! | `Padding`    | constraints minus insets              | child plus insets                         |
//! | `Flex`       | remaining space along the axis        | sum along the axis, maximum across it     |
//! | `Stack`      | full constraints                      | maximum of the children                   |
//! | `Positioned` | space left after the offset           | full constraints                          |
//! | `Builder`    | full constraints                      | the child's size                          |
//!
//! Every resolved size is clamped to the constraints. A child that gets no
//! space collapses: it is neither laid out nor painted.

use slotmap::new_key_type;
use tessel_core::geometry::{Position, SizeBox, Sides};
use tessel_render::{Canvas, Cell, Line};

use crate::element::ElementId;
use crate::error::RenderError;
use crate::scope::Value;
use crate::tree::Tree;
use crate::widget::{Kind, Widget, WidgetKind};

new_key_type! {
    /// Handle to a render object in a [`Tree`].
    pub struct RenderObjectId;
}

/// Per-element layout and paint state.
#[derive(Debug)]
pub struct RenderObject {
    element: ElementId,
    kind: Kind,
    pub(crate) constraints: Option<SizeBox>,
    pub(crate) size: Option<SizeBox>,
    pub(crate) offset: Position,
    pub(crate) cache: Option<Canvas>,
    pub(crate) needs_paint: bool,
    pub(crate) paint_count: u64,
}

impl RenderObject {
    pub(crate) fn new(element: ElementId, kind: Kind) -> Self {
        Self {
            element,
            kind,
            constraints: None,
            size: None,
            offset: Position::ORIGIN,
            cache: None,
            needs_paint: true,
            paint_count: 0,
        }
    }

    /// Absorb a new widget of the same kind.
    pub(crate) fn update(&mut self, widget: &Widget) {
        debug_assert_eq!(widget.kind(), self.kind);
        self.needs_paint = true;
    }

    /// The owning element.
    pub fn element(&self) -> ElementId {
        self.element
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// Constraints from the last layout pass.
    pub fn constraints(&self) -> Option<SizeBox> {
        self.constraints
    }

    /// Size from the last layout pass; `None` when collapsed or never laid
    /// out.
    pub fn size(&self) -> Option<SizeBox> {
        self.size
    }

    /// Offset inside the parent's canvas.
    pub fn offset(&self) -> Position {
        self.offset
    }

    /// Last painted canvas.
    pub fn canvas(&self) -> Option<&Canvas> {
        self.cache.as_ref()
    }

    pub fn needs_paint(&self) -> bool {
        self.needs_paint
    }

    /// How many times this render object has painted a fresh canvas.
    pub fn paint_count(&self) -> u64 {
        self.paint_count
    }
}

pub(crate) type LayoutFn = fn(&mut Tree, ElementId, SizeBox) -> SizeBox;
pub(crate) type PaintFn = fn(&Tree, ElementId, SizeBox) -> Result<Canvas, RenderError>;

/// Dispatch entry for one kind.
pub(crate) struct Behavior {
    pub(crate) layout: LayoutFn,
    pub(crate) paint: PaintFn,
    /// Extra repaint trigger beyond size, widget and child changes.
    pub(crate) stale: fn(&Tree, ElementId) -> bool,
    pub(crate) can_update: fn(&Widget, &Widget) -> bool,
}

static SIZED_BOX: Behavior = Behavior {
    layout: layout_sized_box,
    paint: paint_sized_box,
    stale: never_stale,
    can_update: same_kind_and_key,
};

static TEXT: Behavior = Behavior {
    layout: layout_text,
    paint: paint_text,
    stale: never_stale,
    can_update: same_kind_and_key,
};

static DATA_BOX: Behavior = Behavior {
    layout: layout_data_box,
    paint: paint_data_box,
    stale: data_box_stale,
    can_update: same_kind_and_key,
};

static PADDING: Behavior = Behavior {
    layout: layout_padding,
    paint: compose_children,
    stale: never_stale,
    can_update: same_kind_and_key,
};

static FLEX: Behavior = Behavior {
    layout: layout_flex,
    paint: compose_children,
    stale: never_stale,
    can_update: same_kind_and_key,
};

static STACK: Behavior = Behavior {
    layout: layout_stack,
    paint: compose_children,
    stale: never_stale,
    can_update: same_kind_and_key,
};

static POSITIONED: Behavior = Behavior {
    layout: layout_positioned,
    paint: compose_children,
    stale: never_stale,
    can_update: same_kind_and_key,
};

static BUILDER: Behavior = Behavior {
    layout: layout_builder,
    paint: compose_children,
    stale: never_stale,
    can_update: same_kind_and_key,
};

pub(crate) fn behavior(kind: Kind) -> &'static Behavior {
    match kind {
        Kind::SizedBox => &SIZED_BOX,
        Kind::Text => &TEXT,
        Kind::DataBox => &DATA_BOX,
        Kind::Padding => &PADDING,
        Kind::Flex => &FLEX,
        Kind::Stack => &STACK,
        Kind::Positioned => &POSITIONED,
        Kind::Builder => &BUILDER,
    }
}

fn same_kind_and_key(old: &Widget, new: &Widget) -> bool {
    old.kind() == new.kind() && old.key() == new.key()
}

fn never_stale(_: &Tree, _: ElementId) -> bool {
    false
}

// =============================================================================
// Layout helpers
// =============================================================================

fn config(tree: &Tree, id: ElementId) -> Option<&WidgetKind> {
    tree.elements.get(id).map(|e| e.widget.config())
}

fn children(tree: &Tree, id: ElementId) -> Vec<ElementId> {
    tree.elements
        .get(id)
        .map(|e| e.children.clone())
        .unwrap_or_default()
}

fn saturate(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}

/// Lay out `child` and record where the parent will paint it.
fn layout_child(tree: &mut Tree, child: ElementId, constraints: SizeBox, offset: Position) -> SizeBox {
    let size = tree.layout_node(child, constraints);
    if let Some(ro) = tree.render_object_mut(child) {
        ro.offset = offset;
    }
    size
}

/// Mark `child` as having no space this frame.
fn collapse(tree: &mut Tree, child: ElementId) {
    if let Some(ro) = tree.render_object_mut(child) {
        ro.size = None;
        ro.constraints = None;
    }
}

/// Resolve each dimension from the fixed value, else the scope variable,
/// else the constraint, then clamp to the constraint.
fn resolve_box(
    tree: &Tree,
    id: ElementId,
    width: Option<u16>,
    height: Option<u16>,
    constraints: SizeBox,
) -> SizeBox {
    let scope = tree.elements.get(id).and_then(|e| e.scope);
    let from_scope = |name: &str| {
        scope
            .and_then(|s| tree.scopes.get(s, name))
            .and_then(Value::as_u16)
    };
    let w = width
        .or_else(|| from_scope(&tree.config.width_var))
        .unwrap_or(constraints.width())
        .clamp(1, constraints.width());
    let h = height
        .or_else(|| from_scope(&tree.config.height_var))
        .unwrap_or(constraints.height())
        .clamp(1, constraints.height());
    SizeBox::new(w, h).unwrap_or(constraints)
}

// =============================================================================
// Layout per kind
// =============================================================================

fn layout_sized_box(tree: &mut Tree, id: ElementId, constraints: SizeBox) -> SizeBox {
    let (w, h) = match config(tree, id) {
        Some(WidgetKind::SizedBox(b)) => (b.width, b.height),
        _ => (None, None),
    };
    resolve_box(tree, id, w, h, constraints)
}

fn layout_text(tree: &mut Tree, id: ElementId, constraints: SizeBox) -> SizeBox {
    let (w, h) = match config(tree, id) {
        Some(WidgetKind::Text(t)) => {
            let (nw, nh) = t.natural_size();
            (
                t.width.unwrap_or(saturate(nw)),
                t.height.unwrap_or(saturate(nh)),
            )
        }
        _ => (1, 1),
    };
    let w = w.clamp(1, constraints.width());
    let h = h.clamp(1, constraints.height());
    SizeBox::new(w, h).unwrap_or(constraints)
}

fn layout_data_box(tree: &mut Tree, id: ElementId, constraints: SizeBox) -> SizeBox {
    let (w, h) = match config(tree, id) {
        Some(WidgetKind::DataBox(d)) => (d.width, d.height),
        _ => (None, None),
    };
    resolve_box(tree, id, w, h, constraints)
}

fn layout_padding(tree: &mut Tree, id: ElementId, constraints: SizeBox) -> SizeBox {
    let sides = match config(tree, id) {
        Some(WidgetKind::Padding(p)) => p.sides,
        _ => Sides::default(),
    };
    let Some(child) = children(tree, id).first().copied() else {
        return constraints;
    };
    match constraints.deflate(sides) {
        Some(inner) => {
            let size = layout_child(tree, child, inner, Position::new(sides.left, sides.top));
            size.inflate(sides).min(constraints)
        }
        None => {
            collapse(tree, child);
            constraints
        }
    }
}

fn layout_flex(tree: &mut Tree, id: ElementId, constraints: SizeBox) -> SizeBox {
    let axis = match config(tree, id) {
        Some(WidgetKind::Flex(f)) => f.axis,
        _ => Default::default(),
    };
    let total = axis.main(constraints);
    let cross = axis.cross(constraints);
    let mut used: u16 = 0;
    let mut extent: u16 = 0;
    for child in children(tree, id) {
        match axis.compose(total - used, cross) {
            Some(available) => {
                let size = layout_child(tree, child, available, axis.position(used, 0));
                used += axis.main(size);
                extent = extent.max(axis.cross(size));
            }
            None => collapse(tree, child),
        }
    }
    axis.compose(used, extent).unwrap_or(constraints)
}

fn layout_stack(tree: &mut Tree, id: ElementId, constraints: SizeBox) -> SizeBox {
    let mut extent: Option<SizeBox> = None;
    for child in children(tree, id) {
        let size = layout_child(tree, child, constraints, Position::ORIGIN);
        extent = Some(match extent {
            Some(acc) => SizeBox::new(
                acc.width().max(size.width()),
                acc.height().max(size.height()),
            )
            .unwrap_or(acc),
            None => size,
        });
    }
    extent.unwrap_or(constraints)
}

fn layout_positioned(tree: &mut Tree, id: ElementId, constraints: SizeBox) -> SizeBox {
    let (x, y) = match config(tree, id) {
        Some(WidgetKind::Positioned(p)) => (p.x, p.y),
        _ => (0, 0),
    };
    let Some(child) = children(tree, id).first().copied() else {
        return constraints;
    };
    // Space that keeps the child inside once the anchor is resolved.
    let available = |outer: u16, at: i32| {
        let outer = i32::from(outer);
        let space = if at >= 0 { outer - at } else { outer + at + 1 };
        u16::try_from(space).ok()
    };
    let inner = available(constraints.width(), x)
        .zip(available(constraints.height(), y))
        .and_then(|(w, h)| SizeBox::new(w, h));
    match inner {
        Some(inner) => {
            let size = tree.layout_node(child, inner);
            let ox = Canvas::resolve_anchor(constraints.width(), size.width(), x);
            let oy = Canvas::resolve_anchor(constraints.height(), size.height(), y);
            let offset = Position::new(
                u16::try_from(ox).unwrap_or(0),
                u16::try_from(oy).unwrap_or(0),
            );
            if let Some(ro) = tree.render_object_mut(child) {
                ro.offset = offset;
            }
        }
        None => collapse(tree, child),
    }
    constraints
}

fn layout_builder(tree: &mut Tree, id: ElementId, constraints: SizeBox) -> SizeBox {
    match children(tree, id).first().copied() {
        Some(child) => layout_child(tree, child, constraints, Position::ORIGIN),
        None => constraints,
    }
}

// =============================================================================
// Paint per kind
// =============================================================================

fn paint_sized_box(tree: &Tree, id: ElementId, size: SizeBox) -> Result<Canvas, RenderError> {
    let cell = match config(tree, id) {
        Some(WidgetKind::SizedBox(b)) => Cell {
            ch: b.fill.unwrap_or(' '),
            style: b.style.clone().filter(|s| !s.is_empty()),
        },
        _ => Cell::BLANK,
    };
    Ok(Canvas::filled(size, cell))
}

fn paint_text(tree: &Tree, id: ElementId, size: SizeBox) -> Result<Canvas, RenderError> {
    match config(tree, id) {
        Some(WidgetKind::Text(t)) => fit_lines(size, &t.lines),
        _ => Ok(Canvas::blank(size)),
    }
}

fn paint_data_box(tree: &Tree, id: ElementId, size: SizeBox) -> Result<Canvas, RenderError> {
    let element = tree.elements.get(id);
    let renderer = match element.map(|e| e.widget.config()) {
        Some(WidgetKind::DataBox(d)) => &d.renderer,
        _ => return Ok(Canvas::blank(size)),
    };
    let Some(scope) = element.and_then(|e| e.scope) else {
        return Ok(Canvas::blank(size));
    };
    let lines = renderer.call(size, &tree.scopes.view(scope));
    fit_lines(size, &lines)
}

fn data_box_stale(tree: &Tree, id: ElementId) -> bool {
    let Some(element) = tree.elements.get(id) else {
        return false;
    };
    let (Some(scope), WidgetKind::DataBox(d)) = (element.scope, element.widget.config()) else {
        return false;
    };
    d.depends_on
        .iter()
        .any(|name| tree.scopes.is_changed(scope, name))
}

/// Paint lines into a canvas of exactly `size`. Lines that do not fit are a
/// geometry error, never clipped.
fn fit_lines(size: SizeBox, lines: &[Line]) -> Result<Canvas, RenderError> {
    let canvas = Canvas::blank(size);
    if lines.iter().all(|l| l.width() == 0) {
        return Ok(canvas);
    }
    let text = Canvas::from_lines(lines)?;
    Ok(canvas.overlay(&text, 0, 0)?)
}

/// Paint every laid-out child's canvas at its offset.
fn compose_children(tree: &Tree, id: ElementId, size: SizeBox) -> Result<Canvas, RenderError> {
    let mut canvas = Canvas::blank(size);
    let Some(element) = tree.elements.get(id) else {
        return Ok(canvas);
    };
    for &child in &element.children {
        let Some(ro) = tree.render_object(child) else {
            continue;
        };
        let (Some(_), Some(painted)) = (ro.size, ro.cache.as_ref()) else {
            continue;
        };
        canvas = canvas.overlay(painted, i32::from(ro.offset.x), i32::from(ro.offset.y))?;
    }
    Ok(canvas)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessel_render::{CanvasError, StyledText};
    use tessel_style::Style;

    #[test]
    fn every_kind_has_an_entry() {
        for kind in [
            Kind::SizedBox,
            Kind::Text,
            Kind::DataBox,
            Kind::Padding,
            Kind::Flex,
            Kind::Stack,
            Kind::Positioned,
            Kind::Builder,
        ] {
            let entry = behavior(kind);
            let w: Widget = crate::widget::SizedBox::new().into();
            assert!((entry.can_update)(&w, &w));
        }
    }

    #[test]
    fn fit_lines_pads_to_size() {
        let size = SizeBox::new(4, 2).unwrap();
        let canvas = fit_lines(size, &[Line::styled("ab", Style::BOLD)]).unwrap();
        assert_eq!(canvas.size(), size);
        assert_eq!(canvas.row_text(0), "ab  ");
        assert_eq!(canvas.row_text(1), "    ");
        assert_eq!(canvas.get(1, 0).unwrap().style, Some(Style::BOLD));
    }

    #[test]
    fn fit_lines_rejects_overflow() {
        let size = SizeBox::new(2, 1).unwrap();
        let err = fit_lines(size, &[Line::from(vec![StyledText::raw("abc")])]).unwrap_err();
        assert!(matches!(
            err,
            RenderError::Geometry(CanvasError::OutOfBounds { width: 3, .. })
        ));
    }

    #[test]
    fn fit_lines_of_empty_text_is_blank() {
        let size = SizeBox::new(3, 1).unwrap();
        let canvas = fit_lines(size, &[Line::default()]).unwrap();
        assert!(canvas.cells().iter().all(Cell::is_blank));
    }

    #[test]
    fn new_render_object_needs_paint() {
        let ro = RenderObject::new(ElementId::default(), Kind::Text);
        assert!(ro.needs_paint());
        assert_eq!(ro.size(), None);
        assert_eq!(ro.offset(), Position::ORIGIN);
        assert_eq!(ro.paint_count(), 0);
    }
}

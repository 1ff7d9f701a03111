#![forbid(unsafe_code)]

//! The element tree: reconciliation, focus, and the frame driver.
//!
//! [`Tree`] owns three arenas (elements, render objects, scopes) and runs the
//! frame cycle the driver asks for:
//!
//! 1. between frames: [`Tree::set_root`] / [`Tree::update`] reconcile new
//!    widgets into the existing elements, and [`Tree::dispatch_key`] runs
//!    key handlers that may update scope variables;
//! 2. [`Tree::render`]: publish the viewport, rebuild builders whose
//!    dependencies changed, lay out from the root, paint bottom-up, reset
//!    change flags.
//!
//! # Reconciliation
//!
//! An element can switch to a new widget in place when
//! [`Widget::can_update`] holds (same kind, equal keys); otherwise it is
//! unmounted and a fresh element is mounted at the same slot. Children are
//! matched by key first; unkeyed widgets match unkeyed children in order.
//! Unmatched old children are unmounted, unmatched widgets are mounted, and
//! the children list ends up in the new widget's declared order.

use std::collections::{HashMap, HashSet, VecDeque};

use slotmap::SlotMap;
use tessel_core::event::{EventOutcome, KeyEvent};
use tessel_core::geometry::{Position, SizeBox};
use tessel_render::Canvas;

use crate::config::RenderConfig;
use crate::element::{Element, ElementId};
use crate::error::RenderError;
use crate::render_object::{RenderObject, RenderObjectId, behavior};
use crate::scope::{ScopeCtx, ScopeId, Scopes, Value};
use crate::widget::{Key, Kind, Widget, WidgetKind};

/// Where a freshly mounted element goes in its parent's children list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Append,
    At(usize),
    /// The caller rebuilds the parent's list itself.
    Detached,
}

/// Persistent element tree plus its frame driver.
#[derive(Debug)]
pub struct Tree {
    pub(crate) elements: SlotMap<ElementId, Element>,
    pub(crate) render_objects: SlotMap<RenderObjectId, RenderObject>,
    pub(crate) scopes: Scopes,
    pub(crate) config: RenderConfig,
    root: Option<ElementId>,
    focus: Option<ElementId>,
    last_frame: Option<Canvas>,
    repaint_count: usize,
    pending_repaints: usize,
}

impl Default for Tree {
    fn default() -> Self {
        Self::new(RenderConfig::default())
    }
}

impl Tree {
    pub fn new(config: RenderConfig) -> Self {
        Self {
            elements: SlotMap::with_key(),
            render_objects: SlotMap::with_key(),
            scopes: Scopes::new(),
            config,
            root: None,
            focus: None,
            last_frame: None,
            repaint_count: 0,
            pending_repaints: 0,
        }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn scopes(&self) -> &Scopes {
        &self.scopes
    }

    pub fn scopes_mut(&mut self) -> &mut Scopes {
        &mut self.scopes
    }

    // =========================================================================
    // Element lifecycle
    // =========================================================================

    /// Create an unmounted element bound to `widget`.
    pub fn create_element(&mut self, widget: Widget) -> ElementId {
        self.elements.insert(Element::new(widget))
    }

    /// Attach an unmounted element under `parent` (or as a detached root when
    /// `None`), giving it a scope and render object and mounting its
    /// children. Returns `false` if `id` is unknown or already mounted, or
    /// `parent` is not mounted.
    pub fn mount(&mut self, id: ElementId, parent: Option<ElementId>) -> bool {
        self.mount_at(id, parent, Slot::Append)
    }

    fn mount_at(&mut self, id: ElementId, parent: Option<ElementId>, slot: Slot) -> bool {
        let Some(element) = self.elements.get(id) else {
            return false;
        };
        if element.is_mounted() || parent.is_some_and(|p| !self.is_mounted(p)) {
            return false;
        }
        let kind = element.kind();
        let variables = element.widget.variables().to_vec();

        let parent_scope = parent.and_then(|p| self.scope_of(p));
        let scope = self.scopes.create(parent_scope);
        for (name, value) in variables {
            self.scopes.override_value(scope, &name, value);
        }
        let render_object = self.render_objects.insert(RenderObject::new(id, kind));
        if let Some(element) = self.elements.get_mut(id) {
            element.parent = parent;
            element.scope = Some(scope);
            element.render_object = Some(render_object);
        }
        if let Some(siblings) = parent
            .and_then(|p| self.elements.get_mut(p))
            .map(|p| &mut p.children)
        {
            match slot {
                Slot::Append => siblings.push(id),
                Slot::At(index) => siblings.insert(index.min(siblings.len()), id),
                Slot::Detached => {}
            }
        }
        tessel_core::debug!(element = ?id, kind = kind.name(), "mounted");

        let declared = match kind {
            Kind::Builder => self.build(id).into_iter().collect(),
            _ => self
                .elements
                .get(id)
                .map(|e| e.widget.declared_children().to_vec())
                .unwrap_or_default(),
        };
        for widget in declared {
            let child = self.create_element(widget);
            self.mount_at(child, Some(id), Slot::Append);
        }
        true
    }

    /// Run a builder element's build closure against its scope.
    fn build(&self, id: ElementId) -> Option<Widget> {
        let element = self.elements.get(id)?;
        let scope = element.scope?;
        match element.widget.config() {
            WidgetKind::Builder(b) => Some(b.build.call(&self.scopes.view(scope))),
            _ => None,
        }
    }

    /// Switch a mounted element to `widget`.
    ///
    /// Returns the same id when the element was updated in place, or the id
    /// of the replacement mounted at the same slot when the widgets are
    /// incompatible. Returns `None` if `id` is not mounted.
    pub fn update(&mut self, id: ElementId, widget: Widget) -> Option<ElementId> {
        if !self.is_mounted(id) {
            return None;
        }
        let slot = match self.parent(id) {
            Some(parent) => self
                .children(parent)
                .iter()
                .position(|&c| c == id)
                .map_or(Slot::Append, Slot::At),
            None => Slot::Detached,
        };
        Some(self.update_at(id, widget, slot))
    }

    fn update_at(&mut self, id: ElementId, widget: Widget, slot: Slot) -> ElementId {
        let Some(element) = self.elements.get_mut(id) else {
            return id;
        };

        if !element.widget.can_update(&widget) {
            let parent = element.parent;
            let was_root = self.root == Some(id);
            self.unmount(id);
            let replacement = self.create_element(widget);
            self.mount_at(replacement, parent, slot);
            if was_root {
                self.root = Some(replacement);
            }
            tessel_core::debug!(old = ?id, new = ?replacement, "replaced element");
            return replacement;
        }

        if element.widget == widget {
            return id;
        }
        let old = std::mem::replace(&mut element.widget, widget.clone());
        let scope = element.scope;
        if let Some(ro) = element
            .render_object
            .and_then(|ro| self.render_objects.get_mut(ro))
        {
            ro.update(&widget);
        }

        if let Some(scope) = scope {
            for (name, value) in widget.variables() {
                self.scopes.override_value(scope, name, value.clone());
            }
            for (name, _) in old.variables() {
                if !widget.variables().iter().any(|(n, _)| n == name) {
                    self.scopes.remove(scope, name);
                }
            }
        }

        let next = match widget.kind() {
            Kind::Builder => self.build(id).into_iter().collect(),
            _ => widget.declared_children().to_vec(),
        };
        self.reconcile_children(id, next);
        id
    }

    /// Match `widgets` against the current children of `id`.
    fn reconcile_children(&mut self, id: ElementId, widgets: Vec<Widget>) {
        let Some(old) = self
            .elements
            .get_mut(id)
            .map(|e| std::mem::take(&mut e.children))
        else {
            return;
        };

        let mut keyed: HashMap<Key, ElementId> = HashMap::new();
        let mut unkeyed: VecDeque<ElementId> = VecDeque::new();
        for &child in &old {
            match self.elements.get(child).and_then(|e| e.key().cloned()) {
                Some(key) => {
                    keyed.entry(key).or_insert(child);
                }
                None => unkeyed.push_back(child),
            }
        }

        let mut claimed: HashSet<ElementId> = HashSet::new();
        let mut next = Vec::with_capacity(widgets.len());
        for widget in widgets {
            let matched = match widget.key() {
                Some(key) => keyed.remove(key),
                None => unkeyed.pop_front(),
            };
            let child = match matched {
                Some(existing) => {
                    claimed.insert(existing);
                    self.update_at(existing, widget, Slot::Detached)
                }
                None => {
                    let fresh = self.create_element(widget);
                    self.mount_at(fresh, Some(id), Slot::Detached);
                    fresh
                }
            };
            next.push(child);
        }

        for &child in &old {
            if !claimed.contains(&child) {
                self.unmount(child);
            }
        }

        let changed = old != next;
        if let Some(element) = self.elements.get_mut(id) {
            element.children = next;
        }
        if changed && let Some(ro) = self.render_object_mut(id) {
            ro.needs_paint = true;
        }
    }

    /// Detach `id` from its parent and release it and its whole subtree,
    /// children first. Unknown ids are ignored.
    pub fn unmount(&mut self, id: ElementId) {
        let Some(parent) = self.elements.get(id).map(|e| e.parent) else {
            return;
        };
        if let Some(siblings) = parent
            .and_then(|p| self.elements.get_mut(p))
            .map(|p| &mut p.children)
        {
            siblings.retain(|&c| c != id);
        }
        if let Some(ro) = parent.and_then(|p| self.render_object_mut(p)) {
            ro.needs_paint = true;
        }
        self.release_subtree(id);
    }

    fn release_subtree(&mut self, id: ElementId) {
        let Some(element) = self.elements.get(id) else {
            return;
        };
        for child in element.children.clone() {
            self.release_subtree(child);
        }
        let Some(element) = self.elements.remove(id) else {
            return;
        };
        if let Some(scope) = element.scope {
            self.scopes.release(scope);
        }
        if let Some(ro) = element.render_object {
            self.render_objects.remove(ro);
        }
        if self.focus == Some(id) {
            self.focus = None;
        }
        if self.root == Some(id) {
            self.root = None;
        }
        tessel_core::debug!(element = ?id, kind = element.kind().name(), "unmounted");
    }

    /// Mount `widget` as the root, or reconcile it against the current root.
    pub fn set_root(&mut self, widget: Widget) -> ElementId {
        if let Some(root) = self.root.filter(|&r| self.is_mounted(r)) {
            return self.update_at(root, widget, Slot::Detached);
        }
        let root = self.create_element(widget);
        self.mount_at(root, None, Slot::Detached);
        self.root = Some(root);
        root
    }

    // =========================================================================
    // Introspection
    // =========================================================================

    pub fn root(&self) -> Option<ElementId> {
        self.root
    }

    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(id)
    }

    /// Children of `id` in paint order; empty for unknown ids.
    pub fn children(&self, id: ElementId) -> &[ElementId] {
        self.elements.get(id).map_or(&[], |e| &e.children)
    }

    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.elements.get(id).and_then(|e| e.parent)
    }

    pub fn render_object_of(&self, id: ElementId) -> Option<RenderObjectId> {
        self.elements.get(id).and_then(|e| e.render_object)
    }

    /// The render object bound to element `id`.
    pub fn render_object(&self, id: ElementId) -> Option<&RenderObject> {
        self.render_object_of(id)
            .and_then(|ro| self.render_objects.get(ro))
    }

    pub(crate) fn render_object_mut(&mut self, id: ElementId) -> Option<&mut RenderObject> {
        let ro = self.render_object_of(id)?;
        self.render_objects.get_mut(ro)
    }

    pub fn scope_of(&self, id: ElementId) -> Option<ScopeId> {
        self.elements.get(id).and_then(|e| e.scope)
    }

    pub fn is_mounted(&self, id: ElementId) -> bool {
        self.elements.get(id).is_some_and(Element::is_mounted)
    }

    /// Number of mounted elements.
    pub fn len(&self) -> usize {
        self.elements.values().filter(|e| e.is_mounted()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `id` and its descendants in pre-order.
    pub fn descendants(&self, id: ElementId) -> Vec<ElementId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            let Some(element) = self.elements.get(next) else {
                continue;
            };
            out.push(next);
            stack.extend(element.children.iter().rev());
        }
        out
    }

    /// Read a variable through the scope chain of element `id`.
    pub fn get_var(&self, id: ElementId, name: &str) -> Option<&Value> {
        self.scope_of(id).and_then(|s| self.scopes.get(s, name))
    }

    /// [`Scopes::update`] from element `id`'s scope.
    pub fn update_var(
        &mut self,
        id: ElementId,
        name: &str,
        value: impl Into<Value>,
    ) -> Option<ScopeId> {
        let scope = self.scope_of(id)?;
        self.scopes.update(scope, name, value)
    }

    /// The last successfully rendered frame.
    pub fn last_frame(&self) -> Option<&Canvas> {
        self.last_frame.as_ref()
    }

    /// Render objects that painted a fresh canvas in the last successful
    /// frame.
    pub fn last_repaint_count(&self) -> usize {
        self.repaint_count
    }

    // =========================================================================
    // Focus and key dispatch
    // =========================================================================

    /// Give focus to a mounted element. Returns `false` otherwise.
    pub fn set_focus(&mut self, id: ElementId) -> bool {
        if self.is_mounted(id) {
            self.focus = Some(id);
            true
        } else {
            false
        }
    }

    pub fn clear_focus(&mut self) {
        self.focus = None;
    }

    pub fn focused(&self) -> Option<ElementId> {
        self.focus
    }

    /// Elements with a key handler, in pre-order.
    pub fn focusable(&self) -> Vec<ElementId> {
        let Some(root) = self.root else {
            return Vec::new();
        };
        self.descendants(root)
            .into_iter()
            .filter(|&id| {
                self.elements
                    .get(id)
                    .is_some_and(|e| e.widget.handler().is_some())
            })
            .collect()
    }

    /// Move focus to the next focusable element, wrapping around.
    pub fn focus_next(&mut self) -> Option<ElementId> {
        let order = self.focusable();
        let first = *order.first()?;
        let next = self
            .focus
            .and_then(|f| order.iter().position(|&id| id == f))
            .map_or(first, |i| order[(i + 1) % order.len()]);
        self.focus = Some(next);
        Some(next)
    }

    /// Deliver a key event to the focused element, bubbling to ancestors
    /// until a handler reports it handled.
    pub fn dispatch_key(&mut self, event: &KeyEvent) -> EventOutcome {
        let mut current = self.focus;
        while let Some(id) = current {
            let Some(element) = self.elements.get(id) else {
                break;
            };
            current = element.parent;
            let (Some(handler), Some(scope)) = (element.widget.handler().cloned(), element.scope)
            else {
                continue;
            };
            let mut ctx = ScopeCtx::new(&mut self.scopes, scope);
            if handler.call(event, &mut ctx).is_handled() {
                tessel_core::trace!(element = ?id, ?event, "key handled");
                return EventOutcome::Handled;
            }
        }
        EventOutcome::Ignored
    }

    // =========================================================================
    // Frame
    // =========================================================================

    /// Lay out and paint one frame for a `width` x `height` viewport.
    ///
    /// On success every scope's change flags are reset and the frame is kept
    /// as [`last_frame`](Self::last_frame). On failure nothing is reset and
    /// the previous frame stays.
    ///
    /// # Errors
    ///
    /// [`RenderError::Viewport`] for a zero dimension, [`RenderError::NoRoot`]
    /// before [`set_root`](Self::set_root), [`RenderError::Geometry`] when a
    /// render object paints outside the space it was given.
    pub fn render(&mut self, width: u16, height: u16) -> Result<Canvas, RenderError> {
        let viewport = SizeBox::new(width, height).ok_or(RenderError::Viewport { width, height })?;
        let _span = tessel_core::debug_span!("frame", width, height).entered();
        match self.render_frame(viewport) {
            Ok(frame) => {
                self.scopes.reset_all();
                self.repaint_count = self.pending_repaints;
                self.last_frame = Some(frame.clone());
                tessel_core::debug!(
                    elements = self.elements.len(),
                    repainted = self.repaint_count,
                    "frame complete"
                );
                Ok(frame)
            }
            Err(err) => {
                tessel_core::error!(%err, "frame aborted");
                Err(err)
            }
        }
    }

    fn render_frame(&mut self, viewport: SizeBox) -> Result<Canvas, RenderError> {
        let root = self.root.ok_or(RenderError::NoRoot)?;
        if self.config.publish_viewport {
            self.publish_viewport(root, viewport);
        }
        self.rebuild_dirty_builders();
        let root = self.root.ok_or(RenderError::NoRoot)?;

        self.layout_node(root, viewport);
        self.pending_repaints = 0;
        self.paint_node(root)?;

        let frame = Canvas::blank(viewport);
        match self.render_object(root).and_then(RenderObject::canvas) {
            Some(painted) => Ok(frame.overlay(painted, 0, 0)?),
            None => Ok(frame),
        }
    }

    fn publish_viewport(&mut self, root: ElementId, viewport: SizeBox) {
        let Some(scope) = self.scope_of(root) else {
            return;
        };
        self.scopes
            .update(scope, &self.config.width_var, viewport.width());
        self.scopes
            .update(scope, &self.config.height_var, viewport.height());
    }

    /// Re-run builders whose dependencies changed, outermost first.
    fn rebuild_dirty_builders(&mut self) {
        let Some(root) = self.root else {
            return;
        };
        for id in self.descendants(root) {
            let Some(element) = self.elements.get(id) else {
                continue;
            };
            let (WidgetKind::Builder(builder), Some(scope)) = (element.widget.config(), element.scope)
            else {
                continue;
            };
            if !builder
                .depends_on
                .iter()
                .any(|name| self.scopes.is_changed(scope, name))
            {
                continue;
            }
            let built = builder.build.call(&self.scopes.view(scope));
            tessel_core::trace!(element = ?id, "rebuilding");
            self.reconcile_children(id, vec![built]);
        }
    }

    /// Lay out `id` under `constraints`, flagging it for repaint when its
    /// size or any child's placement changed.
    pub(crate) fn layout_node(&mut self, id: ElementId, constraints: SizeBox) -> SizeBox {
        let Some(kind) = self.elements.get(id).map(Element::kind) else {
            return constraints;
        };
        let before = self.child_geometry(id);
        let size = (behavior(kind).layout)(self, id, constraints);
        let after = self.child_geometry(id);
        if let Some(ro) = self.render_object_mut(id) {
            if before != after || ro.size != Some(size) {
                ro.needs_paint = true;
            }
            ro.constraints = Some(constraints);
            ro.size = Some(size);
        }
        size
    }

    fn child_geometry(&self, id: ElementId) -> Vec<(Option<SizeBox>, Position)> {
        self.children(id)
            .iter()
            .map(|&c| {
                self.render_object(c)
                    .map_or((None, Position::ORIGIN), |ro| (ro.size, ro.offset))
            })
            .collect()
    }

    /// Paint `id` and its subtree. Returns whether `id` painted a fresh
    /// canvas. A failure leaves the node flagged so the next frame retries.
    fn paint_node(&mut self, id: ElementId) -> Result<bool, RenderError> {
        let result = self.paint_subtree(id);
        if result.is_err()
            && let Some(ro) = self.render_object_mut(id)
        {
            ro.needs_paint = true;
        }
        result
    }

    fn paint_subtree(&mut self, id: ElementId) -> Result<bool, RenderError> {
        let Some(element) = self.elements.get(id) else {
            return Ok(false);
        };
        let kind = element.kind();
        let children = element.children.clone();
        let Some(size) = self.render_object(id).and_then(RenderObject::size) else {
            return Ok(false);
        };
        let _span = tessel_core::trace_span!("paint", kind = kind.name()).entered();

        let mut child_repainted = false;
        for child in children {
            child_repainted |= self.paint_node(child)?;
        }

        let entry = behavior(kind);
        let dirty = match self.render_object(id) {
            Some(ro) => {
                !self.config.paint_cache
                    || ro.needs_paint
                    || ro.cache.is_none()
                    || child_repainted
                    || (entry.stale)(self, id)
            }
            None => false,
        };
        if !dirty {
            return Ok(false);
        }

        let canvas = match (entry.paint)(self, id, size) {
            Ok(canvas) => canvas,
            Err(err) => {
                tessel_core::error!(element = ?id, kind = kind.name(), %err, "paint failed");
                return Err(err);
            }
        };
        if let Some(ro) = self.render_object_mut(id) {
            ro.cache = Some(canvas);
            ro.needs_paint = false;
            ro.paint_count += 1;
        }
        self.pending_repaints += 1;
        Ok(true)
    }
}

#![forbid(unsafe_code)]

//! Elements: persistent tree nodes binding a widget to its render object
//! and scope.
//!
//! Elements live in the [`Tree`](crate::Tree) arena and are addressed by
//! [`ElementId`]. The children list is the only ownership edge; the parent
//! link is a plain handle.

use slotmap::new_key_type;

use crate::render_object::RenderObjectId;
use crate::scope::ScopeId;
use crate::widget::{Key, Kind, Widget};

new_key_type! {
    /// Handle to an element in a [`Tree`](crate::Tree).
    pub struct ElementId;
}

/// A node of the element tree.
///
/// Created unmounted by [`Tree::create_element`](crate::Tree::create_element);
/// mounting attaches it under a parent and gives it a scope and a render
/// object.
#[derive(Debug)]
pub struct Element {
    pub(crate) widget: Widget,
    pub(crate) parent: Option<ElementId>,
    pub(crate) children: Vec<ElementId>,
    pub(crate) scope: Option<ScopeId>,
    pub(crate) render_object: Option<RenderObjectId>,
}

impl Element {
    pub(crate) fn new(widget: Widget) -> Self {
        Self {
            widget,
            parent: None,
            children: Vec::new(),
            scope: None,
            render_object: None,
        }
    }

    /// The widget this element currently shows.
    pub fn widget(&self) -> &Widget {
        &self.widget
    }

    pub fn kind(&self) -> Kind {
        self.widget.kind()
    }

    pub fn key(&self) -> Option<&Key> {
        self.widget.key()
    }

    pub fn parent(&self) -> Option<ElementId> {
        self.parent
    }

    /// Children in paint order.
    pub fn children(&self) -> &[ElementId] {
        &self.children
    }

    pub fn scope(&self) -> Option<ScopeId> {
        self.scope
    }

    pub fn render_object(&self) -> Option<RenderObjectId> {
        self.render_object
    }

    pub fn is_mounted(&self) -> bool {
        self.render_object.is_some()
    }
}

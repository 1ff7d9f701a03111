#![forbid(unsafe_code)]

//! Widget tree: declarative widgets reconciled into persistent elements,
//! laid out and painted by render objects, with hierarchical scope variables.
//!
//! # Example
//!
//! ```
//! use tessel_widgets::Tree;
//! use tessel_widgets::widget::{Flex, Text};
//!
//! let mut tree = Tree::default();
//! tree.set_root(Flex::row([Text::raw("ab").into(), Text::raw("c").into()]).into());
//! let frame = tree.render(4, 1).unwrap();
//! assert_eq!(frame.row_text(0), "abc ");
//! ```

pub mod config;
pub mod element;
pub mod error;
pub mod render_object;
pub mod scope;
pub mod tree;
pub mod widget;

pub use config::RenderConfig;
pub use element::{Element, ElementId};
pub use error::RenderError;
pub use render_object::{RenderObject, RenderObjectId};
pub use scope::{ScopeCtx, ScopeId, ScopeView, Scopes, Value};
pub use tree::Tree;
pub use widget::{Key, Kind, Widget, WidgetKind};

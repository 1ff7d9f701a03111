#![forbid(unsafe_code)]

//! Variable scopes: per-element named values with ancestor fallback.
//!
//! Every mounted element owns one scope whose parent is its parent
//! element's scope. Lookups walk up the chain to the nearest scope that
//! defines the name. Writes come in two flavors:
//!
//! - [`Scopes::override_value`] always writes a local slot, shadowing any
//!   ancestor definition for this subtree.
//! - [`Scopes::update`] finds the scope that owns the name and mutates that
//!   slot in place, so a descendant can change a value shared by its
//!   siblings. With no owner it writes locally.
//!
//! Each slot carries a `changed` flag, set whenever the value is replaced
//! by a different one and cleared by [`Scopes::reset`] once per completed
//! frame.

use std::collections::BTreeMap;
use std::fmt;

use slotmap::{SlotMap, new_key_type};

new_key_type! {
    /// Handle to a scope in a [`Scopes`] arena.
    pub struct ScopeId;
}

/// A scope variable value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    Int(i64),
    Bool(bool),
    Text(String),
}

impl Value {
    /// Integer value as a cell count, if it fits.
    pub fn as_u16(&self) -> Option<u16> {
        match self {
            Self::Int(n) => u16::try_from(*n).ok(),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

macro_rules! impl_from_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(n: $ty) -> Self {
                    Self::Int(i64::from(n))
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

#[derive(Debug, Clone)]
struct Slot {
    value: Value,
    changed: bool,
}

#[derive(Debug, Default)]
struct Scope {
    parent: Option<ScopeId>,
    slots: BTreeMap<String, Slot>,
}

/// Arena holding every live scope.
#[derive(Debug, Default)]
pub struct Scopes {
    arena: SlotMap<ScopeId, Scope>,
}

impl Scopes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty scope under `parent`.
    pub fn create(&mut self, parent: Option<ScopeId>) -> ScopeId {
        self.arena.insert(Scope {
            parent,
            slots: BTreeMap::new(),
        })
    }

    /// Drop a scope and all its slots. Child scopes keep their own slots but
    /// no longer see anything above this one.
    pub fn release(&mut self, id: ScopeId) {
        self.arena.remove(id);
    }

    pub fn contains(&self, id: ScopeId) -> bool {
        self.arena.contains_key(id)
    }

    pub fn parent(&self, id: ScopeId) -> Option<ScopeId> {
        self.arena.get(id).and_then(|s| s.parent)
    }

    /// Number of live scopes.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Walk `id` and its ancestors, innermost first.
    fn chain(&self, id: ScopeId) -> impl Iterator<Item = (ScopeId, &Scope)> + '_ {
        std::iter::successors(self.arena.get(id).map(|s| (id, s)), |(_, scope)| {
            scope
                .parent
                .and_then(|p| self.arena.get(p).map(|s| (p, s)))
        })
    }

    /// Nearest scope in the chain that defines `name`.
    pub fn owner(&self, id: ScopeId, name: &str) -> Option<ScopeId> {
        self.chain(id)
            .find(|(_, scope)| scope.slots.contains_key(name))
            .map(|(owner, _)| owner)
    }

    /// Look `name` up locally, then in ancestors.
    pub fn get(&self, id: ScopeId, name: &str) -> Option<&Value> {
        self.chain(id)
            .find_map(|(_, scope)| scope.slots.get(name))
            .map(|slot| &slot.value)
    }

    /// Value defined in this scope only.
    pub fn get_local(&self, id: ScopeId, name: &str) -> Option<&Value> {
        self.arena
            .get(id)
            .and_then(|s| s.slots.get(name))
            .map(|slot| &slot.value)
    }

    /// Changed flag of the slot [`get`](Self::get) would read.
    pub fn is_changed(&self, id: ScopeId, name: &str) -> bool {
        self.chain(id)
            .find_map(|(_, scope)| scope.slots.get(name))
            .is_some_and(|slot| slot.changed)
    }

    /// Write a local slot, shadowing ancestors. Returns whether this write
    /// created the slot or replaced its value. An equal write returns `false`
    /// and leaves any earlier flag as it was.
    pub fn override_value(&mut self, id: ScopeId, name: &str, value: impl Into<Value>) -> bool {
        let Some(scope) = self.arena.get_mut(id) else {
            return false;
        };
        write_slot(&mut scope.slots, name, value.into())
    }

    /// Mutate the owning slot of `name` in place, or write locally when no
    /// scope in the chain defines it. Returns the scope that was written.
    pub fn update(&mut self, id: ScopeId, name: &str, value: impl Into<Value>) -> Option<ScopeId> {
        let target = self.owner(id, name).unwrap_or(id);
        let scope = self.arena.get_mut(target)?;
        write_slot(&mut scope.slots, name, value.into());
        Some(target)
    }

    /// Force the owning slot's changed flag on. Returns `false` when no scope
    /// in the chain defines `name`.
    pub fn invalidate(&mut self, id: ScopeId, name: &str) -> bool {
        let slot = self
            .owner(id, name)
            .and_then(|owner| self.arena.get_mut(owner))
            .and_then(|scope| scope.slots.get_mut(name));
        match slot {
            Some(slot) => {
                slot.changed = true;
                true
            }
            None => false,
        }
    }

    /// Remove a local slot, uncovering any ancestor definition.
    pub fn remove(&mut self, id: ScopeId, name: &str) -> Option<Value> {
        self.arena
            .get_mut(id)?
            .slots
            .remove(name)
            .map(|slot| slot.value)
    }

    /// Clear the changed flag on every local slot. Does not recurse.
    pub fn reset(&mut self, id: ScopeId) {
        if let Some(scope) = self.arena.get_mut(id) {
            for slot in scope.slots.values_mut() {
                slot.changed = false;
            }
        }
    }

    /// [`reset`](Self::reset) every scope in the arena.
    pub fn reset_all(&mut self) {
        for scope in self.arena.values_mut() {
            for slot in scope.slots.values_mut() {
                slot.changed = false;
            }
        }
    }

    /// Read-only handle bound to one scope.
    pub fn view(&self, id: ScopeId) -> ScopeView<'_> {
        ScopeView { scopes: self, id }
    }
}

fn write_slot(slots: &mut BTreeMap<String, Slot>, name: &str, value: Value) -> bool {
    match slots.get_mut(name) {
        Some(slot) => {
            if slot.value == value {
                return false;
            }
            slot.value = value;
            slot.changed = true;
            true
        }
        None => {
            slots.insert(
                name.to_owned(),
                Slot {
                    value,
                    changed: true,
                },
            );
            true
        }
    }
}

/// Read access to one scope chain, handed to renderers and builders.
#[derive(Clone, Copy)]
pub struct ScopeView<'a> {
    scopes: &'a Scopes,
    id: ScopeId,
}

impl<'a> ScopeView<'a> {
    pub fn id(&self) -> ScopeId {
        self.id
    }

    pub fn get(&self, name: &str) -> Option<&'a Value> {
        self.scopes.get(self.id, name)
    }

    pub fn get_u16(&self, name: &str) -> Option<u16> {
        self.get(name).and_then(Value::as_u16)
    }

    pub fn get_i64(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(Value::as_i64)
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(Value::as_bool)
    }

    pub fn get_str(&self, name: &str) -> Option<&'a str> {
        self.get(name).and_then(Value::as_str)
    }

    pub fn is_changed(&self, name: &str) -> bool {
        self.scopes.is_changed(self.id, name)
    }
}

impl fmt::Debug for ScopeView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopeView").field("id", &self.id).finish()
    }
}

/// Mutable access to one scope chain, handed to key handlers.
pub struct ScopeCtx<'a> {
    scopes: &'a mut Scopes,
    id: ScopeId,
}

impl<'a> ScopeCtx<'a> {
    pub(crate) fn new(scopes: &'a mut Scopes, id: ScopeId) -> Self {
        Self { scopes, id }
    }

    pub fn id(&self) -> ScopeId {
        self.id
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.scopes.get(self.id, name)
    }

    pub fn get_i64(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(Value::as_i64)
    }

    pub fn is_changed(&self, name: &str) -> bool {
        self.scopes.is_changed(self.id, name)
    }

    /// See [`Scopes::update`].
    pub fn update(&mut self, name: &str, value: impl Into<Value>) -> Option<ScopeId> {
        self.scopes.update(self.id, name, value)
    }

    /// See [`Scopes::override_value`].
    pub fn override_value(&mut self, name: &str, value: impl Into<Value>) -> bool {
        self.scopes.override_value(self.id, name, value)
    }

    /// See [`Scopes::invalidate`].
    pub fn invalidate(&mut self, name: &str) -> bool {
        self.scopes.invalidate(self.id, name)
    }
}

impl fmt::Debug for ScopeCtx<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopeCtx").field("id", &self.id).finish()
    }
}

//! Lexical scopes.
//!
//! A `Scope` maps names to `Address` cells and links to its parent. Lookup
//! follows a declare-on-read policy: `load_symbol` never fails, it searches
//! this scope, then its ancestors, then the built-in registry, and finally
//! declares the name here bound to `none`.

// Rc is the intentional implementation detail of LocalScope<T>
#![allow(
    clippy::disallowed_types,
    reason = "Rc is the implementation of LocalScope<T>"
)]

use std::cell::RefCell;
use std::fmt;
use std::mem;
use std::ops::Deref;
use std::rc::{Rc, Weak};

use rustc_hash::FxHashMap;

use crate::builtins::BuiltinRegistry;
use crate::collector::Visitor;
use crate::shared::SharedRegistry;
use crate::value::{Address, Object};

/// A single-threaded scope wrapper for reference-counted interior mutability.
///
/// All scope allocations go through `LocalScope::new()`, which is what lets
/// the interpreter register every scope with the collector.
///
/// # Thread Safety
/// `LocalScope<T>` is NOT thread-safe. It uses `Rc` internally, which is
/// faster than `Arc` but cannot be shared across threads.
#[repr(transparent)]
pub struct LocalScope<T>(Rc<RefCell<T>>);

impl<T> LocalScope<T> {
    #[inline]
    pub fn new(value: T) -> Self {
        LocalScope(Rc::new(RefCell::new(value)))
    }

    /// Borrow the inner value immutably.
    #[inline]
    pub fn borrow(&self) -> std::cell::Ref<'_, T> {
        self.0.borrow()
    }

    /// Borrow the inner value mutably.
    #[inline]
    pub fn borrow_mut(&self) -> std::cell::RefMut<'_, T> {
        self.0.borrow_mut()
    }

    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Allocation address; the collector's mark key.
    #[inline]
    pub fn id(&self) -> usize {
        Rc::as_ptr(&self.0).cast::<()>() as usize
    }

    pub fn downgrade(&self) -> WeakScope<T> {
        WeakScope(Rc::downgrade(&self.0))
    }
}

impl<T> Clone for LocalScope<T> {
    #[inline]
    fn clone(&self) -> Self {
        LocalScope(Rc::clone(&self.0))
    }
}

impl<T: fmt::Debug> fmt::Debug for LocalScope<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.try_borrow() {
            Ok(inner) => f.debug_tuple("LocalScope").field(&*inner).finish(),
            Err(_) => f.write_str("LocalScope(<borrowed>)"),
        }
    }
}

impl<T: Default> Default for LocalScope<T> {
    fn default() -> Self {
        LocalScope::new(T::default())
    }
}

impl<T> Deref for LocalScope<T> {
    type Target = RefCell<T>;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Non-owning scope handle held by the collector.
pub struct WeakScope<T>(Weak<RefCell<T>>);

impl<T> WeakScope<T> {
    pub fn upgrade(&self) -> Option<LocalScope<T>> {
        self.0.upgrade().map(LocalScope)
    }

    pub fn is_alive(&self) -> bool {
        self.0.strong_count() > 0
    }
}

/// A single scope containing name bindings.
#[derive(Default)]
pub struct Scope {
    /// Bindings declared in this scope (`FxHashMap` for faster hashing).
    symbols: FxHashMap<String, Address>,
    /// Enclosing scope (for lexical scoping).
    parent: Option<LocalScope<Scope>>,
    /// Built-in registry; only set on a root scope.
    builtins: Option<SharedRegistry<BuiltinRegistry>>,
}

impl Scope {
    /// Create a new empty scope with no parent and no built-ins.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a global scope that resolves built-ins from `builtins`.
    pub fn root(builtins: SharedRegistry<BuiltinRegistry>) -> Self {
        Scope {
            builtins: Some(builtins),
            ..Self::default()
        }
    }

    /// Create a new scope with a parent.
    pub fn with_parent(parent: LocalScope<Scope>) -> Self {
        Scope {
            parent: Some(parent),
            ..Self::default()
        }
    }

    pub fn parent(&self) -> Option<&LocalScope<Scope>> {
        self.parent.as_ref()
    }

    /// Declare `name` in this scope bound to `none`, unless it is already
    /// declared here. Returns the binding either way.
    pub fn create_symbol(&mut self, name: &str) -> Address {
        if let Some(existing) = self.symbols.get(name) {
            return existing.clone();
        }
        let address = Address::none();
        self.symbols.insert(name.to_string(), address.clone());
        address
    }

    /// Bind `name` in this scope to `address`, replacing any previous
    /// binding. Aliases of the previous cell are unaffected.
    pub fn define_symbol(&mut self, name: &str, address: Address) {
        let previous = self.symbols.insert(name.to_string(), address);
        drop(previous);
    }

    /// Find `name` in this scope or an ancestor, ignoring built-ins.
    pub fn find_symbol(&self, name: &str) -> Option<Address> {
        if let Some(address) = self.symbols.get(name) {
            return Some(address.clone());
        }
        let mut current = self.parent.clone();
        while let Some(scope) = current {
            let scope = scope.borrow();
            if let Some(address) = scope.symbols.get(name) {
                return Some(address.clone());
            }
            current = scope.parent.clone();
        }
        None
    }

    /// Find `name` declared directly in this scope.
    pub fn find_local(&self, name: &str) -> Option<Address> {
        self.symbols.get(name).cloned()
    }

    /// Resolve a built-in through the registry reachable from the root.
    ///
    /// Each call yields a fresh cell, so rebinding it never affects the
    /// registry.
    pub fn load_builtin(&self, name: &str) -> Option<Address> {
        if let Some(registry) = &self.builtins {
            return registry
                .lookup(name)
                .map(|builtin| Address::new(Object::Builtin(builtin)));
        }
        let mut current = self.parent.clone();
        while let Some(scope) = current {
            let scope = scope.borrow();
            if let Some(registry) = &scope.builtins {
                return registry
                    .lookup(name)
                    .map(|builtin| Address::new(Object::Builtin(builtin)));
            }
            current = scope.parent.clone();
        }
        None
    }

    /// Resolve `name` for reading or writing. Never fails: an unknown name
    /// is declared in this scope bound to `none`.
    pub fn load_symbol(&mut self, name: &str) -> Address {
        if let Some(address) = self.find_symbol(name) {
            return address;
        }
        if let Some(address) = self.load_builtin(name) {
            return address;
        }
        self.create_symbol(name)
    }

    /// Bindings declared directly in this scope, in no particular order.
    pub fn symbols(&self) -> impl Iterator<Item = (&str, &Address)> {
        self.symbols.iter().map(|(name, address)| (name.as_str(), address))
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Report every binding and the parent link.
    pub fn collect(&self, visitor: &mut dyn Visitor) {
        for address in self.symbols.values() {
            visitor.visit_address(address);
        }
        if let Some(parent) = &self.parent {
            visitor.visit_scope(parent);
        }
    }

    /// Detach every binding and the parent link. The detached handles are
    /// returned so the caller can drop them after releasing its borrow.
    pub(crate) fn clear(&mut self) -> (FxHashMap<String, Address>, Option<LocalScope<Scope>>) {
        (mem::take(&mut self.symbols), self.parent.take())
    }
}

impl fmt::Debug for Scope {
    /// Names only; values may refer back to this scope.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.symbols.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("Scope")
            .field("symbols", &names)
            .field("has_parent", &self.parent.is_some())
            .field("root", &self.builtins.is_some())
            .finish()
    }
}

//! Shared heap handles for reference-typed objects.
//!
//! # Rc Enforcement
//!
//! `Heap<T>` has a crate-private constructor, so heap objects can only be
//! created through the factory methods on `Object`. That keeps every List,
//! Dict and Scope allocation visible to the interpreter, which is what lets
//! the collector track them.
//!
//! # Thread Safety
//!
//! Handles are `Rc`-based and therefore `!Send`. The runtime is
//! single-threaded.

#![allow(
    clippy::disallowed_types,
    reason = "Rc is the implementation of Heap<T>"
)]

use std::fmt;
use std::ops::Deref;
use std::rc::{Rc, Weak};

/// Strong handle to a heap-allocated object body.
#[repr(transparent)]
pub struct Heap<T: ?Sized>(Rc<T>);

impl<T> Heap<T> {
    #[inline]
    pub(crate) fn new(value: T) -> Self {
        Heap(Rc::new(value))
    }
}

impl<T: ?Sized> Heap<T> {
    /// Adopt an existing allocation, used for unsized (`dyn`) bodies.
    #[inline]
    pub(crate) fn from_rc(rc: Rc<T>) -> Self {
        Heap(rc)
    }

    /// Whether both handles point at the same allocation.
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Allocation address, stable for as long as any handle (strong or weak)
    /// exists.
    #[inline]
    pub fn id(&self) -> usize {
        Rc::as_ptr(&self.0).cast::<()>() as usize
    }

    pub fn downgrade(&self) -> WeakHeap<T> {
        WeakHeap(Rc::downgrade(&self.0))
    }

    /// Number of strong handles, used by collector tests.
    pub fn strong_count(&self) -> usize {
        Rc::strong_count(&self.0)
    }
}

impl<T: ?Sized> Clone for Heap<T> {
    #[inline]
    fn clone(&self) -> Self {
        Heap(Rc::clone(&self.0))
    }
}

impl<T: ?Sized> Deref for Heap<T> {
    type Target = T;

    #[inline]
    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T: ?Sized + fmt::Debug> fmt::Debug for Heap<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

/// Non-owning handle held by the collector.
pub struct WeakHeap<T: ?Sized>(Weak<T>);

impl<T: ?Sized> WeakHeap<T> {
    pub fn upgrade(&self) -> Option<Heap<T>> {
        self.0.upgrade().map(Heap)
    }

    pub fn is_alive(&self) -> bool {
        self.0.strong_count() > 0
    }
}

impl<T: ?Sized> Clone for WeakHeap<T> {
    fn clone(&self) -> Self {
        WeakHeap(Weak::clone(&self.0))
    }
}

impl<T: ?Sized> fmt::Debug for WeakHeap<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WeakHeap(alive: {})", self.is_alive())
    }
}

#[cfg(test)]
mod tests;

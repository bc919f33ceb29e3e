//! Mutable object cells.
//!
//! An `Address` is the unit of aliasing: scopes, list slots, dict values and
//! operand-stack entries all hold `Address` handles. Cloning the handle
//! aliases the cell; `bind` retargets the cell for every alias at once
//! without touching the object it previously held.

#![allow(
    clippy::disallowed_types,
    reason = "Rc is the implementation of Address"
)]

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use super::Object;

/// A shared, retargetable cell holding one object.
#[derive(Clone)]
pub struct Address(Rc<RefCell<Object>>);

impl Address {
    /// A fresh cell, not aliased by anything yet.
    #[inline]
    pub fn new(object: Object) -> Self {
        Address(Rc::new(RefCell::new(object)))
    }

    /// A fresh cell holding `None`.
    #[inline]
    pub fn none() -> Self {
        Address::new(Object::None)
    }

    /// The held object. Reference-typed objects share their body.
    #[inline]
    pub fn get(&self) -> Object {
        self.0.borrow().clone()
    }

    /// Retarget the cell.
    ///
    /// The previous object is released only after the borrow ends, so a
    /// destructor that reaches back into this cell cannot observe it
    /// mid-update.
    pub fn bind(&self, object: Object) {
        let previous = self.0.replace(object);
        drop(previous);
    }

    /// Run `f` against the held object without cloning it.
    #[inline]
    pub fn with<R>(&self, f: impl FnOnce(&Object) -> R) -> R {
        f(&self.0.borrow())
    }

    /// Whether both handles alias the same cell.
    #[inline]
    pub fn ptr_eq(&self, other: &Address) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Default for Address {
    fn default() -> Self {
        Address::none()
    }
}

impl From<Object> for Address {
    fn from(object: Object) -> Self {
        Address::new(object)
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.try_borrow() {
            Ok(object) => write!(f, "Address({object:?})"),
            Err(_) => f.write_str("Address(<borrowed>)"),
        }
    }
}

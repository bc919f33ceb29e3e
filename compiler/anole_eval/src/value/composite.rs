//! Bodies of the heap-allocated object variants.

use std::cell::{Ref, RefCell};
use std::collections::BTreeMap;
use std::mem;

use anole_ir::SharedCode;

use super::{Address, Heap, Object};
use crate::scope::{LocalScope, Scope};

/// Ordered, growable sequence of cells.
#[derive(Debug, Default)]
pub struct ListObject {
    items: RefCell<Vec<Address>>,
}

impl ListObject {
    pub fn new(items: Vec<Address>) -> Self {
        ListObject {
            items: RefCell::new(items),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }

    /// The cell at `index`, aliased.
    pub fn get(&self, index: usize) -> Option<Address> {
        self.items.borrow().get(index).cloned()
    }

    pub fn push(&self, item: Address) {
        self.items.borrow_mut().push(item);
    }

    pub fn items(&self) -> Ref<'_, Vec<Address>> {
        self.items.borrow()
    }

    /// Copy of the cell handles, for iteration that may re-enter the list.
    pub fn snapshot(&self) -> Vec<Address> {
        self.items.borrow().clone()
    }

    /// Empty the list, handing the cells to the caller so they are dropped
    /// after the borrow ends.
    pub(crate) fn take(&self) -> Vec<Address> {
        mem::take(&mut *self.items.borrow_mut())
    }
}

/// One dictionary entry: the original key object plus the value cell.
#[derive(Debug, Clone)]
pub struct DictEntry {
    pub key: Object,
    pub value: Address,
}

/// Dictionary ordered by canonical key string.
///
/// Two keys that compare equal produce the same canonical key, so inserting
/// an equal key overwrites the existing entry.
#[derive(Debug, Default)]
pub struct DictObject {
    entries: RefCell<BTreeMap<String, DictEntry>>,
}

impl DictObject {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Insert or overwrite. The value cell is stored as given (aliased).
    pub fn insert(&self, key: Object, value: Address) {
        let canonical = key.to_key();
        let previous = self
            .entries
            .borrow_mut()
            .insert(canonical, DictEntry { key, value });
        drop(previous);
    }

    /// The value cell for `key`, aliased.
    pub fn get(&self, key: &Object) -> Option<Address> {
        let canonical = key.to_key();
        self.entries
            .borrow()
            .get(&canonical)
            .map(|entry| entry.value.clone())
    }

    /// The value cell for `key`, inserting a `none` cell when absent.
    pub fn get_or_insert(&self, key: &Object) -> Address {
        let canonical = key.to_key();
        let mut entries = self.entries.borrow_mut();
        entries
            .entry(canonical)
            .or_insert_with(|| DictEntry {
                key: key.clone(),
                value: Address::none(),
            })
            .value
            .clone()
    }

    pub fn contains(&self, key: &Object) -> bool {
        let canonical = key.to_key();
        self.entries.borrow().contains_key(&canonical)
    }

    pub fn remove(&self, key: &Object) -> Option<DictEntry> {
        let canonical = key.to_key();
        self.entries.borrow_mut().remove(&canonical)
    }

    /// Key objects in canonical order.
    pub fn keys(&self) -> Vec<Object> {
        self.entries
            .borrow()
            .values()
            .map(|entry| entry.key.clone())
            .collect()
    }

    pub fn entries(&self) -> Ref<'_, BTreeMap<String, DictEntry>> {
        self.entries.borrow()
    }

    pub(crate) fn take(&self) -> BTreeMap<String, DictEntry> {
        mem::take(&mut *self.entries.borrow_mut())
    }
}

/// A user function.
#[derive(Debug)]
pub struct FunctionObject {
    /// Code the body lives in, shared with the declaring frame.
    pub code: SharedCode,
    /// Scope captured at declaration.
    pub scope: LocalScope<Scope>,
    /// Offset of the first body instruction.
    pub base: usize,
    /// Declared parameter count.
    pub arity: usize,
}

impl FunctionObject {
    /// Name used in backtraces and display.
    pub fn label(&self) -> String {
        format!("function@{}", self.base)
    }
}

#[derive(Debug)]
pub struct ClassObject {
    pub name: String,
    pub scope: LocalScope<Scope>,
}

#[derive(Debug)]
pub struct InstanceObject {
    pub class: Heap<ClassObject>,
    pub scope: LocalScope<Scope>,
}

/// A callable paired with the receiver passed as its leading argument.
#[derive(Debug)]
pub struct MethodObject {
    pub function: Object,
    pub receiver: Object,
}

#[derive(Debug)]
pub struct EnumObject {
    pub scope: LocalScope<Scope>,
}

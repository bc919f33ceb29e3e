//! Indexing and member access.

use super::{Address, Object};
use crate::builtins::dict_method;
use crate::errors::{
    cannot_index, index_out_of_bounds, key_not_found, unsupported, undefined_member, EvalError,
};
use crate::scope::{LocalScope, Scope};

/// What indexing a dictionary with an absent key does.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MissingKeyPolicy {
    /// Insert a `none` entry and return its cell, so `d[k] = v` can
    /// create entries.
    #[default]
    Insert,
    /// Fail with `KeyError`.
    Error,
}

impl Object {
    /// Resolve `self[index]` to a cell.
    ///
    /// List elements and dictionary values are returned aliased, so storing
    /// through the result updates the container. String indexing yields a
    /// fresh one-character string.
    pub fn index(&self, index: &Object, policy: MissingKeyPolicy) -> Result<Address, EvalError> {
        match self {
            Object::List(list) => {
                let Object::Int(raw) = index else {
                    return Err(cannot_index(self.type_name(), index.type_name()));
                };
                let len = list.len();
                let slot = normalize(*raw, len).ok_or_else(|| index_out_of_bounds(*raw, len))?;
                list.get(slot).ok_or_else(|| index_out_of_bounds(*raw, len))
            }
            Object::Str(s) => {
                let Object::Int(raw) = index else {
                    return Err(cannot_index(self.type_name(), index.type_name()));
                };
                let len = s.chars().count();
                let slot = normalize(*raw, len).ok_or_else(|| index_out_of_bounds(*raw, len))?;
                let ch = s
                    .chars()
                    .nth(slot)
                    .ok_or_else(|| index_out_of_bounds(*raw, len))?;
                Ok(Address::new(Object::string(ch)))
            }
            Object::Dict(dict) => match policy {
                MissingKeyPolicy::Insert => Ok(dict.get_or_insert(index)),
                MissingKeyPolicy::Error => dict
                    .get(index)
                    .ok_or_else(|| key_not_found(&index.to_string())),
            },
            _ => Err(unsupported("indexing", self.type_name())),
        }
    }

    /// Resolve `self.name` to a cell.
    pub fn load_member(&self, name: &str) -> Result<Address, EvalError> {
        match self {
            Object::Class(class) => bound_member(&class.scope, name, self)
                .ok_or_else(|| undefined_member(name, &format!("class {}", class.name))),
            Object::Instance(instance) => bound_member(&instance.scope, name, self)
                .ok_or_else(|| undefined_member(name, &format!("{} instance", instance.class.name))),
            Object::Enum(enumeration) => enumeration
                .scope
                .borrow()
                .find_local(name)
                .map(|member| Address::new(member.get()))
                .ok_or_else(|| undefined_member(name, self.type_name())),
            Object::Dict(_) => dict_method(name)
                .map(|method| Address::new(Object::method(Object::Builtin(method), self.clone())))
                .ok_or_else(|| undefined_member(name, self.type_name())),
            Object::Native(native) => native.load_member(name),
            _ => Err(undefined_member(name, self.type_name())),
        }
    }
}

/// Look up a member declared directly in `scope`. Callable members are
/// wrapped into a method bound to `receiver`; data members are aliased.
fn bound_member(scope: &LocalScope<Scope>, name: &str, receiver: &Object) -> Option<Address> {
    let member = scope.borrow().find_local(name)?;
    let object = member.get();
    if object.is_callable() {
        Some(Address::new(Object::method(object, receiver.clone())))
    } else {
        Some(member)
    }
}

/// Map a possibly negative offset onto `0..len`.
fn normalize(raw: i64, len: usize) -> Option<usize> {
    let len = i64::try_from(len).ok()?;
    let adjusted = if raw < 0 { raw.checked_add(len)? } else { raw };
    if (0..len).contains(&adjusted) {
        usize::try_from(adjusted).ok()
    } else {
        None
    }
}

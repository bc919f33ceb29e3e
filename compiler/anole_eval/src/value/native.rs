//! Objects implemented outside the core object model.

use std::fmt;

use super::Address;
use crate::collector::Visitor;
use crate::errors::{undefined_member, EvalError};

/// Capability contract for standard-library objects.
///
/// Only `type_name` and `to_str` are required; the remaining capabilities
/// default to the behavior of an opaque, always-truthy value with no
/// members.
pub trait NativeObject: fmt::Debug {
    fn type_name(&self) -> &'static str;

    fn to_str(&self) -> String;

    fn to_bool(&self) -> bool {
        true
    }

    fn load_member(&self, name: &str) -> Result<Address, EvalError> {
        Err(undefined_member(name, self.type_name()))
    }

    /// Report owned runtime objects. Natives holding none can keep the
    /// default.
    fn collect(&self, _visitor: &mut dyn Visitor) {}
}

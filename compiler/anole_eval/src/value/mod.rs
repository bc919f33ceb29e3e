//! Runtime objects for the Anole virtual machine.
//!
//! # Rc Enforcement Architecture
//!
//! Reference-typed objects (strings, containers, functions, classes, ...)
//! live behind `Heap<T>`, whose constructor is crate-private. Outside code
//! builds objects through the factory methods on `Object`:
//!
//! ```text
//! let s = Object::string("hello");        // OK
//! let list = Object::list(vec![]);        // OK
//! let s = Object::Str(Heap::new(...));    // ERROR: Heap::new is pub(crate)
//! ```
//!
//! # Capabilities
//!
//! Every variant answers the same capability set: `to_bool`, `Display`
//! (`to_str`), `to_key`, `index`, `load_member`, and `collect`. Capabilities a
//! variant does not implement fail with a `TypeError` or `AttributeError`.
//! Calls are dispatched by the interpreter, since they need a frame.

mod access;
mod address;
mod composite;
mod heap;
mod key;
mod native;

use std::fmt;

use anole_ir::{Literal, SharedCode};

use crate::builtins::BuiltinFunction;
use crate::collector::Visitor;
use crate::scope::{LocalScope, Scope};

pub use access::MissingKeyPolicy;
pub use address::Address;
pub use composite::{
    ClassObject, DictEntry, DictObject, EnumObject, FunctionObject, InstanceObject, ListObject,
    MethodObject,
};
pub use heap::{Heap, WeakHeap};
pub use native::NativeObject;

/// Runtime object.
#[derive(Clone, Default)]
pub enum Object {
    // Primitives (inline, no heap allocation)
    #[default]
    None,
    Int(i64),
    Float(f64),
    Bool(bool),

    // Heap types
    /// Immutable string.
    Str(Heap<String>),
    /// Ordered sequence of cells.
    List(Heap<ListObject>),
    /// Map ordered by canonical key.
    Dict(Heap<DictObject>),

    // Callables and namespaces
    /// User function: shared code, captured scope, entry offset, arity.
    Function(Heap<FunctionObject>),
    /// Class: name plus member scope.
    Class(Heap<ClassObject>),
    /// Instance: member scope seeded from its class.
    Instance(Heap<InstanceObject>),
    /// Callable bound to a receiver, synthesized by member lookup.
    Method(Heap<MethodObject>),
    /// Enumeration: member scope of named constants.
    Enum(Heap<EnumObject>),
    /// Native function from the built-in registry.
    Builtin(BuiltinFunction),
    /// Standard-library object implemented outside the core.
    Native(Heap<dyn NativeObject>),
}

impl Object {
    // Factory methods

    #[inline]
    pub fn string(s: impl Into<String>) -> Self {
        Object::Str(Heap::new(s.into()))
    }

    /// A list over the given cells (the cells are aliased, not copied).
    #[inline]
    pub fn list(items: Vec<Address>) -> Self {
        Object::List(Heap::new(ListObject::new(items)))
    }

    /// A list with one fresh cell per element.
    pub fn list_of(items: impl IntoIterator<Item = Object>) -> Self {
        Object::list(items.into_iter().map(Address::new).collect())
    }

    #[inline]
    pub fn dict() -> Self {
        Object::Dict(Heap::new(DictObject::new()))
    }

    pub fn function(code: SharedCode, scope: LocalScope<Scope>, base: usize, arity: usize) -> Self {
        Object::Function(Heap::new(FunctionObject {
            code,
            scope,
            base,
            arity,
        }))
    }

    pub fn class(name: impl Into<String>, scope: LocalScope<Scope>) -> Self {
        Object::Class(Heap::new(ClassObject {
            name: name.into(),
            scope,
        }))
    }

    pub fn instance(class: Heap<ClassObject>, scope: LocalScope<Scope>) -> Self {
        Object::Instance(Heap::new(InstanceObject { class, scope }))
    }

    pub fn method(function: Object, receiver: Object) -> Self {
        Object::Method(Heap::new(MethodObject { function, receiver }))
    }

    pub fn enumeration(scope: LocalScope<Scope>) -> Self {
        Object::Enum(Heap::new(EnumObject { scope }))
    }

    #[allow(
        clippy::disallowed_types,
        reason = "unsized coercion needs the Rc before it is wrapped"
    )]
    pub fn native(object: impl NativeObject + 'static) -> Self {
        let rc: std::rc::Rc<dyn NativeObject> = std::rc::Rc::new(object);
        Object::Native(Heap::from_rc(rc))
    }

    /// Materialize an instruction literal.
    pub fn from_literal(literal: &Literal) -> Self {
        match literal {
            Literal::None => Object::None,
            Literal::Int(n) => Object::Int(*n),
            Literal::Float(x) => Object::Float(*x),
            Literal::Bool(b) => Object::Bool(*b),
            Literal::Str(s) => Object::string(s.as_str()),
        }
    }

    // Queries

    pub fn type_name(&self) -> &'static str {
        match self {
            Object::None => "none",
            Object::Int(_) => "int",
            Object::Float(_) => "float",
            Object::Bool(_) => "bool",
            Object::Str(_) => "str",
            Object::List(_) => "list",
            Object::Dict(_) => "dict",
            Object::Function(_) => "function",
            Object::Class(_) => "class",
            Object::Instance(_) => "instance",
            Object::Method(_) => "method",
            Object::Enum(_) => "enum",
            Object::Builtin(_) => "builtin",
            Object::Native(n) => n.type_name(),
        }
    }

    /// Truthiness: `none`, zero, empty strings and empty containers are false.
    pub fn to_bool(&self) -> bool {
        match self {
            Object::None => false,
            Object::Int(n) => *n != 0,
            Object::Float(x) => *x != 0.0,
            Object::Bool(b) => *b,
            Object::Str(s) => !s.is_empty(),
            Object::List(list) => !list.is_empty(),
            Object::Dict(dict) => !dict.is_empty(),
            Object::Native(n) => n.to_bool(),
            Object::Function(_)
            | Object::Class(_)
            | Object::Instance(_)
            | Object::Method(_)
            | Object::Enum(_)
            | Object::Builtin(_) => true,
        }
    }

    pub fn is_callable(&self) -> bool {
        matches!(
            self,
            Object::Function(_) | Object::Class(_) | Object::Method(_) | Object::Builtin(_)
        )
    }

    #[inline]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Object::Int(n) => Some(*n),
            _ => None,
        }
    }

    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Object::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Allocation identity of heap-backed objects, `None` for primitives.
    pub fn heap_id(&self) -> Option<usize> {
        match self {
            Object::None | Object::Int(_) | Object::Float(_) | Object::Bool(_) => None,
            Object::Builtin(b) => Some(b.func as usize),
            Object::Str(h) => Some(h.id()),
            Object::List(h) => Some(h.id()),
            Object::Dict(h) => Some(h.id()),
            Object::Function(h) => Some(h.id()),
            Object::Class(h) => Some(h.id()),
            Object::Instance(h) => Some(h.id()),
            Object::Method(h) => Some(h.id()),
            Object::Enum(h) => Some(h.id()),
            Object::Native(h) => Some(h.id()),
        }
    }

    /// Identity comparison (`is`). Primitives compare by value.
    pub fn is_same(&self, other: &Object) -> bool {
        match (self.heap_id(), other.heap_id()) {
            (Some(a), Some(b)) => a == b,
            (None, None) => self == other,
            _ => false,
        }
    }

    /// Display form for user output: like `Display`, but a top-level
    /// string is written without quotes.
    pub fn display_value(&self) -> String {
        match self {
            Object::Str(s) => (**s).clone(),
            other => other.to_string(),
        }
    }

    /// Report every scope and object this object keeps alive.
    pub fn collect(&self, visitor: &mut dyn Visitor) {
        match self {
            Object::None
            | Object::Int(_)
            | Object::Float(_)
            | Object::Bool(_)
            | Object::Str(_)
            | Object::Builtin(_) => {}
            Object::List(list) => {
                for item in list.items().iter() {
                    visitor.visit_address(item);
                }
            }
            Object::Dict(dict) => {
                for entry in dict.entries().values() {
                    visitor.visit_object(&entry.key);
                    visitor.visit_address(&entry.value);
                }
            }
            Object::Function(function) => visitor.visit_scope(&function.scope),
            Object::Class(class) => visitor.visit_scope(&class.scope),
            Object::Instance(instance) => {
                visitor.visit_object(&Object::Class(instance.class.clone()));
                visitor.visit_scope(&instance.scope);
            }
            Object::Method(method) => {
                visitor.visit_object(&method.function);
                visitor.visit_object(&method.receiver);
            }
            Object::Enum(enumeration) => visitor.visit_scope(&enumeration.scope),
            Object::Native(native) => native.collect(visitor),
        }
    }

    fn write_display(&self, f: &mut fmt::Formatter<'_>, seen: &mut Vec<usize>) -> fmt::Result {
        match self {
            Object::None => f.write_str("none"),
            Object::Int(n) => write!(f, "{n}"),
            Object::Float(x) => write!(f, "{x:?}"),
            Object::Bool(b) => write!(f, "{b}"),
            Object::Str(s) => write!(f, "\"{}\"", s.as_str()),
            Object::List(list) => {
                if seen.contains(&list.id()) {
                    return f.write_str("[...]");
                }
                seen.push(list.id());
                f.write_str("[")?;
                for (i, item) in list.items().iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    item.get().write_display(f, seen)?;
                }
                seen.pop();
                f.write_str("]")
            }
            Object::Dict(dict) => {
                if seen.contains(&dict.id()) {
                    return f.write_str("{...}");
                }
                seen.push(dict.id());
                f.write_str("{")?;
                for (i, entry) in dict.entries().values().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    entry.key.write_display(f, seen)?;
                    f.write_str(": ")?;
                    entry.value.get().write_display(f, seen)?;
                }
                seen.pop();
                f.write_str("}")
            }
            Object::Function(function) => write!(f, "<{}>", function.label()),
            Object::Class(class) => write!(f, "<class {}>", class.name),
            Object::Instance(instance) => write!(f, "<{} instance>", instance.class.name),
            Object::Method(method) => {
                f.write_str("<method ")?;
                method.function.write_display(f, seen)?;
                f.write_str(">")
            }
            Object::Enum(_) => f.write_str("<enum>"),
            Object::Builtin(builtin) => write!(f, "<builtin {}>", builtin.name),
            Object::Native(native) => f.write_str(&native.to_str()),
        }
    }
}

impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_display(f, &mut Vec::new())
    }
}

impl fmt::Debug for Object {
    /// Shallow: containers report their size, never their contents, so
    /// cyclic structures are safe to debug-print.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Object::None => f.write_str("None"),
            Object::Int(n) => write!(f, "Int({n})"),
            Object::Float(x) => write!(f, "Float({x:?})"),
            Object::Bool(b) => write!(f, "Bool({b})"),
            Object::Str(s) => write!(f, "Str({:?})", s.as_str()),
            Object::List(list) => write!(f, "List(len={})", list.len()),
            Object::Dict(dict) => write!(f, "Dict(len={})", dict.len()),
            Object::Function(function) => write!(f, "Function({})", function.label()),
            Object::Class(class) => write!(f, "Class({})", class.name),
            Object::Instance(instance) => write!(f, "Instance({})", instance.class.name),
            Object::Method(method) => write!(f, "Method({:?})", method.function),
            Object::Enum(_) => f.write_str("Enum"),
            Object::Builtin(builtin) => write!(f, "Builtin({})", builtin.name),
            Object::Native(native) => write!(f, "Native({native:?})"),
        }
    }
}

impl From<i64> for Object {
    fn from(n: i64) -> Self {
        Object::Int(n)
    }
}

impl From<f64> for Object {
    fn from(x: f64) -> Self {
        Object::Float(x)
    }
}

impl From<bool> for Object {
    fn from(b: bool) -> Self {
        Object::Bool(b)
    }
}

impl From<&str> for Object {
    fn from(s: &str) -> Self {
        Object::string(s)
    }
}

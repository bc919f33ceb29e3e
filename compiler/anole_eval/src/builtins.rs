//! Built-in functions.
//!
//! Built-ins live in an explicit `BuiltinRegistry` value that is built once
//! and handed to the root scope. Name resolution reaches it through
//! `Scope::load_builtin` after every lexical scope has missed.

mod path;

use std::fmt;

use rustc_hash::FxHashMap;

use crate::errors::{
    unsupported, wrong_arg_count, wrong_arg_type, EvalError, EvalResult,
};
use crate::print_handler::PrintHandlerImpl;
use crate::value::{Address, Object};

pub use path::PathObject;

/// Signature of a native function: receives the runtime context and the
/// arguments in source order.
pub type BuiltinFn = fn(&BuiltinContext<'_>, &[Object]) -> EvalResult;

/// Runtime services available to built-ins.
pub struct BuiltinContext<'a> {
    pub print: &'a PrintHandlerImpl,
}

/// Accepted argument count.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Arity {
    Exact(usize),
    Variadic,
}

impl Arity {
    pub fn accepts(self, got: usize) -> bool {
        match self {
            Arity::Exact(n) => n == got,
            Arity::Variadic => true,
        }
    }
}

/// A named native function.
#[derive(Clone, Copy)]
pub struct BuiltinFunction {
    pub name: &'static str,
    pub arity: Arity,
    pub func: BuiltinFn,
}

impl BuiltinFunction {
    pub const fn new(name: &'static str, arity: Arity, func: BuiltinFn) -> Self {
        BuiltinFunction { name, arity, func }
    }

    /// Check the argument count, then run.
    pub fn invoke(&self, ctx: &BuiltinContext<'_>, args: &[Object]) -> EvalResult {
        if let Arity::Exact(expected) = self.arity {
            if expected != args.len() {
                return Err(wrong_arg_count(self.name, expected, args.len()));
            }
        }
        (self.func)(ctx, args)
    }
}

impl fmt::Debug for BuiltinFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuiltinFunction")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}

/// Name to built-in map consulted by root scopes.
#[derive(Default)]
pub struct BuiltinRegistry {
    functions: FxHashMap<&'static str, BuiltinFunction>,
}

impl BuiltinRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard set of built-ins.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for builtin in DEFAULTS {
            registry.register(*builtin);
        }
        registry
    }

    /// Add or replace a built-in.
    pub fn register(&mut self, builtin: BuiltinFunction) {
        self.functions.insert(builtin.name, builtin);
    }

    pub fn lookup(&self, name: &str) -> Option<BuiltinFunction> {
        self.functions.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

impl fmt::Debug for BuiltinRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.functions.keys().copied().collect();
        names.sort_unstable();
        f.debug_struct("BuiltinRegistry")
            .field("functions", &names)
            .finish()
    }
}

const DEFAULTS: &[BuiltinFunction] = &[
    BuiltinFunction::new("print", Arity::Variadic, builtin_print),
    BuiltinFunction::new("println", Arity::Variadic, builtin_println),
    BuiltinFunction::new("len", Arity::Exact(1), builtin_len),
    BuiltinFunction::new("str", Arity::Exact(1), builtin_str),
    BuiltinFunction::new("int", Arity::Exact(1), builtin_int),
    BuiltinFunction::new("float", Arity::Exact(1), builtin_float),
    BuiltinFunction::new("type", Arity::Exact(1), builtin_type),
    BuiltinFunction::new("append", Arity::Exact(2), builtin_append),
    BuiltinFunction::new("path", Arity::Exact(1), path::builtin_path),
    BuiltinFunction::new("current_path", Arity::Exact(0), path::builtin_current_path),
];

/// Bound methods exposed by dictionaries. The receiver is the leading
/// argument.
const DICT_METHODS: &[BuiltinFunction] = &[
    BuiltinFunction::new("size", Arity::Exact(1), dict_size),
    BuiltinFunction::new("contains", Arity::Exact(2), dict_contains),
    BuiltinFunction::new("remove", Arity::Exact(2), dict_remove),
    BuiltinFunction::new("keys", Arity::Exact(1), dict_keys),
];

pub(crate) fn dict_method(name: &str) -> Option<BuiltinFunction> {
    DICT_METHODS.iter().find(|m| m.name == name).copied()
}

fn joined(args: &[Object]) -> String {
    args.iter()
        .map(Object::display_value)
        .collect::<Vec<_>>()
        .join(" ")
}

fn builtin_print(ctx: &BuiltinContext<'_>, args: &[Object]) -> EvalResult {
    ctx.print.print(&joined(args));
    Ok(Object::None)
}

fn builtin_println(ctx: &BuiltinContext<'_>, args: &[Object]) -> EvalResult {
    ctx.print.println(&joined(args));
    Ok(Object::None)
}

fn builtin_len(_: &BuiltinContext<'_>, args: &[Object]) -> EvalResult {
    let len = match &args[0] {
        Object::Str(s) => s.chars().count(),
        Object::List(list) => list.len(),
        Object::Dict(dict) => dict.len(),
        other => return Err(unsupported("len", other.type_name())),
    };
    i64::try_from(len)
        .map(Object::Int)
        .map_err(|_| EvalError::new(format!("length {len} does not fit in int")))
}

fn builtin_str(_: &BuiltinContext<'_>, args: &[Object]) -> EvalResult {
    Ok(Object::string(args[0].display_value()))
}

fn builtin_int(_: &BuiltinContext<'_>, args: &[Object]) -> EvalResult {
    match &args[0] {
        Object::Int(n) => Ok(Object::Int(*n)),
        Object::Bool(b) => Ok(Object::Int(i64::from(*b))),
        Object::Float(x) => {
            if x.is_nan() || x.is_infinite() {
                return Err(EvalError::new(format!("cannot convert {x} to int")));
            }
            let truncated = x.trunc();
            // -2^63 <= truncated < 2^63 is exactly the i64 range
            let two_pow_63 = 2.0_f64.powi(63);
            if truncated >= two_pow_63 || truncated < -two_pow_63 {
                return Err(EvalError::new(format!("float {x} out of range for int")));
            }
            #[allow(clippy::cast_possible_truncation, reason = "range checked above")]
            let n = truncated as i64;
            Ok(Object::Int(n))
        }
        Object::Str(s) => s
            .trim()
            .parse::<i64>()
            .map(Object::Int)
            .map_err(|_| EvalError::new(format!("cannot parse '{}' as int", s.as_str()))),
        other => Err(wrong_arg_type("int", "a number or string", other.type_name())),
    }
}

fn builtin_float(_: &BuiltinContext<'_>, args: &[Object]) -> EvalResult {
    match &args[0] {
        Object::Float(x) => Ok(Object::Float(*x)),
        #[allow(clippy::cast_precision_loss, reason = "int to float promotion")]
        Object::Int(n) => Ok(Object::Float(*n as f64)),
        Object::Str(s) => s
            .trim()
            .parse::<f64>()
            .map(Object::Float)
            .map_err(|_| EvalError::new(format!("cannot parse '{}' as float", s.as_str()))),
        other => Err(wrong_arg_type("float", "a number or string", other.type_name())),
    }
}

fn builtin_type(_: &BuiltinContext<'_>, args: &[Object]) -> EvalResult {
    Ok(Object::string(args[0].type_name()))
}

fn builtin_append(_: &BuiltinContext<'_>, args: &[Object]) -> EvalResult {
    let Object::List(list) = &args[0] else {
        return Err(wrong_arg_type("append", "a list", args[0].type_name()));
    };
    list.push(Address::new(args[1].clone()));
    Ok(args[0].clone())
}

// Dictionary methods

fn dict_size(_: &BuiltinContext<'_>, args: &[Object]) -> EvalResult {
    let Object::Dict(dict) = &args[0] else {
        return Err(wrong_arg_type("size", "a dict", args[0].type_name()));
    };
    i64::try_from(dict.len())
        .map(Object::Int)
        .map_err(|_| EvalError::new("dict size does not fit in int"))
}

fn dict_contains(_: &BuiltinContext<'_>, args: &[Object]) -> EvalResult {
    let Object::Dict(dict) = &args[0] else {
        return Err(wrong_arg_type("contains", "a dict", args[0].type_name()));
    };
    Ok(Object::Bool(dict.contains(&args[1])))
}

/// Remove an entry and return its value, or `none` when absent.
fn dict_remove(_: &BuiltinContext<'_>, args: &[Object]) -> EvalResult {
    let Object::Dict(dict) = &args[0] else {
        return Err(wrong_arg_type("remove", "a dict", args[0].type_name()));
    };
    Ok(dict
        .remove(&args[1])
        .map_or(Object::None, |entry| entry.value.get()))
}

fn dict_keys(_: &BuiltinContext<'_>, args: &[Object]) -> EvalResult {
    let Object::Dict(dict) = &args[0] else {
        return Err(wrong_arg_type("keys", "a dict", args[0].type_name()));
    };
    Ok(Object::list_of(dict.keys()))
}

#[cfg(test)]
mod tests;

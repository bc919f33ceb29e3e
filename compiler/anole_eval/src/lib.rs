//! Anole Eval - the bytecode virtual machine for the Anole language.
//!
//! This crate executes the `Code` produced by the Anole compiler.
//!
//! # Architecture
//!
//! The runtime uses:
//! - `Address`: shared, retargetable cells; the unit of aliasing
//! - `Object`: the polymorphic object model with per-variant capabilities
//! - `Scope`: lexical name tables with a declare-on-read policy
//! - `Frame`: operand stack plus instruction loop, one per activation
//! - `Collector`: reference counting plus a tracing pass that breaks cycles
//! - `evaluate_binary` / `evaluate_unary`: direct enum-based operator dispatch
//!
//! # Entry Points
//!
//! `run` executes a `Code` in a fresh default interpreter; `Interpreter`
//! (via `InterpreterBuilder`) exposes configuration, output capture and
//! garbage-collection statistics.

mod builtins;
mod collector;
mod config;
pub mod errors;
mod interpreter;
mod operators;
mod print_handler;
mod scope;
mod shared;
mod unary_operators;
mod value;

pub use builtins::{
    Arity, BuiltinContext, BuiltinFn, BuiltinFunction, BuiltinRegistry, PathObject,
};
pub use collector::{Collector, GcStats, Visitor};
pub use config::{RuntimeConfig, DEFAULT_GC_THRESHOLD};
pub use errors::{ErrorCategory, EvalError, EvalErrorKind, EvalResult};
pub use interpreter::{run, Interpreter, InterpreterBuilder};
pub use operators::evaluate_binary;
pub use print_handler::{
    buffer_handler, silent_handler, stdout_handler, BufferPrintHandler, PrintHandlerImpl,
    SharedPrintHandler,
};
pub use scope::{LocalScope, Scope, WeakScope};
pub use shared::SharedRegistry;
pub use unary_operators::evaluate_unary;
pub use value::{
    Address, ClassObject, DictEntry, DictObject, EnumObject, FunctionObject, Heap,
    InstanceObject, ListObject, MethodObject, MissingKeyPolicy, NativeObject, Object, WeakHeap,
};

#[cfg(test)]
mod tests;

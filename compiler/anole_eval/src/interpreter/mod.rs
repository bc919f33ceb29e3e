//! The bytecode interpreter.
//!
//! An `Interpreter` owns everything that outlives a single frame: the global
//! scope, the built-in registry, the print handler, runtime configuration
//! and the collector. Execution itself happens in `Frame`s, which borrow
//! the interpreter mutably and their caller immutably, so the chain of live
//! frames is always available as collector roots.

mod builder;
mod call;
mod frame;

use anole_ir::SharedCode;

use crate::builtins::BuiltinRegistry;
use crate::collector::{Collector, GcStats};
use crate::config::RuntimeConfig;
use crate::errors::EvalResult;
use crate::print_handler::SharedPrintHandler;
use crate::scope::{LocalScope, Scope};
use crate::shared::SharedRegistry;
use crate::value::Object;

pub use builder::InterpreterBuilder;
pub(crate) use frame::Frame;

/// Bytecode interpreter.
pub struct Interpreter {
    config: RuntimeConfig,
    print_handler: SharedPrintHandler,
    builtins: SharedRegistry<BuiltinRegistry>,
    global: LocalScope<Scope>,
    collector: Collector,
    /// Number of user-function frames currently executing.
    depth: usize,
}

impl Interpreter {
    /// An interpreter with default configuration, stdout output and the
    /// default built-ins.
    pub fn new() -> Self {
        InterpreterBuilder::new().build()
    }

    pub fn builder() -> InterpreterBuilder {
        InterpreterBuilder::new()
    }

    /// Run `code` from offset 0 in the global scope.
    ///
    /// The global scope persists across calls, so a second `execute` sees
    /// the bindings left by the first.
    pub fn execute(&mut self, code: &SharedCode) -> EvalResult {
        tracing::debug!(instructions = code.len(), "execute");
        let mut frame = Frame::new(None, code.clone(), self.global.clone(), None);
        frame.execute(self, 0)
    }

    pub fn global(&self) -> &LocalScope<Scope> {
        &self.global
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn print_handler(&self) -> &SharedPrintHandler {
        &self.print_handler
    }

    pub fn builtins(&self) -> &SharedRegistry<BuiltinRegistry> {
        &self.builtins
    }

    pub fn gc_stats(&self) -> GcStats {
        self.collector.stats()
    }

    /// Collect cycles unreachable from the global scope.
    ///
    /// Objects held only by the embedder (such as a value returned from
    /// `execute`) are not roots; use `collect_garbage_with` to keep them.
    pub fn collect_garbage(&mut self) -> usize {
        self.collect_garbage_with(&[])
    }

    /// Collect cycles unreachable from the global scope and `extra_roots`.
    pub fn collect_garbage_with(&mut self, extra_roots: &[Object]) -> usize {
        let global = self.global.clone();
        self.collector.collect(|visitor| {
            visitor.visit_scope(&global);
            for root in extra_roots {
                visitor.visit_object(root);
            }
        })
    }

    /// Safe-point collection: the global scope plus every live frame.
    fn collect_at(&mut self, frame: &Frame<'_>) -> usize {
        let global = self.global.clone();
        self.collector.collect(|visitor| {
            visitor.visit_scope(&global);
            frame.trace_roots(visitor);
        })
    }

    /// Allocate a scope and register it with the collector.
    fn new_scope(&mut self, parent: Option<LocalScope<Scope>>) -> LocalScope<Scope> {
        let scope = LocalScope::new(match parent {
            Some(parent) => Scope::with_parent(parent),
            None => Scope::new(),
        });
        self.collector.track_scope(&scope);
        scope
    }

    #[inline]
    fn track(&mut self, object: &Object) {
        self.collector.track(object);
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

/// Run `code` in a fresh default interpreter.
pub fn run(code: SharedCode) -> EvalResult {
    Interpreter::new().execute(&code)
}

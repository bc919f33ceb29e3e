//! `InterpreterBuilder` for creating Interpreter instances with various configurations.

use super::Interpreter;
use crate::builtins::BuiltinRegistry;
use crate::collector::Collector;
use crate::config::RuntimeConfig;
use crate::print_handler::{stdout_handler, SharedPrintHandler};
use crate::scope::{LocalScope, Scope};
use crate::shared::SharedRegistry;

/// Builder for creating Interpreter instances.
///
/// Everything is optional: the defaults are `RuntimeConfig::default()`,
/// stdout output and `BuiltinRegistry::with_defaults()`.
#[derive(Default)]
pub struct InterpreterBuilder {
    config: Option<RuntimeConfig>,
    print_handler: Option<SharedPrintHandler>,
    builtins: Option<SharedRegistry<BuiltinRegistry>>,
}

impl InterpreterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the runtime configuration.
    #[must_use]
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the print handler used by `print` and `println`.
    #[must_use]
    pub fn print_handler(mut self, handler: SharedPrintHandler) -> Self {
        self.print_handler = Some(handler);
        self
    }

    /// Replace the built-in registry.
    #[must_use]
    pub fn builtins(mut self, registry: BuiltinRegistry) -> Self {
        self.builtins = Some(SharedRegistry::new(registry));
        self
    }

    /// Share an existing registry with other interpreters.
    #[must_use]
    pub fn shared_builtins(mut self, registry: SharedRegistry<BuiltinRegistry>) -> Self {
        self.builtins = Some(registry);
        self
    }

    /// Build the interpreter.
    pub fn build(self) -> Interpreter {
        let config = self.config.unwrap_or_default();
        let builtins = self
            .builtins
            .unwrap_or_else(|| SharedRegistry::new(BuiltinRegistry::with_defaults()));
        let print_handler = self.print_handler.unwrap_or_else(stdout_handler);
        let collector = Collector::new(config.gc_threshold);
        let global = LocalScope::new(Scope::root(builtins.clone()));

        Interpreter {
            config,
            print_handler,
            builtins,
            global,
            collector,
            depth: 0,
        }
    }
}

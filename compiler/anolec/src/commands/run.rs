//! The `run` command: load a code image and execute it.

use std::path::Path;

use anole_eval::{Interpreter, Object, RuntimeConfig, SharedPrintHandler};
use anole_ir::SharedCode;

use crate::{load_code, DriverError};

/// Options for `anole run`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunOptions {
    pub config: RuntimeConfig,
    /// Print collector statistics to stderr after the run.
    pub gc_stats: bool,
}

impl RunOptions {
    /// Defaults overridden by the `ANOLE_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Defaults overridden by variables looked up through `var`.
    ///
    /// - `ANOLE_MAX_DEPTH=<n>`: call depth limit
    /// - `ANOLE_GC_THRESHOLD=<n>|off`: allocations between collections
    /// - `ANOLE_STRICT_KEYS=1`: missing dictionary keys are errors
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let mut options = RunOptions::default();
        if let Some(depth) = var("ANOLE_MAX_DEPTH") {
            options.apply_max_depth(&depth);
        }
        if let Some(threshold) = var("ANOLE_GC_THRESHOLD") {
            options.apply_gc_threshold(&threshold);
        }
        if var("ANOLE_STRICT_KEYS").is_some_and(|value| is_enabled(&value)) {
            options.config = options.config.strict_keys();
        }
        options
    }

    fn apply_max_depth(&mut self, value: &str) {
        match value.parse::<usize>() {
            Ok(0) => self.config.max_call_depth = None,
            Ok(depth) => self.config = self.config.clone().max_call_depth(depth),
            Err(_) => eprintln!("warning: invalid call depth '{value}', ignoring"),
        }
    }

    fn apply_gc_threshold(&mut self, value: &str) {
        if value == "off" {
            self.config.gc_threshold = None;
            return;
        }
        match value.parse::<usize>() {
            Ok(threshold) if threshold > 0 => self.config.gc_threshold = Some(threshold),
            _ => eprintln!("warning: invalid gc threshold '{value}', ignoring"),
        }
    }
}

fn is_enabled(value: &str) -> bool {
    !matches!(value, "" | "0" | "false" | "off")
}

/// Apply `anole run` flags on top of `base`. Returns the options and the
/// first positional argument (the image path), if any.
pub fn parse_run_options(args: &[String], base: RunOptions) -> (RunOptions, Option<String>) {
    let mut options = base;
    let mut path = None;

    for arg in args {
        if let Some(depth) = arg.strip_prefix("--max-depth=") {
            options.apply_max_depth(depth);
        } else if let Some(threshold) = arg.strip_prefix("--gc-threshold=") {
            options.apply_gc_threshold(threshold);
        } else if arg == "--strict-keys" {
            options.config = options.config.strict_keys();
        } else if arg == "--gc-stats" {
            options.gc_stats = true;
        } else if arg.starts_with('-') {
            eprintln!("warning: unknown option '{arg}', ignoring");
        } else if path.is_none() {
            path = Some(arg.clone());
        }
    }

    (options, path)
}

/// Run the image at `path`, printing to stdout.
pub fn run_file(path: &Path, options: &RunOptions) -> Result<Object, DriverError> {
    let code = load_code(path)?;
    run_code(&code, options, anole_eval::stdout_handler())
}

/// Run `code` with the given options and output handler.
pub fn run_code(
    code: &SharedCode,
    options: &RunOptions,
    print_handler: SharedPrintHandler,
) -> Result<Object, DriverError> {
    let mut interpreter = Interpreter::builder()
        .config(options.config.clone())
        .print_handler(print_handler)
        .build();
    let result = interpreter.execute(code);

    if options.gc_stats {
        let stats = interpreter.gc_stats();
        eprintln!(
            "gc: {} collections, {} reclaimed, {} tracked",
            stats.collections, stats.reclaimed, stats.tracked
        );
    }
    result.map_err(DriverError::from)
}

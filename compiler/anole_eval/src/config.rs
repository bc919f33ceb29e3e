//! Runtime configuration.
//!
//! A `RuntimeConfig` is fixed for the lifetime of an interpreter. The driver
//! fills it from command-line flags; embedders go through
//! `InterpreterBuilder::config`.

use crate::value::MissingKeyPolicy;

/// Allocations between automatic collections when nothing else is set.
pub const DEFAULT_GC_THRESHOLD: usize = 4096;

/// Interpreter policy knobs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// What `d[k]` does when `k` is absent.
    pub missing_key: MissingKeyPolicy,
    /// Maximum nested call depth, or `None` for unlimited (native stack
    /// growth is the only bound).
    pub max_call_depth: Option<usize>,
    /// Tracked allocations between automatic collections, or `None` to
    /// collect only on request.
    pub gc_threshold: Option<usize>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        RuntimeConfig {
            missing_key: MissingKeyPolicy::Insert,
            max_call_depth: None,
            gc_threshold: Some(DEFAULT_GC_THRESHOLD),
        }
    }
}

impl RuntimeConfig {
    /// Fail on missing dictionary keys instead of inserting them.
    #[must_use]
    pub fn strict_keys(mut self) -> Self {
        self.missing_key = MissingKeyPolicy::Error;
        self
    }

    #[must_use]
    pub fn max_call_depth(mut self, depth: usize) -> Self {
        self.max_call_depth = Some(depth);
        self
    }

    #[must_use]
    pub fn gc_threshold(mut self, threshold: Option<usize>) -> Self {
        self.gc_threshold = threshold;
        self
    }

    /// Whether `depth` nested calls are allowed.
    #[inline]
    pub fn allows_depth(&self, depth: usize) -> bool {
        self.max_call_depth.map_or(true, |max| depth <= max)
    }
}

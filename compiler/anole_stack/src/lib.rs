//! Stack safety for deep call nesting.
//!
//! Every bytecode `Call` runs the callee's frame to completion on the native
//! stack before the caller resumes, so a recursive Anole function recurses in
//! Rust as well. Wrapping each nested frame in [`ensure_sufficient_stack`]
//! keeps recursion depth bounded by available memory instead of the size of
//! the main thread's stack.
//!
//! # Platform Support
//!
//! - **Native targets**: Uses the `stacker` crate to grow the stack on demand.
//! - **WASM targets**: No-op passthrough (WASM has its own stack management).
//!
//! # Configuration
//!
//! - **Red zone**: 128KB - If less than this remains, we grow the stack
//! - **Growth size**: 1MB - Each growth allocates this much additional space
//!
//! A single frame of the interpreter loop is a few kilobytes, so the red zone
//! leaves room for one full dispatch plus a built-in call before the next check.

/// Minimum stack space to keep available (128KB red zone).
const RED_ZONE: usize = 128 * 1024;

/// Stack space to allocate when growing (1MB).
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Ensure sufficient stack space is available before executing `f`.
///
/// If the remaining stack is below the red zone threshold, this allocates a
/// new stack segment before calling `f`.
///
/// # Example
///
/// ```text
/// let result = ensure_sufficient_stack(|| child.execute(runtime, base));
/// ```
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

/// WASM version - just call directly (WASM has its own stack management).
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

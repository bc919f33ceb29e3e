//! Shared read-only registry wrapper.

// Arc is the implementation - all usage goes through the newtype
#![allow(
    clippy::disallowed_types,
    reason = "Arc is the implementation of SharedRegistry"
)]

use std::fmt;
use std::sync::Arc;

/// Shared registry wrapper (immutable after creation).
///
/// The built-in registry is built once per interpreter and handed to the
/// root scope; every interpreter built from the same registry shares it.
pub struct SharedRegistry<T>(Arc<T>);

impl<T> SharedRegistry<T> {
    pub fn new(registry: T) -> Self {
        SharedRegistry(Arc::new(registry))
    }
}

impl<T> Clone for SharedRegistry<T> {
    fn clone(&self) -> Self {
        SharedRegistry(Arc::clone(&self.0))
    }
}

impl<T> std::ops::Deref for SharedRegistry<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T: fmt::Debug> fmt::Debug for SharedRegistry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SharedRegistry({:?})", &*self.0)
    }
}

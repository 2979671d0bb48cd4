// SPDX-License-Identifier: GPL-3.0-only

//! Save-before-exit callback registry.
//!
//! Callbacks are kept in registration order and are unique by identity: the
//! same [`CloseCallback`] (the same `Rc`) registered twice keeps its first
//! position. The registry is drained exactly once; after that it is sealed
//! and further registrations are ignored.

use crate::error::CallbackResult;
use std::rc::Rc;

/// A save-before-exit hook. Runs on the UI thread during close negotiation.
pub type CloseCallback = Rc<dyn Fn() -> CallbackResult>;

/// Wraps a closure as a [`CloseCallback`].
pub fn close_callback(callback: impl Fn() -> CallbackResult + 'static) -> CloseCallback {
    Rc::new(callback)
}

/// Ordered, identity-deduplicated set of close callbacks.
#[derive(Default)]
pub struct CloseCallbackRegistry {
    callbacks: Vec<CloseCallback>,
    sealed: bool,
}

impl std::fmt::Debug for CloseCallbackRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloseCallbackRegistry")
            .field("len", &self.callbacks.len())
            .field("sealed", &self.sealed)
            .finish()
    }
}

impl CloseCallbackRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a callback. Returns `false` if it was already registered or
    /// the registry has been drained.
    pub fn register(&mut self, callback: CloseCallback) -> bool {
        if self.sealed {
            tracing::warn!("Close callback registered after shutdown began, ignoring");
            return false;
        }
        if self.contains(&callback) {
            return false;
        }
        self.callbacks.push(callback);
        true
    }

    /// Removes a callback. Returns `false` if it was not registered.
    pub fn unregister(&mut self, callback: &CloseCallback) -> bool {
        let before = self.callbacks.len();
        self.callbacks
            .retain(|registered| !Rc::ptr_eq(registered, callback));
        self.callbacks.len() != before
    }

    #[must_use]
    pub fn contains(&self, callback: &CloseCallback) -> bool {
        self.callbacks
            .iter()
            .any(|registered| Rc::ptr_eq(registered, callback))
    }

    /// Seals the registry and hands out its callbacks in registration order,
    /// leaving it empty.
    pub fn take_for_drain(&mut self) -> Vec<CloseCallback> {
        self.sealed = true;
        std::mem::take(&mut self.callbacks)
    }

    #[must_use]
    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_callback_registered_once() {
        let mut registry = CloseCallbackRegistry::new();
        let callback = close_callback(|| Ok(()));

        assert!(registry.register(Rc::clone(&callback)));
        assert!(!registry.register(Rc::clone(&callback)));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_distinct_callbacks_keep_order() {
        let mut registry = CloseCallbackRegistry::new();
        let first = close_callback(|| Ok(()));
        let second = close_callback(|| Ok(()));

        registry.register(Rc::clone(&first));
        registry.register(Rc::clone(&second));
        registry.register(Rc::clone(&first));

        let drained = registry.take_for_drain();
        assert_eq!(drained.len(), 2);
        assert!(Rc::ptr_eq(&drained[0], &first));
        assert!(Rc::ptr_eq(&drained[1], &second));
    }

    #[test]
    fn test_unregister() {
        let mut registry = CloseCallbackRegistry::new();
        let callback = close_callback(|| Ok(()));

        registry.register(Rc::clone(&callback));
        assert!(registry.unregister(&callback));
        assert!(!registry.unregister(&callback));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_sealed_after_drain() {
        let mut registry = CloseCallbackRegistry::new();
        registry.register(close_callback(|| Ok(())));

        let drained = registry.take_for_drain();
        assert_eq!(drained.len(), 1);
        assert!(registry.is_empty());
        assert!(registry.is_sealed());

        assert!(!registry.register(close_callback(|| Ok(()))));
        assert!(registry.is_empty());
    }
}

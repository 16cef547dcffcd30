//! Handle → wrapper registry.
//!
//! Keeps at most one live wrapper per handle so that repeated resolutions of
//! the same native object yield the same wrapper, and only that wrapper
//! releases the native reference when it goes away. Entries are weak: the
//! registry never keeps a wrapper alive.

use std::collections::HashMap;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use crate::error::{Error, Result};
use crate::ffi::Handle;

/// How [`HandleRegistry::resolve_or_register`] obtained its wrapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// A live wrapper for the handle already existed.
    Existing,
    /// A new wrapper was created and registered.
    Registered,
}

/// Map from handle to the live wrapper bound to it.
pub struct HandleRegistry<T> {
    entries: Mutex<HashMap<Handle, Weak<T>>>,
}

impl<T> HandleRegistry<T> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// The live wrapper for `handle`, if any.
    pub fn resolve(&self, handle: Handle) -> Option<Arc<T>> {
        self.entries.lock().get(&handle).and_then(Weak::upgrade)
    }

    /// Register `wrapper` for `handle`.
    ///
    /// Fails for the null handle and for a handle that already has a live
    /// wrapper.
    pub fn register(&self, handle: Handle, wrapper: &Arc<T>) -> Result<()> {
        if handle.is_null() {
            return Err(Error::InvalidParameter(
                "cannot register the null handle".to_string(),
            ));
        }

        let mut entries = self.entries.lock();
        if entries.get(&handle).is_some_and(|w| w.strong_count() > 0) {
            return Err(Error::InvalidParameter(format!(
                "{:?} already has a live wrapper",
                handle
            )));
        }
        entries.insert(handle, Arc::downgrade(wrapper));
        Ok(())
    }

    /// Return the live wrapper for `handle`, or build one with `make` and
    /// register it.
    ///
    /// Lookup and insertion happen under one lock acquisition, so two
    /// callers racing on the same handle always end up with the same
    /// wrapper. `make` runs with the lock held and must not touch the
    /// registry.
    pub fn resolve_or_register<F>(&self, handle: Handle, make: F) -> Result<(Arc<T>, Resolution)>
    where
        F: FnOnce() -> Result<Arc<T>>,
    {
        if handle.is_null() {
            return Err(Error::InvalidParameter(
                "cannot register the null handle".to_string(),
            ));
        }

        let mut entries = self.entries.lock();
        if let Some(existing) = entries.get(&handle).and_then(Weak::upgrade) {
            return Ok((existing, Resolution::Existing));
        }

        let wrapper = make()?;
        entries.insert(handle, Arc::downgrade(&wrapper));
        Ok((wrapper, Resolution::Registered))
    }

    /// Drop the entry for `handle` unless a live wrapper still holds it.
    pub fn forget(&self, handle: Handle) {
        let mut entries = self.entries.lock();
        if entries.get(&handle).is_some_and(|w| w.strong_count() == 0) {
            entries.remove(&handle);
        }
    }

    /// Number of handles with a live wrapper.
    pub fn live_count(&self) -> usize {
        self.entries
            .lock()
            .values()
            .filter(|w| w.strong_count() > 0)
            .count()
    }
}

impl<T> Default for HandleRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

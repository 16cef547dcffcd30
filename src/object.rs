//! The shared core behind every wrapper.

use std::fmt;
use std::sync::Arc;

use log::{trace, warn};

use crate::binding::BindingInner;
use crate::class::ClassKind;
use crate::error::Result;
use crate::ffi::{self, Handle, RttiResult, RTTI_SUCCESS};
use crate::gateway::Gateway;

/// Native instance state shared by all wrappers of one handle.
pub(crate) struct ObjectInner {
    handle: Handle,
    kind: ClassKind,
    binding: Arc<BindingInner>,
}

impl ObjectInner {
    /// Take over one native reference to `handle`.
    pub(crate) fn new(handle: Handle, kind: ClassKind, binding: Arc<BindingInner>) -> Self {
        Self {
            handle,
            kind,
            binding,
        }
    }
}

impl Drop for ObjectInner {
    fn drop(&mut self) {
        self.binding.registry.forget(self.handle);

        let code = self.binding.gateway.release_instance(self.handle);
        if code != RTTI_SUCCESS {
            // Ignore errors on drop
            warn!(
                "releasing {} {:?} failed with status {}",
                self.kind, self.handle, code
            );
        } else {
            trace!("released {} {:?}", self.kind, self.handle);
        }
    }
}

/// A reference to a native instance.
///
/// Clones share the native reference; the last clone to go away releases
/// it. An `Object` keeps its binding (and with it the loaded library)
/// alive.
#[derive(Clone)]
pub struct Object {
    inner: Arc<ObjectInner>,
}

impl Object {
    pub(crate) fn from_inner(inner: Arc<ObjectInner>) -> Self {
        Self { inner }
    }

    /// The native handle.
    pub fn handle(&self) -> Handle {
        self.inner.handle
    }

    /// Runtime class, as resolved when the object was first materialized.
    pub fn kind(&self) -> ClassKind {
        self.inner.kind
    }

    /// Whether `self` and `other` wrap the same native instance.
    pub fn same_object(&self, other: &Object) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    pub(crate) fn binding(&self) -> &Arc<BindingInner> {
        &self.inner.binding
    }

    pub(crate) fn gateway(&self) -> &dyn Gateway {
        self.inner.binding.gateway.as_ref()
    }

    /// Check the status of a call made on this object.
    pub(crate) fn check(&self, code: RttiResult) -> Result<()> {
        ffi::check_status(self.gateway(), self.inner.handle, code)
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Object")
            .field("handle", &self.inner.handle)
            .field("kind", &self.inner.kind)
            .finish()
    }
}

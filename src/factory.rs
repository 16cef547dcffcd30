//! Polymorphic factory: turns a handle returned by the library into a
//! wrapper of its runtime class.

use std::sync::Arc;

use log::{trace, warn};

use crate::binding::BindingInner;
use crate::error::{Error, Result};
use crate::family::sealed::Checked;
use crate::family::BaseClass;
use crate::ffi::{Handle, RTTI_SUCCESS};
use crate::object::{Object, ObjectInner};
use crate::registry::Resolution;
use crate::resolver;

/// Materialize `handle` as a `T`.
///
/// The caller hands over the one native reference that came with `handle`.
/// A null handle is "no object" and yields `Ok(None)` without touching the
/// registry. A handle that already has a live wrapper yields that same
/// wrapper, and the extra native reference is released so the library's
/// count stays at one per live wrapper.
pub(crate) fn create<T: BaseClass>(binding: &Arc<BindingInner>, handle: Handle) -> Result<Option<T>> {
    if handle.is_null() {
        return Ok(None);
    }

    let gateway = binding.gateway.as_ref();
    let resolved = binding.registry.resolve_or_register(handle, || {
        let kind = resolver::classify(gateway, handle)?;
        trace!("materializing {} for {:?}", kind, handle);
        Ok(Arc::new(ObjectInner::new(handle, kind, Arc::clone(binding))))
    });

    let object = match resolved {
        Ok((inner, Resolution::Registered)) => Object::from_inner(inner),
        Ok((inner, Resolution::Existing)) => {
            trace!("reusing wrapper for {:?}", handle);
            let object = Object::from_inner(inner);
            object.check(gateway.release_instance(handle))?;
            object
        }
        Err(err) => {
            if gateway.release_instance(handle) != RTTI_SUCCESS {
                warn!("could not release unresolved {:?}", handle);
            }
            return Err(err);
        }
    };

    if !object.kind().is_a(T::KIND) {
        return Err(Error::InvalidCast(format!(
            "{} is not a {}",
            object.kind(),
            T::KIND
        )));
    }

    Ok(Some(T::from_object(object, Checked::new())))
}

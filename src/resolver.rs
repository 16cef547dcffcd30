//! Runtime class resolution for handles.

use log::trace;

use crate::class::ClassKind;
use crate::error::{Error, Result};
use crate::ffi::{self, Handle};
use crate::gateway::Gateway;

/// Ask the library for the runtime class of `handle`.
///
/// The class type id is looked up in the static class table. An id that is
/// missing from the table, or that names an abstract class, is reported as
/// [`Error::UnknownTypeTag`]; it is never coerced to a base class, since that
/// would hide a version mismatch between library and bindings.
pub fn classify(gateway: &dyn Gateway, handle: Handle) -> Result<ClassKind> {
    let mut type_id: u64 = 0;
    ffi::check_status(gateway, handle, gateway.class_type_id(handle, &mut type_id))?;

    let kind = ClassKind::from_type_id(type_id).ok_or(Error::UnknownTypeTag(type_id))?;
    trace!("{:?} classified as {} ({:#018x})", handle, kind, type_id);
    Ok(kind)
}

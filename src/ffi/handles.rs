//! Opaque instance handles.
//!
//! Every object the native component hands out is identified by an
//! address-sized value. The binding never dereferences it; handles are only
//! compared, hashed and passed back across the boundary.

use std::fmt;
use std::os::raw::c_void;

/// Opaque handle to a native instance.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Handle {
    _h: usize,
}

impl Handle {
    /// The null handle ("no object").
    #[inline]
    pub const fn null() -> Self {
        Self { _h: 0 }
    }

    /// Wrap a raw address-sized value.
    #[inline]
    pub const fn from_raw(raw: usize) -> Self {
        Self { _h: raw }
    }

    /// The raw address-sized value.
    #[inline]
    pub const fn as_raw(&self) -> usize {
        self._h
    }

    /// Check if this is the null handle.
    #[inline]
    pub const fn is_null(&self) -> bool {
        self._h == 0
    }

    #[inline]
    pub(crate) fn from_ptr(ptr: *mut c_void) -> Self {
        Self { _h: ptr as usize }
    }

    #[inline]
    pub(crate) fn as_ptr(&self) -> *mut c_void {
        self._h as *mut c_void
    }
}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle({:#x})", self._h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_handle() {
        assert!(Handle::null().is_null());
        assert!(Handle::default().is_null());
        assert!(!Handle::from_raw(0x10).is_null());
    }

    #[test]
    fn test_pointer_conversion() {
        let h = Handle::from_raw(0xdead_beef);
        assert_eq!(Handle::from_ptr(h.as_ptr()), h);
        assert_eq!(format!("{:?}", h), "Handle(0xdeadbeef)");
    }
}

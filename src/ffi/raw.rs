//! Raw C ABI of the RTTI component.
//!
//! The library is loaded at runtime, so instead of an `extern "C"` block this
//! module declares the export names and the function pointer types they are
//! resolved to. Users should prefer the safe wrappers in the parent modules.

use std::os::raw::{c_char, c_void};

/// Status code returned by every export.
pub type RttiResult = i32;

// Status codes
pub const RTTI_SUCCESS: RttiResult = 0;
pub const RTTI_ERROR_NOTIMPLEMENTED: RttiResult = 1;
pub const RTTI_ERROR_INVALIDPARAM: RttiResult = 2;
pub const RTTI_ERROR_INVALIDCAST: RttiResult = 3;
pub const RTTI_ERROR_BUFFERTOOSMALL: RttiResult = 4;
pub const RTTI_ERROR_GENERICEXCEPTION: RttiResult = 5;
pub const RTTI_ERROR_COULDNOTLOADLIBRARY: RttiResult = 6;
pub const RTTI_ERROR_COULDNOTFINDLIBRARYEXPORT: RttiResult = 7;
pub const RTTI_ERROR_INCOMPATIBLEBINARYVERSION: RttiResult = 8;
pub const RTTI_ERROR_NORESULTAVAILABLE: RttiResult = 9;

/// Raw handle type at the ABI.
pub type RttiHandle = *mut c_void;

// Export names
pub const EXPORT_BASE_CLASSTYPEID: &str = "rtti_base_classtypeid";
pub const EXPORT_ANIMAL_NAME: &str = "rtti_animal_name";
pub const EXPORT_TIGER_ROAR: &str = "rtti_tiger_roar";
pub const EXPORT_ANIMALITERATOR_GETNEXTANIMAL: &str = "rtti_animaliterator_getnextanimal";
pub const EXPORT_ZOO_ITERATOR: &str = "rtti_zoo_iterator";
pub const EXPORT_GETVERSION: &str = "rtti_getversion";
pub const EXPORT_GETLASTERROR: &str = "rtti_getlasterror";
pub const EXPORT_RELEASEINSTANCE: &str = "rtti_releaseinstance";
pub const EXPORT_ACQUIREINSTANCE: &str = "rtti_acquireinstance";
pub const EXPORT_GETSYMBOLLOOKUPMETHOD: &str = "rtti_getsymbollookupmethod";
pub const EXPORT_CREATEZOO: &str = "rtti_createzoo";

// Function pointer types
pub type BaseClassTypeIdFn =
    unsafe extern "C" fn(base: RttiHandle, class_type_id: *mut u64) -> RttiResult;
pub type AnimalNameFn = unsafe extern "C" fn(
    animal: RttiHandle,
    buffer_size: u32,
    needed_chars: *mut u32,
    buffer: *mut c_char,
) -> RttiResult;
pub type TigerRoarFn = unsafe extern "C" fn(tiger: RttiHandle) -> RttiResult;
pub type AnimalIteratorGetNextAnimalFn =
    unsafe extern "C" fn(iterator: RttiHandle, animal: *mut RttiHandle) -> RttiResult;
pub type ZooIteratorFn =
    unsafe extern "C" fn(zoo: RttiHandle, iterator: *mut RttiHandle) -> RttiResult;
pub type GetVersionFn =
    unsafe extern "C" fn(major: *mut u32, minor: *mut u32, micro: *mut u32) -> RttiResult;
pub type GetLastErrorFn = unsafe extern "C" fn(
    instance: RttiHandle,
    buffer_size: u32,
    needed_chars: *mut u32,
    buffer: *mut c_char,
    has_error: *mut bool,
) -> RttiResult;
pub type ReleaseInstanceFn = unsafe extern "C" fn(instance: RttiHandle) -> RttiResult;
pub type AcquireInstanceFn = unsafe extern "C" fn(instance: RttiHandle) -> RttiResult;
pub type GetSymbolLookupMethodFn =
    unsafe extern "C" fn(lookup_method: *mut *mut c_void) -> RttiResult;
pub type CreateZooFn = unsafe extern "C" fn(instance: *mut RttiHandle) -> RttiResult;

/// Signature of the component's symbol lookup method.
pub type SymbolLookupFn =
    unsafe extern "C" fn(name: *const c_char, address: *mut *mut c_void) -> RttiResult;

//! The call gateway: the narrow interface through which every native call
//! is made.
//!
//! Each method corresponds to one export of the component and keeps its
//! shape: a status code is returned and results are written into the
//! provided out-parameters. String-returning calls follow the component's
//! buffer protocol: an empty `buffer` is a size query that only fills
//! `needed`; a buffer of at least `needed` bytes receives the NUL-terminated
//! string.
//!
//! [`NativeGateway`](crate::library::NativeGateway) forwards to a loaded
//! library. Tests implement the trait directly to drive the binding without
//! one.

use crate::ffi::raw::RttiResult;
use crate::ffi::Handle;

/// Raw call interface of the RTTI component.
pub trait Gateway: Send + Sync {
    /// `rtti_base_classtypeid`
    fn class_type_id(&self, instance: Handle, class_type_id: &mut u64) -> RttiResult;

    /// `rtti_animal_name`
    fn animal_name(&self, animal: Handle, buffer: &mut [u8], needed: &mut u32) -> RttiResult;

    /// `rtti_tiger_roar`
    fn tiger_roar(&self, tiger: Handle) -> RttiResult;

    /// `rtti_animaliterator_getnextanimal`
    fn animal_iterator_get_next_animal(&self, iterator: Handle, animal: &mut Handle)
        -> RttiResult;

    /// `rtti_zoo_iterator`
    fn zoo_iterator(&self, zoo: Handle, iterator: &mut Handle) -> RttiResult;

    /// `rtti_getversion`
    fn get_version(&self, major: &mut u32, minor: &mut u32, micro: &mut u32) -> RttiResult;

    /// `rtti_getlasterror`
    fn get_last_error(
        &self,
        instance: Handle,
        buffer: &mut [u8],
        needed: &mut u32,
        has_error: &mut bool,
    ) -> RttiResult;

    /// `rtti_acquireinstance`
    fn acquire_instance(&self, instance: Handle) -> RttiResult;

    /// `rtti_releaseinstance`
    fn release_instance(&self, instance: Handle) -> RttiResult;

    /// `rtti_createzoo`
    fn create_zoo(&self, instance: &mut Handle) -> RttiResult;
}

//! Native library loading and export lookup.

use std::ffi::CString;
use std::os::raw::c_void;
use std::path::Path;
use std::ptr;

use libloading::Library;
use log::debug;

use crate::error::{Error, Result};
use crate::ffi::raw::*;
use crate::ffi::Handle;
use crate::gateway::Gateway;

/// Function pointers for every export the bindings use.
struct Exports {
    class_type_id: BaseClassTypeIdFn,
    animal_name: AnimalNameFn,
    tiger_roar: TigerRoarFn,
    get_next_animal: AnimalIteratorGetNextAnimalFn,
    zoo_iterator: ZooIteratorFn,
    get_version: GetVersionFn,
    get_last_error: GetLastErrorFn,
    release_instance: ReleaseInstanceFn,
    acquire_instance: AcquireInstanceFn,
    get_symbol_lookup_method: GetSymbolLookupMethodFn,
    create_zoo: CreateZooFn,
}

/// Resolve one export through `$lookup` and reinterpret it as `$ty`.
macro_rules! export {
    ($lookup:expr, $name:expr, $ty:ty) => {
        std::mem::transmute::<*mut c_void, $ty>($lookup($name)?)
    };
}

impl Exports {
    /// # Safety
    ///
    /// Every address returned by `lookup` must be a function with the
    /// signature declared in [`crate::ffi::raw`] for that export name.
    unsafe fn resolve<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&'static str) -> Result<*mut c_void>,
    {
        Ok(Self {
            class_type_id: export!(lookup, EXPORT_BASE_CLASSTYPEID, BaseClassTypeIdFn),
            animal_name: export!(lookup, EXPORT_ANIMAL_NAME, AnimalNameFn),
            tiger_roar: export!(lookup, EXPORT_TIGER_ROAR, TigerRoarFn),
            get_next_animal: export!(
                lookup,
                EXPORT_ANIMALITERATOR_GETNEXTANIMAL,
                AnimalIteratorGetNextAnimalFn
            ),
            zoo_iterator: export!(lookup, EXPORT_ZOO_ITERATOR, ZooIteratorFn),
            get_version: export!(lookup, EXPORT_GETVERSION, GetVersionFn),
            get_last_error: export!(lookup, EXPORT_GETLASTERROR, GetLastErrorFn),
            release_instance: export!(lookup, EXPORT_RELEASEINSTANCE, ReleaseInstanceFn),
            acquire_instance: export!(lookup, EXPORT_ACQUIREINSTANCE, AcquireInstanceFn),
            get_symbol_lookup_method: export!(
                lookup,
                EXPORT_GETSYMBOLLOOKUPMETHOD,
                GetSymbolLookupMethodFn
            ),
            create_zoo: export!(lookup, EXPORT_CREATEZOO, CreateZooFn),
        })
    }
}

/// A [`Gateway`] backed by a dynamically loaded RTTI library.
pub struct NativeGateway {
    exports: Exports,
    /// Path to the library (for debugging)
    path: String,
    /// Keeps the library mapped for as long as the exports are reachable.
    _library: Option<Library>,
}

impl NativeGateway {
    /// Load the library from a path and resolve all exports by name.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("loading RTTI library from {}", path.display());

        let library = unsafe { Library::new(path) }
            .map_err(|e| Error::LibraryLoad(format!("'{}': {}", path.display(), e)))?;

        let exports = unsafe {
            Exports::resolve(|name| {
                let symbol = library
                    .get::<*mut c_void>(name.as_bytes())
                    .map_err(|e| Error::MissingExport(format!("{} ({})", name, e)))?;
                let address = *symbol;
                if address.is_null() {
                    return Err(Error::MissingExport(name.to_string()));
                }
                debug!("resolved {} at {:p}", name, address);
                Ok(address)
            })?
        };

        Ok(Self {
            exports,
            path: path.display().to_string(),
            _library: Some(library),
        })
    }

    /// Load a library by base name (e.g. `"rtti"`), using the platform's
    /// naming convention.
    pub fn load_by_name(name: &str) -> Result<Self> {
        Self::load(platform_lib_name(name))
    }

    /// Resolve all exports through a component's symbol lookup method.
    ///
    /// This is how a library that is already loaded by someone else is
    /// reached.
    ///
    /// # Safety
    ///
    /// `lookup` must be the symbol lookup method of an RTTI component, and
    /// that component must stay loaded for the lifetime of the gateway.
    pub unsafe fn from_symbol_lookup(lookup: SymbolLookupFn) -> Result<Self> {
        debug!("resolving RTTI exports through symbol lookup method");

        let exports = Exports::resolve(|name| {
            let name_c = CString::new(name)
                .map_err(|_| Error::InvalidParameter(format!("export name {:?}", name)))?;
            let mut address: *mut c_void = ptr::null_mut();
            let code = lookup(name_c.as_ptr(), &mut address);
            if code != RTTI_SUCCESS || address.is_null() {
                return Err(Error::MissingExport(name.to_string()));
            }
            Ok(address)
        })?;

        Ok(Self {
            exports,
            path: String::from("<symbol lookup>"),
            _library: None,
        })
    }

    /// The library's symbol lookup method, for handing to another component.
    pub fn symbol_lookup_method(&self) -> Result<SymbolLookupFn> {
        let mut address: *mut c_void = ptr::null_mut();
        let code = unsafe { (self.exports.get_symbol_lookup_method)(&mut address) };
        if code != RTTI_SUCCESS {
            return Err(Error::native(code, String::new()));
        }
        if address.is_null() {
            return Err(Error::NoResultAvailable(
                "symbol lookup method is null".to_string(),
            ));
        }
        Ok(unsafe { std::mem::transmute::<*mut c_void, SymbolLookupFn>(address) })
    }

    /// Get the path of this library.
    pub fn path(&self) -> &str {
        &self.path
    }
}

/// Get the platform-specific library filename.
pub fn platform_lib_name(name: &str) -> String {
    #[cfg(target_os = "windows")]
    {
        format!("{}.dll", name)
    }
    #[cfg(target_os = "macos")]
    {
        format!("lib{}.dylib", name)
    }
    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        format!("lib{}.so", name)
    }
}

/// Split a buffer into the (size, pointer) pair the ABI expects; an empty
/// buffer becomes a null pointer.
fn buffer_parts(buffer: &mut [u8]) -> (u32, *mut std::os::raw::c_char) {
    if buffer.is_empty() {
        (0, ptr::null_mut())
    } else {
        (buffer.len() as u32, buffer.as_mut_ptr().cast())
    }
}

impl Gateway for NativeGateway {
    fn class_type_id(&self, instance: Handle, class_type_id: &mut u64) -> RttiResult {
        unsafe { (self.exports.class_type_id)(instance.as_ptr(), class_type_id) }
    }

    fn animal_name(&self, animal: Handle, buffer: &mut [u8], needed: &mut u32) -> RttiResult {
        let (size, data) = buffer_parts(buffer);
        unsafe { (self.exports.animal_name)(animal.as_ptr(), size, needed, data) }
    }

    fn tiger_roar(&self, tiger: Handle) -> RttiResult {
        unsafe { (self.exports.tiger_roar)(tiger.as_ptr()) }
    }

    fn animal_iterator_get_next_animal(
        &self,
        iterator: Handle,
        animal: &mut Handle,
    ) -> RttiResult {
        let mut out: RttiHandle = ptr::null_mut();
        let code = unsafe { (self.exports.get_next_animal)(iterator.as_ptr(), &mut out) };
        *animal = Handle::from_ptr(out);
        code
    }

    fn zoo_iterator(&self, zoo: Handle, iterator: &mut Handle) -> RttiResult {
        let mut out: RttiHandle = ptr::null_mut();
        let code = unsafe { (self.exports.zoo_iterator)(zoo.as_ptr(), &mut out) };
        *iterator = Handle::from_ptr(out);
        code
    }

    fn get_version(&self, major: &mut u32, minor: &mut u32, micro: &mut u32) -> RttiResult {
        unsafe { (self.exports.get_version)(major, minor, micro) }
    }

    fn get_last_error(
        &self,
        instance: Handle,
        buffer: &mut [u8],
        needed: &mut u32,
        has_error: &mut bool,
    ) -> RttiResult {
        let (size, data) = buffer_parts(buffer);
        unsafe { (self.exports.get_last_error)(instance.as_ptr(), size, needed, data, has_error) }
    }

    fn acquire_instance(&self, instance: Handle) -> RttiResult {
        unsafe { (self.exports.acquire_instance)(instance.as_ptr()) }
    }

    fn release_instance(&self, instance: Handle) -> RttiResult {
        unsafe { (self.exports.release_instance)(instance.as_ptr()) }
    }

    fn create_zoo(&self, instance: &mut Handle) -> RttiResult {
        let mut out: RttiHandle = ptr::null_mut();
        let code = unsafe { (self.exports.create_zoo)(&mut out) };
        *instance = Handle::from_ptr(out);
        code
    }
}

//! The binding context: one gateway plus the registry of its wrappers.

use std::env;
use std::path::Path;
use std::sync::Arc;

use log::debug;

use crate::error::{Error, Result};
use crate::factory;
use crate::family::{BaseClass, Zoo};
use crate::ffi::{self, Handle};
use crate::gateway::Gateway;
use crate::library::NativeGateway;
use crate::object::ObjectInner;
use crate::registry::HandleRegistry;
use crate::types::{BindingOptions, Version};
use crate::version;

/// Environment variable naming the library used by [`Rtti::from_env`].
pub const LIBRARY_ENV: &str = "RTTI_LIBRARY";

pub(crate) struct BindingInner {
    pub(crate) gateway: Arc<dyn Gateway>,
    pub(crate) registry: HandleRegistry<ObjectInner>,
}

/// A binding to one RTTI library.
///
/// Cloning is cheap; clones share the gateway and the handle registry.
/// Every wrapper created through a binding keeps it alive, so the library
/// stays loaded for as long as any of its objects exists.
///
/// # Example
///
/// ```no_run
/// use rtti::{AnimalClass, Rtti};
///
/// # fn main() -> rtti::Result<()> {
/// let rtti = Rtti::load_by_name("rtti")?;
/// println!("library version {}", rtti.get_version()?);
///
/// let zoo = rtti.create_zoo()?;
/// for animal in zoo.animals()? {
///     println!("{}", animal?.name()?);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Rtti {
    inner: Arc<BindingInner>,
}

impl Rtti {
    /// Load the library at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::with_options(Arc::new(NativeGateway::load(path)?), BindingOptions::default())
    }

    /// Load a library by base name (e.g. `"rtti"`).
    pub fn load_by_name(name: &str) -> Result<Self> {
        Self::with_options(
            Arc::new(NativeGateway::load_by_name(name)?),
            BindingOptions::default(),
        )
    }

    /// Load the library named by the `RTTI_LIBRARY` environment variable.
    pub fn from_env() -> Result<Self> {
        let path = env::var(LIBRARY_ENV).map_err(|_| {
            Error::LibraryLoad(format!("environment variable {} is not set", LIBRARY_ENV))
        })?;
        Self::load(path)
    }

    /// Bind to an arbitrary gateway with default options.
    pub fn with_gateway(gateway: Arc<dyn Gateway>) -> Result<Self> {
        Self::with_options(gateway, BindingOptions::default())
    }

    /// Bind to an arbitrary gateway.
    pub fn with_options(gateway: Arc<dyn Gateway>, options: BindingOptions) -> Result<Self> {
        let rtti = Self {
            inner: Arc::new(BindingInner {
                gateway,
                registry: HandleRegistry::new(),
            }),
        };
        if options.check_binary_version {
            rtti.check_binary_version()?;
        }
        Ok(rtti)
    }

    fn gateway(&self) -> &dyn Gateway {
        self.inner.gateway.as_ref()
    }

    /// Fail with [`Error::InvalidCast`] unless `object` was created by this binding.
    fn ensure_bound<T: BaseClass>(&self, object: &T) -> Result<()> {
        if Arc::ptr_eq(object.object().binding(), &self.inner) {
            Ok(())
        } else {
            Err(Error::InvalidCast(format!(
                "{} {:?} belongs to a different binding",
                object.runtime_class(),
                object.handle()
            )))
        }
    }

    /// Retrieve the binary version of the library.
    pub fn get_version(&self) -> Result<Version> {
        let (mut major, mut minor, mut micro) = (0, 0, 0);
        let code = self.gateway().get_version(&mut major, &mut minor, &mut micro);
        ffi::check_status(self.gateway(), Handle::null(), code)?;
        Ok(Version::new(major, minor, micro))
    }

    /// Fail with [`Error::IncompatibleBinaryVersion`] unless the library's
    /// major version matches the bindings'.
    pub fn check_binary_version(&self) -> Result<Version> {
        let found = self.get_version()?;
        let expected = version::BINDING;
        debug!("library version {}, bindings version {}", found, expected);
        if !found.is_compatible_with(&expected) {
            return Err(Error::IncompatibleBinaryVersion {
                found: found.to_string(),
                expected: expected.to_string(),
            });
        }
        Ok(found)
    }

    /// Return the last error recorded on `instance`, if any.
    pub fn get_last_error<T: BaseClass>(&self, instance: &T) -> Result<Option<String>> {
        self.ensure_bound(instance)?;
        ffi::last_error(self.gateway(), instance.handle())
    }

    /// Acquire an additional native reference to `instance`.
    ///
    /// Wrappers manage their own reference; this is for handing the
    /// instance to code outside the bindings. Every acquire must be paired
    /// with a [`release_instance`](Self::release_instance).
    pub fn acquire_instance<T: BaseClass>(&self, instance: &T) -> Result<()> {
        self.ensure_bound(instance)?;
        let code = self.gateway().acquire_instance(instance.handle());
        ffi::check_status(self.gateway(), instance.handle(), code)
    }

    /// Release a native reference taken with [`acquire_instance`](Self::acquire_instance).
    pub fn release_instance<T: BaseClass>(&self, instance: &T) -> Result<()> {
        self.ensure_bound(instance)?;
        let code = self.gateway().release_instance(instance.handle());
        ffi::check_status(self.gateway(), instance.handle(), code)
    }

    /// Create a new zoo with animals.
    pub fn create_zoo(&self) -> Result<Zoo> {
        let mut handle = Handle::null();
        let code = self.gateway().create_zoo(&mut handle);
        ffi::check_status(self.gateway(), Handle::null(), code)?;
        self.create(handle)?
            .ok_or_else(|| Error::NoResultAvailable("zoo was a null handle".to_string()))
    }

    /// Materialize a handle returned by the library as a `T`.
    ///
    /// Takes over the one native reference that came with `handle`. Returns
    /// `Ok(None)` for the null handle. Repeated calls for the same live
    /// instance return wrappers of the same object. Fails with
    /// [`Error::UnknownTypeTag`] if the runtime class is unknown and with
    /// [`Error::InvalidCast`] if it does not derive from `T`.
    pub fn create<T: BaseClass>(&self, handle: Handle) -> Result<Option<T>> {
        factory::create(&self.inner, handle)
    }

    /// Number of native instances with a live wrapper.
    pub fn live_objects(&self) -> usize {
        self.inner.registry.live_count()
    }

    /// Whether two bindings are the same.
    pub fn same_binding(&self, other: &Rtti) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

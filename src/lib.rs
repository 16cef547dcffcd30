//! Rust bindings for the RTTI component library.
//!
//! The component exposes a polymorphic family of classes through a C ABI.
//! Calls whose declared return type is a base class (an `Animal` coming out
//! of an iterator, say) hand back an opaque handle; this crate asks the
//! library for the runtime class of that handle and materializes the
//! matching wrapper, keeping exactly one wrapper per live native instance.
//!
//! # Example
//!
//! ```no_run
//! use rtti::{AnimalClass, BaseClass, ConcreteAnimal, Rtti};
//!
//! fn main() -> rtti::Result<()> {
//!     // Load the library and check its binary version
//!     let rtti = Rtti::load_by_name("rtti")?;
//!     println!("RTTI library {}", rtti.get_version()?);
//!
//!     let zoo = rtti.create_zoo()?;
//!     for animal in zoo.animals()? {
//!         let animal = animal?;
//!         println!("{} is a {}", animal.name()?, animal.runtime_class());
//!
//!         if let ConcreteAnimal::Tiger(tiger) = animal.concrete()? {
//!             tiger.roar()?;
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Testing without a library
//!
//! Every native call goes through the [`Gateway`] trait. Implement it to
//! drive the bindings from a test double and pass it to
//! [`Rtti::with_gateway`].

pub mod binding;
pub mod class;
pub mod error;
mod factory;
pub mod family;
pub mod ffi;
pub mod gateway;
pub mod iterator;
pub mod library;
mod object;
pub mod registry;
mod resolver;
pub mod types;

// Re-export main types at the crate root
pub use binding::{Rtti, LIBRARY_ENV};
pub use class::ClassKind;
pub use error::{Error, ErrorKind, Result};
pub use family::{
    Animal, AnimalClass, AnimalIterator, Base, BaseClass, ConcreteAnimal, Giraffe, Mammal,
    MammalClass, Reptile, ReptileClass, Snake, Tiger, Turtle, Zoo,
};
pub use ffi::Handle;
pub use gateway::Gateway;
pub use iterator::{Animals, IteratorState};
pub use library::NativeGateway;
pub use object::Object;
pub use types::{BindingOptions, Version};

/// Version constants of the binary interface these bindings target.
pub mod version {
    use crate::types::Version;

    /// Interface major version.
    pub const MAJOR: u32 = 1;
    /// Interface minor version.
    pub const MINOR: u32 = 0;
    /// Interface micro version.
    pub const MICRO: u32 = 0;

    /// The full bindings version.
    pub const BINDING: Version = Version::new(MAJOR, MINOR, MICRO);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binding_version() {
        assert_eq!(version::BINDING.to_string(), "1.0.0");
    }
}

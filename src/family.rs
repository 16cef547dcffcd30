//! Typed wrappers for the RTTI class family.
//!
//! The component's class hierarchy is
//!
//! ```text
//! Base ─┬─ Animal ─┬─ Mammal ─┬─ Giraffe
//!       │          │          └─ Tiger
//!       │          └─ Reptile ┬─ Snake
//!       │                     └─ Turtle
//!       ├─ AnimalIterator
//!       └─ Zoo
//! ```
//!
//! Every class is a thin wrapper around an [`Object`]. Inherited operations
//! come from the capability traits ([`BaseClass`], [`AnimalClass`], ...).
//! Upcasts are infallible `From` conversions; downcasts go through
//! [`BaseClass::cast`], which checks the runtime class.
//!
//! # Example
//!
//! ```no_run
//! use rtti::{AnimalClass, ConcreteAnimal, Rtti};
//!
//! # fn main() -> rtti::Result<()> {
//! let rtti = Rtti::load_by_name("rtti")?;
//! let zoo = rtti.create_zoo()?;
//! for animal in zoo.animals()? {
//!     let animal = animal?;
//!     match animal.concrete()? {
//!         ConcreteAnimal::Tiger(tiger) => tiger.roar()?,
//!         other => println!("{}", other.name()?),
//!     }
//! }
//! # Ok(())
//! # }
//! ```

use crate::class::ClassKind;
use crate::error::{Error, Result};
use crate::ffi::{self, Handle};
use crate::factory;
use crate::iterator::Animals;
use crate::object::Object;

pub(crate) mod sealed {
    use crate::object::Object;

    /// Proof that the runtime class of an object was checked.
    ///
    /// Only this crate can create one, so only the factory and checked
    /// casts can put an object into a wrapper.
    pub struct Checked(());

    impl Checked {
        pub(crate) fn new() -> Self {
            Checked(())
        }
    }

    pub trait Sealed: Sized {
        fn from_object(object: Object, checked: Checked) -> Self;
    }
}

use sealed::{Checked, Sealed};

/// Operations every class supports.
///
/// This trait is sealed: wrappers are only created by the library's
/// factory and by checked casts.
///
/// ```compile_fail
/// use rtti::{BaseClass, Tiger, Zoo};
///
/// fn forge(zoo: &Zoo) -> Tiger {
///     Tiger::from_object(zoo.object().clone())
/// }
/// ```
pub trait BaseClass: Sealed {
    /// The class this wrapper type stands for.
    const KIND: ClassKind;

    /// The shared wrapper core.
    fn object(&self) -> &Object;

    /// The native handle.
    fn handle(&self) -> Handle {
        self.object().handle()
    }

    /// Runtime class of the wrapped instance (may be more derived than `KIND`).
    fn runtime_class(&self) -> ClassKind {
        self.object().kind()
    }

    /// Query the class type id from the library.
    fn class_type_id(&self) -> Result<u64> {
        let object = self.object();
        let mut type_id: u64 = 0;
        object.check(object.gateway().class_type_id(object.handle(), &mut type_id))?;
        Ok(type_id)
    }

    /// Convert to another class of the family.
    ///
    /// Fails with [`Error::InvalidCast`] if the runtime class does not
    /// derive from `T`. The result wraps the same instance.
    fn cast<T: BaseClass>(&self) -> Result<T> {
        let kind = self.runtime_class();
        if kind.is_a(T::KIND) {
            Ok(T::from_object(self.object().clone(), Checked::new()))
        } else {
            Err(Error::InvalidCast(format!("{} is not a {}", kind, T::KIND)))
        }
    }

    /// Whether both wrappers refer to the same native instance.
    fn same_object<U: BaseClass>(&self, other: &U) -> bool {
        self.object().same_object(other.object())
    }
}

/// Operations of `Animal` and its subclasses.
pub trait AnimalClass: BaseClass {
    /// Get the name of the animal.
    fn name(&self) -> Result<String> {
        let object = self.object();
        let gateway = object.gateway();
        ffi::read_string(gateway, object.handle(), |buffer, needed| {
            gateway.animal_name(object.handle(), buffer, needed)
        })
    }
}

/// Marker for `Mammal` and its subclasses.
pub trait MammalClass: AnimalClass {}

/// Marker for `Reptile` and its subclasses.
pub trait ReptileClass: AnimalClass {}

macro_rules! define_class {
    ($(#[$meta:meta])* $name:ident, $kind:expr) => {
        $(#[$meta])*
        #[derive(Clone, Debug)]
        pub struct $name {
            object: Object,
        }

        impl Sealed for $name {
            fn from_object(object: Object, _: Checked) -> Self {
                Self { object }
            }
        }

        impl BaseClass for $name {
            const KIND: ClassKind = $kind;

            fn object(&self) -> &Object {
                &self.object
            }
        }
    };
}

macro_rules! upcast {
    ($from:ident => $($to:ident),+) => {
        $(
            impl From<$from> for $to {
                fn from(value: $from) -> Self {
                    $to { object: value.object }
                }
            }
        )+
    };
}

define_class!(
    /// Any instance of the component.
    Base,
    ClassKind::Base
);
define_class!(
    /// An animal of unknown concrete class.
    Animal,
    ClassKind::Animal
);
define_class!(
    /// A mammal.
    Mammal,
    ClassKind::Mammal
);
define_class!(
    /// A reptile.
    Reptile,
    ClassKind::Reptile
);
define_class!(Giraffe, ClassKind::Giraffe);
define_class!(Tiger, ClassKind::Tiger);
define_class!(Snake, ClassKind::Snake);
define_class!(Turtle, ClassKind::Turtle);
define_class!(
    /// Iterator over the animals of a zoo.
    ///
    /// Use [`AnimalIterator::animals`] for a checked, fused iterator.
    AnimalIterator,
    ClassKind::AnimalIterator
);
define_class!(
    /// A zoo full of animals.
    Zoo,
    ClassKind::Zoo
);

impl AnimalClass for Animal {}
impl AnimalClass for Mammal {}
impl AnimalClass for Reptile {}
impl AnimalClass for Giraffe {}
impl AnimalClass for Tiger {}
impl AnimalClass for Snake {}
impl AnimalClass for Turtle {}

impl MammalClass for Mammal {}
impl MammalClass for Giraffe {}
impl MammalClass for Tiger {}

impl ReptileClass for Reptile {}
impl ReptileClass for Snake {}
impl ReptileClass for Turtle {}

upcast!(Animal => Base);
upcast!(Mammal => Animal, Base);
upcast!(Reptile => Animal, Base);
upcast!(Giraffe => Mammal, Animal, Base);
upcast!(Tiger => Mammal, Animal, Base);
upcast!(Snake => Reptile, Animal, Base);
upcast!(Turtle => Reptile, Animal, Base);
upcast!(AnimalIterator => Base);
upcast!(Zoo => Base);

/// An animal resolved to its concrete class.
#[derive(Clone, Debug)]
pub enum ConcreteAnimal {
    Giraffe(Giraffe),
    Tiger(Tiger),
    Snake(Snake),
    Turtle(Turtle),
}

impl ConcreteAnimal {
    /// Runtime class.
    pub fn kind(&self) -> ClassKind {
        match self {
            ConcreteAnimal::Giraffe(_) => ClassKind::Giraffe,
            ConcreteAnimal::Tiger(_) => ClassKind::Tiger,
            ConcreteAnimal::Snake(_) => ClassKind::Snake,
            ConcreteAnimal::Turtle(_) => ClassKind::Turtle,
        }
    }

    /// Get the name of the animal.
    pub fn name(&self) -> Result<String> {
        match self {
            ConcreteAnimal::Giraffe(a) => a.name(),
            ConcreteAnimal::Tiger(a) => a.name(),
            ConcreteAnimal::Snake(a) => a.name(),
            ConcreteAnimal::Turtle(a) => a.name(),
        }
    }
}

impl From<ConcreteAnimal> for Animal {
    fn from(value: ConcreteAnimal) -> Self {
        match value {
            ConcreteAnimal::Giraffe(a) => a.into(),
            ConcreteAnimal::Tiger(a) => a.into(),
            ConcreteAnimal::Snake(a) => a.into(),
            ConcreteAnimal::Turtle(a) => a.into(),
        }
    }
}

impl Animal {
    /// Resolve to the concrete class.
    ///
    /// Fails with [`Error::InvalidCast`] if the runtime class is not one of
    /// the concrete animals.
    pub fn concrete(&self) -> Result<ConcreteAnimal> {
        let object = self.object.clone();
        match object.kind() {
            ClassKind::Giraffe => Ok(ConcreteAnimal::Giraffe(Giraffe { object })),
            ClassKind::Tiger => Ok(ConcreteAnimal::Tiger(Tiger { object })),
            ClassKind::Snake => Ok(ConcreteAnimal::Snake(Snake { object })),
            ClassKind::Turtle => Ok(ConcreteAnimal::Turtle(Turtle { object })),
            other => Err(Error::InvalidCast(format!(
                "{} is not a concrete animal",
                other
            ))),
        }
    }
}

impl Tiger {
    /// Roar like a tiger.
    pub fn roar(&self) -> Result<()> {
        self.object
            .check(self.object.gateway().tiger_roar(self.object.handle()))
    }
}

impl AnimalIterator {
    /// Return the next animal, or `None` once the iterator is exhausted.
    ///
    /// This is the raw call; it does not track whether the end has already
    /// been reached.
    pub fn get_next_animal(&self) -> Result<Option<Animal>> {
        let object = &self.object;
        let mut animal = Handle::null();
        object.check(
            object
                .gateway()
                .animal_iterator_get_next_animal(object.handle(), &mut animal),
        )?;
        factory::create(object.binding(), animal)
    }

    /// Consume the iterator into a checked, fused [`Iterator`] of animals.
    pub fn animals(self) -> Animals {
        Animals::new(self)
    }
}

impl Zoo {
    /// Return an iterator over all zoo animals.
    pub fn iterator(&self) -> Result<AnimalIterator> {
        let object = &self.object;
        let mut iterator = Handle::null();
        object.check(object.gateway().zoo_iterator(object.handle(), &mut iterator))?;
        factory::create(object.binding(), iterator)?.ok_or_else(|| {
            Error::NoResultAvailable("zoo returned a null iterator".to_string())
        })
    }

    /// Iterate over all zoo animals.
    pub fn animals(&self) -> Result<Animals> {
        Ok(self.iterator()?.animals())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::binding::BindingInner;
    use crate::ffi::{RttiResult, RTTI_SUCCESS};
    use crate::gateway::Gateway;
    use crate::object::ObjectInner;
    use crate::registry::HandleRegistry;

    /// Accepts every call.
    struct NullGateway;

    impl Gateway for NullGateway {
        fn class_type_id(&self, _: Handle, _: &mut u64) -> RttiResult {
            RTTI_SUCCESS
        }
        fn animal_name(&self, _: Handle, _: &mut [u8], _: &mut u32) -> RttiResult {
            RTTI_SUCCESS
        }
        fn tiger_roar(&self, _: Handle) -> RttiResult {
            RTTI_SUCCESS
        }
        fn animal_iterator_get_next_animal(&self, _: Handle, _: &mut Handle) -> RttiResult {
            RTTI_SUCCESS
        }
        fn zoo_iterator(&self, _: Handle, _: &mut Handle) -> RttiResult {
            RTTI_SUCCESS
        }
        fn get_version(&self, _: &mut u32, _: &mut u32, _: &mut u32) -> RttiResult {
            RTTI_SUCCESS
        }
        fn get_last_error(
            &self,
            _: Handle,
            _: &mut [u8],
            _: &mut u32,
            has_error: &mut bool,
        ) -> RttiResult {
            *has_error = false;
            RTTI_SUCCESS
        }
        fn acquire_instance(&self, _: Handle) -> RttiResult {
            RTTI_SUCCESS
        }
        fn release_instance(&self, _: Handle) -> RttiResult {
            RTTI_SUCCESS
        }
        fn create_zoo(&self, _: &mut Handle) -> RttiResult {
            RTTI_SUCCESS
        }
    }

    fn object_of(kind: ClassKind) -> Object {
        let binding = Arc::new(BindingInner {
            gateway: Arc::new(NullGateway),
            registry: HandleRegistry::new(),
        });
        Object::from_inner(Arc::new(ObjectInner::new(
            Handle::from_raw(0x40),
            kind,
            binding,
        )))
    }

    #[test]
    fn test_concrete_rejects_non_animal() {
        let animal = Animal::from_object(object_of(ClassKind::Zoo), Checked::new());
        let err = animal.concrete().unwrap_err();
        assert!(err.is_invalid_cast(), "unexpected error: {}", err);
    }

    #[test]
    fn test_concrete_resolves_each_animal() {
        for kind in [
            ClassKind::Giraffe,
            ClassKind::Tiger,
            ClassKind::Snake,
            ClassKind::Turtle,
        ] {
            let animal = Animal::from_object(object_of(kind), Checked::new());
            assert_eq!(animal.concrete().unwrap().kind(), kind);
        }
    }

    #[test]
    fn test_cast_keeps_object() {
        let base = Base::from_object(object_of(ClassKind::Tiger), Checked::new());
        let tiger: Tiger = base.cast().unwrap();
        assert!(tiger.same_object(&base));
        assert!(base.cast::<Zoo>().unwrap_err().is_invalid_cast());
    }
}

//! The closed set of classes the component can hand out.
//!
//! A class type id is the first 64 bits of the SHA-1 of the qualified class
//! name. The id → class table is fixed when the bindings are built; it is not
//! discoverable from the library at runtime.

use std::collections::HashMap;
use std::fmt;

use once_cell::sync::Lazy;

/// Every class of the RTTI component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassKind {
    Base,
    Animal,
    Mammal,
    Reptile,
    Giraffe,
    Tiger,
    Snake,
    Turtle,
    AnimalIterator,
    Zoo,
}

/// (class, type id, abstract)
static CLASS_TABLE: [(ClassKind, u64, bool); 10] = [
    (ClassKind::Base, 0x1549AD28813DAE05, true),
    (ClassKind::Animal, 0x8B40467DA6D327AF, true),
    (ClassKind::Mammal, 0xBC9D5FA7750C1020, true),
    (ClassKind::Reptile, 0x6756AA8EA5802EC3, true),
    (ClassKind::Giraffe, 0x9751971BD2C2D958, false),
    (ClassKind::Tiger, 0x08D007E7B5F7BAF4, false),
    (ClassKind::Snake, 0x5F6826EF909803B2, false),
    (ClassKind::Turtle, 0x8E551B208A2E8321, false),
    (ClassKind::AnimalIterator, 0xF1917FE6BBE77831, false),
    (ClassKind::Zoo, 0x2262ABE80A5E7878, false),
];

/// Concrete classes indexed by type id. Abstract classes are absent.
static CONCRETE_BY_TYPE_ID: Lazy<HashMap<u64, ClassKind>> = Lazy::new(|| {
    CLASS_TABLE
        .iter()
        .filter(|(_, _, is_abstract)| !is_abstract)
        .map(|&(kind, type_id, _)| (type_id, kind))
        .collect()
});

impl ClassKind {
    /// All classes, base classes first.
    pub const ALL: [ClassKind; 10] = [
        ClassKind::Base,
        ClassKind::Animal,
        ClassKind::Mammal,
        ClassKind::Reptile,
        ClassKind::Giraffe,
        ClassKind::Tiger,
        ClassKind::Snake,
        ClassKind::Turtle,
        ClassKind::AnimalIterator,
        ClassKind::Zoo,
    ];

    fn entry(self) -> &'static (ClassKind, u64, bool) {
        &CLASS_TABLE[self as usize]
    }

    /// Class type id reported by `rtti_base_classtypeid`.
    pub fn type_id(self) -> u64 {
        self.entry().1
    }

    /// Whether the class can be the runtime class of an instance.
    pub fn is_abstract(self) -> bool {
        self.entry().2
    }

    /// Qualified class name, e.g. `RTTI::Tiger`.
    pub const fn name(self) -> &'static str {
        match self {
            ClassKind::Base => "RTTI::Base",
            ClassKind::Animal => "RTTI::Animal",
            ClassKind::Mammal => "RTTI::Mammal",
            ClassKind::Reptile => "RTTI::Reptile",
            ClassKind::Giraffe => "RTTI::Giraffe",
            ClassKind::Tiger => "RTTI::Tiger",
            ClassKind::Snake => "RTTI::Snake",
            ClassKind::Turtle => "RTTI::Turtle",
            ClassKind::AnimalIterator => "RTTI::AnimalIterator",
            ClassKind::Zoo => "RTTI::Zoo",
        }
    }

    /// Direct parent class.
    pub const fn parent(self) -> Option<ClassKind> {
        match self {
            ClassKind::Base => None,
            ClassKind::Animal | ClassKind::AnimalIterator | ClassKind::Zoo => {
                Some(ClassKind::Base)
            }
            ClassKind::Mammal | ClassKind::Reptile => Some(ClassKind::Animal),
            ClassKind::Giraffe | ClassKind::Tiger => Some(ClassKind::Mammal),
            ClassKind::Snake | ClassKind::Turtle => Some(ClassKind::Reptile),
        }
    }

    /// Whether an instance of `self` satisfies the capability `other`.
    pub fn is_a(self, other: ClassKind) -> bool {
        let mut current = Some(self);
        while let Some(kind) = current {
            if kind == other {
                return true;
            }
            current = kind.parent();
        }
        false
    }

    /// Flat lookup of a concrete class by type id.
    pub fn from_type_id(type_id: u64) -> Option<ClassKind> {
        CONCRETE_BY_TYPE_ID.get(&type_id).copied()
    }
}

impl fmt::Display for ClassKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

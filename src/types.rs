//! Type definitions and options.

use std::fmt;

/// A binary interface version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub micro: u32,
}

impl Version {
    /// Create a version.
    pub const fn new(major: u32, minor: u32, micro: u32) -> Self {
        Self {
            major,
            minor,
            micro,
        }
    }

    /// A library of version `self` can serve bindings written for `bindings`
    /// when the major versions match.
    pub fn is_compatible_with(&self, bindings: &Version) -> bool {
        self.major == bindings.major
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.micro)
    }
}

/// Options for creating a binding.
#[derive(Debug, Clone)]
pub struct BindingOptions {
    /// Check the library's binary version when the binding is created.
    pub check_binary_version: bool,
}

impl Default for BindingOptions {
    fn default() -> Self {
        Self {
            check_binary_version: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_display() {
        assert_eq!(Version::new(1, 0, 0).to_string(), "1.0.0");
    }

    #[test]
    fn test_version_compatibility() {
        let bindings = Version::new(1, 0, 0);
        assert!(Version::new(1, 0, 0).is_compatible_with(&bindings));
        assert!(Version::new(1, 4, 2).is_compatible_with(&bindings));
        assert!(!Version::new(2, 0, 0).is_compatible_with(&bindings));
        assert!(!Version::new(0, 9, 0).is_compatible_with(&bindings));
    }
}

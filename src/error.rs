//! Error types for the rtti crate.

use std::fmt;

use thiserror::Error;

use crate::ffi::raw::*;
use crate::iterator::IteratorState;

/// Result type alias for rtti operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Kind of a failure, independent of where it was raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotImplemented,
    InvalidParameter,
    InvalidCast,
    BufferTooSmall,
    GenericFailure,
    LibraryLoadFailure,
    MissingExport,
    IncompatibleBinaryVersion,
    NoResultAvailable,
    /// Iterator used after reaching a terminal state.
    ProtocolViolation,
    /// Class type id with no concrete class mapping.
    UnknownTypeTag,
}

impl ErrorKind {
    /// Map a native status code to its kind.
    ///
    /// Returns `None` for success and for codes the component does not define.
    pub const fn from_code(code: RttiResult) -> Option<Self> {
        match code {
            RTTI_ERROR_NOTIMPLEMENTED => Some(Self::NotImplemented),
            RTTI_ERROR_INVALIDPARAM => Some(Self::InvalidParameter),
            RTTI_ERROR_INVALIDCAST => Some(Self::InvalidCast),
            RTTI_ERROR_BUFFERTOOSMALL => Some(Self::BufferTooSmall),
            RTTI_ERROR_GENERICEXCEPTION => Some(Self::GenericFailure),
            RTTI_ERROR_COULDNOTLOADLIBRARY => Some(Self::LibraryLoadFailure),
            RTTI_ERROR_COULDNOTFINDLIBRARYEXPORT => Some(Self::MissingExport),
            RTTI_ERROR_INCOMPATIBLEBINARYVERSION => Some(Self::IncompatibleBinaryVersion),
            RTTI_ERROR_NORESULTAVAILABLE => Some(Self::NoResultAvailable),
            _ => None,
        }
    }

    /// Native status code for this kind. Kinds raised only on the Rust side
    /// have none.
    pub const fn code(self) -> Option<RttiResult> {
        match self {
            Self::NotImplemented => Some(RTTI_ERROR_NOTIMPLEMENTED),
            Self::InvalidParameter => Some(RTTI_ERROR_INVALIDPARAM),
            Self::InvalidCast => Some(RTTI_ERROR_INVALIDCAST),
            Self::BufferTooSmall => Some(RTTI_ERROR_BUFFERTOOSMALL),
            Self::GenericFailure => Some(RTTI_ERROR_GENERICEXCEPTION),
            Self::LibraryLoadFailure => Some(RTTI_ERROR_COULDNOTLOADLIBRARY),
            Self::MissingExport => Some(RTTI_ERROR_COULDNOTFINDLIBRARYEXPORT),
            Self::IncompatibleBinaryVersion => Some(RTTI_ERROR_INCOMPATIBLEBINARYVERSION),
            Self::NoResultAvailable => Some(RTTI_ERROR_NORESULTAVAILABLE),
            Self::ProtocolViolation | Self::UnknownTypeTag => None,
        }
    }

    /// Short name, as used by the component's error constants.
    pub const fn name(self) -> &'static str {
        match self {
            Self::NotImplemented => "NOTIMPLEMENTED",
            Self::InvalidParameter => "INVALIDPARAM",
            Self::InvalidCast => "INVALIDCAST",
            Self::BufferTooSmall => "BUFFERTOOSMALL",
            Self::GenericFailure => "GENERICEXCEPTION",
            Self::LibraryLoadFailure => "COULDNOTLOADLIBRARY",
            Self::MissingExport => "COULDNOTFINDLIBRARYEXPORT",
            Self::IncompatibleBinaryVersion => "INCOMPATIBLEBINARYVERSION",
            Self::NoResultAvailable => "NORESULTAVAILABLE",
            Self::ProtocolViolation => "PROTOCOLVIOLATION",
            Self::UnknownTypeTag => "UNKNOWNTYPETAG",
        }
    }

    /// Human-readable description.
    pub const fn description(self) -> &'static str {
        match self {
            Self::NotImplemented => "functionality not implemented",
            Self::InvalidParameter => "an invalid parameter was passed",
            Self::InvalidCast => "a type cast failed",
            Self::BufferTooSmall => "a provided buffer is too small",
            Self::GenericFailure => "a generic exception occurred",
            Self::LibraryLoadFailure => "the library could not be loaded",
            Self::MissingExport => "a required exported symbol could not be found",
            Self::IncompatibleBinaryVersion => "the version of the binary interface does not match the bindings interface",
            Self::NoResultAvailable => "no result is available",
            Self::ProtocolViolation => "the iterator was used after it reached a terminal state",
            Self::UnknownTypeTag => "the class type id has no known concrete class",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Error type for rtti operations.
#[derive(Error, Debug)]
pub enum Error {
    /// A native call returned a failure status.
    #[error("{kind} (#{code}){}", format_message(.message))]
    Native {
        /// Kind derived from the status code.
        kind: ErrorKind,
        /// Raw status code.
        code: RttiResult,
        /// Message recorded by the library on the failing instance.
        message: String,
    },

    /// The shared library could not be opened.
    #[error("could not load library: {0}")]
    LibraryLoad(String),

    /// A required export is missing from the library.
    #[error("could not find library export: {0}")]
    MissingExport(String),

    /// The library's major version differs from the bindings'.
    #[error("incompatible binary version: library {found}, bindings {expected}")]
    IncompatibleBinaryVersion {
        /// Version reported by the library.
        found: String,
        /// Version these bindings were written against.
        expected: String,
    },

    /// Class type id that maps to no concrete class.
    #[error("unknown class type id {0:#018x}")]
    UnknownTypeTag(u64),

    /// Wrapper does not satisfy the requested class, or belongs to another binding.
    #[error("invalid cast: {0}")]
    InvalidCast(String),

    /// Function argument is invalid.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// A call that must produce an object produced none.
    #[error("no result available: {0}")]
    NoResultAvailable(String),

    /// Iterator advanced after reaching a terminal state.
    #[error("iterator protocol violation: next called in state {0:?}")]
    ProtocolViolation(IteratorState),
}

fn format_message(message: &str) -> String {
    if message.is_empty() {
        String::new()
    } else {
        format!(": {}", message)
    }
}

impl Error {
    /// Build the error for a failing native status code.
    pub(crate) fn native(code: RttiResult, message: String) -> Self {
        Error::Native {
            kind: ErrorKind::from_code(code).unwrap_or(ErrorKind::GenericFailure),
            code,
            message,
        }
    }

    /// Kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Native { kind, .. } => *kind,
            Error::LibraryLoad(_) => ErrorKind::LibraryLoadFailure,
            Error::MissingExport(_) => ErrorKind::MissingExport,
            Error::IncompatibleBinaryVersion { .. } => ErrorKind::IncompatibleBinaryVersion,
            Error::UnknownTypeTag(_) => ErrorKind::UnknownTypeTag,
            Error::InvalidCast(_) => ErrorKind::InvalidCast,
            Error::InvalidParameter(_) => ErrorKind::InvalidParameter,
            Error::NoResultAvailable(_) => ErrorKind::NoResultAvailable,
            Error::ProtocolViolation(_) => ErrorKind::ProtocolViolation,
        }
    }

    /// Native status code, raw for native failures, derived from the kind otherwise.
    pub fn code(&self) -> Option<RttiResult> {
        match self {
            Error::Native { code, .. } => Some(*code),
            other => other.kind().code(),
        }
    }

    /// Message recorded by the library, if this is a native failure.
    pub fn library_message(&self) -> Option<&str> {
        match self {
            Error::Native { message, .. } => Some(message),
            _ => None,
        }
    }

    /// Check if this is an invalid cast error.
    pub fn is_invalid_cast(&self) -> bool {
        self.kind() == ErrorKind::InvalidCast
    }

    /// Check if this is an unknown class type id error.
    pub fn is_unknown_type_tag(&self) -> bool {
        matches!(self, Error::UnknownTypeTag(_))
    }

    /// Check if this is an iterator protocol violation.
    pub fn is_protocol_violation(&self) -> bool {
        matches!(self, Error::ProtocolViolation(_))
    }
}

//! Low-level ABI definitions for the RTTI component.
//!
//! Users should prefer the safe Rust wrappers in the parent modules.

pub mod error;
pub mod handles;
pub mod raw;

pub use error::{check_status, last_error, read_string};
pub use handles::Handle;
pub use raw::*;

//! # dwarfline-core
//!
//! Types shared between the format decoders and the front end: target
//! identification and the source location a machine address maps to.

pub mod arch;
pub mod location;

pub use arch::{Architecture, Bitness, Endianness};
pub use location::{DebugLocation, NOT_AVAILABLE};

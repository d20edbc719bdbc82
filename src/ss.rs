//! Shared Service payload extraction.
//!
//! The Shared Service's resource APIs answer with JSON documents whose field
//! layout is a provider contract, not an OAuth one. The extractors here are
//! lenient by design: an absent key yields an absent value, never an error,
//! because partially filled documents are normal for this provider.

pub mod demographics;
pub mod roles;

pub use demographics::*;
pub use roles::*;

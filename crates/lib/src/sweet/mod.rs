//! Sugar targets: the vocabulary of build descriptions.
//!
//! # Submodules
//!
//! - [`types`] - Sugar target and rule descriptors
//! - [`rules`] - Built-in rule per target kind
//! - [`expand`] - Expansion into the canonical graph
//! - [`lua`] - Reading descriptors from a Lua description

pub mod expand;
pub mod lua;
pub mod rules;
mod types;

pub use expand::expand;
pub use types::*;

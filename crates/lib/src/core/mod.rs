//! The canonical build graph.
//!
//! Sugar targets expand into the types defined here: explicit edges
//! ([`CoreTarget`]) that reference named command templates ([`CoreRule`]).
//!
//! # Submodules
//!
//! - [`registry`] - Deduplicating rule table, first registration wins
//! - [`ninja`] - Serialization into a `build.ninja` file

pub mod ninja;
mod registry;
mod types;

pub use registry::*;
pub use types::*;

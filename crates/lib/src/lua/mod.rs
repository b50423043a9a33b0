//! Lua runtime and evaluation of build descriptions.
//!
//! # Submodules
//!
//! - [`entrypoint`] - Description file loading and evaluation
//! - [`globals`] - The `haga` global table and keyword markers
//! - [`runtime`] - Low-level Lua VM management

pub mod entrypoint;
pub mod globals;
pub mod runtime;

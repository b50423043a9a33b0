//! haga-lib: build description compiler for haga
//!
//! This crate turns a declarative build description into a ninja build graph:
//! - `Keyword` / `Context`: symbolic paths and tools resolved per invocation
//! - `SweetTarget`: high-level targets (preprocess, copy, convert, deploy, ...)
//! - `CoreExport`: the canonical rules and edges handed to ninja
//! - `deploy`: the whitelist-checked mirror used by deployment targets

pub mod compose;
pub mod consts;
pub mod context;
pub mod core;
pub mod deploy;
pub mod generate;
pub mod keyword;
pub mod lua;
pub mod path;
pub mod sweet;
pub mod tools;

#![forbid(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
//! Sable compile-time surface
//!
//! Sable lets source code talk to a managed target platform at compile time: attaching native metadata to
//! declarations, and calling intrinsics that lower to target-only syntax or disappear entirely. This crate provides
//! the declaration-gathering pass, intrinsic checking and the lowering pass that feeds a host emitter.
//!
//! ## Panic Policy
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`.
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.
//! - **True invariants**: registry lookups that cannot fail use `.expect("... info missing")` in `sable_core`.

pub mod backend;
pub mod frontend;

pub use frontend::annotations;
pub use frontend::ast;
pub use frontend::diagnostics;
pub use frontend::intrinsics;
pub use frontend::symbols;

pub use backend::{EmissionSink, Emitter, Lowering, LoweringErrors, LoweringOptions, RecordingSink};

//! Provide the canonical compile-time vocabulary of the Sable transpiler front end.
//!
//! This crate is intentionally small and dependency-free. It holds the registries every compiler stage agrees on:
//! - the intrinsic recognition table (spelling, input shape, result shape, erasure class, lowering template),
//! - the spellings of the attribute-attachment chain,
//! - builtin target type names and the numeric widening table.
//!
//! ## Notes
//!
//! - This is a "vocabulary core" crate: **no IO**, no global state, and no compiler-specific types.

pub mod lang;

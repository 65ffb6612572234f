//! Sable surface vocabulary registries.
//!
//! This module is the "front door" for compile-time vocabulary: intrinsic operations, annotation-chain steps and
//! builtin target types.
//!
//! The design goal is to avoid stringly-typed checks scattered across the compiler. Callers work with **stable IDs**
//! (e.g. `IntrinsicId`, `AnnotationStepId`) and look up spellings and metadata via registry tables.
//!
//! ## Notes
//! - Registries are intentionally **pure**: no AST types, no IO, no side effects.
//!
//! ## Examples
//! ```rust
//! use sable_core::lang::intrinsics::{self, IntrinsicId};
//!
//! assert_eq!(intrinsics::from_str("nameof"), Some(IntrinsicId::NameOf));
//! assert_eq!(intrinsics::as_str(IntrinsicId::NameOf), "nameof");
//! ```
//!
//! ## See also
//! - `cargo run -p sable_core --bin generate_intrinsic_reference` to generate Markdown reference tables.

pub mod annotations;
pub mod intrinsics;
pub mod registry;
pub mod types;

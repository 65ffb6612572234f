//! Builtin target type vocabularies.
//!
//! ## Notes
//! - These registries define spellings and per-type facts (integral-ness, widening, size). Assignability between
//!   declared types lives in the compiler front end, which owns the symbol table.
//!
//! ## See also
//! - [`crate::lang::registry`] for shared metadata types

pub mod numerics;
pub mod primitives;

pub use numerics::{NUMERIC_TYPES, NumericTypeId, NumericTypeInfo};
pub use primitives::{PRIMITIVE_TYPES, PrimitiveTypeId, PrimitiveTypeInfo};

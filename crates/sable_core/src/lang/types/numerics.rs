//! Numeric target type vocabulary.
//!
//! This registry covers the target platform's builtin numeric types (including `char`, which takes part in the
//! numeric widening table), their spellings, and the implicit widening conversions between them.
//!
//! ## Notes
//! - Lookup via [`from_str`] is **case-sensitive**; aliases cover the platform's qualified names
//!   (`System.Int32`) and the source language's `number`.
//! - Widening is the platform's built-in implicit numeric conversion table. It never narrows, and it is not
//!   symmetric.
//!
//! ## Examples
//! ```rust
//! use sable_core::lang::types::numerics::{self, NumericTypeId};
//!
//! assert_eq!(numerics::from_str("int"), Some(NumericTypeId::Int));
//! assert_eq!(numerics::from_str("System.Int64"), Some(NumericTypeId::Long));
//! assert!(numerics::widens_to(NumericTypeId::Int, NumericTypeId::Double));
//! assert!(!numerics::widens_to(NumericTypeId::Long, NumericTypeId::Int));
//! ```

use crate::lang::registry::{Since, Stability};

/// Stable identifier for numeric target types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NumericTypeId {
    SByte,
    Byte,
    Short,
    UShort,
    Int,
    UInt,
    Long,
    ULong,
    Char,
    Float,
    Double,
    Decimal,
}

/// Metadata for a numeric target type.
#[derive(Debug, Clone, Copy)]
pub struct NumericTypeInfo {
    pub id: NumericTypeId,
    pub canonical: &'static str,
    pub aliases: &'static [&'static str],
    pub description: &'static str,
    /// Whether the type is integral (valid as a stack-allocation count).
    pub integral: bool,
    /// In-memory size in bytes.
    pub size: u8,
    /// Types this one converts to implicitly (excluding itself).
    pub widens_to: &'static [NumericTypeId],
    pub since: Since,
    pub stability: Stability,
}

use NumericTypeId::*;

/// Registry of numeric target types.
pub const NUMERIC_TYPES: &[NumericTypeInfo] = &[
    info(
        SByte,
        "sbyte",
        &["System.SByte"],
        "Signed 8-bit integer.",
        true,
        1,
        &[Short, Int, Long, Float, Double, Decimal],
    ),
    info(
        Byte,
        "byte",
        &["System.Byte"],
        "Unsigned 8-bit integer.",
        true,
        1,
        &[Short, UShort, Int, UInt, Long, ULong, Float, Double, Decimal],
    ),
    info(
        Short,
        "short",
        &["System.Int16"],
        "Signed 16-bit integer.",
        true,
        2,
        &[Int, Long, Float, Double, Decimal],
    ),
    info(
        UShort,
        "ushort",
        &["System.UInt16"],
        "Unsigned 16-bit integer.",
        true,
        2,
        &[Int, UInt, Long, ULong, Float, Double, Decimal],
    ),
    info(
        Int,
        "int",
        &["System.Int32"],
        "Signed 32-bit integer.",
        true,
        4,
        &[Long, Float, Double, Decimal],
    ),
    info(
        UInt,
        "uint",
        &["System.UInt32"],
        "Unsigned 32-bit integer.",
        true,
        4,
        &[Long, ULong, Float, Double, Decimal],
    ),
    info(
        Long,
        "long",
        &["System.Int64"],
        "Signed 64-bit integer.",
        true,
        8,
        &[Float, Double, Decimal],
    ),
    info(
        ULong,
        "ulong",
        &["System.UInt64"],
        "Unsigned 64-bit integer.",
        true,
        8,
        &[Float, Double, Decimal],
    ),
    info(
        Char,
        "char",
        &["System.Char"],
        "UTF-16 code unit.",
        true,
        2,
        &[UShort, Int, UInt, Long, ULong, Float, Double, Decimal],
    ),
    info(
        Float,
        "float",
        &["System.Single"],
        "32-bit IEEE 754 floating point.",
        false,
        4,
        &[Double],
    ),
    info(
        Double,
        "double",
        &["System.Double", "number"],
        "64-bit IEEE 754 floating point.",
        false,
        8,
        &[],
    ),
    info(
        Decimal,
        "decimal",
        &["System.Decimal"],
        "128-bit decimal floating point.",
        false,
        16,
        &[],
    ),
];

/// Resolve a type name to a [`NumericTypeId`].
pub fn from_str(name: &str) -> Option<NumericTypeId> {
    if let Some(t) = NUMERIC_TYPES.iter().find(|t| t.canonical == name) {
        return Some(t.id);
    }
    NUMERIC_TYPES
        .iter()
        .find(|t| t.aliases.contains(&name))
        .map(|t| t.id)
}

/// Return the canonical spelling for a numeric type.
pub fn as_str(id: NumericTypeId) -> &'static str {
    info_for(id).canonical
}

/// Whether the numeric type is integral.
pub fn is_integral(id: NumericTypeId) -> bool {
    info_for(id).integral
}

/// Whether a value of `from` converts implicitly to `to`.
///
/// ## Notes
/// - Reflexive: every type widens to itself.
pub fn widens_to(from: NumericTypeId, to: NumericTypeId) -> bool {
    from == to || info_for(from).widens_to.contains(&to)
}

/// Return the full metadata entry for a numeric type.
///
/// ## Panics
/// - If the registry is missing an entry for `id` (this indicates a programming error).
pub fn info_for(id: NumericTypeId) -> &'static NumericTypeInfo {
    NUMERIC_TYPES
        .iter()
        .find(|t| t.id == id)
        .expect("numeric type info missing")
}

const fn info(
    id: NumericTypeId,
    canonical: &'static str,
    aliases: &'static [&'static str],
    description: &'static str,
    integral: bool,
    size: u8,
    widens_to: &'static [NumericTypeId],
) -> NumericTypeInfo {
    NumericTypeInfo {
        id,
        canonical,
        aliases,
        description,
        integral,
        size,
        widens_to,
        since: Since(0, 1),
        stability: Stability::Stable,
    }
}

//! Non-numeric builtin target type vocabulary.
//!
//! Covers the handful of target types the front end needs by name besides the numerics: `bool`, `string`,
//! `object`, the runtime type handle, and the stack memory view produced by `stackalloc`.
//!
//! ## Notes
//! - Lookup via [`from_str`] is **case-sensitive**.
//! - `Span` is generic (`Span<T>`); the registry only records the base spelling.

use crate::lang::registry::{LangItemInfo, Since, Stability};

/// Stable identifier for non-numeric builtin target types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveTypeId {
    Bool,
    String,
    Object,
    Type,
    Span,
}

/// Metadata for a non-numeric builtin target type.
pub type PrimitiveTypeInfo = LangItemInfo<PrimitiveTypeId>;

/// Registry of non-numeric builtin target types.
pub const PRIMITIVE_TYPES: &[PrimitiveTypeInfo] = &[
    info(
        PrimitiveTypeId::Bool,
        "bool",
        &["boolean", "System.Boolean"],
        "Boolean value type.",
    ),
    info(
        PrimitiveTypeId::String,
        "string",
        &["System.String"],
        "Immutable UTF-16 string (reference type).",
    ),
    info(
        PrimitiveTypeId::Object,
        "object",
        &["System.Object"],
        "Root of the type hierarchy (reference type).",
    ),
    info(
        PrimitiveTypeId::Type,
        "Type",
        &["System.Type"],
        "Runtime type handle, the static type of `typeof(T)`.",
    ),
    info(
        PrimitiveTypeId::Span,
        "Span",
        &["System.Span"],
        "Bounded contiguous memory view (`Span<T>`).",
    ),
];

/// Resolve a type name to a [`PrimitiveTypeId`].
pub fn from_str(name: &str) -> Option<PrimitiveTypeId> {
    PRIMITIVE_TYPES.iter().find(|t| t.matches(name)).map(|t| t.id)
}

/// Return the canonical spelling for a builtin type.
pub fn as_str(id: PrimitiveTypeId) -> &'static str {
    info_for(id).canonical
}

/// Return the full metadata entry for a builtin type.
///
/// ## Panics
/// - If the registry is missing an entry for `id` (this indicates a programming error).
pub fn info_for(id: PrimitiveTypeId) -> &'static PrimitiveTypeInfo {
    PRIMITIVE_TYPES
        .iter()
        .find(|t| t.id == id)
        .expect("primitive type info missing")
}

const fn info(
    id: PrimitiveTypeId,
    canonical: &'static str,
    aliases: &'static [&'static str],
    description: &'static str,
) -> PrimitiveTypeInfo {
    LangItemInfo {
        id,
        canonical,
        aliases,
        description,
        since: Since(0, 1),
        stability: Stability::Stable,
        examples: &[],
    }
}

//! Resolved target types.
//!
//! [`ResolvedType`] is the front end's view of a target-platform type after name resolution. Classification that
//! depends on declarations (value vs reference for named types, fixed layout) lives on
//! [`DeclarationLookup`](crate::frontend::symbols::DeclarationLookup), which owns the declarations.

use std::fmt;

use sable_core::lang::types::numerics::{self, NumericTypeId};
use sable_core::lang::types::primitives::{self, PrimitiveTypeId};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResolvedType {
    Numeric(NumericTypeId),
    Bool,
    String,
    Object,
    /// The runtime type handle (`typeof(T)`).
    TypeHandle,
    /// Static type of the `null` literal.
    Null,
    /// A declared class, interface, struct or enum.
    Named(String),
    Array(Box<ResolvedType>),
    /// `T?` over a value type.
    Nullable(Box<ResolvedType>),
    /// `Span<T>`, the stack memory view.
    Span(Box<ResolvedType>),
}

impl ResolvedType {
    pub fn named(name: impl Into<String>) -> Self {
        ResolvedType::Named(name.into())
    }

    pub fn array_of(element: ResolvedType) -> Self {
        ResolvedType::Array(Box::new(element))
    }

    pub fn is_integral(&self) -> bool {
        matches!(self, ResolvedType::Numeric(id) if numerics::is_integral(*id))
    }

    /// Element type of an array, if this is one.
    pub fn element(&self) -> Option<&ResolvedType> {
        match self {
            ResolvedType::Array(inner) => Some(inner),
            _ => None,
        }
    }
}

impl fmt::Display for ResolvedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolvedType::Numeric(id) => f.write_str(numerics::as_str(*id)),
            ResolvedType::Bool => f.write_str(primitives::as_str(PrimitiveTypeId::Bool)),
            ResolvedType::String => f.write_str(primitives::as_str(PrimitiveTypeId::String)),
            ResolvedType::Object => f.write_str(primitives::as_str(PrimitiveTypeId::Object)),
            ResolvedType::TypeHandle => f.write_str(primitives::as_str(PrimitiveTypeId::Type)),
            ResolvedType::Null => f.write_str("null"),
            ResolvedType::Named(name) => f.write_str(name),
            ResolvedType::Array(inner) => write!(f, "{inner}[]"),
            ResolvedType::Nullable(inner) => write!(f, "{inner}?"),
            ResolvedType::Span(inner) => write!(f, "{}<{inner}>", primitives::as_str(PrimitiveTypeId::Span)),
        }
    }
}

/// Kind of a declared type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Class,
    Interface,
    Struct,
    Enum,
}

impl TypeKind {
    pub fn is_value(self) -> bool {
        matches!(self, TypeKind::Struct | TypeKind::Enum)
    }
}

/// What `default(T)` evaluates to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DefaultValue {
    /// The zero / empty value of a value-like type.
    Zero,
    /// The absence marker (`null`) of a reference-like or nullable type.
    Absent,
}

/// Render a parameter or argument type list as `(a, b, c)`.
pub fn format_type_list(types: &[ResolvedType]) -> String {
    let parts: Vec<String> = types.iter().map(ToString::to_string).collect();
    format!("({})", parts.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_nested_types() {
        let ty = ResolvedType::Span(Box::new(ResolvedType::Numeric(NumericTypeId::Byte)));
        assert_eq!(ty.to_string(), "Span<byte>");
        let arr = ResolvedType::array_of(ResolvedType::Nullable(Box::new(ResolvedType::Bool)));
        assert_eq!(arr.to_string(), "bool?[]");
    }

    #[test]
    fn test_format_type_list() {
        assert_eq!(format_type_list(&[]), "()");
        assert_eq!(
            format_type_list(&[ResolvedType::String, ResolvedType::Numeric(NumericTypeId::Int)]),
            "(string, int)"
        );
    }

    #[test]
    fn test_integral() {
        assert!(ResolvedType::Numeric(NumericTypeId::UShort).is_integral());
        assert!(!ResolvedType::Numeric(NumericTypeId::Double).is_integral());
        assert!(!ResolvedType::String.is_integral());
    }
}

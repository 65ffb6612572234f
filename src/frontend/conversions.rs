//! Implicit-conversion predicate of the target platform.
//!
//! Attribute overload validation asks one question: may a value of static type `from` be passed where `to` is
//! expected? [`ImplicitConversion`] is that question; [`BuiltinConversions`] answers it with the platform's
//! built-in rules only:
//!
//! - identity
//! - numeric widening (from the `sable_core` widening table; never narrowing, not even for constants)
//! - `null` to any reference type or `T?`
//! - value type `S` to `T?` when `S` converts to `T`
//! - reference types to any base class or implemented interface, and to `object`
//! - value types to `object` or an implemented interface (boxing; see [`ConversionPolicy`])
//! - array covariance over reference element types, and any array to `object`
//!
//! User-defined conversions are never applied.

use sable_core::lang::types::numerics;

use crate::frontend::symbols::DeclarationLookup;
use crate::frontend::types::ResolvedType;

/// Decide whether a value of static type `from` is assignable to `to`.
pub trait ImplicitConversion {
    fn is_assignable(&self, from: &ResolvedType, to: &ResolvedType) -> bool;
}

/// Knobs on the built-in conversion rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConversionPolicy {
    /// Accept value types where `object` or an implemented interface is expected.
    pub allow_boxing: bool,
}

impl Default for ConversionPolicy {
    fn default() -> Self {
        Self { allow_boxing: true }
    }
}

/// The platform's built-in implicit conversions, resolved against declared types.
pub struct BuiltinConversions<'a> {
    lookup: &'a dyn DeclarationLookup,
    policy: ConversionPolicy,
}

impl<'a> BuiltinConversions<'a> {
    pub fn new(lookup: &'a dyn DeclarationLookup) -> Self {
        Self {
            lookup,
            policy: ConversionPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: ConversionPolicy) -> Self {
        self.policy = policy;
        self
    }

    fn is_supertype(&self, from: &str, to: &str) -> bool {
        self.lookup.supertypes(from).iter().any(|s| s == to)
    }

    /// Reference conversion: identity, base class, interface, `object`, array covariance.
    fn is_reference_assignable(&self, from: &ResolvedType, to: &ResolvedType) -> bool {
        if !self.lookup.is_reference_type(from) {
            return false;
        }
        match (from, to) {
            _ if from == to => true,
            (_, ResolvedType::Object) => true,
            (ResolvedType::Null, _) => self.lookup.is_reference_type(to),
            (ResolvedType::Named(a), ResolvedType::Named(b)) => self.is_supertype(a, b),
            (ResolvedType::Array(a), ResolvedType::Array(b)) => self.is_reference_assignable(a, b),
            _ => false,
        }
    }
}

impl ImplicitConversion for BuiltinConversions<'_> {
    fn is_assignable(&self, from: &ResolvedType, to: &ResolvedType) -> bool {
        if from == to {
            return true;
        }
        match (from, to) {
            (ResolvedType::Numeric(a), ResolvedType::Numeric(b)) => numerics::widens_to(*a, *b),
            (ResolvedType::Null, ResolvedType::Nullable(_)) => true,
            (ResolvedType::Nullable(a), ResolvedType::Nullable(b)) => self.is_assignable(a, b),
            (_, ResolvedType::Nullable(inner)) => {
                self.lookup.is_value_type(from)
                    && !matches!(from, ResolvedType::Span(_))
                    && self.is_assignable(from, inner)
            }
            // Span is stack-only and never boxes.
            (ResolvedType::Span(_), _) => false,
            _ if self.lookup.is_reference_type(from) => self.is_reference_assignable(from, to),
            (_, ResolvedType::Object) => self.policy.allow_boxing && self.lookup.is_value_type(from),
            (ResolvedType::Named(a), ResolvedType::Named(b)) if self.lookup.is_interface(to) => {
                self.policy.allow_boxing && self.is_supertype(a, b)
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::symbols::{SymbolTable, TypeDecl};
    use sable_core::lang::types::NumericTypeId;

    fn num(id: NumericTypeId) -> ResolvedType {
        ResolvedType::Numeric(id)
    }

    fn nullable(ty: ResolvedType) -> ResolvedType {
        ResolvedType::Nullable(Box::new(ty))
    }

    fn table() -> SymbolTable {
        SymbolTable::new()
            .with(TypeDecl::interface("IShape"))
            .with(TypeDecl::class("Shape").implements("IShape"))
            .with(TypeDecl::class("Circle").extends("Shape"))
            .with(TypeDecl::structure("Size").implements("IShape"))
            .with(TypeDecl::enumeration("Color", &["Red"]))
    }

    #[test]
    fn test_numeric_widening_only() {
        let t = table();
        let c = BuiltinConversions::new(&t);
        assert!(c.is_assignable(&num(NumericTypeId::Int), &num(NumericTypeId::Long)));
        assert!(c.is_assignable(&num(NumericTypeId::Int), &num(NumericTypeId::Double)));
        assert!(c.is_assignable(&num(NumericTypeId::Char), &num(NumericTypeId::Int)));
        assert!(!c.is_assignable(&num(NumericTypeId::Long), &num(NumericTypeId::Int)));
        assert!(!c.is_assignable(&num(NumericTypeId::Double), &num(NumericTypeId::Float)));
        assert!(!c.is_assignable(&num(NumericTypeId::Int), &num(NumericTypeId::Char)));
        assert!(!c.is_assignable(&num(NumericTypeId::Int), &ResolvedType::String));
    }

    #[test]
    fn test_reference_conversions() {
        let t = table();
        let c = BuiltinConversions::new(&t);
        let circle = ResolvedType::named("Circle");
        assert!(c.is_assignable(&circle, &ResolvedType::named("Shape")));
        assert!(c.is_assignable(&circle, &ResolvedType::named("IShape")));
        assert!(c.is_assignable(&circle, &ResolvedType::Object));
        assert!(!c.is_assignable(&ResolvedType::named("Shape"), &circle));
        assert!(c.is_assignable(&ResolvedType::String, &ResolvedType::Object));
        assert!(c.is_assignable(&ResolvedType::TypeHandle, &ResolvedType::Object));
    }

    #[test]
    fn test_null_conversions() {
        let t = table();
        let c = BuiltinConversions::new(&t);
        assert!(c.is_assignable(&ResolvedType::Null, &ResolvedType::String));
        assert!(c.is_assignable(&ResolvedType::Null, &ResolvedType::named("Circle")));
        assert!(c.is_assignable(&ResolvedType::Null, &nullable(num(NumericTypeId::Int))));
        assert!(!c.is_assignable(&ResolvedType::Null, &num(NumericTypeId::Int)));
        assert!(!c.is_assignable(&ResolvedType::Null, &ResolvedType::named("Size")));
    }

    #[test]
    fn test_nullable_lifting() {
        let t = table();
        let c = BuiltinConversions::new(&t);
        assert!(c.is_assignable(&num(NumericTypeId::Int), &nullable(num(NumericTypeId::Int))));
        assert!(c.is_assignable(&num(NumericTypeId::Int), &nullable(num(NumericTypeId::Long))));
        assert!(!c.is_assignable(&nullable(num(NumericTypeId::Int)), &num(NumericTypeId::Int)));
        assert!(!c.is_assignable(&ResolvedType::String, &nullable(num(NumericTypeId::Int))));
    }

    #[test]
    fn test_boxing_respects_policy() {
        let t = table();
        let strict = BuiltinConversions::new(&t).with_policy(ConversionPolicy { allow_boxing: false });
        let lenient = BuiltinConversions::new(&t);
        let size = ResolvedType::named("Size");

        assert!(lenient.is_assignable(&num(NumericTypeId::Int), &ResolvedType::Object));
        assert!(lenient.is_assignable(&size, &ResolvedType::named("IShape")));
        assert!(lenient.is_assignable(&ResolvedType::named("Color"), &ResolvedType::Object));
        assert!(!strict.is_assignable(&num(NumericTypeId::Int), &ResolvedType::Object));
        assert!(!strict.is_assignable(&size, &ResolvedType::named("IShape")));
    }

    #[test]
    fn test_array_covariance() {
        let t = table();
        let c = BuiltinConversions::new(&t);
        let circles = ResolvedType::array_of(ResolvedType::named("Circle"));
        let shapes = ResolvedType::array_of(ResolvedType::named("Shape"));
        let ints = ResolvedType::array_of(num(NumericTypeId::Int));
        let longs = ResolvedType::array_of(num(NumericTypeId::Long));

        assert!(c.is_assignable(&circles, &shapes));
        assert!(!c.is_assignable(&shapes, &circles));
        assert!(!c.is_assignable(&ints, &longs));
        assert!(c.is_assignable(&ints, &ResolvedType::Object));
    }

    #[test]
    fn test_span_never_converts() {
        let t = table();
        let c = BuiltinConversions::new(&t);
        let span = ResolvedType::Span(Box::new(num(NumericTypeId::Byte)));
        assert!(c.is_assignable(&span, &span.clone()));
        assert!(!c.is_assignable(&span, &ResolvedType::Object));
    }
}

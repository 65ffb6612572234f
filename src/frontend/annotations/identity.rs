//! Attribute identities, constant arguments and descriptors.

use std::fmt;

use sable_core::lang::types::NumericTypeId;

use crate::frontend::ast::Span;
use crate::frontend::diagnostics::{CompileError, errors};
use crate::frontend::symbols::DeclarationLookup;
use crate::frontend::types::{ResolvedType, format_type_list};

/// One constructor signature: an ordered list of positional parameter types.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signature {
    pub params: Vec<ResolvedType>,
}

impl Signature {
    pub fn new(params: Vec<ResolvedType>) -> Self {
        Self { params }
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_type_list(&self.params))
    }
}

/// The initializer of a target-platform metadata class.
///
/// Always carries at least one signature: a class declared without constructors gets the implicit `()`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AttributeIdentity {
    native_name: String,
    signatures: Vec<Signature>,
}

impl AttributeIdentity {
    pub fn new(native_name: impl Into<String>, signatures: Vec<Signature>) -> Self {
        let signatures = if signatures.is_empty() {
            vec![Signature::new(Vec::new())]
        } else {
            signatures
        };
        Self {
            native_name: native_name.into(),
            signatures,
        }
    }

    /// Resolve a declared attribute class by name.
    pub fn resolve(lookup: &dyn DeclarationLookup, name: &str, span: Span) -> Result<Self, CompileError> {
        let decl = lookup.type_decl(name).ok_or_else(|| errors::unknown_type(name, span))?;
        if !decl.is_attribute {
            return Err(errors::not_an_attribute(name, span));
        }
        let signatures = decl.constructors.iter().cloned().map(Signature::new).collect();
        Ok(Self::new(decl.name.clone(), signatures))
    }

    /// Fully qualified target-platform class name.
    pub fn native_name(&self) -> &str {
        &self.native_name
    }

    pub fn signatures(&self) -> &[Signature] {
        &self.signatures
    }
}

impl fmt::Display for AttributeIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.native_name)
    }
}

/// A compile-time constant attribute argument value.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    Int(i64),
    Float(f64),
    String(String),
    Bool(bool),
    Char(char),
    Null,
    /// `typeof(T)`
    TypeOf(ResolvedType),
    /// `Enum.Member`
    EnumMember { enum_type: String, member: String },
    /// Single-dimension array of constants.
    Array(Vec<AttributeArg>),
}

/// A constant argument together with its static type.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeArg {
    pub value: AttrValue,
    pub ty: ResolvedType,
}

impl AttributeArg {
    /// An argument whose static type the host already knows (typed constants, casts).
    pub fn typed(value: AttrValue, ty: ResolvedType) -> Self {
        Self { value, ty }
    }

    /// Integer literal: `int` when it fits, `long` otherwise.
    pub fn int(value: i64) -> Self {
        let id = if i32::try_from(value).is_ok() {
            NumericTypeId::Int
        } else {
            NumericTypeId::Long
        };
        Self::typed(AttrValue::Int(value), ResolvedType::Numeric(id))
    }

    pub fn float(value: f64) -> Self {
        Self::typed(AttrValue::Float(value), ResolvedType::Numeric(NumericTypeId::Double))
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self::typed(AttrValue::String(value.into()), ResolvedType::String)
    }

    pub fn bool(value: bool) -> Self {
        Self::typed(AttrValue::Bool(value), ResolvedType::Bool)
    }

    pub fn char(value: char) -> Self {
        Self::typed(AttrValue::Char(value), ResolvedType::Numeric(NumericTypeId::Char))
    }

    pub fn null() -> Self {
        Self::typed(AttrValue::Null, ResolvedType::Null)
    }

    pub fn type_of(ty: ResolvedType) -> Self {
        Self::typed(AttrValue::TypeOf(ty), ResolvedType::TypeHandle)
    }

    pub fn enum_member(enum_type: &str, member: &str) -> Self {
        Self::typed(
            AttrValue::EnumMember {
                enum_type: enum_type.to_string(),
                member: member.to_string(),
            },
            ResolvedType::named(enum_type),
        )
    }

    pub fn array(element: ResolvedType, items: Vec<AttributeArg>) -> Self {
        Self::typed(AttrValue::Array(items), ResolvedType::array_of(element))
    }
}

/// An attribute identity bound to a validated argument list.
///
/// Only [`AnnotationPass::build_descriptor`](super::AnnotationPass::build_descriptor) and the targeting builders
/// construct these, after overload validation succeeded.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeDescriptor {
    identity: AttributeIdentity,
    args: Vec<AttributeArg>,
    signature: usize,
    span: Span,
}

impl AttributeDescriptor {
    pub(crate) fn new(identity: AttributeIdentity, args: Vec<AttributeArg>, signature: usize, span: Span) -> Self {
        Self {
            identity,
            args,
            signature,
            span,
        }
    }

    /// Where the attribute was constructed.
    pub fn span(&self) -> Span {
        self.span
    }

    pub fn identity(&self) -> &AttributeIdentity {
        &self.identity
    }

    pub fn args(&self) -> &[AttributeArg] {
        &self.args
    }

    /// The first signature, in declaration order, that accepted the arguments.
    pub fn matched_signature(&self) -> &Signature {
        &self.identity.signatures[self.signature]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::diagnostics::ErrorKind;
    use crate::frontend::symbols::{SymbolTable, TypeDecl};

    #[test]
    fn test_identity_without_constructors_has_default_signature() {
        let id = AttributeIdentity::new("SerializableAttribute", Vec::new());
        assert_eq!(id.signatures().len(), 1);
        assert_eq!(id.signatures()[0].to_string(), "()");
    }

    #[test]
    fn test_resolve_requires_attribute_class() {
        let table = SymbolTable::new()
            .with(TypeDecl::attribute(
                "ObsoleteAttribute",
                vec![vec![], vec![ResolvedType::String]],
            ))
            .with(TypeDecl::class("Widget"));

        let id = AttributeIdentity::resolve(&table, "ObsoleteAttribute", Span::default()).unwrap();
        assert_eq!(id.native_name(), "ObsoleteAttribute");
        assert_eq!(id.signatures().len(), 2);

        let err = AttributeIdentity::resolve(&table, "Widget", Span::default()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnknownType);
        let err = AttributeIdentity::resolve(&table, "Missing", Span::default()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnknownType);
    }

    #[test]
    fn test_integer_literal_typing() {
        assert_eq!(AttributeArg::int(7).ty, ResolvedType::Numeric(NumericTypeId::Int));
        assert_eq!(
            AttributeArg::int(i64::from(i32::MAX) + 1).ty,
            ResolvedType::Numeric(NumericTypeId::Long)
        );
        assert_eq!(AttributeArg::int(-5).ty, ResolvedType::Numeric(NumericTypeId::Int));
    }
}

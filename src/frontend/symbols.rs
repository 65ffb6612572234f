//! Declared target types and the name-resolution service.
//!
//! The host pipeline owns the real declaration surface (including everything the external binding generator
//! produces). The compile-time surface only needs to ask a few questions of it, captured by the
//! [`DeclarationLookup`] trait: implementors supply [`DeclarationLookup::type_decl`] and inherit every derived query.
//! [`SymbolTable`] is the in-crate implementation.

use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;

use sable_core::lang::intrinsics;
use sable_core::lang::types::numerics;
use sable_core::lang::types::primitives::{self, PrimitiveTypeId};

use crate::frontend::ast::{Span, Spanned, TypeExpr};
use crate::frontend::diagnostics::{CompileError, errors};
use crate::frontend::intrinsics::type_position_precondition;
use crate::frontend::types::{DefaultValue, ResolvedType, TypeKind};

/// Kind of a type member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberKind {
    Method,
    Property,
    Field,
}

impl MemberKind {
    pub fn is_callable(self) -> bool {
        self == MemberKind::Method
    }
}

impl fmt::Display for MemberKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemberKind::Method => write!(f, "method"),
            MemberKind::Property => write!(f, "property"),
            MemberKind::Field => write!(f, "field"),
        }
    }
}

/// A member of a declared type.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberDecl {
    pub name: String,
    pub kind: MemberKind,
    /// Property/field type, or method return type.
    pub ty: ResolvedType,
}

/// A declared target type.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDecl {
    pub name: String,
    pub kind: TypeKind,
    pub base: Option<String>,
    pub interfaces: Vec<String>,
    pub members: Vec<MemberDecl>,
    /// Constructor signatures, in declaration order.
    pub constructors: Vec<Vec<ResolvedType>>,
    /// Whether this class is a metadata (attribute) class.
    pub is_attribute: bool,
}

impl TypeDecl {
    fn new(name: &str, kind: TypeKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
            base: None,
            interfaces: Vec::new(),
            members: Vec::new(),
            constructors: Vec::new(),
            is_attribute: false,
        }
    }

    pub fn class(name: &str) -> Self {
        Self::new(name, TypeKind::Class)
    }

    pub fn interface(name: &str) -> Self {
        Self::new(name, TypeKind::Interface)
    }

    pub fn structure(name: &str) -> Self {
        Self::new(name, TypeKind::Struct)
    }

    /// An enum whose members are static fields of the enum's own type.
    pub fn enumeration(name: &str, members: &[&str]) -> Self {
        let mut decl = Self::new(name, TypeKind::Enum);
        for m in members {
            decl = decl.field(m, ResolvedType::named(name));
        }
        decl
    }

    /// An attribute class with the given constructor signatures.
    pub fn attribute(name: &str, constructors: Vec<Vec<ResolvedType>>) -> Self {
        let mut decl = Self::class(name);
        decl.is_attribute = true;
        decl.constructors = constructors;
        decl
    }

    pub fn extends(mut self, base: &str) -> Self {
        self.base = Some(base.to_string());
        self
    }

    pub fn implements(mut self, interface: &str) -> Self {
        self.interfaces.push(interface.to_string());
        self
    }

    pub fn constructor(mut self, params: Vec<ResolvedType>) -> Self {
        self.constructors.push(params);
        self
    }

    fn member(mut self, name: &str, kind: MemberKind, ty: ResolvedType) -> Self {
        self.members.push(MemberDecl {
            name: name.to_string(),
            kind,
            ty,
        });
        self
    }

    pub fn method(self, name: &str, returns: ResolvedType) -> Self {
        self.member(name, MemberKind::Method, returns)
    }

    pub fn property(self, name: &str, ty: ResolvedType) -> Self {
        self.member(name, MemberKind::Property, ty)
    }

    pub fn field(self, name: &str, ty: ResolvedType) -> Self {
        self.member(name, MemberKind::Field, ty)
    }

    pub fn fields(&self) -> impl Iterator<Item = &MemberDecl> {
        self.members.iter().filter(|m| m.kind == MemberKind::Field)
    }
}

/// Proof that a declared type exists.
///
/// Only a [`DeclarationLookup`] can produce one, which is what makes selecting a type infallible.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeHandle {
    name: String,
}

impl TypeHandle {
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for TypeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Name-resolution service over declared target types.
pub trait DeclarationLookup {
    /// Look up a declared type by name.
    fn type_decl(&self, name: &str) -> Option<&TypeDecl>;

    /// Resolve a type name to a [`TypeHandle`].
    fn type_handle(&self, name: &str) -> Option<TypeHandle> {
        self.type_decl(name).map(|d| TypeHandle { name: d.name.clone() })
    }

    /// All base classes and implemented interfaces of `name`, transitively, nearest first.
    fn supertypes(&self, name: &str) -> Vec<String> {
        let mut out = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        let mut queue: VecDeque<String> = VecDeque::new();
        queue.push_back(name.to_string());
        seen.insert(name.to_string());

        while let Some(current) = queue.pop_front() {
            let Some(decl) = self.type_decl(&current) else {
                continue;
            };
            for parent in decl.base.iter().chain(decl.interfaces.iter()) {
                if seen.insert(parent.clone()) {
                    out.push(parent.clone());
                    queue.push_back(parent.clone());
                }
            }
        }
        out
    }

    /// Members named `member` on `ty` or any of its supertypes.
    fn members_named(&self, ty: &TypeHandle, member: &str) -> Vec<MemberDecl> {
        std::iter::once(ty.name().to_string())
            .chain(self.supertypes(ty.name()))
            .filter_map(|name| self.type_decl(&name).cloned())
            .flat_map(|decl| decl.members.into_iter().filter(|m| m.name == member))
            .collect()
    }

    fn type_kind(&self, ty: &ResolvedType) -> Option<TypeKind> {
        match ty {
            ResolvedType::Named(name) => self.type_decl(name).map(|d| d.kind),
            _ => None,
        }
    }

    fn is_interface(&self, ty: &ResolvedType) -> bool {
        self.type_kind(ty) == Some(TypeKind::Interface)
    }

    /// Value-like types: numerics, `bool`, structs, enums, nullables and spans.
    fn is_value_type(&self, ty: &ResolvedType) -> bool {
        match ty {
            ResolvedType::Numeric(_)
            | ResolvedType::Bool
            | ResolvedType::Nullable(_)
            | ResolvedType::Span(_) => true,
            ResolvedType::Named(_) => self.type_kind(ty).is_some_and(TypeKind::is_value),
            _ => false,
        }
    }

    fn is_reference_type(&self, ty: &ResolvedType) -> bool {
        match ty {
            ResolvedType::String
            | ResolvedType::Object
            | ResolvedType::TypeHandle
            | ResolvedType::Null
            | ResolvedType::Array(_) => true,
            ResolvedType::Named(_) => self.type_kind(ty).is_some_and(|k| !k.is_value()),
            _ => false,
        }
    }

    /// Whether `ty` has a fixed, reference-free layout whose size is statically known.
    fn is_fixed_layout(&self, ty: &ResolvedType) -> bool {
        fn walk<L: DeclarationLookup + ?Sized>(lookup: &L, ty: &ResolvedType, visiting: &mut HashSet<String>) -> bool {
            match ty {
                ResolvedType::Numeric(_) | ResolvedType::Bool => true,
                // `T?` over a value type is the value plus a presence flag.
                ResolvedType::Nullable(inner) => walk(lookup, inner, visiting),
                ResolvedType::Named(name) => {
                    let Some(decl) = lookup.type_decl(name) else {
                        return false;
                    };
                    match decl.kind {
                        TypeKind::Enum => true,
                        TypeKind::Struct => {
                            // A struct containing itself has no finite layout.
                            if !visiting.insert(name.clone()) {
                                return false;
                            }
                            let ok = decl.fields().all(|f| walk(lookup, &f.ty, visiting));
                            visiting.remove(name);
                            ok
                        }
                        TypeKind::Class | TypeKind::Interface => false,
                    }
                }
                _ => false,
            }
        }
        walk(self, ty, &mut HashSet::new())
    }

    /// What `default(T)` evaluates to for `ty`.
    fn default_value(&self, ty: &ResolvedType) -> DefaultValue {
        match ty {
            ResolvedType::Nullable(_) => DefaultValue::Absent,
            _ if self.is_value_type(ty) => DefaultValue::Zero,
            _ => DefaultValue::Absent,
        }
    }

    /// Resolve a source type expression.
    ///
    /// ## Errors
    /// - `UnknownType` for names that resolve nowhere or carry the wrong number of type arguments.
    /// - `UnlowerableIntrinsic` for intrinsic spellings used in type position (`thisarg<T>` is handled by function
    ///   lowering before it reaches here; anywhere else it is misplaced).
    fn resolve_type(&self, ty: &Spanned<TypeExpr>) -> Result<ResolvedType, CompileError> {
        match &ty.node {
            TypeExpr::Array(inner) => Ok(ResolvedType::array_of(self.resolve_type(inner)?)),
            TypeExpr::Named { name, args } => {
                if let Some(id) = intrinsics::from_str(name) {
                    return Err(errors::unlowerable_intrinsic(
                        name,
                        type_position_precondition(id),
                        ty.span,
                    ));
                }
                if let Some(id) = numerics::from_str(name) {
                    expect_type_args(name, args, 0, ty.span)?;
                    return Ok(ResolvedType::Numeric(id));
                }
                if let Some(id) = primitives::from_str(name) {
                    return match id {
                        PrimitiveTypeId::Span => {
                            expect_type_args(name, args, 1, ty.span)?;
                            Ok(ResolvedType::Span(Box::new(self.resolve_type(&args[0])?)))
                        }
                        PrimitiveTypeId::Bool => expect_type_args(name, args, 0, ty.span).map(|_| ResolvedType::Bool),
                        PrimitiveTypeId::String => {
                            expect_type_args(name, args, 0, ty.span).map(|_| ResolvedType::String)
                        }
                        PrimitiveTypeId::Object => {
                            expect_type_args(name, args, 0, ty.span).map(|_| ResolvedType::Object)
                        }
                        PrimitiveTypeId::Type => {
                            expect_type_args(name, args, 0, ty.span).map(|_| ResolvedType::TypeHandle)
                        }
                    };
                }
                match self.type_decl(name) {
                    Some(decl) => {
                        expect_type_args(name, args, 0, ty.span)?;
                        Ok(ResolvedType::Named(decl.name.clone()))
                    }
                    None => Err(errors::unknown_type(name, ty.span)),
                }
            }
        }
    }
}

fn expect_type_args(name: &str, args: &[Spanned<TypeExpr>], expected: usize, span: Span) -> Result<(), CompileError> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(errors::unknown_type(name, span).with_note(format!(
            "'{name}' takes {expected} type argument(s), found {}",
            args.len()
        )))
    }
}

/// In-crate declaration table.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    types: HashMap<String, TypeDecl>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a type, replacing any previous declaration with the same name.
    pub fn declare(&mut self, decl: TypeDecl) {
        self.types.insert(decl.name.clone(), decl);
    }

    /// Builder-style [`declare`](Self::declare).
    pub fn with(mut self, decl: TypeDecl) -> Self {
        self.declare(decl);
        self
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl DeclarationLookup for SymbolTable {
    fn type_decl(&self, name: &str) -> Option<&TypeDecl> {
        self.types.get(name)
    }
}

/// Static types of local bindings visible to an expression.
#[derive(Debug, Clone, Default)]
pub struct Locals {
    bindings: HashMap<String, ResolvedType>,
}

impl Locals {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn define(&mut self, name: impl Into<String>, ty: ResolvedType) {
        self.bindings.insert(name.into(), ty);
    }

    pub fn lookup(&self, name: &str) -> Option<&ResolvedType> {
        self.bindings.get(name)
    }

    /// A copy without `names`, for a scope whose untyped parameters shadow them.
    pub fn shadowed(&self, names: &[String]) -> Locals {
        let mut inner = self.clone();
        for name in names {
            inner.bindings.remove(name);
        }
        inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::ast::AstBuilder;
    use sable_core::lang::types::NumericTypeId;

    fn int() -> ResolvedType {
        ResolvedType::Numeric(NumericTypeId::Int)
    }

    fn table() -> SymbolTable {
        SymbolTable::new()
            .with(TypeDecl::interface("IEntity"))
            .with(TypeDecl::class("Entity").implements("IEntity").method("save", ResolvedType::Bool))
            .with(
                TypeDecl::class("User")
                    .extends("Entity")
                    .property("name", ResolvedType::String),
            )
            .with(TypeDecl::structure("Point").field("x", int()).field("y", int()))
            .with(TypeDecl::structure("Named").field("label", ResolvedType::String))
            .with(TypeDecl::structure("Loop").field("next", ResolvedType::named("Loop")))
            .with(TypeDecl::structure("Segment").field("a", ResolvedType::named("Point")))
            .with(TypeDecl::enumeration("Color", &["Red", "Green"]))
    }

    #[test]
    fn test_supertypes_are_transitive() {
        let t = table();
        assert_eq!(t.supertypes("User"), vec!["Entity".to_string(), "IEntity".to_string()]);
        assert!(t.supertypes("IEntity").is_empty());
    }

    #[test]
    fn test_members_include_inherited() {
        let t = table();
        let user = t.type_handle("User").unwrap();
        let save = t.members_named(&user, "save");
        assert_eq!(save.len(), 1);
        assert_eq!(save[0].kind, MemberKind::Method);
        assert!(t.members_named(&user, "missing").is_empty());
    }

    #[test]
    fn test_fixed_layout() {
        let t = table();
        assert!(t.is_fixed_layout(&int()));
        assert!(t.is_fixed_layout(&ResolvedType::named("Point")));
        assert!(t.is_fixed_layout(&ResolvedType::named("Segment")));
        assert!(t.is_fixed_layout(&ResolvedType::named("Color")));
        assert!(!t.is_fixed_layout(&ResolvedType::named("Named")));
        assert!(!t.is_fixed_layout(&ResolvedType::named("Loop")));
        assert!(!t.is_fixed_layout(&ResolvedType::named("User")));
        assert!(!t.is_fixed_layout(&ResolvedType::String));
    }

    #[test]
    fn test_nullable_layout_follows_its_value_type() {
        let t = table();
        let nullable = |ty| ResolvedType::Nullable(Box::new(ty));
        assert!(t.is_fixed_layout(&nullable(int())));
        assert!(t.is_fixed_layout(&nullable(ResolvedType::named("Point"))));
        assert!(t.is_fixed_layout(&nullable(ResolvedType::named("Color"))));
        assert!(!t.is_fixed_layout(&nullable(ResolvedType::named("Named"))));
        assert!(!t.is_fixed_layout(&nullable(ResolvedType::named("Loop"))));
    }

    #[test]
    fn test_default_values() {
        let t = table();
        assert_eq!(t.default_value(&int()), DefaultValue::Zero);
        assert_eq!(t.default_value(&ResolvedType::named("Point")), DefaultValue::Zero);
        assert_eq!(t.default_value(&ResolvedType::named("User")), DefaultValue::Absent);
        assert_eq!(t.default_value(&ResolvedType::String), DefaultValue::Absent);
        assert_eq!(
            t.default_value(&ResolvedType::Nullable(Box::new(int()))),
            DefaultValue::Absent
        );
    }

    #[test]
    fn test_resolve_type_expressions() {
        let t = table();
        let mut b = AstBuilder::new();

        let byte = b.ty("byte");
        let span = b.generic_ty("Span", vec![byte]);
        assert_eq!(
            t.resolve_type(&span).unwrap(),
            ResolvedType::Span(Box::new(ResolvedType::Numeric(NumericTypeId::Byte)))
        );

        let user = b.ty("User");
        let users = b.array_ty(user);
        assert_eq!(
            t.resolve_type(&users).unwrap(),
            ResolvedType::array_of(ResolvedType::named("User"))
        );

        let alias = b.ty("System.Int32");
        assert_eq!(t.resolve_type(&alias).unwrap(), int());
    }

    #[test]
    fn test_resolve_type_errors() {
        let t = table();
        let mut b = AstBuilder::new();

        let missing = b.ty("Nope");
        let err = t.resolve_type(&missing).unwrap_err();
        assert_eq!(err.kind, crate::frontend::diagnostics::ErrorKind::UnknownType);

        let bare_span = b.ty("Span");
        assert!(t.resolve_type(&bare_span).is_err());

        let inner = b.ty("string");
        let receiver = b.generic_ty("thisarg", vec![inner]);
        let err = t.resolve_type(&receiver).unwrap_err();
        assert_eq!(err.kind, crate::frontend::diagnostics::ErrorKind::UnlowerableIntrinsic);
    }
}

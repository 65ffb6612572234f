//! The targeting builders: `select(T)` → [`OnBuilder`] → [`TargetBuilder`].

use tracing::debug;

use super::AnnotationPass;
use super::entity::ProgramEntity;
use super::identity::{AttributeArg, AttributeDescriptor, AttributeIdentity};
use crate::frontend::ast::{Expr, Span, Spanned};
use crate::frontend::diagnostics::{CompileError, errors};
use crate::frontend::symbols::TypeHandle;

/// A member selector reduced to its member name.
///
/// Only direct member access on the selector's own parameter qualifies (`x => x.name`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberSelector {
    member: String,
    span: Span,
}

impl MemberSelector {
    /// A selector for a member name the host already extracted.
    pub fn named(member: impl Into<String>, span: Span) -> Self {
        Self {
            member: member.into(),
            span,
        }
    }

    /// Reduce a selector expression to the member it accesses.
    ///
    /// ## Errors
    /// - `NonPathSelector` for anything but a one-parameter arrow whose body is `param.member`.
    pub fn from_expr(expr: &Spanned<Expr>) -> Result<Self, CompileError> {
        let Expr::Arrow { params, body } = &expr.node else {
            return Err(errors::non_path_selector(expr.node.shape_name(), expr.span));
        };
        let [param] = params.as_slice() else {
            return Err(errors::non_path_selector(
                &format!("an arrow function with {} parameters", params.len()),
                expr.span,
            ));
        };
        match &body.node {
            Expr::Member { object, member } => match &object.node {
                Expr::Ident(name) if name == param => Ok(Self::named(member.clone(), expr.span)),
                Expr::Ident(_) => Err(errors::non_path_selector("a member access on another value", body.span)),
                _ => Err(errors::non_path_selector("a nested member access", body.span)),
            },
            other => Err(errors::non_path_selector(other.shape_name(), body.span)),
        }
    }

    pub fn member(&self) -> &str {
        &self.member
    }

    pub fn span(&self) -> Span {
        self.span
    }
}

/// Chooses which entity of the selected type to annotate.
pub struct OnBuilder<'p, 'a> {
    pass: &'p mut AnnotationPass<'a>,
    ty: TypeHandle,
}

impl<'p, 'a> OnBuilder<'p, 'a> {
    pub(super) fn new(pass: &'p mut AnnotationPass<'a>, ty: TypeHandle) -> Self {
        Self { pass, ty }
    }

    pub fn selected(&self) -> &TypeHandle {
        &self.ty
    }

    pub fn type_target(self) -> TargetBuilder<'p, 'a> {
        let entity = ProgramEntity::Type(self.ty);
        TargetBuilder::new(self.pass, entity)
    }

    pub fn ctor_target(self) -> TargetBuilder<'p, 'a> {
        let entity = ProgramEntity::Constructor(self.ty);
        TargetBuilder::new(self.pass, entity)
    }

    /// Target a callable member.
    ///
    /// ## Errors
    /// - `UnresolvedMember` when the member is missing, is not callable, or its name is shared with non-callable
    ///   members.
    pub fn method(self, selector: &MemberSelector) -> Result<TargetBuilder<'p, 'a>, CompileError> {
        self.resolve_member(selector, true)?;
        let entity = ProgramEntity::Method {
            owner: self.ty,
            name: selector.member().to_string(),
        };
        Ok(TargetBuilder::new(self.pass, entity))
    }

    /// Target a property or field.
    ///
    /// ## Errors
    /// - `UnresolvedMember` when the member is missing, is callable, or its name is shared with callable members.
    pub fn property(self, selector: &MemberSelector) -> Result<TargetBuilder<'p, 'a>, CompileError> {
        self.resolve_member(selector, false)?;
        let entity = ProgramEntity::Property {
            owner: self.ty,
            name: selector.member().to_string(),
        };
        Ok(TargetBuilder::new(self.pass, entity))
    }

    /// Check that `selector` names exactly one member key of the wanted kind.
    fn resolve_member(&self, selector: &MemberSelector, callable: bool) -> Result<(), CompileError> {
        let name = selector.member();
        let found = self.pass.lookup().members_named(&self.ty, name);
        let Some(first) = found.first() else {
            return Err(errors::unresolved_member(self.ty.name(), name, selector.span()));
        };
        let mixed = found.iter().any(|m| m.kind.is_callable() != first.kind.is_callable());
        if mixed {
            return Err(errors::ambiguous_member(self.ty.name(), name, selector.span()));
        }
        if first.kind.is_callable() != callable {
            let wanted = if callable { "callable" } else { "non-callable" };
            return Err(errors::wrong_member_kind(
                self.ty.name(),
                name,
                first.kind,
                wanted,
                selector.span(),
            ));
        }
        Ok(())
    }
}

/// Enqueues descriptors against one bound entity.
pub struct TargetBuilder<'p, 'a> {
    pass: &'p mut AnnotationPass<'a>,
    entity: ProgramEntity,
}

impl<'p, 'a> TargetBuilder<'p, 'a> {
    fn new(pass: &'p mut AnnotationPass<'a>, entity: ProgramEntity) -> Self {
        Self { pass, entity }
    }

    pub fn entity(&self) -> &ProgramEntity {
        &self.entity
    }

    /// Validate `args` against `identity` and attach the resulting descriptor.
    ///
    /// ## Errors
    /// - `NoMatchingOverload` when no constructor signature accepts `args`; nothing is attached.
    pub fn add(
        &mut self,
        identity: &AttributeIdentity,
        args: Vec<AttributeArg>,
        span: Span,
    ) -> Result<&mut Self, CompileError> {
        let descriptor = self.pass.build_descriptor(identity, args, span)?;
        Ok(self.add_descriptor(&descriptor))
    }

    /// Attach an already validated descriptor.
    pub fn add_descriptor(&mut self, descriptor: &AttributeDescriptor) -> &mut Self {
        debug!(entity = %self.entity, attribute = %descriptor.identity(), "attach descriptor");
        self.pass.table_mut().attach(self.entity.clone(), descriptor.clone());
        self
    }
}

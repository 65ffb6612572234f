//! Surface recognition of attachment chains.
//!
//! The declaration-gathering pass walks the declaration statements of a unit and executes the ones that belong to
//! the annotation surface:
//!
//! ```text
//! select(User).method(u => u.save).add(Transaction).add(Obsolete, "use persist");
//! select<Order>().typeTarget.add(Serializable);
//! let legacy = buildDescriptor(Obsolete, "legacy api");
//! select(Client).ctorTarget.add(legacy);
//! ```
//!
//! Chains drive the builders in [`super::builder`]. Every recognized statement is reported as erased, whether it
//! succeeded or not; errors are collected per statement and the walk continues.

use std::collections::HashMap;

use sable_core::lang::annotations::{self, AnnotationStepId};
use tracing::debug;

use super::AnnotationPass;
use super::builder::{MemberSelector, TargetBuilder};
use super::identity::{AttributeArg, AttributeDescriptor, AttributeIdentity};
use crate::frontend::ast::{Expr, Literal, Span, Spanned, Stmt, TypeExpr};
use crate::frontend::diagnostics::{CompileError, errors};
use crate::frontend::symbols::{DeclarationLookup, TypeHandle};
use crate::frontend::types::{ResolvedType, TypeKind};

/// What the gathering walk did with a unit's declaration statements.
#[derive(Debug, Default)]
pub struct GatherOutcome {
    /// Spans of the statements that belong to the annotation surface, in source order.
    pub erased: Vec<Span>,
    pub errors: Vec<CompileError>,
}

/// One `.name` or `.name(args)` step after the chain root.
#[derive(Debug, Clone, Copy)]
enum Step<'e> {
    Member {
        name: &'e str,
        span: Span,
    },
    Call {
        name: &'e str,
        type_args: usize,
        args: &'e [Spanned<Expr>],
        span: Span,
    },
}

impl Step<'_> {
    fn name(&self) -> &str {
        match self {
            Step::Member { name, .. } | Step::Call { name, .. } => name,
        }
    }

    fn span(&self) -> Span {
        match self {
            Step::Member { span, .. } | Step::Call { span, .. } => *span,
        }
    }

    fn id(&self) -> Option<AnnotationStepId> {
        annotations::from_str(self.name())
    }
}

/// Split `a.b(..).c` into its root expression and the steps applied to it, innermost first.
fn flatten(expr: &Spanned<Expr>) -> (&Spanned<Expr>, Vec<Step<'_>>) {
    let mut steps = Vec::new();
    let mut current = expr;
    loop {
        match &current.node {
            Expr::Call {
                callee,
                type_args,
                args,
            } => match &callee.node {
                Expr::Member { object, member } => {
                    steps.push(Step::Call {
                        name: member,
                        type_args: type_args.len(),
                        args,
                        span: current.span,
                    });
                    current = &**object;
                }
                _ => break,
            },
            Expr::Member { object, member } => {
                steps.push(Step::Member {
                    name: member,
                    span: current.span,
                });
                current = &**object;
            }
            _ => break,
        }
    }
    steps.reverse();
    (current, steps)
}

fn is_free_call_of(expr: &Expr, step: AnnotationStepId) -> bool {
    expr.called_name().and_then(annotations::from_str) == Some(step)
}

/// Whether `stmt` belongs to the annotation surface (an attachment chain or a descriptor binding).
pub fn is_annotation_statement(stmt: &Stmt) -> bool {
    match stmt {
        Stmt::Let { value, .. } => is_free_call_of(&value.node, AnnotationStepId::BuildDescriptor),
        Stmt::Expr(expr) => {
            let (root, _) = flatten(expr);
            is_free_call_of(&root.node, AnnotationStepId::Select)
                || is_free_call_of(&expr.node, AnnotationStepId::BuildDescriptor)
        }
        Stmt::Return(_) => false,
    }
}

/// Executes attachment chains and descriptor bindings against an [`AnnotationPass`].
pub struct DeclarationGatherer<'p, 'a> {
    pass: &'p mut AnnotationPass<'a>,
    /// Descriptors bound with `let name = buildDescriptor(..)`.
    descriptors: HashMap<String, AttributeDescriptor>,
}

impl<'p, 'a> DeclarationGatherer<'p, 'a> {
    pub fn new(pass: &'p mut AnnotationPass<'a>) -> Self {
        Self {
            pass,
            descriptors: HashMap::new(),
        }
    }

    /// Run every annotation statement in `stmts`, in order.
    #[tracing::instrument(skip_all, fields(statements = stmts.len()))]
    pub fn gather(&mut self, stmts: &[Spanned<Stmt>]) -> GatherOutcome {
        let mut outcome = GatherOutcome::default();
        for stmt in stmts {
            if !is_annotation_statement(&stmt.node) {
                continue;
            }
            outcome.erased.push(stmt.span);
            if let Err(err) = self.statement(stmt) {
                debug!(kind = %err.kind, "annotation statement rejected");
                outcome.errors.push(err);
            }
        }
        outcome
    }

    fn statement(&mut self, stmt: &Spanned<Stmt>) -> Result<(), CompileError> {
        match &stmt.node {
            Stmt::Let { name, value } => {
                let descriptor = self.build_descriptor(value)?;
                self.descriptors.insert(name.clone(), descriptor);
                Ok(())
            }
            Stmt::Expr(expr) if is_free_call_of(&expr.node, AnnotationStepId::BuildDescriptor) => {
                self.build_descriptor(expr).map(|_| ())
            }
            Stmt::Expr(expr) => self.attachment_chain(expr),
            Stmt::Return(_) => Ok(()),
        }
    }

    /// `buildDescriptor(Attr, args..)`
    fn build_descriptor(&self, call: &Spanned<Expr>) -> Result<AttributeDescriptor, CompileError> {
        let Expr::Call { args, .. } = &call.node else {
            return Err(errors::malformed_attachment("expected a `buildDescriptor(..)` call", call.span));
        };
        let Some((attr, rest)) = args.split_first() else {
            return Err(errors::malformed_attachment(
                "`buildDescriptor` needs an attribute class as its first argument",
                call.span,
            ));
        };
        let lookup = self.pass.lookup();
        let identity = attribute_identity(lookup, attr)?;
        let args = constant_args(lookup, rest)?;
        self.pass.build_descriptor(&identity, args, call.span)
    }

    fn attachment_chain(&mut self, expr: &Spanned<Expr>) -> Result<(), CompileError> {
        let lookup = self.pass.lookup();
        let (root, steps) = flatten(expr);
        let ty = selected_type(lookup, root)?;

        let Some((target, adds)) = steps.split_first() else {
            return Err(errors::malformed_attachment(
                "`select(..)` must be followed by `typeTarget`, `ctorTarget`, `method(..)` or `property(..)`",
                expr.span,
            ));
        };
        let mut builder = target_builder(self.pass, ty, target)?;

        for step in adds {
            let Step::Call {
                type_args: 0, args, span, ..
            } = *step
            else {
                return Err(unexpected_step(step));
            };
            if step.id() != Some(AnnotationStepId::Add) {
                return Err(unexpected_step(step));
            }
            let Some((attr, rest)) = args.split_first() else {
                return Err(errors::malformed_attachment(
                    "`add` needs an attribute class or a descriptor",
                    span,
                ));
            };
            let bound = match &attr.node {
                Expr::Ident(name) if rest.is_empty() => self.descriptors.get(name),
                _ => None,
            };
            match bound {
                Some(descriptor) => {
                    builder.add_descriptor(descriptor);
                }
                None => {
                    let identity = attribute_identity(lookup, attr)?;
                    let args = constant_args(lookup, rest)?;
                    builder.add(&identity, args, span)?;
                }
            }
        }
        Ok(())
    }
}

/// Bind the target step of a chain to an entity of `ty`.
fn target_builder<'p, 'a>(
    pass: &'p mut AnnotationPass<'a>,
    ty: TypeHandle,
    step: &Step<'_>,
) -> Result<TargetBuilder<'p, 'a>, CompileError> {
    let on = pass.select(ty);
    match (*step, step.id()) {
        (Step::Member { .. }, Some(AnnotationStepId::TypeTarget)) => Ok(on.type_target()),
        (Step::Member { .. }, Some(AnnotationStepId::CtorTarget)) => Ok(on.ctor_target()),
        (
            Step::Call {
                type_args: 0,
                args: [selector],
                ..
            },
            Some(id @ (AnnotationStepId::Method | AnnotationStepId::Property)),
        ) => {
            let selector = MemberSelector::from_expr(selector)?;
            if id == AnnotationStepId::Method {
                on.method(&selector)
            } else {
                on.property(&selector)
            }
        }
        (Step::Call { .. }, Some(AnnotationStepId::Method | AnnotationStepId::Property)) => {
            Err(errors::malformed_attachment(
                format!("`{}` takes exactly one member selector", step.name()),
                step.span(),
            ))
        }
        _ => Err(errors::malformed_attachment(
            format!("expected a target after `select(..)`, found `{}`", step.name()),
            step.span(),
        )),
    }
}

fn unexpected_step(step: &Step<'_>) -> CompileError {
    errors::malformed_attachment(
        format!("expected `.add(..)` after the target, found `{}`", step.name()),
        step.span(),
    )
}

/// `select(T)` or `select<T>()`
fn selected_type(lookup: &dyn DeclarationLookup, root: &Spanned<Expr>) -> Result<TypeHandle, CompileError> {
    let Expr::Call { type_args, args, .. } = &root.node else {
        return Err(errors::malformed_attachment("expected `select(..)`", root.span));
    };
    let (name, span) = match (type_args.as_slice(), args.as_slice()) {
        (
            [
                Spanned {
                    node: TypeExpr::Named { name, args: generic },
                    span,
                },
            ],
            [],
        ) if generic.is_empty() => (name.clone(), *span),
        ([], [arg]) => match arg.node.member_path() {
            Some(path) => (path.join("."), arg.span),
            None => {
                return Err(errors::malformed_attachment(
                    format!("`select` expects a type name, found {}", arg.node.shape_name()),
                    arg.span,
                ));
            }
        },
        _ => {
            return Err(errors::malformed_attachment(
                "`select` takes exactly one declared type",
                root.span,
            ));
        }
    };
    lookup.type_handle(&name).ok_or_else(|| errors::unknown_type(&name, span))
}

fn attribute_identity(lookup: &dyn DeclarationLookup, attr: &Spanned<Expr>) -> Result<AttributeIdentity, CompileError> {
    match attr.node.member_path() {
        Some(path) => AttributeIdentity::resolve(lookup, &path.join("."), attr.span),
        None => Err(errors::malformed_attachment(
            format!("expected an attribute class name, found {}", attr.node.shape_name()),
            attr.span,
        )),
    }
}

fn constant_args(lookup: &dyn DeclarationLookup, exprs: &[Spanned<Expr>]) -> Result<Vec<AttributeArg>, CompileError> {
    exprs.iter().map(|e| constant_arg(lookup, e)).collect()
}

/// Convert a source expression into a compile-time constant argument.
///
/// ## Errors
/// - `NonConstantArgument` for expressions with no constant value.
/// - `UnknownType` / `UnresolvedMember` for `typeof` and enum-member references that do not resolve.
pub fn constant_arg(lookup: &dyn DeclarationLookup, expr: &Spanned<Expr>) -> Result<AttributeArg, CompileError> {
    match &expr.node {
        Expr::Literal(lit) => Ok(match lit {
            Literal::Int(v) => AttributeArg::int(*v),
            Literal::Float(v) => AttributeArg::float(*v),
            Literal::String(s) => AttributeArg::string(s.clone()),
            Literal::Bool(b) => AttributeArg::bool(*b),
            Literal::Char(c) => AttributeArg::char(*c),
            Literal::Null => AttributeArg::null(),
        }),
        Expr::TypeOf(ty) => Ok(AttributeArg::type_of(lookup.resolve_type(ty)?)),
        Expr::Member { .. } => enum_member(lookup, expr),
        Expr::Array(items) => {
            let items = constant_args(lookup, items)?;
            let element = match items.split_first() {
                Some((first, rest)) if rest.iter().all(|i| i.ty == first.ty) => first.ty.clone(),
                _ => ResolvedType::Object,
            };
            Ok(AttributeArg::array(element, items))
        }
        other => Err(errors::non_constant_argument(other.shape_name(), expr.span)),
    }
}

/// `Enum.Member`, with a possibly dotted enum name.
fn enum_member(lookup: &dyn DeclarationLookup, expr: &Spanned<Expr>) -> Result<AttributeArg, CompileError> {
    let not_constant = || errors::non_constant_argument(expr.node.shape_name(), expr.span);
    let path = expr.node.member_path().ok_or_else(not_constant)?;
    let Some((member, owner)) = path.split_last() else {
        return Err(not_constant());
    };
    let owner = owner.join(".");
    let decl = lookup
        .type_decl(&owner)
        .filter(|d| d.kind == TypeKind::Enum)
        .ok_or_else(not_constant)?;
    if !decl.fields().any(|f| f.name == *member) {
        return Err(errors::unresolved_member(&decl.name, member, expr.span));
    }
    Ok(AttributeArg::enum_member(&decl.name, member))
}

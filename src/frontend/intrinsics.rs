//! Recognition and static checking of intrinsic calls.
//!
//! An intrinsic call is a call of a bare identifier that spells an entry of
//! [`sable_core::lang::intrinsics::INTRINSICS`]. Recognition is purely syntactic; [`IntrinsicChecker::check`]
//! resolves the type arguments, enforces each intrinsic's preconditions and reports the static result type.
//! Turning a checked intrinsic into target syntax is the back end's job.
//!
//! ## Notes
//! - Static types of operands come from [`IntrinsicChecker::static_type`], which only knows literals, typed locals
//!   and nested intrinsics. An operand whose type it cannot determine is not rejected; the host type checker owns
//!   general expression typing.

use sable_core::lang::intrinsics::{self, IntrinsicId, IntrinsicPosition};
use sable_core::lang::types::NumericTypeId;
use sable_core::lang::types::numerics;

use crate::frontend::ast::{BinaryOp, Expr, Literal, Span, Spanned, TypeExpr};
use crate::frontend::conversions::{BuiltinConversions, ImplicitConversion};
use crate::frontend::diagnostics::{CompileError, errors};
use crate::frontend::symbols::{DeclarationLookup, Locals};
use crate::frontend::types::{DefaultValue, ResolvedType};

/// A syntactically recognized intrinsic call, not yet checked.
#[derive(Debug, Clone, Copy)]
pub struct IntrinsicCall<'e> {
    pub id: IntrinsicId,
    /// The spelling used at the call site.
    pub name: &'e str,
    pub type_args: &'e [Spanned<TypeExpr>],
    pub args: &'e [Spanned<Expr>],
    pub span: Span,
}

/// Recognize `expr` as an intrinsic call.
///
/// Spellings that are only valid in parameter-type position (`thisarg`) are recognized too, so the checker can
/// report them as misplaced.
pub fn recognize(expr: &Spanned<Expr>) -> Option<IntrinsicCall<'_>> {
    let Expr::Call {
        callee,
        type_args,
        args,
    } = &expr.node
    else {
        return None;
    };
    let Expr::Ident(name) = &callee.node else {
        return None;
    };
    let id = intrinsics::from_str(name)?;
    Some(IntrinsicCall {
        id,
        name,
        type_args,
        args,
        span: expr.span,
    })
}

/// Whether `ty` names the receiver marker (`thisarg<T>`).
pub fn receiver_marker(ty: &TypeExpr) -> Option<&[Spanned<TypeExpr>]> {
    match ty {
        TypeExpr::Named { name, args }
            if intrinsics::from_str_in(name, IntrinsicPosition::ParameterType) == Some(IntrinsicId::ThisArg) =>
        {
            Some(args)
        }
        _ => None,
    }
}

/// Why an intrinsic spelling cannot stand where a type is expected.
pub fn type_position_precondition(id: IntrinsicId) -> &'static str {
    match id {
        IntrinsicId::ThisArg => {
            "a receiver marker is only valid as the first parameter type of a module-level function"
        }
        _ => "an expression intrinsic cannot be used as a type",
    }
}

/// The checked form of an intrinsic call: everything lowering needs besides the operand expressions.
#[derive(Debug, Clone, PartialEq)]
pub enum IntrinsicForm {
    StackAlloc { element: ResolvedType },
    SizeOf { ty: ResolvedType },
    DefaultOf { ty: ResolvedType, value: DefaultValue },
    NameOf { path: Vec<String> },
    /// `as_nullable` is set when `target` is a value type, which needs the `T?` form.
    TryCast { target: ResolvedType, as_nullable: bool },
    InterfaceView { interface: ResolvedType },
    TypeTest { ty: ResolvedType },
}

#[derive(Debug, Clone, PartialEq)]
pub struct CheckedIntrinsic {
    pub id: IntrinsicId,
    pub form: IntrinsicForm,
    /// Static type of the call expression.
    pub result: ResolvedType,
}

/// Checks intrinsic calls against declared types.
pub struct IntrinsicChecker<'a> {
    lookup: &'a dyn DeclarationLookup,
    conversions: BuiltinConversions<'a>,
}

impl<'a> IntrinsicChecker<'a> {
    pub fn new(lookup: &'a dyn DeclarationLookup) -> Self {
        Self {
            lookup,
            conversions: BuiltinConversions::new(lookup),
        }
    }

    /// Check a recognized call.
    ///
    /// ## Errors
    /// - `UnlowerableIntrinsic` when the call has the wrong shape or a precondition does not hold.
    /// - `UnknownType` when a type argument does not resolve.
    pub fn check(&self, call: &IntrinsicCall<'_>, locals: &Locals) -> Result<CheckedIntrinsic, CompileError> {
        let shape = intrinsics::shape(call.id);
        if shape.position != IntrinsicPosition::Expression {
            return Err(errors::unlowerable_intrinsic(
                call.name,
                "a receiver marker is only valid as the first parameter type of a module-level function",
                call.span,
            ));
        }
        if call.type_args.len() != shape.type_args || call.args.len() != shape.value_args {
            return Err(errors::unlowerable_intrinsic(
                call.name,
                format!(
                    "expected {shape}, found {} type argument(s), {} value argument(s)",
                    call.type_args.len(),
                    call.args.len()
                ),
                call.span,
            ));
        }

        let type_arg = match call.type_args.first() {
            Some(t) => Some(self.lookup.resolve_type(t)?),
            None => None,
        };
        let value = call.args.first();

        let (form, result) = match (call.id, type_arg, value) {
            (IntrinsicId::StackAlloc, Some(element), Some(count)) => {
                self.check_count(call.name, count, locals)?;
                let result = ResolvedType::Span(Box::new(element.clone()));
                (IntrinsicForm::StackAlloc { element }, result)
            }
            (IntrinsicId::SizeOf, Some(ty), None) => {
                if !self.lookup.is_fixed_layout(&ty) {
                    return Err(errors::unlowerable_intrinsic(
                        call.name,
                        format!("'{ty}' is not a fixed-layout type"),
                        call.span,
                    )
                    .with_note("only numeric types, bool, enums and structs made of those have a static size"));
                }
                (IntrinsicForm::SizeOf { ty }, ResolvedType::Numeric(NumericTypeId::Int))
            }
            (IntrinsicId::DefaultOf, Some(ty), None) => {
                let value = self.lookup.default_value(&ty);
                (IntrinsicForm::DefaultOf { ty: ty.clone(), value }, ty)
            }
            (IntrinsicId::NameOf, None, Some(arg)) => {
                let Some(path) = arg.node.member_path() else {
                    return Err(errors::unlowerable_intrinsic(
                        call.name,
                        format!("expected an identifier or member path, found {}", arg.node.shape_name()),
                        arg.span,
                    ));
                };
                let path = path.into_iter().map(str::to_string).collect();
                (IntrinsicForm::NameOf { path }, ResolvedType::String)
            }
            (IntrinsicId::TryCast, Some(target), Some(_)) => {
                let as_nullable = self.lookup.is_value_type(&target) && !matches!(target, ResolvedType::Nullable(_));
                if matches!(target, ResolvedType::Span(_)) {
                    return Err(errors::unlowerable_intrinsic(
                        call.name,
                        "a stack memory view cannot be the target of a cast",
                        call.span,
                    ));
                }
                let result = if as_nullable {
                    ResolvedType::Nullable(Box::new(target.clone()))
                } else {
                    target.clone()
                };
                (IntrinsicForm::TryCast { target, as_nullable }, result)
            }
            (IntrinsicId::InterfaceView, Some(interface), Some(arg)) => {
                if !self.lookup.is_interface(&interface) {
                    return Err(errors::unlowerable_intrinsic(
                        call.name,
                        format!("'{interface}' is not an interface"),
                        call.span,
                    ));
                }
                if let Some(from) = self.static_type(arg, locals) {
                    if !self.conversions.is_assignable(&from, &interface) {
                        return Err(errors::unlowerable_intrinsic(
                            call.name,
                            format!("a value of type '{from}' does not implement '{interface}'"),
                            arg.span,
                        ));
                    }
                }
                (
                    IntrinsicForm::InterfaceView {
                        interface: interface.clone(),
                    },
                    interface,
                )
            }
            (IntrinsicId::TypeTest, Some(ty), Some(_)) => (IntrinsicForm::TypeTest { ty }, ResolvedType::Bool),
            _ => {
                return Err(errors::unlowerable_intrinsic(
                    call.name,
                    format!("expected {shape}"),
                    call.span,
                ));
            }
        };

        Ok(CheckedIntrinsic {
            id: call.id,
            form,
            result,
        })
    }

    /// The element count of `stackalloc` must be a non-negative integral value.
    fn check_count(&self, name: &str, count: &Spanned<Expr>, locals: &Locals) -> Result<(), CompileError> {
        if let Expr::Literal(Literal::Int(n)) = count.node {
            if n < 0 {
                return Err(errors::unlowerable_intrinsic(
                    name,
                    format!("element count must be non-negative, found {n}"),
                    count.span,
                ));
            }
        }
        match self.static_type(count, locals) {
            Some(ty) if !ty.is_integral() => Err(errors::unlowerable_intrinsic(
                name,
                format!("element count must be integral, found '{ty}'"),
                count.span,
            )),
            _ => Ok(()),
        }
    }

    /// Static type of `expr`, when it can be determined locally.
    pub fn static_type(&self, expr: &Spanned<Expr>, locals: &Locals) -> Option<ResolvedType> {
        if let Some(call) = recognize(expr) {
            return self.check(&call, locals).ok().map(|c| c.result);
        }
        match &expr.node {
            Expr::Literal(lit) => Some(literal_type(lit)),
            Expr::Ident(name) => locals.lookup(name).cloned(),
            Expr::TypeOf(_) => Some(ResolvedType::TypeHandle),
            Expr::Array(items) => {
                let first = self.static_type(items.first()?, locals)?;
                items[1..]
                    .iter()
                    .all(|i| self.static_type(i, locals).as_ref() == Some(&first))
                    .then(|| ResolvedType::array_of(first))
            }
            Expr::Binary { op, lhs, rhs } => match op {
                BinaryOp::Eq | BinaryOp::NotEq | BinaryOp::Lt | BinaryOp::Gt | BinaryOp::And | BinaryOp::Or => {
                    Some(ResolvedType::Bool)
                }
                BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div => {
                    let l = self.static_type(lhs, locals)?;
                    let r = self.static_type(rhs, locals)?;
                    arithmetic_type(&l, &r)
                }
            },
            Expr::Member { .. } | Expr::Call { .. } | Expr::Arrow { .. } => None,
        }
    }
}

fn literal_type(lit: &Literal) -> ResolvedType {
    match lit {
        Literal::Int(v) if i32::try_from(*v).is_ok() => ResolvedType::Numeric(NumericTypeId::Int),
        Literal::Int(_) => ResolvedType::Numeric(NumericTypeId::Long),
        Literal::Float(_) => ResolvedType::Numeric(NumericTypeId::Double),
        Literal::String(_) => ResolvedType::String,
        Literal::Bool(_) => ResolvedType::Bool,
        Literal::Char(_) => ResolvedType::Numeric(NumericTypeId::Char),
        Literal::Null => ResolvedType::Null,
    }
}

/// Result type of `l op r` for arithmetic operators: the wider operand, never narrower than `int`.
fn arithmetic_type(l: &ResolvedType, r: &ResolvedType) -> Option<ResolvedType> {
    if *l == ResolvedType::String || *r == ResolvedType::String {
        return Some(ResolvedType::String);
    }
    let (ResolvedType::Numeric(a), ResolvedType::Numeric(b)) = (l, r) else {
        return None;
    };
    let wider = if numerics::widens_to(*a, *b) {
        *b
    } else if numerics::widens_to(*b, *a) {
        *a
    } else {
        return None;
    };
    if numerics::widens_to(wider, NumericTypeId::Int) {
        Some(ResolvedType::Numeric(NumericTypeId::Int))
    } else {
        Some(ResolvedType::Numeric(wider))
    }
}

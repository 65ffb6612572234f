//! Intrinsic call lowering.

use proc_macro2::TokenStream;
use quote::quote;
use sable_core::lang::intrinsics as registry;
use tracing::debug;

use super::UnitLowering;
use crate::backend::emit::Emitter;
use crate::backend::emit::types::resolved_type_tokens;
use crate::backend::sink::{EmissionSink, Replacement};
use crate::frontend::ast::{Expr, Spanned};
use crate::frontend::diagnostics::{CompileError, errors};
use crate::frontend::intrinsics::{CheckedIntrinsic, IntrinsicCall, IntrinsicForm, recognize};
use crate::frontend::symbols::Locals;

impl UnitLowering<'_, '_> {
    /// Lower every intrinsic call in `expr`, innermost first.
    ///
    /// Returns whether the whole subtree lowered; an outer intrinsic is only rendered when its operands were.
    pub(super) fn lower_expr(&mut self, expr: &Spanned<Expr>, locals: &Locals) -> bool {
        let mut ok = true;
        let mut types_ok = true;
        match &expr.node {
            Expr::Member { object, member } => {
                ok &= self.lower_expr(object, locals);
                ok &= self.check_name(member, expr.span);
            }
            Expr::Call {
                callee,
                type_args,
                args,
            } => {
                ok &= self.lower_expr(callee, locals);
                for ty in type_args {
                    types_ok &= self.check_type_expr(ty);
                }
                for arg in args {
                    ok &= self.lower_expr(arg, locals);
                }
            }
            Expr::Arrow { params, body } => {
                for param in params {
                    ok &= self.check_name(param, expr.span);
                }
                ok &= self.lower_expr(body, &locals.shadowed(params));
            }
            Expr::Array(items) => {
                for item in items {
                    ok &= self.lower_expr(item, locals);
                }
            }
            Expr::Binary { lhs, rhs, .. } => {
                ok &= self.lower_expr(lhs, locals);
                ok &= self.lower_expr(rhs, locals);
            }
            Expr::TypeOf(ty) => {
                let before = self.errors.len();
                self.source_type(ty);
                ok &= self.errors.len() == before;
            }
            Expr::Ident(name) => ok &= self.check_name(name, expr.span),
            Expr::Literal(_) => {}
        }

        let Some(call) = recognize(expr) else {
            return ok && types_ok;
        };
        // Misplaced type-argument spellings are already reported.
        if !types_ok {
            return false;
        }
        let checked = match self.checker.check(&call, locals) {
            Ok(checked) => checked,
            Err(err) => {
                self.errors.push(err);
                return false;
            }
        };
        if !ok {
            return false;
        }
        match self.render(&call, &checked) {
            Ok(tokens) => {
                debug!(
                    intrinsic = registry::as_str(call.id),
                    erased = registry::is_erased(call.id),
                    "lower intrinsic"
                );
                self.recorded.replace(call.span, Replacement::Syntax(tokens));
                true
            }
            Err(err) => {
                self.errors.push(err);
                false
            }
        }
    }

    /// Target tokens for a checked intrinsic.
    fn render(&self, call: &IntrinsicCall<'_>, checked: &CheckedIntrinsic) -> Result<TokenStream, CompileError> {
        let emitter = Emitter::new(&self.recorded);
        let value = || value_arg(call);

        Ok(match &checked.form {
            IntrinsicForm::StackAlloc { element } => {
                let element = resolved_type_tokens(element, call.span)?;
                let count = emitter.expr(value()?)?;
                quote! { stackalloc #element [#count] }
            }
            IntrinsicForm::SizeOf { ty } => {
                let ty = resolved_type_tokens(ty, call.span)?;
                quote! { sizeof(#ty) }
            }
            IntrinsicForm::DefaultOf { ty, .. } => {
                let ty = resolved_type_tokens(ty, call.span)?;
                quote! { default(#ty) }
            }
            IntrinsicForm::NameOf { .. } => {
                let path = emitter.expr(value()?)?;
                quote! { nameof(#path) }
            }
            IntrinsicForm::TryCast { target, as_nullable } => {
                let value = emitter.operand(value()?)?;
                let target = resolved_type_tokens(target, call.span)?;
                if *as_nullable {
                    quote! { #value as #target ? }
                } else {
                    quote! { #value as #target }
                }
            }
            // Erased: the view is the value itself, with no cast.
            IntrinsicForm::InterfaceView { .. } => emitter.operand(value()?)?,
            IntrinsicForm::TypeTest { ty } => {
                let value = emitter.operand(value()?)?;
                let ty = resolved_type_tokens(ty, call.span)?;
                quote! { #value is #ty }
            }
        })
    }
}

fn value_arg<'e>(call: &IntrinsicCall<'e>) -> Result<&'e Spanned<Expr>, CompileError> {
    call.args
        .first()
        .ok_or_else(|| errors::unlowerable_intrinsic(call.name, "missing value argument", call.span))
}

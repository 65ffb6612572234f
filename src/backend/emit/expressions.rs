//! Expression and type-expression emission.

use proc_macro2::TokenStream;
use quote::quote;
use sable_core::lang::intrinsics;

use super::types::{char_literal, float_literal, int_literal, path_tokens, string_literal, target_ident};
use super::{EmitError, Emitter};
use crate::backend::sink::Replacement;
use crate::frontend::ast::{BinaryOp, Expr, Literal, Spanned, TypeExpr};
use crate::frontend::diagnostics::errors;
use crate::frontend::intrinsics::recognize;

impl Emitter<'_> {
    /// Emit an expression, splicing in recorded replacements.
    ///
    /// ## Errors
    /// - [`EmitError::Stale`] when an intrinsic call has no recorded replacement.
    /// - [`EmitError::InvalidName`] when a name is not a target identifier.
    pub fn expr(&self, expr: &Spanned<Expr>) -> Result<TokenStream, EmitError> {
        match self.sink.replacement(expr.span) {
            Some(Replacement::Syntax(tokens)) => return Ok(tokens.clone()),
            Some(Replacement::Erased) => return Ok(TokenStream::new()),
            Some(Replacement::ThisParameter(_)) | None => {}
        }
        if let Some(call) = recognize(expr) {
            return Err(EmitError::Stale(errors::stale_erased_construct(
                &format!("intrinsic `{}`", call.name),
                expr.span,
            )));
        }

        Ok(match &expr.node {
            Expr::Ident(name) => {
                let name = target_ident(name, expr.span)?;
                quote! { #name }
            }
            Expr::Literal(lit) => literal_tokens(lit),
            Expr::Member { object, member } => {
                let object = self.operand(object)?;
                let member = target_ident(member, expr.span)?;
                quote! { #object . #member }
            }
            Expr::Call {
                callee,
                type_args,
                args,
            } => {
                let callee = self.operand(callee)?;
                let args = args.iter().map(|a| self.expr(a)).collect::<Result<Vec<_>, _>>()?;
                if type_args.is_empty() {
                    quote! { #callee ( #(#args),* ) }
                } else {
                    let type_args = type_args
                        .iter()
                        .map(|t| self.type_expr(t))
                        .collect::<Result<Vec<_>, _>>()?;
                    quote! { #callee < #(#type_args),* > ( #(#args),* ) }
                }
            }
            Expr::Arrow { params, body } => {
                let body = self.expr(body)?;
                let params = params
                    .iter()
                    .map(|p| target_ident(p, expr.span))
                    .collect::<Result<Vec<_>, _>>()?;
                match params.as_slice() {
                    [single] => quote! { #single => #body },
                    _ => quote! { ( #(#params),* ) => #body },
                }
            }
            Expr::Array(items) => {
                let items = items.iter().map(|i| self.expr(i)).collect::<Result<Vec<_>, _>>()?;
                quote! { new [] { #(#items),* } }
            }
            Expr::Binary { op, lhs, rhs } => {
                let lhs = self.operand(lhs)?;
                let rhs = self.operand(rhs)?;
                let op = binary_op_tokens(*op);
                quote! { #lhs #op #rhs }
            }
            Expr::TypeOf(ty) => {
                let ty = self.type_expr(ty)?;
                quote! { typeof(#ty) }
            }
        })
    }

    /// Emit a subexpression that sits next to an operator, parenthesized when it is itself an operation.
    pub fn operand(&self, expr: &Spanned<Expr>) -> Result<TokenStream, EmitError> {
        let tokens = self.expr(expr)?;
        Ok(if needs_parens(&expr.node) {
            quote! { ( #tokens ) }
        } else {
            tokens
        })
    }

    /// Emit a type expression.
    ///
    /// ## Errors
    /// - [`EmitError::Stale`] when a receiver marker or another intrinsic spelling has no recorded replacement.
    pub fn type_expr(&self, ty: &Spanned<TypeExpr>) -> Result<TokenStream, EmitError> {
        match self.sink.replacement(ty.span) {
            Some(Replacement::ThisParameter(inner)) => return Ok(quote! { this #inner }),
            Some(Replacement::Syntax(tokens)) => return Ok(tokens.clone()),
            Some(Replacement::Erased) | None => {}
        }
        match &ty.node {
            TypeExpr::Named { name, args } => {
                if intrinsics::from_str(name).is_some() {
                    return Err(EmitError::Stale(errors::stale_erased_construct(
                        &format!("receiver marker `{name}`"),
                        ty.span,
                    )));
                }
                let name = path_tokens(name, ty.span)?;
                if args.is_empty() {
                    Ok(name)
                } else {
                    let args = args.iter().map(|a| self.type_expr(a)).collect::<Result<Vec<_>, _>>()?;
                    Ok(quote! { #name < #(#args),* > })
                }
            }
            TypeExpr::Array(inner) => {
                let inner = self.type_expr(inner)?;
                Ok(quote! { #inner [] })
            }
        }
    }
}

/// Whether `expr` must be parenthesized when used as an operand.
///
/// Operations whose lowering is an operator form (`as`, `is`) count too.
fn needs_parens(expr: &Expr) -> bool {
    match expr {
        Expr::Binary { .. } | Expr::Arrow { .. } => true,
        Expr::Call { .. } => matches!(
            expr.called_name().and_then(intrinsics::from_str),
            Some(intrinsics::IntrinsicId::TryCast | intrinsics::IntrinsicId::TypeTest)
        ),
        _ => false,
    }
}

fn literal_tokens(lit: &Literal) -> TokenStream {
    match lit {
        Literal::Int(v) => int_literal(*v),
        Literal::Float(v) => float_literal(*v),
        Literal::String(s) => {
            let lit = string_literal(s);
            quote! { #lit }
        }
        Literal::Bool(true) => quote! { true },
        Literal::Bool(false) => quote! { false },
        Literal::Char(c) => char_literal(*c),
        Literal::Null => quote! { null },
    }
}

fn binary_op_tokens(op: BinaryOp) -> TokenStream {
    match op {
        BinaryOp::Add => quote! { + },
        BinaryOp::Sub => quote! { - },
        BinaryOp::Mul => quote! { * },
        BinaryOp::Div => quote! { / },
        BinaryOp::Eq => quote! { == },
        BinaryOp::NotEq => quote! { != },
        BinaryOp::Lt => quote! { < },
        BinaryOp::Gt => quote! { > },
        BinaryOp::And => quote! { && },
        BinaryOp::Or => quote! { || },
    }
}

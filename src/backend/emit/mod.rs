//! Emit target tokens from lowered source.
//!
//! [`Emitter`] renders source constructs structurally and splices in whatever lowering recorded in a
//! [`RecordingSink`]. It never lowers anything itself: an intrinsic, receiver marker or attachment chain with no
//! recorded replacement is reported as [`EmitError::Stale`]. Names that are not target identifiers are reported as
//! [`EmitError::InvalidName`].
//!
//! ## Notes
//! - Output is a `TokenStream`; layout and file writing belong to the host emitter.
//!
//! ## See also
//! - [`expressions`]: expression and type-expression emission
//! - [`types`]: type, name and constant helpers

mod errors;
mod expressions;
pub mod types;

pub use errors::EmitError;

use proc_macro2::TokenStream;
use quote::quote;

use self::types::{path_tokens, target_ident};
use crate::backend::sink::{RecordingSink, Replacement};
use crate::frontend::annotations::ProgramEntity;
use crate::frontend::annotations::chain::is_annotation_statement;
use crate::frontend::ast::{CompilationUnit, FunctionDecl, Span, Spanned, Stmt};
use crate::frontend::diagnostics::errors as diagnostics;

/// Renders target tokens from source plus recorded replacements.
pub struct Emitter<'s> {
    sink: &'s RecordingSink,
}

impl<'s> Emitter<'s> {
    pub fn new(sink: &'s RecordingSink) -> Self {
        Self { sink }
    }

    /// Native annotation tags of `entity`, in attachment order.
    ///
    /// ## Errors
    /// - [`EmitError::InvalidName`] when a tag name is not a target path. Tags carry no source location, so the
    ///   error has an empty span; lowering checks names before it records tags.
    pub fn annotations(&self, entity: &ProgramEntity) -> Result<TokenStream, EmitError> {
        let tags = self
            .sink
            .tags_for(entity)
            .map(|tag| {
                let name = path_tokens(&tag.name, Span::default())?;
                let args = &tag.args;
                Ok(if args.is_empty() {
                    quote! { [#name] }
                } else {
                    quote! { [#name(#(#args),*)] }
                })
            })
            .collect::<Result<Vec<_>, EmitError>>()?;
        Ok(quote! { #(#tags)* })
    }

    pub fn stmt(&self, stmt: &Spanned<Stmt>) -> Result<TokenStream, EmitError> {
        match self.sink.replacement(stmt.span) {
            Some(Replacement::Erased) => return Ok(TokenStream::new()),
            Some(Replacement::Syntax(tokens)) => return Ok(tokens.clone()),
            Some(Replacement::ThisParameter(_)) | None => {}
        }
        if is_annotation_statement(&stmt.node) {
            return Err(EmitError::Stale(diagnostics::stale_erased_construct(
                "attachment chain",
                stmt.span,
            )));
        }
        Ok(match &stmt.node {
            Stmt::Let { name, value } => {
                let name = target_ident(name, stmt.span)?;
                let value = self.expr(value)?;
                quote! { var #name = #value; }
            }
            Stmt::Expr(expr) => {
                let expr = self.expr(expr)?;
                quote! { #expr; }
            }
            Stmt::Return(Some(expr)) => {
                let expr = self.expr(expr)?;
                quote! { return #expr; }
            }
            Stmt::Return(None) => quote! { return; },
        })
    }

    pub fn block(&self, stmts: &[Spanned<Stmt>]) -> Result<TokenStream, EmitError> {
        let stmts = stmts.iter().map(|s| self.stmt(s)).collect::<Result<Vec<_>, _>>()?;
        Ok(quote! { #(#stmts)* })
    }

    /// Emit a function; module-level functions become `static` members.
    pub fn function(&self, func: &Spanned<FunctionDecl>) -> Result<TokenStream, EmitError> {
        let f = &func.node;
        let ret = self.type_expr(&f.return_type)?;
        let name = target_ident(&f.name, func.span)?;
        let params = f
            .params
            .iter()
            .map(|p| {
                let ty = self.type_expr(&p.ty)?;
                let name = target_ident(&p.name, p.ty.span)?;
                Ok(quote! { #ty #name })
            })
            .collect::<Result<Vec<_>, EmitError>>()?;
        let body = self.block(&f.body)?;
        let modifiers = if f.module_level { quote! { static } } else { TokenStream::new() };
        Ok(quote! { #modifiers #ret #name ( #(#params),* ) { #body } })
    }

    /// Emit a whole unit: surviving declaration statements, then functions.
    pub fn unit(&self, unit: &CompilationUnit) -> Result<TokenStream, EmitError> {
        let declarations = self.block(&unit.declarations)?;
        let functions = unit
            .functions
            .iter()
            .map(|f| self.function(f))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(quote! { #declarations #(#functions)* })
    }
}

//! Function signatures, receiver markers and statement walking.

use quote::quote;
use sable_core::lang::intrinsics::{self as registry, IntrinsicId};
use tracing::debug;

use super::UnitLowering;
use crate::backend::emit::Emitter;
use crate::backend::emit::types::{path_tokens, resolved_type_tokens, target_ident};
use crate::backend::sink::{EmissionSink, Replacement};
use crate::frontend::annotations::chain::is_annotation_statement;
use crate::frontend::ast::{Expr, FunctionDecl, Span, Spanned, Stmt, TypeExpr};
use crate::frontend::diagnostics::{ErrorKind, errors};
use crate::frontend::intrinsics::{receiver_marker, type_position_precondition};
use crate::frontend::symbols::{DeclarationLookup, Locals};
use crate::frontend::types::ResolvedType;

impl UnitLowering<'_, '_> {
    /// Lower the intrinsic calls in declaration statements that are not attachment chains.
    pub(super) fn lower_declarations(&mut self, declarations: &[Spanned<Stmt>]) {
        let mut locals = Locals::new();
        for stmt in declarations {
            if is_annotation_statement(&stmt.node) {
                continue;
            }
            self.lower_statement(stmt, &mut locals);
        }
    }

    pub(super) fn lower_function(&mut self, func: &Spanned<FunctionDecl>) {
        let f = &func.node;
        let mut locals = Locals::new();
        self.check_name(&f.name, func.span);

        for (index, param) in f.params.iter().enumerate() {
            self.check_name(&param.name, param.ty.span);
            match receiver_marker(&param.ty.node) {
                Some(args) => self.lower_receiver(f, index, param.ty.span, args, &param.name, &mut locals),
                None => {
                    if let Some(ty) = self.source_type(&param.ty) {
                        locals.define(param.name.clone(), ty);
                    }
                }
            }
        }
        self.source_type(&f.return_type);

        for stmt in &f.body {
            self.lower_statement(stmt, &mut locals);
        }
    }

    /// `thisarg<T>` on the first parameter of a module-level function becomes `this T`.
    fn lower_receiver(
        &mut self,
        func: &FunctionDecl,
        index: usize,
        span: Span,
        args: &[Spanned<TypeExpr>],
        param: &str,
        locals: &mut Locals,
    ) {
        if index != 0 || !func.module_level {
            self.errors.push(errors::unlowerable_intrinsic(
                "thisarg",
                type_position_precondition(IntrinsicId::ThisArg),
                span,
            ));
            return;
        }
        let [inner] = args else {
            self.errors.push(errors::unlowerable_intrinsic(
                "thisarg",
                format!("expected exactly one type argument, found {}", args.len()),
                span,
            ));
            return;
        };
        if !self.check_type_expr(inner) {
            return;
        }
        let ty = match self.lookup.resolve_type(inner) {
            Ok(ty) => ty,
            Err(err) => {
                self.errors.push(err);
                return;
            }
        };
        match resolved_type_tokens(&ty, inner.span) {
            Ok(tokens) => {
                debug!(function = %func.name, receiver = %ty, "lower receiver marker");
                self.recorded.replace(span, Replacement::ThisParameter(tokens));
                locals.define(param, ty);
            }
            Err(err) => self.errors.push(err.into()),
        }
    }

    /// Resolve a type written in source.
    ///
    /// Only misplaced intrinsic spellings and names with no target spelling are errors here; other resolution
    /// failures belong to the host type checker.
    pub(super) fn source_type(&mut self, ty: &Spanned<TypeExpr>) -> Option<ResolvedType> {
        if !self.check_type_expr(ty) {
            return None;
        }
        match self.lookup.resolve_type(ty) {
            Ok(resolved) => Some(resolved),
            Err(err) => {
                if err.kind == ErrorKind::UnlowerableIntrinsic {
                    self.errors.push(err);
                }
                None
            }
        }
    }

    /// Report every intrinsic spelling and invalid name nested anywhere in `ty`.
    ///
    /// A receiver marker is only accepted as the whole type of a receiver parameter, which is unwrapped before
    /// this runs, so any spelling found here is misplaced.
    pub(super) fn check_type_expr(&mut self, ty: &Spanned<TypeExpr>) -> bool {
        match &ty.node {
            TypeExpr::Array(inner) => self.check_type_expr(inner),
            TypeExpr::Named { name, args } => {
                let mut ok = match registry::from_str(name) {
                    Some(id) => {
                        self.errors.push(errors::unlowerable_intrinsic(
                            name,
                            type_position_precondition(id),
                            ty.span,
                        ));
                        false
                    }
                    None => match path_tokens(name, ty.span) {
                        Ok(_) => true,
                        Err(err) => {
                            self.errors.push(err.into());
                            false
                        }
                    },
                };
                for arg in args {
                    ok &= self.check_type_expr(arg);
                }
                ok
            }
        }
    }

    /// Whether `name` is a target identifier, reporting it when not.
    pub(super) fn check_name(&mut self, name: &str, span: Span) -> bool {
        match target_ident(name, span) {
            Ok(_) => true,
            Err(err) => {
                self.errors.push(err.into());
                false
            }
        }
    }

    fn lower_statement(&mut self, stmt: &Spanned<Stmt>, locals: &mut Locals) {
        if is_annotation_statement(&stmt.node) {
            self.errors.push(errors::malformed_attachment(
                "attachment chains are only valid among declarations",
                stmt.span,
            ));
            return;
        }
        match &stmt.node {
            Stmt::Let { name, value } => {
                let named = self.check_name(name, stmt.span);
                let lowered = self.lower_expr(value, locals);
                match self.checker.static_type(value, locals) {
                    Some(ty) => {
                        if named && lowered && matches!(ty, ResolvedType::Span(_)) {
                            self.lower_span_local(stmt.span, name, value, &ty);
                        }
                        locals.define(name.clone(), ty);
                    }
                    None => *locals = locals.shadowed(std::slice::from_ref(name)),
                }
            }
            Stmt::Expr(expr) | Stmt::Return(Some(expr)) => {
                self.lower_expr(expr, locals);
            }
            Stmt::Return(None) => {}
        }
    }

    /// `Span<T> name = value;` for a span-typed local.
    ///
    /// `var` would type a `stackalloc` initializer as a pointer.
    fn lower_span_local(&mut self, span: Span, name: &str, value: &Spanned<Expr>, ty: &ResolvedType) {
        let emitter = Emitter::new(&self.recorded);
        let rendered = resolved_type_tokens(ty, span).and_then(|ty| {
            let name = target_ident(name, span)?;
            let value = emitter.expr(value)?;
            Ok(quote! { #ty #name = #value; })
        });
        match rendered {
            Ok(tokens) => {
                debug!(local = name, "declare span local");
                self.recorded.replace(span, Replacement::Syntax(tokens));
            }
            Err(err) => self.errors.push(err.into()),
        }
    }
}

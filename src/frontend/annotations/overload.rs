//! Overload-argument validation for attribute constructors.
//!
//! An argument list is accepted iff some declared signature has the same arity and every argument is assignable to
//! the parameter at its position. Signatures are all considered; declaration order only decides which match is
//! recorded on the descriptor.

use tracing::trace;

use super::identity::{AttributeArg, AttributeIdentity, Signature};
use crate::frontend::ast::Span;
use crate::frontend::conversions::ImplicitConversion;
use crate::frontend::diagnostics::{CompileError, errors};
use crate::frontend::types::ResolvedType;

/// Whether `signature` accepts arguments of the given static types.
pub fn signature_accepts(signature: &Signature, arg_types: &[ResolvedType], conv: &dyn ImplicitConversion) -> bool {
    signature.arity() == arg_types.len()
        && arg_types
            .iter()
            .zip(&signature.params)
            .all(|(arg, param)| conv.is_assignable(arg, param))
}

/// Indices of every signature of `identity` that accepts the argument types, in declaration order.
pub fn matching_signatures(
    identity: &AttributeIdentity,
    arg_types: &[ResolvedType],
    conv: &dyn ImplicitConversion,
) -> Vec<usize> {
    identity
        .signatures()
        .iter()
        .enumerate()
        .filter(|(idx, sig)| {
            let accepted = signature_accepts(sig, arg_types, conv);
            trace!(attribute = %identity, signature = idx, %sig, accepted, "overload check");
            accepted
        })
        .map(|(idx, _)| idx)
        .collect()
}

/// Validate `args` against `identity`, returning the index of the first accepting signature.
///
/// ## Errors
/// - `NoMatchingOverload` listing the attempted argument types and every declared signature.
pub fn validate(
    identity: &AttributeIdentity,
    args: &[AttributeArg],
    conv: &dyn ImplicitConversion,
    span: Span,
) -> Result<usize, CompileError> {
    let arg_types: Vec<ResolvedType> = args.iter().map(|a| a.ty.clone()).collect();
    match matching_signatures(identity, &arg_types, conv).first() {
        Some(&idx) => Ok(idx),
        None => {
            let attempted: Vec<String> = arg_types.iter().map(ToString::to_string).collect();
            let declared: Vec<String> = identity.signatures().iter().map(ToString::to_string).collect();
            Err(errors::no_matching_overload(
                identity.native_name(),
                &attempted,
                &declared,
                span,
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::conversions::BuiltinConversions;
    use crate::frontend::diagnostics::ErrorKind;
    use crate::frontend::symbols::SymbolTable;
    use sable_core::lang::types::NumericTypeId;

    fn int() -> ResolvedType {
        ResolvedType::Numeric(NumericTypeId::Int)
    }

    fn obsolete() -> AttributeIdentity {
        AttributeIdentity::new(
            "ObsoleteAttribute",
            vec![
                Signature::new(vec![]),
                Signature::new(vec![ResolvedType::String]),
                Signature::new(vec![ResolvedType::String, ResolvedType::Bool]),
            ],
        )
    }

    #[test]
    fn test_accepts_any_matching_signature() {
        let table = SymbolTable::new();
        let conv = BuiltinConversions::new(&table);
        let id = obsolete();

        assert_eq!(validate(&id, &[], &conv, Span::default()), Ok(0));
        assert_eq!(validate(&id, &[AttributeArg::string("msg")], &conv, Span::default()), Ok(1));
        assert_eq!(
            validate(
                &id,
                &[AttributeArg::string("msg"), AttributeArg::bool(true)],
                &conv,
                Span::default()
            ),
            Ok(2)
        );
    }

    #[test]
    fn test_three_args_match_three_params_despite_shorter_signature() {
        let table = SymbolTable::new();
        let conv = BuiltinConversions::new(&table);
        let id = AttributeIdentity::new(
            "RangeAttribute",
            vec![
                Signature::new(vec![int(), int(), int()]),
                Signature::new(vec![ResolvedType::String]),
            ],
        );
        let args = [AttributeArg::int(1), AttributeArg::int(2), AttributeArg::int(3)];
        assert_eq!(validate(&id, &args, &conv, Span::default()), Ok(0));
    }

    #[test]
    fn test_no_matching_overload_lists_signatures() {
        let table = SymbolTable::new();
        let conv = BuiltinConversions::new(&table);
        let args = [AttributeArg::int(1), AttributeArg::int(2), AttributeArg::int(3)];
        let err = validate(&obsolete(), &args, &conv, Span::new(10, 20)).unwrap_err();

        assert_eq!(err.kind, ErrorKind::NoMatchingOverload);
        assert_eq!(err.span, Span::new(10, 20));
        assert!(err.message.contains("ObsoleteAttribute"));
        assert!(err.message.contains("(int, int, int)"));
        assert_eq!(err.notes.len(), 3);
        assert_eq!(err.notes[2], "declared: ObsoleteAttribute(string, bool)");
    }

    #[test]
    fn test_widening_applies_per_position() {
        let table = SymbolTable::new();
        let conv = BuiltinConversions::new(&table);
        let id = AttributeIdentity::new(
            "TimeoutAttribute",
            vec![Signature::new(vec![ResolvedType::Numeric(NumericTypeId::Long)])],
        );
        assert!(validate(&id, &[AttributeArg::int(30)], &conv, Span::default()).is_ok());
        assert!(validate(&id, &[AttributeArg::float(1.5)], &conv, Span::default()).is_err());
    }

    #[test]
    fn test_all_matches_reported_in_declaration_order() {
        let table = SymbolTable::new();
        let conv = BuiltinConversions::new(&table);
        let id = AttributeIdentity::new(
            "TagAttribute",
            vec![
                Signature::new(vec![ResolvedType::Numeric(NumericTypeId::Long)]),
                Signature::new(vec![ResolvedType::Object]),
                Signature::new(vec![int()]),
            ],
        );
        assert_eq!(matching_signatures(&id, &[int()], &conv), vec![0, 1, 2]);
        assert_eq!(matching_signatures(&id, &[ResolvedType::String], &conv), vec![1]);
    }
}

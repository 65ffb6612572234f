//! Error collection for the lowering pass.
//!
//! Lowering keeps going after a failed construct so that one run reports every problem in a unit. The individual
//! errors are ordinary [`CompileError`]s; [`LoweringErrors`] is the non-empty collection returned when any occurred.

use crate::frontend::diagnostics::CompileError;

/// Collection of lowering errors, in the order they were found.
///
/// # Examples
///
/// ```rust,ignore
/// use sable::backend::lower::{Lowering, LoweringErrors};
///
/// match Lowering::new(&symbols).lower_unit(&unit, &mut sink) {
///     Ok(annotations) => { /* emit */ }
///     Err(errors) => {
///         for err in errors.iter() {
///             eprintln!("error: {}", err);
///         }
///     }
/// }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LoweringErrors(pub Vec<CompileError>);

impl LoweringErrors {
    pub fn single(error: CompileError) -> Self {
        Self(vec![error])
    }

    /// `None` when `errors` is empty.
    pub fn from_vec(errors: Vec<CompileError>) -> Option<Self> {
        if errors.is_empty() { None } else { Some(Self(errors)) }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CompileError> {
        self.0.iter()
    }

    /// Get the first error.
    ///
    /// Useful when callers only want to display a single error message.
    pub fn first(&self) -> Option<&CompileError> {
        self.0.first()
    }

    /// Whether any collected error is a pipeline bug rather than a user mistake.
    pub fn has_internal(&self) -> bool {
        self.0.iter().any(CompileError::is_internal)
    }
}

impl std::fmt::Display for LoweringErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0.len() == 1 {
            write!(f, "{}", self.0[0])
        } else {
            writeln!(f, "{} lowering errors:", self.0.len())?;
            for (i, err) in self.0.iter().enumerate() {
                writeln!(f, "  {}: {}", i + 1, err)?;
            }
            Ok(())
        }
    }
}

impl std::error::Error for LoweringErrors {}

impl From<CompileError> for LoweringErrors {
    fn from(e: CompileError) -> Self {
        LoweringErrors::single(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::ast::Span;
    use crate::frontend::diagnostics::errors;

    #[test]
    fn test_from_vec_rejects_empty() {
        assert!(LoweringErrors::from_vec(Vec::new()).is_none());
        let errs = LoweringErrors::from_vec(vec![errors::unknown_type("A", Span::default())]).unwrap();
        assert_eq!(errs.len(), 1);
        assert!(!errs.has_internal());
    }

    #[test]
    fn test_display_enumerates_multiple_errors() {
        let errs = LoweringErrors(vec![
            errors::unknown_type("A", Span::default()),
            errors::stale_erased_construct("intrinsic `sizeof`", Span::default()),
        ]);
        let text = errs.to_string();
        assert!(text.starts_with("2 lowering errors:"));
        assert!(text.contains("  1: unknown type: unknown type 'A'"));
        assert!(errs.has_internal());
    }
}

//! Diagnostics and error reporting for the compile-time surface.
//!
//! Every failure in this crate is static: it is detected during the single analysis pass and reported against the
//! construct that caused it. [`CompileError`] carries the location and a kind; [`errors`] is the catalog that
//! builds consistently worded messages for each kind.

use std::fmt;

use crate::frontend::ast::Span;

/// A compile-time error with location information
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct CompileError {
    pub message: String,
    pub span: Span,
    pub kind: ErrorKind,
    pub notes: Vec<String>,
    pub hints: Vec<String>,
}

impl CompileError {
    pub fn new(kind: ErrorKind, message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
            kind,
            notes: Vec::new(),
            hints: Vec::new(),
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hints.push(hint.into());
        self
    }

    /// Whether this error indicates a compiler pipeline bug rather than a user mistake.
    pub fn is_internal(&self) -> bool {
        self.kind == ErrorKind::StaleErasedConstruct
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A selector names a missing member, a member of the wrong kind, or an ambiguous member key.
    UnresolvedMember,
    /// A selector is not a direct member access.
    NonPathSelector,
    /// No attribute constructor signature accepts the argument list.
    NoMatchingOverload,
    /// An intrinsic's precondition does not hold.
    UnlowerableIntrinsic,
    /// An erased construct reached emission unlowered.
    StaleErasedConstruct,
    /// A type or attribute name does not resolve.
    UnknownType,
    /// An attribute argument is not a compile-time constant.
    NonConstantArgument,
    /// A chain rooted at `select` does not follow the targeting grammar.
    MalformedAttachment,
    /// A name has no spelling as a target identifier.
    InvalidTargetName,
}

impl ErrorKind {
    /// Stable diagnostic code.
    pub fn code(self) -> &'static str {
        match self {
            ErrorKind::UnresolvedMember => "sable::unresolved_member",
            ErrorKind::NonPathSelector => "sable::non_path_selector",
            ErrorKind::NoMatchingOverload => "sable::no_matching_overload",
            ErrorKind::UnlowerableIntrinsic => "sable::unlowerable_intrinsic",
            ErrorKind::StaleErasedConstruct => "sable::internal::stale_erased_construct",
            ErrorKind::UnknownType => "sable::unknown_type",
            ErrorKind::NonConstantArgument => "sable::non_constant_argument",
            ErrorKind::MalformedAttachment => "sable::malformed_attachment",
            ErrorKind::InvalidTargetName => "sable::invalid_target_name",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::UnresolvedMember => write!(f, "unresolved member"),
            ErrorKind::NonPathSelector => write!(f, "invalid selector"),
            ErrorKind::NoMatchingOverload => write!(f, "no matching overload"),
            ErrorKind::UnlowerableIntrinsic => write!(f, "unlowerable intrinsic"),
            ErrorKind::StaleErasedConstruct => write!(f, "internal compiler error"),
            ErrorKind::UnknownType => write!(f, "unknown type"),
            ErrorKind::NonConstantArgument => write!(f, "non-constant attribute argument"),
            ErrorKind::MalformedAttachment => write!(f, "malformed attachment"),
            ErrorKind::InvalidTargetName => write!(f, "invalid target name"),
        }
    }
}

impl miette::Diagnostic for CompileError {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(self.kind.code()))
    }

    fn severity(&self) -> Option<miette::Severity> {
        Some(miette::Severity::Error)
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        if self.hints.is_empty() {
            None
        } else {
            Some(Box::new(self.hints.join("\n")))
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = miette::LabeledSpan> + '_>> {
        let span = miette::SourceSpan::from(self.span.start..self.span.end);
        let label = miette::LabeledSpan::new_with_span(Some(self.kind.to_string()), span);
        Some(Box::new(std::iter::once(label)))
    }
}

/// Build a miette report that renders `error` against the source it was found in.
pub fn render_report(file_name: &str, source: &str, error: &CompileError) -> miette::Report {
    miette::Report::new(error.clone()).with_source_code(miette::NamedSource::new(file_name, source.to_string()))
}

/// Print an error with source context (simple implementation)
pub fn print_error(file_name: &str, source: &str, error: &CompileError) {
    let (line_num, col_num, line_text) = get_line_info(source, error.span.start);

    let red = "\x1b[31m";
    let cyan = "\x1b[36m";
    let bold = "\x1b[1m";
    let reset = "\x1b[0m";

    eprintln!(
        "{bold}{red}{kind}{reset}{bold}[{code}]: {message}{reset}",
        kind = error.kind,
        code = error.kind.code(),
        message = error.message,
    );
    eprintln!("  {cyan}-->{reset} {file_name}:{line_num}:{col_num}");

    let width = line_num.to_string().len();
    eprintln!("  {cyan}{:>width$} |{reset}", "");
    eprintln!("  {cyan}{line_num:>width$} |{reset} {line_text}");

    let underline_len = error
        .span
        .end
        .saturating_sub(error.span.start)
        .min(line_text.len().saturating_sub(col_num - 1))
        .max(1);
    eprintln!(
        "  {cyan}{:>width$} |{reset} {}{red}{}{reset}",
        "",
        " ".repeat(col_num - 1),
        "^".repeat(underline_len),
    );

    for note in &error.notes {
        eprintln!("  {cyan}= note:{reset} {note}");
    }
    for hint in &error.hints {
        eprintln!("  {cyan}= hint:{reset} {hint}");
    }
    eprintln!();
}

/// Get line number, column number, and line text for a byte offset
fn get_line_info(source: &str, offset: usize) -> (usize, usize, &str) {
    let offset = offset.min(source.len());
    let mut line_num = 1;
    let mut line_start = 0;

    for (i, c) in source.char_indices() {
        if i >= offset {
            break;
        }
        if c == '\n' {
            line_num += 1;
            line_start = i + 1;
        }
    }

    let line_end = source[line_start..]
        .find('\n')
        .map(|i| line_start + i)
        .unwrap_or(source.len());

    (line_num, offset - line_start + 1, &source[line_start..line_end])
}

// ============================================================================
// Error catalog
// ============================================================================

/// Create the crate's errors with consistent wording.
pub mod errors {
    use super::*;
    use crate::frontend::symbols::MemberKind;

    pub fn unresolved_member(type_name: &str, member: &str, span: Span) -> CompileError {
        CompileError::new(
            ErrorKind::UnresolvedMember,
            format!("type '{type_name}' has no member named '{member}'"),
            span,
        )
    }

    pub fn wrong_member_kind(
        type_name: &str,
        member: &str,
        found: MemberKind,
        wanted: &str,
        span: Span,
    ) -> CompileError {
        CompileError::new(
            ErrorKind::UnresolvedMember,
            format!("'{type_name}.{member}' is a {found}, but a {wanted} member was selected"),
            span,
        )
        .with_hint(if found.is_callable() {
            "use `method(...)` to target callable members"
        } else {
            "use `property(...)` to target non-callable members"
        })
    }

    pub fn ambiguous_member(type_name: &str, member: &str, span: Span) -> CompileError {
        CompileError::new(
            ErrorKind::UnresolvedMember,
            format!("'{type_name}.{member}' names both callable and non-callable members"),
            span,
        )
        .with_note("a selector must resolve to exactly one member key")
    }

    pub fn non_path_selector(shape: &str, span: Span) -> CompileError {
        CompileError::new(
            ErrorKind::NonPathSelector,
            format!("member selector must be a direct member access, found {shape}"),
            span,
        )
        .with_hint("write the selector as `x => x.member`")
    }

    pub fn no_matching_overload(
        identity: &str,
        attempted: &[String],
        signatures: &[String],
        span: Span,
    ) -> CompileError {
        let mut err = CompileError::new(
            ErrorKind::NoMatchingOverload,
            format!(
                "no constructor of attribute '{identity}' accepts ({})",
                attempted.join(", ")
            ),
            span,
        );
        for sig in signatures {
            err = err.with_note(format!("declared: {identity}{sig}"));
        }
        err
    }

    pub fn unlowerable_intrinsic(intrinsic: &str, precondition: impl Into<String>, span: Span) -> CompileError {
        CompileError::new(
            ErrorKind::UnlowerableIntrinsic,
            format!("cannot lower `{intrinsic}`: {}", precondition.into()),
            span,
        )
    }

    pub fn stale_erased_construct(construct: &str, span: Span) -> CompileError {
        CompileError::new(
            ErrorKind::StaleErasedConstruct,
            format!("{construct} reached emission without being lowered"),
            span,
        )
        .with_note("this is a compiler bug: the lowering pass must run before emission")
    }

    pub fn unknown_type(name: &str, span: Span) -> CompileError {
        CompileError::new(ErrorKind::UnknownType, format!("unknown type '{name}'"), span)
    }

    pub fn not_an_attribute(name: &str, span: Span) -> CompileError {
        CompileError::new(
            ErrorKind::UnknownType,
            format!("'{name}' is not an attribute class"),
            span,
        )
    }

    pub fn non_constant_argument(shape: &str, span: Span) -> CompileError {
        CompileError::new(
            ErrorKind::NonConstantArgument,
            format!("attribute arguments must be compile-time constants, found {shape}"),
            span,
        )
        .with_hint("use a literal, an enum member, `typeof(T)` or an array of those")
    }

    pub fn malformed_attachment(detail: impl Into<String>, span: Span) -> CompileError {
        CompileError::new(ErrorKind::MalformedAttachment, detail, span)
            .with_hint("attachments read `select(T).typeTarget|ctorTarget|method(..)|property(..).add(..)`")
    }

    pub fn invalid_target_name(name: &str, span: Span) -> CompileError {
        CompileError::new(
            ErrorKind::InvalidTargetName,
            format!("'{name}' is not a valid target identifier"),
            span,
        )
        .with_note("identifiers are letters, digits and `_`, and do not start with a digit")
    }
}

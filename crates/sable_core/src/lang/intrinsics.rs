//! Intrinsic operation vocabulary.
//!
//! This module is the recognition table for compile-time intrinsics: a stable identifier ([`IntrinsicId`]) plus a
//! const metadata table ([`INTRINSICS`]) recording spellings, input shape, result shape, lowering template and, most
//! importantly, the [`ErasureClass`] of every intrinsic.
//!
//! ## Notes
//! - Lookup via [`from_str`] is **case-sensitive**.
//! - The erasure class is a property of the intrinsic id alone. Call-site context never changes it: an
//!   [`ErasureClass::Erased`] intrinsic must never produce runtime code.
//! - The table is closed. Adding an intrinsic means adding an id, a table row and a lowering arm; the registry
//!   guardrail tests fail until all three exist.
//!
//! ## Examples
//! ```rust
//! use sable_core::lang::intrinsics::{self, ErasureClass, IntrinsicId};
//!
//! assert_eq!(intrinsics::from_str("sizeof"), Some(IntrinsicId::SizeOf));
//! assert_eq!(intrinsics::erasure_class(IntrinsicId::InterfaceView), ErasureClass::Erased);
//! assert_eq!(intrinsics::as_str(IntrinsicId::TryCast), "trycast");
//! ```

use super::registry::{Example, Since, Stability};

/// Stable identifier for a compile-time intrinsic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IntrinsicId {
    StackAlloc,
    SizeOf,
    DefaultOf,
    NameOf,
    TryCast,
    InterfaceView,
    TypeTest,
    ThisArg,
}

/// How an intrinsic disappears from emitted output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErasureClass {
    /// Replaced in place by a different, still present, native expression.
    Transformed,
    /// Leaves no runtime trace at all; exists only for the front-end type checker.
    Erased,
}

/// Where an intrinsic spelling is recognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntrinsicPosition {
    /// A call expression: `name<T>(args)`.
    Expression,
    /// A parameter type: `name<T>` as the first parameter type of a module-level function.
    ParameterType,
}

/// Accepted input shape of an intrinsic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InputShape {
    /// Number of compile-time type arguments.
    pub type_args: usize,
    /// Number of value arguments (always `0` for [`IntrinsicPosition::ParameterType`]).
    pub value_args: usize,
    pub position: IntrinsicPosition,
}

impl InputShape {
    const fn call(type_args: usize, value_args: usize) -> Self {
        Self {
            type_args,
            value_args,
            position: IntrinsicPosition::Expression,
        }
    }

    const fn parameter_type() -> Self {
        Self {
            type_args: 1,
            value_args: 0,
            position: IntrinsicPosition::ParameterType,
        }
    }
}

impl std::fmt::Display for InputShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.position {
            IntrinsicPosition::Expression => write!(
                f,
                "{} type argument(s), {} value argument(s)",
                self.type_args, self.value_args
            ),
            IntrinsicPosition::ParameterType => write!(f, "first parameter type with 1 type argument"),
        }
    }
}

/// Static result of an intrinsic, expressed in terms of its type argument `T`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResultShape {
    /// `Span<T>`.
    SpanOfT,
    /// The platform `int` byte count.
    ByteCount,
    /// `T` itself.
    T,
    /// A `string`.
    String,
    /// `T` or the absence marker (`T?` for value types).
    TOrAbsent,
    /// `bool`.
    Bool,
    /// `T`, flagged as the receiver.
    FlaggedT,
}

impl std::fmt::Display for ResultShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ResultShape::SpanOfT => "Span<T>",
            ResultShape::ByteCount => "int",
            ResultShape::T => "T",
            ResultShape::String => "string",
            ResultShape::TOrAbsent => "T | null",
            ResultShape::Bool => "bool",
            ResultShape::FlaggedT => "T (receiver)",
        };
        f.write_str(s)
    }
}

/// Metadata for an intrinsic.
///
/// ## Notes
/// - `lowering` is a human-readable template for docs and diagnostics. The actual token lowering lives in the
///   compiler backend and is keyed by [`IntrinsicId`].
#[derive(Debug, Clone, Copy)]
pub struct IntrinsicInfo {
    pub id: IntrinsicId,
    pub canonical: &'static str,
    pub aliases: &'static [&'static str],
    pub description: &'static str,
    pub shape: InputShape,
    pub result: ResultShape,
    pub erasure: ErasureClass,
    pub lowering: &'static str,
    pub since: Since,
    pub stability: Stability,
    pub examples: &'static [Example],
}

/// Registry of all intrinsics.
pub const INTRINSICS: &[IntrinsicInfo] = &[
    info(
        IntrinsicId::StackAlloc,
        "stackalloc",
        &[],
        "Allocate `count` elements of `T` on the stack; the view lives until the enclosing block ends.",
        InputShape::call(1, 1),
        ResultShape::SpanOfT,
        ErasureClass::Transformed,
        "stackalloc T[count]",
        &[Example {
            code: "const buf = stackalloc<byte>(256);",
            note: Some("Lowers to `stackalloc byte[256]`."),
        }],
    ),
    info(
        IntrinsicId::SizeOf,
        "sizeof",
        &[],
        "Byte size of a fixed-layout type.",
        InputShape::call(1, 0),
        ResultShape::ByteCount,
        ErasureClass::Transformed,
        "sizeof(T)",
        &[Example {
            code: "const n = sizeof<int>();",
            note: Some("Rejected when `T` contains references."),
        }],
    ),
    info(
        IntrinsicId::DefaultOf,
        "defaultof",
        &[],
        "Zero value of a value-like type, or null for a reference-like type.",
        InputShape::call(1, 0),
        ResultShape::T,
        ErasureClass::Transformed,
        "default(T)",
        &[],
    ),
    info(
        IntrinsicId::NameOf,
        "nameof",
        &[],
        "Identifier text of a variable or member access path.",
        InputShape::call(0, 1),
        ResultShape::String,
        ErasureClass::Transformed,
        "nameof(path)",
        &[Example {
            code: "const field = nameof(user.email);",
            note: Some("Any argument other than an identifier or member path is rejected."),
        }],
    ),
    info(
        IntrinsicId::TryCast,
        "trycast",
        &[],
        "Non-throwing cast; yields null when the value is not a `T`.",
        InputShape::call(1, 1),
        ResultShape::TOrAbsent,
        ErasureClass::Transformed,
        "value as T",
        &[],
    ),
    info(
        IntrinsicId::InterfaceView,
        "asinterface",
        &[],
        "View a value as an interface for the front-end checker only; no runtime cast is emitted.",
        InputShape::call(1, 1),
        ResultShape::T,
        ErasureClass::Erased,
        "value",
        &[Example {
            code: "const it = asinterface<IEnumerable<int>>(list);",
            note: Some("Emits `list` unchanged."),
        }],
    ),
    info(
        IntrinsicId::TypeTest,
        "istype",
        &[],
        "Runtime type test selecting among branches of one overloaded implementation body.",
        InputShape::call(1, 1),
        ResultShape::Bool,
        ErasureClass::Transformed,
        "value is T",
        &[],
    ),
    info(
        IntrinsicId::ThisArg,
        "thisarg",
        &[],
        "Mark the first parameter of a module-level function as the extension receiver.",
        InputShape::parameter_type(),
        ResultShape::FlaggedT,
        ErasureClass::Erased,
        "this T param",
        &[Example {
            code: "export function shout(s: thisarg<string>): string",
            note: Some("Lowers to `static string shout(this string s)`."),
        }],
    ),
];

/// Return the canonical spelling for an intrinsic.
pub fn as_str(id: IntrinsicId) -> &'static str {
    info_for(id).canonical
}

/// Return the accepted aliases for an intrinsic.
pub fn aliases(id: IntrinsicId) -> &'static [&'static str] {
    info_for(id).aliases
}

/// Return the erasure class of an intrinsic.
///
/// ## Notes
/// - This is a pure function of `id`; lowering must never consult call-site context to decide erasure.
pub fn erasure_class(id: IntrinsicId) -> ErasureClass {
    info_for(id).erasure
}

/// Whether the intrinsic leaves no runtime trace.
pub fn is_erased(id: IntrinsicId) -> bool {
    erasure_class(id) == ErasureClass::Erased
}

/// Return the accepted input shape of an intrinsic.
pub fn shape(id: IntrinsicId) -> InputShape {
    info_for(id).shape
}

/// Return the full metadata entry for an intrinsic.
///
/// ## Panics
/// - If the registry is missing an entry for `id` (this indicates a programming error).
pub fn info_for(id: IntrinsicId) -> &'static IntrinsicInfo {
    INTRINSICS
        .iter()
        .find(|i| i.id == id)
        .expect("intrinsic info missing")
}

/// Resolve a spelling to an intrinsic identifier.
///
/// ## Parameters
/// - `name`: Candidate intrinsic name (canonical or alias).
///
/// ## Returns
/// - `Some(IntrinsicId)` if `name` matches a canonical spelling or alias.
/// - `None` otherwise.
pub fn from_str(name: &str) -> Option<IntrinsicId> {
    if let Some(i) = INTRINSICS.iter().find(|i| i.canonical == name) {
        return Some(i.id);
    }
    INTRINSICS
        .iter()
        .find(|i| {
            let aliases: &[&str] = i.aliases;
            aliases.contains(&name)
        })
        .map(|i| i.id)
}

/// Resolve a spelling, restricted to intrinsics recognized in `position`.
pub fn from_str_in(name: &str, position: IntrinsicPosition) -> Option<IntrinsicId> {
    from_str(name).filter(|id| shape(*id).position == position)
}

#[allow(clippy::too_many_arguments)]
const fn info(
    id: IntrinsicId,
    canonical: &'static str,
    aliases: &'static [&'static str],
    description: &'static str,
    shape: InputShape,
    result: ResultShape,
    erasure: ErasureClass,
    lowering: &'static str,
    examples: &'static [Example],
) -> IntrinsicInfo {
    IntrinsicInfo {
        id,
        canonical,
        aliases,
        description,
        shape,
        result,
        erasure,
        lowering,
        since: Since(0, 1),
        stability: Stability::Stable,
        examples,
    }
}

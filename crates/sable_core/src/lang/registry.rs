//! Shareable metadata for `sable_core::lang` registries.
//!
//! The `sable_core::lang` module is a set of **registry-first** vocabularies: intrinsics, annotation-chain steps,
//! builtin target types. This submodule provides the small, dependency-free metadata types reused across all of them.
//!
//! ## Notes
//! - These types are intentionally lightweight and `Copy`-friendly so registries can live in `const` tables.
//! - Metadata is meant for tooling/docs/diagnostics; enforcement of call shapes lives in the front end.
//!
//! ## See also
//! - [`crate::lang::intrinsics`]
//! - [`crate::lang::annotations`]
//! - [`crate::lang::types`]

/// Identify the surface version a vocabulary item is available since, as `(major, minor)`.
///
/// ## Examples
/// ```rust
/// use sable_core::lang::registry::Since;
///
/// let since = Since(0, 1);
/// assert_eq!(since.to_string(), "0.1");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Since(pub u16, pub u16);

impl std::fmt::Display for Since {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.0, self.1)
    }
}

/// Describe the lifecycle status of a vocabulary item.
///
/// ## Notes
/// - This is intended for docs/tooling (e.g. to warn on deprecated spellings), not for feature-gating by itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stability {
    Stable,
    Draft,
    Deprecated,
}

/// Represent a small example snippet for documentation.
///
/// ## Examples
/// ```rust
/// use sable_core::lang::registry::Example;
///
/// let ex = Example {
///     code: "const n = sizeof<int>();",
///     note: Some("Lowers to `sizeof(int)`."),
/// };
/// assert!(ex.code.contains("sizeof"));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Example {
    pub code: &'static str,
    pub note: Option<&'static str>,
}

/// Shared metadata shape for "registry-first" vocabulary items.
///
/// Many vocabularies share the same core fields:
/// - stable identity (`id`)
/// - accepted spellings (`canonical` + `aliases`)
/// - documentation (`description` + `examples`)
/// - provenance (`since`, `stability`)
///
/// Registries that need extra per-item data (e.g. intrinsic input shape or erasure class) wrap this struct in an
/// "extension" info type.
#[derive(Debug, Clone, Copy)]
pub struct LangItemInfo<Id> {
    pub id: Id,
    pub canonical: &'static str,
    pub aliases: &'static [&'static str],
    pub description: &'static str,
    pub since: Since,
    pub stability: Stability,
    pub examples: &'static [Example],
}

impl<Id> LangItemInfo<Id> {
    /// Whether `name` is the canonical spelling or one of the aliases.
    pub fn matches(&self, name: &str) -> bool {
        self.canonical == name || self.aliases.contains(&name)
    }
}

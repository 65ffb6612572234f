//! Annotation-chain vocabulary.
//!
//! Attribute attachment is written in source as a fluent chain:
//!
//! ```text
//! select(User).method(u => u.save).add(TransactionAttribute)
//! select<Config>().typeTarget.add(ObsoleteAttribute, "use Settings")
//! let d = buildDescriptor(ObsoleteAttribute, "legacy")
//! ```
//!
//! This registry names every step of such a chain so the front end recognizes chains by [`AnnotationStepId`] rather
//! than by string comparisons.
//!
//! ## Notes
//! - Lookup via [`from_str`] is **case-sensitive**.
//! - [`StepForm`] records whether the step is spelled as a call (`method(...)`) or as a bare member access
//!   (`typeTarget`).

use super::registry::{LangItemInfo, Since, Stability};

/// Stable identifier for an annotation-chain step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnnotationStepId {
    Select,
    TypeTarget,
    CtorTarget,
    Method,
    Property,
    Add,
    BuildDescriptor,
}

/// Syntactic form of a chain step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepForm {
    /// A free function call (`select(...)`, `buildDescriptor(...)`).
    FreeCall,
    /// A member access without a call (`.typeTarget`).
    Member,
    /// A member call (`.method(...)`, `.add(...)`).
    MemberCall,
}

/// Position of a step inside a chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepRole {
    /// Starts a chain and yields an entity selector.
    Root,
    /// Narrows the selector to a concrete target entity.
    Target,
    /// Attaches a descriptor to the current target.
    Attach,
    /// Stands alone outside any chain.
    Standalone,
}

/// Metadata for an annotation-chain step.
#[derive(Debug, Clone, Copy)]
pub struct AnnotationStepInfo {
    pub item: LangItemInfo<AnnotationStepId>,
    pub form: StepForm,
    pub role: StepRole,
}

/// Registry of annotation-chain steps.
pub const ANNOTATION_STEPS: &[AnnotationStepInfo] = &[
    info(
        AnnotationStepId::Select,
        "select",
        "Select a declared type as the root of an attachment chain.",
        StepForm::FreeCall,
        StepRole::Root,
    ),
    info(
        AnnotationStepId::TypeTarget,
        "typeTarget",
        "Target the selected type declaration itself.",
        StepForm::Member,
        StepRole::Target,
    ),
    info(
        AnnotationStepId::CtorTarget,
        "ctorTarget",
        "Target the constructor of the selected type.",
        StepForm::Member,
        StepRole::Target,
    ),
    info(
        AnnotationStepId::Method,
        "method",
        "Target a callable member, chosen with a `x => x.name` selector.",
        StepForm::MemberCall,
        StepRole::Target,
    ),
    info(
        AnnotationStepId::Property,
        "property",
        "Target a non-callable member, chosen with a `x => x.name` selector.",
        StepForm::MemberCall,
        StepRole::Target,
    ),
    info(
        AnnotationStepId::Add,
        "add",
        "Attach an attribute (identity plus arguments, or a prebuilt descriptor) to the current target.",
        StepForm::MemberCall,
        StepRole::Attach,
    ),
    info(
        AnnotationStepId::BuildDescriptor,
        "buildDescriptor",
        "Validate and package an attribute descriptor without attaching it.",
        StepForm::FreeCall,
        StepRole::Standalone,
    ),
];

/// Return the canonical spelling for a chain step.
pub fn as_str(id: AnnotationStepId) -> &'static str {
    info_for(id).item.canonical
}

/// Return the syntactic form of a chain step.
pub fn form(id: AnnotationStepId) -> StepForm {
    info_for(id).form
}

/// Return the role of a chain step.
pub fn role(id: AnnotationStepId) -> StepRole {
    info_for(id).role
}

/// Return the full metadata entry for a chain step.
///
/// ## Panics
/// - If the registry is missing an entry for `id` (this indicates a programming error).
pub fn info_for(id: AnnotationStepId) -> &'static AnnotationStepInfo {
    ANNOTATION_STEPS
        .iter()
        .find(|s| s.item.id == id)
        .expect("annotation step info missing")
}

/// Resolve a spelling to a chain step identifier.
pub fn from_str(name: &str) -> Option<AnnotationStepId> {
    ANNOTATION_STEPS
        .iter()
        .find(|s| s.item.matches(name))
        .map(|s| s.item.id)
}

const fn info(
    id: AnnotationStepId,
    canonical: &'static str,
    description: &'static str,
    form: StepForm,
    role: StepRole,
) -> AnnotationStepInfo {
    AnnotationStepInfo {
        item: LangItemInfo {
            id,
            canonical,
            aliases: &[],
            description,
            since: Since(0, 1),
            stability: Stability::Stable,
            examples: &[],
        },
        form,
        role,
    }
}

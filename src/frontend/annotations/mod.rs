//! Metadata annotations: attaching attribute descriptors to program entities.
//!
//! Declarations reach this module in two ways:
//!
//! - directly, through the builder API ([`AnnotationPass::select`] → [`OnBuilder`] → [`TargetBuilder`]);
//! - from source, through [`chain::DeclarationGatherer`], which recognizes attachment chains such as
//!   `select(User).method(u => u.save).add(Transaction)` and drives the same builders.
//!
//! Either way the result is an [`AnnotationTable`]: per entity, the validated descriptors in attachment order. The
//! chains themselves produce no runtime code; lowering erases them and emits native annotation tags instead.
//!
//! ## See also
//! - [`overload`]: overload-argument validation
//! - [`crate::frontend::conversions`]: the implicit-conversion predicate validation consults

pub mod builder;
pub mod chain;
pub mod entity;
pub mod identity;
pub mod overload;


pub use builder::{MemberSelector, OnBuilder, TargetBuilder};
pub use chain::{DeclarationGatherer, GatherOutcome};
pub use entity::ProgramEntity;
pub use identity::{AttrValue, AttributeArg, AttributeDescriptor, AttributeIdentity, Signature};

use crate::frontend::ast::Span;
use crate::frontend::conversions::{BuiltinConversions, ConversionPolicy, ImplicitConversion};
use crate::frontend::diagnostics::CompileError;
use crate::frontend::symbols::{DeclarationLookup, TypeHandle};

/// One descriptor attached to one entity.
#[derive(Debug, Clone, PartialEq)]
pub struct Attachment {
    pub entity: ProgramEntity,
    pub descriptor: AttributeDescriptor,
}

/// Every attachment of a compilation unit, in attachment order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnnotationTable {
    attachments: Vec<Attachment>,
}

impl AnnotationTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn attach(&mut self, entity: ProgramEntity, descriptor: AttributeDescriptor) {
        self.attachments.push(Attachment { entity, descriptor });
    }

    /// All attachments, in the order they were made.
    pub fn attachments(&self) -> &[Attachment] {
        &self.attachments
    }

    /// Descriptors attached to `entity`, in attachment order.
    pub fn for_entity<'t>(&'t self, entity: &'t ProgramEntity) -> impl Iterator<Item = &'t AttributeDescriptor> + 't {
        self.attachments
            .iter()
            .filter(move |a| &a.entity == entity)
            .map(|a| &a.descriptor)
    }

    /// Annotated entities, ordered by their first attachment.
    pub fn entities(&self) -> Vec<&ProgramEntity> {
        let mut out: Vec<&ProgramEntity> = Vec::new();
        for a in &self.attachments {
            if !out.contains(&&a.entity) {
                out.push(&a.entity);
            }
        }
        out
    }

    pub fn len(&self) -> usize {
        self.attachments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attachments.is_empty()
    }
}

/// State of the declaration-gathering pass for one compilation unit.
///
/// Owns the attachments made so far; builders borrow it mutably for the duration of one chain.
pub struct AnnotationPass<'a> {
    lookup: &'a dyn DeclarationLookup,
    conversions: Box<dyn ImplicitConversion + 'a>,
    table: AnnotationTable,
}

impl<'a> AnnotationPass<'a> {
    /// A pass validating arguments with the built-in conversions.
    pub fn new(lookup: &'a dyn DeclarationLookup) -> Self {
        Self::with_policy(lookup, ConversionPolicy::default())
    }

    pub fn with_policy(lookup: &'a dyn DeclarationLookup, policy: ConversionPolicy) -> Self {
        Self::with_conversions(lookup, Box::new(BuiltinConversions::new(lookup).with_policy(policy)))
    }

    /// A pass validating arguments with a host-supplied conversion predicate.
    pub fn with_conversions(lookup: &'a dyn DeclarationLookup, conversions: Box<dyn ImplicitConversion + 'a>) -> Self {
        Self {
            lookup,
            conversions,
            table: AnnotationTable::new(),
        }
    }

    pub fn lookup(&self) -> &'a dyn DeclarationLookup {
        self.lookup
    }

    /// Begin targeting a resolved type.
    pub fn select(&mut self, ty: TypeHandle) -> OnBuilder<'_, 'a> {
        OnBuilder::new(self, ty)
    }

    /// Resolve an attribute class by name.
    pub fn identity(&self, name: &str, span: Span) -> Result<AttributeIdentity, CompileError> {
        AttributeIdentity::resolve(self.lookup, name, span)
    }

    /// Validate `args` against `identity` and package them without attaching.
    ///
    /// ## Errors
    /// - `NoMatchingOverload` when no constructor signature accepts `args`.
    pub fn build_descriptor(
        &self,
        identity: &AttributeIdentity,
        args: Vec<AttributeArg>,
        span: Span,
    ) -> Result<AttributeDescriptor, CompileError> {
        let signature = overload::validate(identity, &args, self.conversions.as_ref(), span)?;
        Ok(AttributeDescriptor::new(identity.clone(), args, signature, span))
    }

    pub fn table(&self) -> &AnnotationTable {
        &self.table
    }

    pub(crate) fn table_mut(&mut self) -> &mut AnnotationTable {
        &mut self.table
    }

    /// End the pass, yielding every attachment made.
    pub fn finish(self) -> AnnotationTable {
        self.table
    }
}

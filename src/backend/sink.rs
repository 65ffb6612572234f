//! The emission sink: where lowering hands its output to the host emitter.
//!
//! Lowering never writes target text. It reports two kinds of facts:
//!
//! - native annotation tags to place on a program entity (`annotate`);
//! - in-place replacements for source constructs, keyed by span (`replace`).
//!
//! Hosts implement [`EmissionSink`] to feed their own emitter. [`RecordingSink`] keeps everything in memory and is
//! what [`Emitter`](crate::backend::emit::Emitter) renders from.

use std::collections::HashMap;

use proc_macro2::TokenStream;

use crate::frontend::annotations::ProgramEntity;
use crate::frontend::ast::Span;

/// What a lowered construct becomes.
#[derive(Debug, Clone)]
pub enum Replacement {
    /// Replace the construct with these target tokens.
    Syntax(TokenStream),
    /// A receiver parameter type: emit `this T` with these tokens for `T`.
    ThisParameter(TokenStream),
    /// Emit nothing for the construct.
    Erased,
}

impl Replacement {
    pub fn is_erased(&self) -> bool {
        matches!(self, Replacement::Erased)
    }
}

/// One annotation tag, `[name(args)]`.
#[derive(Debug, Clone)]
pub struct AnnotationTag {
    pub name: String,
    pub args: Vec<TokenStream>,
}

/// Receives the output of lowering.
pub trait EmissionSink {
    /// Place a native annotation tag on `entity`. Calls for one entity arrive in attachment order.
    fn annotate(&mut self, entity: &ProgramEntity, native_name: &str, args: Vec<TokenStream>);

    /// Replace the construct at `span`.
    fn replace(&mut self, span: Span, replacement: Replacement);
}

/// In-memory sink.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    tags: Vec<(ProgramEntity, AnnotationTag)>,
    replacements: HashMap<Span, Replacement>,
    order: Vec<Span>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replacement(&self, span: Span) -> Option<&Replacement> {
        self.replacements.get(&span)
    }

    /// Tags on `entity`, in attachment order.
    pub fn tags_for<'s>(&'s self, entity: &'s ProgramEntity) -> impl Iterator<Item = &'s AnnotationTag> + 's {
        self.tags.iter().filter(move |(e, _)| e == entity).map(|(_, tag)| tag)
    }

    pub fn tags(&self) -> impl Iterator<Item = (&ProgramEntity, &AnnotationTag)> {
        self.tags.iter().map(|(e, tag)| (e, tag))
    }

    /// Number of recorded replacements.
    pub fn replacement_count(&self) -> usize {
        self.order.len()
    }

    /// Replay everything recorded into another sink, in recording order.
    pub fn forward_to(&self, sink: &mut dyn EmissionSink) {
        for (entity, tag) in &self.tags {
            sink.annotate(entity, &tag.name, tag.args.clone());
        }
        for span in &self.order {
            if let Some(replacement) = self.replacements.get(span) {
                sink.replace(*span, replacement.clone());
            }
        }
    }
}

impl EmissionSink for RecordingSink {
    fn annotate(&mut self, entity: &ProgramEntity, native_name: &str, args: Vec<TokenStream>) {
        self.tags.push((
            entity.clone(),
            AnnotationTag {
                name: native_name.to_string(),
                args,
            },
        ));
    }

    fn replace(&mut self, span: Span, replacement: Replacement) {
        if self.replacements.insert(span, replacement).is_none() {
            self.order.push(span);
        }
    }
}

//! Annotation gathering and tag lowering.

use tracing::debug;

use super::UnitLowering;
use crate::backend::emit::types::{attr_arg_tokens, path_tokens};
use crate::backend::sink::{EmissionSink, Replacement};
use crate::frontend::annotations::{AnnotationPass, AnnotationTable, DeclarationGatherer};
use crate::frontend::ast::{Spanned, Stmt};

impl UnitLowering<'_, '_> {
    /// Run the declaration-gathering pass, erase the chains and emit one tag per attachment.
    pub(super) fn lower_annotations(&mut self, declarations: &[Spanned<Stmt>]) -> AnnotationTable {
        let mut pass = AnnotationPass::with_policy(self.lookup, self.options.conversions);
        let outcome = DeclarationGatherer::new(&mut pass).gather(declarations);

        for span in outcome.erased {
            self.recorded.replace(span, Replacement::Erased);
        }
        self.errors.extend(outcome.errors);

        let table = pass.finish();
        for attachment in table.attachments() {
            let descriptor = &attachment.descriptor;
            let name = self.options.annotation_name(descriptor.identity().native_name());
            let span = descriptor.span();
            let args = path_tokens(name, span).and_then(|_| {
                descriptor
                    .args()
                    .iter()
                    .map(|arg| attr_arg_tokens(arg, span))
                    .collect::<Result<Vec<_>, _>>()
            });
            match args {
                Ok(args) => {
                    debug!(entity = %attachment.entity, annotation = name, "lower annotation");
                    self.recorded.annotate(&attachment.entity, name, args);
                }
                Err(err) => self.errors.push(err.into()),
            }
        }
        table
    }
}

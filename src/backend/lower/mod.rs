//! The lowering pass: compile-time constructs to target syntax.
//!
//! Lowering runs once per compilation unit, after parsing and before emission. It:
//!
//! 1. Gathers the unit's annotation declarations and turns every attachment into a native annotation tag.
//! 2. Erases the attachment chains themselves.
//! 3. Lowers every intrinsic call, innermost first, to its target form.
//! 4. Lowers receiver markers on module-level functions to `this` parameters.
//!
//! Errors do not stop the walk; everything found is returned together. The host sink only receives output when the
//! whole unit lowered cleanly.
//!
//! # Architecture
//!
//! - `errors` - Error collection (`LoweringErrors`)
//! - `annotations` - Annotation gathering and tag lowering
//! - `intrinsics` - Intrinsic call lowering
//! - `functions` - Function signatures, receiver markers and statement walking
//!
//! # Usage
//!
//! ```rust,ignore
//! use sable::backend::lower::Lowering;
//!
//! let lowered = Lowering::new(&symbols).lower(&unit)?;
//! let tokens = lowered.emitter().unit(&unit)?;
//! ```

mod annotations;
mod errors;
mod functions;
mod intrinsics;

pub use errors::LoweringErrors;

use crate::backend::emit::Emitter;
use crate::backend::options::LoweringOptions;
use crate::backend::sink::{EmissionSink, RecordingSink};
use crate::frontend::annotations::AnnotationTable;
use crate::frontend::ast::CompilationUnit;
use crate::frontend::diagnostics::CompileError;
use crate::frontend::intrinsics::IntrinsicChecker;
use crate::frontend::symbols::DeclarationLookup;

/// Entry point of the lowering pass.
pub struct Lowering<'a> {
    lookup: &'a dyn DeclarationLookup,
    options: LoweringOptions,
}

/// A unit lowered into an in-memory sink.
#[derive(Debug)]
pub struct LoweredUnit {
    pub annotations: AnnotationTable,
    pub sink: RecordingSink,
}

impl LoweredUnit {
    /// An emitter over the recorded output.
    pub fn emitter(&self) -> Emitter<'_> {
        Emitter::new(&self.sink)
    }
}

impl<'a> Lowering<'a> {
    pub fn new(lookup: &'a dyn DeclarationLookup) -> Self {
        Self {
            lookup,
            options: LoweringOptions::default(),
        }
    }

    pub fn with_options(mut self, options: LoweringOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &LoweringOptions {
        &self.options
    }

    /// Lower `unit`, reporting output to `sink`.
    ///
    /// # Errors
    ///
    /// Returns `LoweringErrors` containing every error found in the unit; `sink` receives nothing in that case.
    #[tracing::instrument(
        skip_all,
        fields(declarations = unit.declarations.len(), functions = unit.functions.len())
    )]
    pub fn lower_unit(
        &self,
        unit: &CompilationUnit,
        sink: &mut dyn EmissionSink,
    ) -> Result<AnnotationTable, LoweringErrors> {
        let mut state = UnitLowering::new(self);

        let annotations = state.lower_annotations(&unit.declarations);
        state.lower_declarations(&unit.declarations);
        for func in &unit.functions {
            state.lower_function(func);
        }

        if let Some(errors) = LoweringErrors::from_vec(state.errors) {
            tracing::debug!(errors = errors.len(), "lowering failed");
            return Err(errors);
        }
        state.recorded.forward_to(sink);
        Ok(annotations)
    }

    /// Lower `unit` into a fresh [`RecordingSink`].
    pub fn lower(&self, unit: &CompilationUnit) -> Result<LoweredUnit, LoweringErrors> {
        let mut sink = RecordingSink::new();
        let annotations = self.lower_unit(unit, &mut sink)?;
        Ok(LoweredUnit { annotations, sink })
    }
}

/// Per-unit lowering state.
///
/// Replacements are recorded locally first: lowering an outer intrinsic renders its operands through an
/// [`Emitter`] over what the inner ones already produced.
struct UnitLowering<'l, 'a> {
    lookup: &'a dyn DeclarationLookup,
    options: &'l LoweringOptions,
    checker: IntrinsicChecker<'a>,
    recorded: RecordingSink,
    errors: Vec<CompileError>,
}

impl<'l, 'a> UnitLowering<'l, 'a> {
    fn new(lowering: &'l Lowering<'a>) -> Self {
        Self {
            lookup: lowering.lookup,
            options: &lowering.options,
            checker: IntrinsicChecker::new(lowering.lookup),
            recorded: RecordingSink::new(),
            errors: Vec::new(),
        }
    }
}

//! Sable Compiler Backend
//!
//! Lowering and emission for the compile-time surface.
//!
//! The pipeline is:
//! 1. Parsed unit from the host front end → [`Lowering`] → replacements and annotation tags in an [`EmissionSink`]
//! 2. Recorded output → [`Emitter`] → target tokens
//!
//! ## Module Organization
//!
//! - `lower/` - The lowering pass
//!   - `mod.rs` - `Lowering` entry point and per-unit state
//!   - `annotations.rs` - Attachments to native annotation tags
//!   - `intrinsics.rs` - Intrinsic calls to target syntax
//!   - `functions.rs` - Receiver markers and statement walking
//!   - `errors.rs` - `LoweringErrors`
//! - `emit/` - Token emission over recorded replacements
//! - `sink.rs` - The `EmissionSink` seam and the in-memory `RecordingSink`
//! - `options.rs` - `LoweringOptions`

pub mod emit;
pub mod lower;
pub mod options;
pub mod sink;

pub use emit::{EmitError, Emitter};
pub use lower::{LoweredUnit, Lowering, LoweringErrors};
pub use options::LoweringOptions;
pub use sink::{AnnotationTag, EmissionSink, RecordingSink, Replacement};

//! Sable Compiler Frontend
//!
//! This module contains the compile-time surface as seen before lowering:
//! - `ast`: the slice of the source tree that lowering reads
//! - `types`: resolved types
//! - `symbols`: declaration lookup and local bindings
//! - `conversions`: implicit conversion rules
//! - `annotations`: the declaration-gathering pass and the annotation table
//! - `intrinsics`: recognition and checking of intrinsic calls
//! - `diagnostics`: error reporting

pub mod annotations;
pub mod ast;
pub mod conversions;
pub mod diagnostics;
pub mod intrinsics;
pub mod symbols;
pub mod types;

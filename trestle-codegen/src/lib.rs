//! Code generation for Trestle API designs.
//!
//! The crate consumes a [`trestle_design::LinkedApi`] and renders one
//! formatted source file per artifact kind:
//!
//! ```text
//! LinkedApi → Names (identifier derivation) → Generator → artifact files
//! ```
//!
//! The [`Generator`] owns the output directory lifecycle: it recreates the
//! directory, runs the artifact writers in a fixed order, and removes the
//! directory again if any writer fails or the process is interrupted, so a
//! generated tree is always complete or absent. Given the same linked
//! design and options, two runs produce byte-identical output.

mod ast;
mod code_builder;
mod encoders;
mod error;
mod generator;
mod naming;
mod rust_file;
mod writers;

pub use ast::{Field, Fn, Impl, Param, Struct, TraitDef};
pub use code_builder::CodeBuilder;
pub use encoders::{EncoderBinding, build_encoders};
pub use error::GenerationError;
pub use generator::{Generator, Options};
pub use naming::{Names, safe_field};
pub use rust_file::{RustFile, Use};
pub use writers::Artifact;

//! Core utilities for the Trestle code generator.
//!
//! This crate provides the casing transforms used to derive generated
//! identifiers from user-chosen names, and the file writing helpers used by
//! the generation orchestrator. It has no opinion on what is being
//! generated; that lives in `trestle-codegen`.

mod casing;
mod file;

pub use casing::{to_pascal_case, to_snake_case};
pub use file::write_file;

/// Header comment prepended to every generated source file.
pub const GENERATED_HEADER: &str = "// Code generated by trestle. DO NOT EDIT.";

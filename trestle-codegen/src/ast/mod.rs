//! Builders for the Rust constructs the artifact writers emit.

mod fns;
mod impls;
mod structs;
mod traits;

pub use fns::{Fn, Param};
pub use impls::Impl;
pub use structs::{Field, Struct};
pub use traits::TraitDef;

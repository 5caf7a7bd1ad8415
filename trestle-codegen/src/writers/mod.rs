//! Artifact writers, one per generated file kind.
//!
//! Writers consume the linked design plus the session's [`Names`] registry
//! and render one formatted source unit each. File names are fixed and part
//! of the external contract; downstream build tooling depends on them.

use trestle_core::{GENERATED_HEADER, to_pascal_case};
use trestle_design::{AttributeDefinition, AttributeType, LinkedApi, LinkedResource, Primitive, RouteDefinition};

use crate::error::GenerationError;
use crate::naming::Names;

mod contexts;
mod controllers;
mod hrefs;
mod media_types;
mod security;
mod tests_file;
mod user_types;

pub use contexts::ContextsFile;
pub use controllers::ControllersFile;
pub use hrefs::HrefsFile;
pub use media_types::MediaTypesFile;
pub use security::SecurityFile;
pub use tests_file::TestsFile;
pub use user_types::UserTypesFile;

/// One generated source unit.
pub trait Artifact {
    /// Fixed output file name.
    fn file_name(&self) -> &'static str;

    /// Render the complete file content.
    fn render(&self, api: &LinkedApi, names: &mut Names) -> Result<String, GenerationError>;
}

/// Header comment for a generated file.
pub(crate) fn header(api: &LinkedApi, title: &str) -> String {
    format!("{GENERATED_HEADER}\n// {}: {title}", api.context())
}

/// The Rust type an attribute renders to.
///
/// Anonymous nested objects stay dynamic; only named user types and media
/// types get dedicated structs.
pub(crate) fn rust_type(attr: &AttributeDefinition) -> String {
    match &attr.ty {
        AttributeType::Primitive(p) => p.rust_type().to_string(),
        AttributeType::Array(element) => format!("Vec<{}>", rust_type(element)),
        AttributeType::Map(element) => {
            format!("std::collections::HashMap<String, {}>", rust_type(element))
        }
        AttributeType::Object(_) => "serde_json::Value".to_string(),
        AttributeType::UserType(name) => to_pascal_case(name),
    }
}

/// The field type for a struct member: optional members wrap in `Option`.
pub(crate) fn field_type(attr: &AttributeDefinition, required: bool) -> String {
    let ty = rust_type(attr);
    if required || attr.default_value.is_some() {
        ty
    } else {
        format!("Option<{ty}>")
    }
}

/// Render a string as a Rust string literal.
pub(crate) fn literal(s: &str) -> String {
    format!("{s:?}")
}

/// The full mux path of a route: the resource base path plus the route's
/// path template.
pub(crate) fn full_path(resource: &LinkedResource, route: &RouteDefinition) -> String {
    let base = resource.base_path.as_deref().unwrap_or("");
    let base = base.trim_end_matches('/');
    let path = route.path.trim_start_matches('/');
    if path.is_empty() {
        if base.is_empty() {
            "/".to_string()
        } else {
            base.to_string()
        }
    } else {
        format!("{base}/{path}")
    }
}

/// Render a default value as a Rust expression, when the primitive kind
/// supports one.
pub(crate) fn default_expr(primitive: Primitive, value: &serde_json::Value) -> Option<String> {
    match (primitive, value) {
        (Primitive::String, serde_json::Value::String(s)) => {
            Some(format!("{}.to_string()", literal(s)))
        }
        (Primitive::Integer, serde_json::Value::Number(n)) => n.as_i64().map(|v| v.to_string()),
        (Primitive::Float, serde_json::Value::Number(n)) => n.as_f64().map(|v| format!("{v:?}")),
        (Primitive::Boolean, serde_json::Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    }
}

//! Generation-time failures.
//!
//! Every variant is fatal: link and naming problems abort before any file
//! exists, and mid-run failures trigger the orchestrator's rollback so the
//! output directory never holds a partial artifact set.

use miette::Diagnostic;
use thiserror::Error;

/// A fatal failure raised while generating output.
#[derive(Debug, Error, Diagnostic)]
pub enum GenerationError {
    /// Two distinct entities derived the same identifier.
    #[error("generated identifier '{identifier}' collides: derived for both {first} and {second}")]
    #[diagnostic(
        code(trestle::naming_collision),
        help("rename one of the entities so the derived identifiers differ")
    )]
    NamingCollision {
        identifier: String,
        first: String,
        second: String,
    },

    /// A produces/consumes MIME type with no known codec binding.
    #[error("no codec is registered for MIME type '{mime}'")]
    #[diagnostic(code(trestle::unknown_encoding))]
    UnknownEncoding { mime: String },

    /// An IR shape no writer can render, e.g. an object with zero fields.
    #[error("cannot render {entity}: {reason}")]
    #[diagnostic(code(trestle::invalid_shape))]
    InvalidShape { entity: String, reason: String },

    /// Internal rendering defect. Always a bug in the generator itself.
    #[error("internal render failure in {artifact}: {detail}")]
    #[diagnostic(
        code(trestle::render),
        help("this is a generator bug; please report it")
    )]
    Render { artifact: String, detail: String },

    /// Filesystem failure while writing output; propagated verbatim.
    #[error(transparent)]
    #[diagnostic(code(trestle::io))]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collision_names_both_entities() {
        let err = GenerationError::NamingCollision {
            identifier: "GetWidgetContext".to_string(),
            first: "action 'get' of resource 'Widget'".to_string(),
            second: "action 'get' of resource 'widget'".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("GetWidgetContext"));
        assert!(msg.contains("resource 'Widget'"));
        assert!(msg.contains("resource 'widget'"));
    }
}

//! Link-time diagnostics.

use miette::Diagnostic;
use thiserror::Error;

/// A single validation or reference-resolution failure.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum LinkError {
    #[error("duplicate {kind} '{name}'")]
    #[diagnostic(
        code(trestle::duplicate_definition),
        help("every {kind} must be registered under a unique name")
    )]
    Duplicate { kind: &'static str, name: String },

    #[error("{referrer} references unknown media type '{identifier}'")]
    #[diagnostic(
        code(trestle::unknown_media_type),
        help("declare a media type with identifier '{identifier}' or fix the reference")
    )]
    UnknownMediaType { referrer: String, identifier: String },

    #[error("{referrer} references unknown user type '{name}'")]
    #[diagnostic(code(trestle::unknown_user_type))]
    UnknownUserType { referrer: String, name: String },

    #[error("{referrer} requires unknown security scheme '{name}'")]
    #[diagnostic(code(trestle::unknown_security_scheme))]
    UnknownSecurityScheme { referrer: String, name: String },

    #[error("route {verb} {path} of {action} declares wildcard ':{wildcard}' with no matching param")]
    #[diagnostic(
        code(trestle::unmatched_wildcard),
        help("declare a param named '{wildcard}' on the action or its resource")
    )]
    UnmatchedWildcard {
        action: String,
        verb: String,
        path: String,
        wildcard: String,
    },

    #[error("{owner} marks '{field}' required but declares no such field")]
    #[diagnostic(code(trestle::unknown_required_field))]
    UnknownRequiredField { owner: String, field: String },

    #[error("{owner} must be an object")]
    #[diagnostic(
        code(trestle::not_an_object),
        help("params and headers are sets of named fields")
    )]
    NotAnObject { owner: String },

    #[error("resource '{resource}' declares canonical action '{action}' but defines no such action")]
    #[diagnostic(code(trestle::unknown_canonical_action))]
    UnknownCanonicalAction { resource: String, action: String },

    #[error("{action} declares no route")]
    #[diagnostic(
        code(trestle::no_routes),
        help("every action needs at least one verb + path route")
    )]
    NoRoutes { action: String },
}

/// Every problem found while linking a design, reported in one batch so
/// the description can be fixed in a single pass.
#[derive(Debug, Error, Diagnostic)]
#[error("the design failed validation with {} error(s)", errors.len())]
pub struct LinkErrors {
    #[related]
    pub errors: Vec<LinkError>,
}

impl LinkErrors {
    /// Number of collected errors; never zero.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Present for completeness; a constructed batch is never empty.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_both_sides() {
        let err = LinkError::UnknownMediaType {
            referrer: "resource 'Widget'".to_string(),
            identifier: "vnd.missing".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("Widget"));
        assert!(msg.contains("vnd.missing"));
    }

    #[test]
    fn test_batch_display_counts() {
        let batch = LinkErrors {
            errors: vec![
                LinkError::Duplicate {
                    kind: "resource",
                    name: "Widget".to_string(),
                },
                LinkError::NoRoutes {
                    action: "action 'get' of resource 'Widget'".to_string(),
                },
            ],
        };
        assert_eq!(batch.len(), 2);
        assert!(batch.to_string().contains("2 error(s)"));
    }
}

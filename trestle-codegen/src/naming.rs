//! Identifier derivation and collision tracking.
//!
//! Generated identifiers are derived from user-chosen names by
//! concatenating the normalized parts with a kind suffix, e.g. action
//! "get" on resource "Widget" yields `GetWidgetContext`. Since arbitrary
//! names can normalize to the same identifier, every derived name is
//! claimed in a [`Names`] registry scoped to one generation session;
//! claiming the same identifier for two different entities is a fatal
//! collision, while re-deriving it for the same entity is idempotent.

use std::collections::HashMap;

use trestle_core::{to_pascal_case, to_snake_case};

use crate::error::GenerationError;

/// Rust reserved words that cannot be used as field or function names.
const RESERVED_WORDS: &[&str] = &[
    "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum",
    "extern", "false", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move",
    "mut", "pub", "ref", "return", "self", "Self", "static", "struct", "super", "trait",
    "true", "type", "unsafe", "use", "where", "while", "abstract", "become", "box", "do",
    "final", "macro", "override", "priv", "try", "typeof", "unsized", "virtual", "yield",
];

/// Normalize a name for use as a field or function identifier, escaping
/// reserved words the raw-identifier way.
pub fn safe_field(name: &str) -> String {
    let snake = to_snake_case(name);
    if RESERVED_WORDS.contains(&snake.as_str()) {
        format!("r#{snake}")
    } else {
        snake
    }
}

/// Session-scoped registry of the identifiers claimed by generated
/// entities.
///
/// One registry exists per `generate` call — never a process-wide
/// singleton — so concurrent or test-isolated sessions cannot observe
/// each other's claims.
#[derive(Debug)]
pub struct Names {
    claimed: HashMap<String, String>,
}

impl Names {
    /// Create a registry with the target package name pre-reserved.
    pub fn new(package: &str) -> Self {
        let mut claimed = HashMap::new();
        claimed.insert(
            to_pascal_case(package),
            format!("target package '{package}'"),
        );
        Self { claimed }
    }

    /// Claim `identifier` for `owner`.
    ///
    /// Claiming an identifier already held by a different owner fails;
    /// re-claiming it for the same owner is not an error, so regenerating
    /// is idempotent.
    pub fn claim(&mut self, identifier: &str, owner: &str) -> Result<(), GenerationError> {
        match self.claimed.get(identifier) {
            Some(existing) if existing == owner => Ok(()),
            Some(existing) => Err(GenerationError::NamingCollision {
                identifier: identifier.to_string(),
                first: existing.clone(),
                second: owner.to_string(),
            }),
            None => {
                self.claimed
                    .insert(identifier.to_string(), owner.to_string());
                Ok(())
            }
        }
    }

    /// Derive the context type name for an action.
    pub fn context(&mut self, action: &str, resource: &str) -> Result<String, GenerationError> {
        let identifier = format!(
            "{}{}Context",
            to_pascal_case(action),
            to_pascal_case(resource)
        );
        self.claim(&identifier, &action_owner(action, resource))?;
        Ok(identifier)
    }

    /// Derive the controller trait name for a resource.
    pub fn controller(&mut self, resource: &str) -> Result<String, GenerationError> {
        let identifier = format!("{}Controller", to_pascal_case(resource));
        self.claim(&identifier, &resource_owner(resource))?;
        Ok(identifier)
    }

    /// Derive the payload unmarshal function name for an action.
    pub fn unmarshal(&mut self, action: &str, resource: &str) -> Result<String, GenerationError> {
        let identifier = format!(
            "unmarshal_{}_{}_payload",
            to_snake_case(action),
            to_snake_case(resource)
        );
        self.claim(&identifier, &action_owner(action, resource))?;
        Ok(identifier)
    }

    /// Derive the href function name for a resource.
    pub fn href(&mut self, resource: &str) -> Result<String, GenerationError> {
        let identifier = format!("{}_href", to_snake_case(resource));
        self.claim(&identifier, &resource_owner(resource))?;
        Ok(identifier)
    }

    /// Derive the data structure name for a media type.
    pub fn media_type(&mut self, name: &str, identifier: &str) -> Result<String, GenerationError> {
        let type_name = to_pascal_case(name);
        self.claim(&type_name, &format!("media type '{identifier}'"))?;
        Ok(type_name)
    }

    /// Derive the projection struct name for a media type view.
    pub fn view(
        &mut self,
        media_name: &str,
        view_name: &str,
        identifier: &str,
    ) -> Result<String, GenerationError> {
        let type_name = format!("{}{}", to_pascal_case(media_name), to_pascal_case(view_name));
        self.claim(
            &type_name,
            &format!("view '{view_name}' of media type '{identifier}'"),
        )?;
        Ok(type_name)
    }

    /// Derive the data structure name for a user type.
    pub fn user_type(&mut self, name: &str) -> Result<String, GenerationError> {
        let type_name = to_pascal_case(name);
        self.claim(&type_name, &format!("user type '{name}'"))?;
        Ok(type_name)
    }

    /// Derive the test helper function name for an action response.
    pub fn test_helper(
        &mut self,
        action: &str,
        resource: &str,
        response: &str,
    ) -> Result<String, GenerationError> {
        let identifier = format!(
            "{}_{}_{}",
            to_snake_case(action),
            to_snake_case(resource),
            to_snake_case(response)
        );
        self.claim(
            &identifier,
            &format!("response '{response}' of {}", action_owner(action, resource)),
        )?;
        Ok(identifier)
    }
}

fn action_owner(action: &str, resource: &str) -> String {
    format!("action '{action}' of resource '{resource}'")
}

fn resource_owner(resource: &str) -> String {
    format!("resource '{resource}'")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_field_escapes_reserved() {
        assert_eq!(safe_field("type"), "r#type");
        assert_eq!(safe_field("match"), "r#match");
        assert_eq!(safe_field("id"), "id");
        assert_eq!(safe_field("WidgetId"), "widget_id");
    }

    #[test]
    fn test_context_derivation_normalizes_spellings() {
        for spelling in ["get-widget", "get_widget", "GetWidget"] {
            let mut names = Names::new("app");
            let ident = names.context(spelling, "store").unwrap();
            assert_eq!(ident, "GetWidgetStoreContext");
        }
    }

    #[test]
    fn test_rederiving_is_idempotent() {
        let mut names = Names::new("app");
        let first = names.context("get", "Widget").unwrap();
        let second = names.context("get", "Widget").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_distinct_entities_collide() {
        let mut names = Names::new("app");
        names.context("get", "Widget").unwrap();
        // A differently-spelled resource normalizing to the same identifier.
        let err = names.context("get", "widget").unwrap_err();
        match err {
            GenerationError::NamingCollision { identifier, first, second } => {
                assert_eq!(identifier, "GetWidgetContext");
                assert!(first.contains("'Widget'"));
                assert!(second.contains("'widget'"));
            }
            other => panic!("expected a naming collision, got {other:?}"),
        }
    }

    #[test]
    fn test_package_name_is_reserved() {
        let mut names = Names::new("app");
        let err = names.user_type("app").unwrap_err();
        assert!(matches!(err, GenerationError::NamingCollision { .. }));
    }

    #[test]
    fn test_cross_artifact_collision() {
        let mut names = Names::new("app");
        names.media_type("widget", "vnd.example.widgets").unwrap();
        let err = names.user_type("widget").unwrap_err();
        assert!(matches!(err, GenerationError::NamingCollision { .. }));
    }
}

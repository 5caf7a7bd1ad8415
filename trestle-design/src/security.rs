//! Security scheme definitions.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// The kind of a security scheme, with its scheme-specific parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SchemeKind {
    /// A static key carried in a request header.
    ApiKey {
        /// Name of the header carrying the key.
        header: String,
    },
    /// HTTP basic authentication.
    Basic,
    /// Bearer token in JWT form.
    Jwt {
        /// URL the client obtains tokens from.
        token_url: String,
    },
    /// OAuth2 authorization-code flow.
    OAuth2 {
        authorization_url: String,
        token_url: String,
        /// Scope name to description.
        #[serde(default)]
        scopes: IndexMap<String, String>,
    },
}

impl SchemeKind {
    /// Short label used in generated doc comments.
    pub fn label(&self) -> &'static str {
        match self {
            SchemeKind::ApiKey { .. } => "API key",
            SchemeKind::Basic => "basic auth",
            SchemeKind::Jwt { .. } => "JWT",
            SchemeKind::OAuth2 { .. } => "OAuth2",
        }
    }
}

/// A named security scheme actions can require.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityScheme {
    /// Scheme name, unique within the API.
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub kind: SchemeKind,
}

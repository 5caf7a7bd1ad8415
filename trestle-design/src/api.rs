//! The root API definition.

use serde::{Deserialize, Serialize};

use crate::media::{MediaTypeDefinition, UserTypeDefinition};
use crate::resource::ResourceDefinition;
use crate::security::SecurityScheme;

/// Root of a raw API description.
///
/// The raw model is order-preserving: definitions live in plain vectors so
/// the linker can detect duplicate registrations instead of silently
/// keeping one of them. The linker builds the name-keyed registries.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiDefinition {
    pub name: String,
    pub title: Option<String>,
    pub description: Option<String>,
    /// Path prefix shared by every resource.
    pub base_path: Option<String>,
    pub resources: Vec<ResourceDefinition>,
    pub media_types: Vec<MediaTypeDefinition>,
    pub user_types: Vec<UserTypeDefinition>,
    pub security_schemes: Vec<SecurityScheme>,
    /// MIME types the API responds with; drives encoder wiring.
    pub produces: Vec<String>,
    /// MIME types the API accepts; drives decoder wiring.
    pub consumes: Vec<String>,
}

impl ApiDefinition {
    /// A human-readable label for error messages.
    pub fn context(&self) -> String {
        match &self.title {
            Some(title) => format!("API \"{}\" ({})", self.name, title),
            None => format!("API \"{}\"", self.name),
        }
    }
}

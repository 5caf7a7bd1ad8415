//! Resource, action, route, and response definitions.

use serde::{Deserialize, Serialize};

use crate::attribute::AttributeDefinition;

/// A group of actions sharing a base path and defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceDefinition {
    /// Resource name, unique within the API.
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Path prefix shared by the resource's routes.
    #[serde(default)]
    pub base_path: Option<String>,
    /// Identifier of the default media type for this resource's responses.
    #[serde(default)]
    pub media_type: Option<String>,
    /// Action whose route builds the resource href.
    #[serde(default)]
    pub canonical_action: Option<String>,
    #[serde(default)]
    pub actions: Vec<ActionDefinition>,
    /// Resource-level params, merged into every action at link time.
    #[serde(default)]
    pub params: Option<AttributeDefinition>,
    /// Resource-level headers, merged into every action at link time.
    #[serde(default)]
    pub headers: Option<AttributeDefinition>,
    /// Origins allowed by CORS; non-empty triggers preflight registration.
    #[serde(default)]
    pub origins: Vec<String>,
    #[serde(default)]
    pub file_servers: Vec<FileServerDefinition>,
}

/// A static file mapping served by the resource's controller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileServerDefinition {
    /// Request path, possibly ending in a `*wildcard` segment.
    pub request_path: String,
    /// Path of the served file or directory.
    pub file_path: String,
}

/// One operation on a resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionDefinition {
    /// Action name, unique within the resource.
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Routes dispatching to this action; at least one is required.
    #[serde(default)]
    pub routes: Vec<RouteDefinition>,
    /// Action params; merged over the resource params, action wins.
    #[serde(default)]
    pub params: Option<AttributeDefinition>,
    #[serde(default)]
    pub headers: Option<AttributeDefinition>,
    /// Request body shape. `None` means the action takes no payload.
    #[serde(default)]
    pub payload: Option<AttributeDefinition>,
    /// When true, requests without a body are dispatched with an unset
    /// payload instead of being rejected.
    #[serde(default)]
    pub payload_optional: bool,
    #[serde(default)]
    pub responses: Vec<ResponseDefinition>,
    /// Name of the security scheme protecting this action.
    #[serde(default)]
    pub security: Option<String>,
}

/// An HTTP verb plus path template.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteDefinition {
    pub verb: String,
    /// Path template with `:name` and `*name` wildcard segments.
    pub path: String,
}

impl RouteDefinition {
    /// Names of the wildcard segments, in path order.
    ///
    /// Every wildcard must correspond to a declared param; the linker
    /// enforces this.
    pub fn params(&self) -> Vec<&str> {
        self.path
            .split('/')
            .filter_map(|segment| {
                segment
                    .strip_prefix(':')
                    .or_else(|| segment.strip_prefix('*'))
            })
            .filter(|name| !name.is_empty())
            .collect()
    }
}

/// A declared response of an action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseDefinition {
    /// Response name, unique within the action (e.g. "ok").
    pub name: String,
    pub status: u16,
    #[serde(default)]
    pub description: Option<String>,
    /// Identifier of the response body media type.
    #[serde(default)]
    pub media_type: Option<String>,
}

impl ResponseDefinition {
    /// Protocol-switch responses are routed but never get sender helpers.
    pub fn is_protocol_switch(&self) -> bool {
        self.status == 101
    }
}

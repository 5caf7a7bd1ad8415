//! Reference resolution and structural validation.
//!
//! [`link`] turns a raw [`ApiDefinition`] into a [`LinkedApi`]: name-keyed
//! registries, resource-level params and headers merged into each action,
//! and every by-name reference checked against its registry. The input is
//! never mutated; all problems are collected and reported in one batch.
//!
//! Back-references (action to resource, response to media type) stay plain
//! name lookups into the registries owned by [`LinkedApi`], so the linked
//! model has no ownership cycles.

use indexmap::IndexMap;

use crate::api::ApiDefinition;
use crate::attribute::{AttributeDefinition, AttributeType};
use crate::error::{LinkError, LinkErrors};
use crate::media::{MediaTypeDefinition, UserTypeDefinition};
use crate::resource::{
    ActionDefinition, FileServerDefinition, ResourceDefinition, ResponseDefinition,
    RouteDefinition,
};
use crate::security::SecurityScheme;

/// A fully linked, validated API description.
#[derive(Debug, Clone)]
pub struct LinkedApi {
    pub name: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub base_path: Option<String>,
    pub resources: IndexMap<String, LinkedResource>,
    pub media_types: IndexMap<String, MediaTypeDefinition>,
    pub user_types: IndexMap<String, UserTypeDefinition>,
    pub security_schemes: IndexMap<String, SecurityScheme>,
    pub produces: Vec<String>,
    pub consumes: Vec<String>,
}

impl LinkedApi {
    /// Look up a media type by identifier.
    pub fn media_type(&self, identifier: &str) -> Option<&MediaTypeDefinition> {
        self.media_types.get(identifier)
    }

    /// Look up a user type by name.
    pub fn user_type(&self, name: &str) -> Option<&UserTypeDefinition> {
        self.user_types.get(name)
    }

    /// A human-readable label for generated file headers.
    pub fn context(&self) -> String {
        match &self.title {
            Some(title) => format!("API \"{}\" ({})", self.name, title),
            None => format!("API \"{}\"", self.name),
        }
    }
}

/// A resource with its actions linked and merged.
#[derive(Debug, Clone)]
pub struct LinkedResource {
    pub name: String,
    pub description: Option<String>,
    pub base_path: Option<String>,
    pub media_type: Option<String>,
    pub canonical_action: Option<String>,
    pub actions: IndexMap<String, LinkedAction>,
    pub origins: Vec<String>,
    pub file_servers: Vec<FileServerDefinition>,
}

impl LinkedResource {
    /// Route of the canonical action, if one is declared.
    pub fn canonical_route(&self) -> Option<&RouteDefinition> {
        self.canonical_action
            .as_deref()
            .and_then(|name| self.actions.get(name))
            .and_then(|action| action.routes.first())
    }

    /// Distinct route paths needing CORS preflight registration.
    pub fn preflight_paths(&self) -> Vec<&str> {
        let mut paths = Vec::new();
        for action in self.actions.values() {
            for route in &action.routes {
                if !paths.contains(&route.path.as_str()) {
                    paths.push(route.path.as_str());
                }
            }
        }
        paths
    }
}

/// An action with resource-level defaults merged in.
#[derive(Debug, Clone)]
pub struct LinkedAction {
    pub name: String,
    pub description: Option<String>,
    pub routes: Vec<RouteDefinition>,
    /// Merged resource + action params; `None` when the merged object is
    /// empty so writers can skip it.
    pub params: Option<AttributeDefinition>,
    /// Merged resource + action headers; same collapse rule as params.
    pub headers: Option<AttributeDefinition>,
    pub payload: Option<AttributeDefinition>,
    pub payload_optional: bool,
    pub responses: IndexMap<String, ResponseDefinition>,
    pub security: Option<String>,
}

impl LinkedAction {
    /// Responses that get a generated sender helper. Protocol-switch
    /// responses are retained for routing but never get helpers.
    pub fn success_responses(&self) -> impl Iterator<Item = &ResponseDefinition> {
        self.responses.values().filter(|r| !r.is_protocol_switch())
    }
}

/// Link a raw API description.
///
/// Returns the fully linked model, or every problem found — never both.
pub fn link(api: &ApiDefinition) -> Result<LinkedApi, LinkErrors> {
    let mut errors = Vec::new();

    let media_types = register(&api.media_types, "media type", &mut errors, |mt| {
        mt.identifier.clone()
    });
    let user_types = register(&api.user_types, "user type", &mut errors, |ut| {
        ut.name.clone()
    });
    let security_schemes =
        register(&api.security_schemes, "security scheme", &mut errors, |s| {
            s.name.clone()
        });

    for mt in media_types.values() {
        let owner = format!("media type '{}'", mt.identifier);
        check_attribute(&mt.attribute, &owner, &user_types, &mut errors);
    }
    for ut in user_types.values() {
        let owner = format!("user type '{}'", ut.name);
        check_attribute(&ut.attribute, &owner, &user_types, &mut errors);
    }

    let mut resources = IndexMap::new();
    for resource in &api.resources {
        let linked = link_resource(resource, &media_types, &user_types, &security_schemes, &mut errors);
        if resources.insert(resource.name.clone(), linked).is_some() {
            errors.push(LinkError::Duplicate {
                kind: "resource",
                name: resource.name.clone(),
            });
        }
    }

    if errors.is_empty() {
        Ok(LinkedApi {
            name: api.name.clone(),
            title: api.title.clone(),
            description: api.description.clone(),
            base_path: api.base_path.clone(),
            resources,
            media_types,
            user_types,
            security_schemes,
            produces: api.produces.clone(),
            consumes: api.consumes.clone(),
        })
    } else {
        Err(LinkErrors { errors })
    }
}

/// Build a keyed registry, recording an error for every duplicate key.
fn register<T: Clone>(
    items: &[T],
    kind: &'static str,
    errors: &mut Vec<LinkError>,
    key: impl Fn(&T) -> String,
) -> IndexMap<String, T> {
    let mut registry = IndexMap::new();
    for item in items {
        let name = key(item);
        if registry.contains_key(&name) {
            errors.push(LinkError::Duplicate { kind, name });
        } else {
            registry.insert(name, item.clone());
        }
    }
    registry
}

fn link_resource(
    resource: &ResourceDefinition,
    media_types: &IndexMap<String, MediaTypeDefinition>,
    user_types: &IndexMap<String, UserTypeDefinition>,
    security_schemes: &IndexMap<String, SecurityScheme>,
    errors: &mut Vec<LinkError>,
) -> LinkedResource {
    let resource_label = format!("resource '{}'", resource.name);

    if let Some(identifier) = &resource.media_type {
        if !media_types.contains_key(identifier) {
            errors.push(LinkError::UnknownMediaType {
                referrer: resource_label.clone(),
                identifier: identifier.clone(),
            });
        }
    }

    if let Some(canonical) = &resource.canonical_action {
        if !resource.actions.iter().any(|a| &a.name == canonical) {
            errors.push(LinkError::UnknownCanonicalAction {
                resource: resource.name.clone(),
                action: canonical.clone(),
            });
        }
    }

    check_object_shape(resource.params.as_ref(), &format!("params of {resource_label}"), errors);
    check_object_shape(resource.headers.as_ref(), &format!("headers of {resource_label}"), errors);

    let mut actions = IndexMap::new();
    for action in &resource.actions {
        let linked = link_action(action, resource, media_types, user_types, security_schemes, errors);
        if actions.insert(action.name.clone(), linked).is_some() {
            errors.push(LinkError::Duplicate {
                kind: "action",
                name: format!("{} of {}", action.name, resource_label),
            });
        }
    }

    LinkedResource {
        name: resource.name.clone(),
        description: resource.description.clone(),
        base_path: resource.base_path.clone(),
        media_type: resource.media_type.clone(),
        canonical_action: resource.canonical_action.clone(),
        actions,
        origins: resource.origins.clone(),
        file_servers: resource.file_servers.clone(),
    }
}

fn link_action(
    action: &ActionDefinition,
    resource: &ResourceDefinition,
    media_types: &IndexMap<String, MediaTypeDefinition>,
    user_types: &IndexMap<String, UserTypeDefinition>,
    security_schemes: &IndexMap<String, SecurityScheme>,
    errors: &mut Vec<LinkError>,
) -> LinkedAction {
    let action_label = format!("action '{}' of resource '{}'", action.name, resource.name);

    if action.routes.is_empty() {
        errors.push(LinkError::NoRoutes {
            action: action_label.clone(),
        });
    }

    check_object_shape(action.params.as_ref(), &format!("params of {action_label}"), errors);
    check_object_shape(action.headers.as_ref(), &format!("headers of {action_label}"), errors);

    let params = merge_objects(resource.params.as_ref(), action.params.as_ref());
    let headers = merge_objects(resource.headers.as_ref(), action.headers.as_ref());

    if let Some(merged) = &params {
        let owner = format!("params of {action_label}");
        check_attribute(merged, &owner, user_types, errors);
    }
    if let Some(merged) = &headers {
        let owner = format!("headers of {action_label}");
        check_attribute(merged, &owner, user_types, errors);
    }

    for route in &action.routes {
        for wildcard in route.params() {
            let declared = params
                .as_ref()
                .and_then(|p| p.ty.as_object())
                .is_some_and(|fields| fields.contains_key(wildcard));
            if !declared {
                errors.push(LinkError::UnmatchedWildcard {
                    action: action_label.clone(),
                    verb: route.verb.clone(),
                    path: route.path.clone(),
                    wildcard: wildcard.to_string(),
                });
            }
        }
    }

    if let Some(payload) = &action.payload {
        let owner = format!("payload of {action_label}");
        check_attribute(payload, &owner, user_types, errors);
    }

    if let Some(scheme) = &action.security {
        if !security_schemes.contains_key(scheme) {
            errors.push(LinkError::UnknownSecurityScheme {
                referrer: action_label.clone(),
                name: scheme.clone(),
            });
        }
    }

    let mut responses = IndexMap::new();
    for response in &action.responses {
        if let Some(identifier) = &response.media_type {
            if !media_types.contains_key(identifier) {
                errors.push(LinkError::UnknownMediaType {
                    referrer: format!("response '{}' of {action_label}", response.name),
                    identifier: identifier.clone(),
                });
            }
        }
        if responses
            .insert(response.name.clone(), response.clone())
            .is_some()
        {
            errors.push(LinkError::Duplicate {
                kind: "response",
                name: format!("{} of {action_label}", response.name),
            });
        }
    }

    LinkedAction {
        name: action.name.clone(),
        description: action.description.clone(),
        routes: action.routes.clone(),
        params,
        headers,
        payload: action.payload.clone(),
        payload_optional: action.payload_optional,
        responses,
        security: action.security.clone(),
    }
}

/// Record an error when a params/headers attribute is not object-shaped.
fn check_object_shape(
    attr: Option<&AttributeDefinition>,
    owner: &str,
    errors: &mut Vec<LinkError>,
) {
    if let Some(attr) = attr {
        if !attr.ty.is_object() {
            errors.push(LinkError::NotAnObject {
                owner: owner.to_string(),
            });
        }
    }
}

/// Merge two object attributes; the overriding side wins on key conflicts
/// and required sets are unioned. An empty result collapses to `None`.
fn merge_objects(
    base: Option<&AttributeDefinition>,
    over: Option<&AttributeDefinition>,
) -> Option<AttributeDefinition> {
    let merged = match (base, over) {
        (None, None) => return None,
        (Some(b), None) => b.clone(),
        (None, Some(o)) => o.clone(),
        (Some(b), Some(o)) => {
            let mut fields = b.ty.as_object().cloned().unwrap_or_default();
            if let Some(over_fields) = o.ty.as_object() {
                for (name, attr) in over_fields {
                    fields.insert(name.clone(), attr.clone());
                }
            }
            let mut merged = o.clone();
            merged.ty = AttributeType::Object(fields);
            for required in &b.validation.required {
                if !merged.validation.required.contains(required) {
                    merged.validation.required.push(required.clone());
                }
            }
            merged
        }
    };
    match merged.ty.as_object() {
        Some(fields) if fields.is_empty() => None,
        Some(_) => Some(merged),
        // Shape errors are reported separately; don't cascade here.
        None => None,
    }
}

/// Walk an attribute tree checking user-type references and required
/// fields at every object node.
fn check_attribute(
    attr: &AttributeDefinition,
    owner: &str,
    user_types: &IndexMap<String, UserTypeDefinition>,
    errors: &mut Vec<LinkError>,
) {
    match &attr.ty {
        AttributeType::Primitive(_) => {
            report_required(attr, owner, errors);
        }
        AttributeType::UserType(name) => {
            if !user_types.contains_key(name) {
                errors.push(LinkError::UnknownUserType {
                    referrer: owner.to_string(),
                    name: name.clone(),
                });
            }
        }
        AttributeType::Array(element) | AttributeType::Map(element) => {
            check_attribute(element, owner, user_types, errors);
        }
        AttributeType::Object(fields) => {
            for required in &attr.validation.required {
                if !fields.contains_key(required) {
                    errors.push(LinkError::UnknownRequiredField {
                        owner: owner.to_string(),
                        field: required.clone(),
                    });
                }
            }
            for (name, field) in fields {
                let field_owner = format!("{owner}.{name}");
                check_attribute(field, &field_owner, user_types, errors);
            }
        }
    }
}

/// Required names on a non-object attribute have nothing to refer to.
fn report_required(attr: &AttributeDefinition, owner: &str, errors: &mut Vec<LinkError>) {
    for required in &attr.validation.required {
        errors.push(LinkError::UnknownRequiredField {
            owner: owner.to_string(),
            field: required.clone(),
        });
    }
}

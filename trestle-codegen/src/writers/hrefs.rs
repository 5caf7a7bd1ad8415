//! The hrefs artifact: one function per resource building its canonical
//! URL from the canonical action's route, falling back to the base path.

use trestle_design::{LinkedApi, LinkedResource};

use crate::ast::{Fn, Param};
use crate::error::GenerationError;
use crate::naming::{Names, safe_field};
use crate::rust_file::RustFile;

use super::{Artifact, full_path, header, literal};

/// Writer for `hrefs.rs`.
pub struct HrefsFile;

impl Artifact for HrefsFile {
    fn file_name(&self) -> &'static str {
        "hrefs.rs"
    }

    fn render(&self, api: &LinkedApi, names: &mut Names) -> Result<String, GenerationError> {
        let mut file = RustFile::new();
        for resource in api.resources.values() {
            file = file.add(href_fn(resource, api, names)?.build());
        }
        Ok(file.render_with_header(&header(api, "resource href builders")))
    }
}

fn href_fn(
    resource: &LinkedResource,
    api: &LinkedApi,
    names: &mut Names,
) -> Result<Fn, GenerationError> {
    let fn_name = names.href(&resource.name)?;

    // The href doc names the media type identifier the resource serves;
    // resources without one fall back to plain text.
    let identifier = resource
        .media_type
        .as_deref()
        .and_then(|id| api.media_type(id))
        .map(|mt| mt.identifier.as_str())
        .unwrap_or("text/plain");

    let mut f = Fn::new(fn_name)
        .doc(format!(
            "Canonical href to the {} resource ('{identifier}').",
            resource.name
        ))
        .returns("String");

    match resource.canonical_route() {
        Some(route) => {
            let path = full_path(resource, route);
            let mut template_segments = Vec::new();
            let mut params = Vec::new();
            for segment in path.split('/') {
                match segment.strip_prefix(':').or_else(|| segment.strip_prefix('*')) {
                    Some(name) if !name.is_empty() => {
                        template_segments.push("{}");
                        params.push(safe_field(name));
                    }
                    _ => template_segments.push(segment),
                }
            }
            let template = template_segments.join("/");
            if params.is_empty() {
                f = f.body_line(format!("{}.to_string()", literal(&template)));
            } else {
                for param in &params {
                    f = f.param(Param::new(param.clone(), "impl std::fmt::Display"));
                }
                f = f.body_line(format!(
                    "format!({}, {})",
                    literal(&template),
                    params.join(", ")
                ));
            }
        }
        None => {
            let base = resource.base_path.as_deref().unwrap_or("/");
            f = f.body_line(format!("{}.to_string()", literal(base)));
        }
    }
    Ok(f)
}

#[cfg(test)]
mod tests {
    use trestle_design::{
        ActionDefinition, ApiDefinition, AttributeDefinition, Primitive, ResourceDefinition,
        RouteDefinition, link,
    };

    use super::*;

    #[test]
    fn test_href_from_canonical_route() {
        let mut params = AttributeDefinition::object([(
            "id".to_string(),
            AttributeDefinition::primitive(Primitive::String),
        )]);
        params.validation.required = vec!["id".to_string()];
        let api = ApiDefinition {
            name: "test".to_string(),
            resources: vec![ResourceDefinition {
                name: "Widget".to_string(),
                description: None,
                base_path: Some("/widgets".to_string()),
                media_type: None,
                canonical_action: Some("get".to_string()),
                actions: vec![ActionDefinition {
                    name: "get".to_string(),
                    description: None,
                    routes: vec![RouteDefinition {
                        verb: "GET".to_string(),
                        path: "/:id".to_string(),
                    }],
                    params: Some(params),
                    headers: None,
                    payload: None,
                    payload_optional: false,
                    responses: Vec::new(),
                    security: None,
                }],
                params: None,
                headers: None,
                origins: Vec::new(),
                file_servers: Vec::new(),
            }],
            ..ApiDefinition::default()
        };
        let linked = link(&api).unwrap();
        let mut names = Names::new("app");
        let code = HrefsFile.render(&linked, &mut names).unwrap();
        assert!(code.contains("pub fn widget_href(id: impl std::fmt::Display) -> String {"));
        assert!(code.contains(r#"format!("/widgets/{}", id)"#));
    }

    #[test]
    fn test_href_falls_back_to_base_path() {
        let api = ApiDefinition {
            name: "test".to_string(),
            resources: vec![ResourceDefinition {
                name: "Status".to_string(),
                description: None,
                base_path: Some("/status".to_string()),
                media_type: None,
                canonical_action: None,
                actions: Vec::new(),
                params: None,
                headers: None,
                origins: Vec::new(),
                file_servers: Vec::new(),
            }],
            ..ApiDefinition::default()
        };
        let linked = link(&api).unwrap();
        let mut names = Names::new("app");
        let code = HrefsFile.render(&linked, &mut names).unwrap();
        assert!(code.contains("pub fn status_href() -> String {"));
        assert!(code.contains(r#""/status".to_string()"#));
    }
}

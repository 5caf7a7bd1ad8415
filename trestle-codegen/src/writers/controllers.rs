//! The controllers artifact: the service initializer plus, per resource,
//! a controller trait and a mount routine registering every route.

use std::collections::BTreeSet;

use trestle_design::{LinkedAction, LinkedApi, LinkedResource};

use crate::ast::{Fn, Param, TraitDef};
use crate::encoders::build_encoders;
use crate::error::GenerationError;
use crate::naming::{Names, safe_field};
use crate::rust_file::{RustFile, Use};

use super::{Artifact, full_path, header, literal, rust_type};

/// Writer for `controllers.rs`.
pub struct ControllersFile;

impl Artifact for ControllersFile {
    fn file_name(&self) -> &'static str {
        "controllers.rs"
    }

    fn render(&self, api: &LinkedApi, names: &mut Names) -> Result<String, GenerationError> {
        let mut file = RustFile::new();
        let mut context_uses = BTreeSet::new();
        let mut chunks = vec![init_service(api)?.build()];

        for resource in api.resources.values() {
            if resource.actions.is_empty() && resource.file_servers.is_empty() {
                continue;
            }
            let controller = names.controller(&resource.name)?;
            chunks.push(controller_trait(&controller, resource, names, &mut context_uses)?.build());
            chunks.push(mount_fn(&controller, resource, names)?.build());
            for action in resource.actions.values() {
                if action.payload.is_some() {
                    chunks.push(unmarshal_fn(action, resource, names)?.build());
                }
            }
        }

        if !context_uses.is_empty() {
            file = file.use_stmt(Use::new("super::contexts").symbols(context_uses));
        }
        for chunk in chunks {
            file = file.add(chunk);
        }
        Ok(file.render_with_header(&header(api, "application controllers")))
    }
}

/// The service initializer wiring the declared codecs.
fn init_service(api: &LinkedApi) -> Result<Fn, GenerationError> {
    let mut lines = Vec::new();
    for binding in build_encoders(&api.produces)? {
        lines.push(format!(
            "service.register_encoder({}::{}, &[{}]);",
            binding.module,
            binding.constructor,
            binding
                .mime_types
                .iter()
                .map(|m| literal(m))
                .collect::<Vec<_>>()
                .join(", ")
        ));
    }
    for binding in build_encoders(&api.consumes)? {
        lines.push(format!(
            "service.register_decoder({}::{}, &[{}]);",
            binding.module,
            binding.constructor,
            binding
                .mime_types
                .iter()
                .map(|m| literal(m))
                .collect::<Vec<_>>()
                .join(", ")
        ));
    }
    Ok(Fn::new("init_service")
        .doc("Wire the codecs declared by the design into the service.")
        .param(Param::new("service", "&mut trestle_runtime::Service"))
        .body(lines.join("\n")))
}

/// The capability contract naming every action handler.
fn controller_trait(
    controller: &str,
    resource: &LinkedResource,
    names: &mut Names,
    context_uses: &mut BTreeSet<String>,
) -> Result<TraitDef, GenerationError> {
    let mut def = TraitDef::new(controller)
        .doc(format!("Controller contract for the {} resource.", resource.name))
        .supertrait("trestle_runtime::Controller");

    for action in resource.actions.values() {
        let ctx_name = names.context(&action.name, &resource.name)?;
        context_uses.insert(ctx_name.clone());
        let mut method = Fn::new(safe_field(&action.name))
            .param(Param::new("&self", ""))
            .param(Param::new("ctx", ctx_name))
            .param(Param::new("resp", "&mut trestle_runtime::Response"))
            .returns("trestle_runtime::Outcome");
        method = match &action.description {
            Some(desc) => method.doc(desc.clone()),
            None => method.doc(format!("Handle the {} action.", action.name)),
        };
        def = def.method(method);
    }
    Ok(def)
}

/// The mount routine: one handler registration per route, preflight
/// registrations for CORS, and file server mappings.
fn mount_fn(
    controller: &str,
    resource: &LinkedResource,
    names: &mut Names,
) -> Result<Fn, GenerationError> {
    let mut lines = Vec::new();

    for (i, action) in resource.actions.values().enumerate() {
        if i > 0 {
            lines.push(String::new());
        }
        lines.extend(action_registration(resource, action, names)?);
    }

    if !resource.origins.is_empty() {
        lines.push(String::new());
        let origins = resource
            .origins
            .iter()
            .map(|o| literal(o))
            .collect::<Vec<_>>()
            .join(", ");
        for path in resource.preflight_paths() {
            let route = trestle_design::RouteDefinition {
                verb: "OPTIONS".to_string(),
                path: path.to_string(),
            };
            lines.push(format!(
                "service.mux().register_preflight({}, &[{origins}]);",
                literal(&full_path(resource, &route))
            ));
        }
    }

    for server in &resource.file_servers {
        lines.push(format!(
            "service.mux().serve_files({}, {});",
            literal(&server.request_path),
            literal(&server.file_path)
        ));
    }

    Ok(Fn::new(format!(
        "mount_{}_controller",
        trestle_core::to_snake_case(&resource.name)
    ))
    .doc(format!(
        "Mount the {} resource controller onto the service.",
        resource.name
    ))
    .generic("C")
    .param(Param::new("service", "&mut trestle_runtime::Service"))
    .param(Param::new("ctrl", "std::sync::Arc<C>"))
    .where_bound(format!("C: {controller} + Send + Sync + 'static"))
    .body(lines.join("\n")))
}

/// Registration block for one action: build the handler closure, then
/// register it for every route.
fn action_registration(
    resource: &LinkedResource,
    action: &LinkedAction,
    names: &mut Names,
) -> Result<Vec<String>, GenerationError> {
    let ctx_name = names.context(&action.name, &resource.name)?;
    let method = safe_field(&action.name);
    let handler = format!("{method}_handler");

    let mut lines = Vec::new();
    lines.push(format!("let {handler} = {{"));
    lines.push("    let ctrl = ctrl.clone();".to_string());
    lines.push(
        "    move |req: &trestle_runtime::Request, resp: &mut trestle_runtime::Response| {"
            .to_string(),
    );
    // `mut` only when a payload assignment follows.
    let binding = if action.payload.is_some() { "mut ctx" } else { "ctx" };
    lines.push(format!("        let {binding} = {ctx_name}::new(req)?;"));
    if action.payload.is_some() {
        let unmarshal = names.unmarshal(&action.name, &resource.name)?;
        if action.payload_optional {
            lines.push("        if let Some(raw) = req.decoded_payload() {".to_string());
            lines.push(format!("            ctx.payload = Some({unmarshal}(raw)?);"));
            lines.push("        }".to_string());
        } else {
            lines.push("        match req.decoded_payload() {".to_string());
            lines.push(format!(
                "            Some(raw) => ctx.payload = Some({unmarshal}(raw)?),"
            ));
            lines.push(
                "            None => return Err(trestle_runtime::Error::missing_payload()),"
                    .to_string(),
            );
            lines.push("        }".to_string());
        }
    }
    lines.push(format!("        ctrl.{method}(ctx, resp)"));
    lines.push("    }".to_string());
    lines.push("};".to_string());

    let route_count = action.routes.len();
    for (i, route) in action.routes.iter().enumerate() {
        // Clone for all but the last registration so the closure moves once.
        let value = if i + 1 < route_count {
            format!("{handler}.clone()")
        } else {
            handler.clone()
        };
        lines.push(format!(
            "service.mux().register({}, {}, trestle_runtime::handler({value}));",
            literal(&route.verb),
            literal(&full_path(resource, route))
        ));
        if let Some(scheme) = &action.security {
            lines.push(format!(
                "service.mux().register_guard({}, {}, {});",
                literal(&route.verb),
                literal(&full_path(resource, route)),
                literal(scheme)
            ));
        }
    }
    Ok(lines)
}

/// The payload decode helper for one action.
fn unmarshal_fn(
    action: &LinkedAction,
    resource: &LinkedResource,
    names: &mut Names,
) -> Result<Fn, GenerationError> {
    let name = names.unmarshal(&action.name, &resource.name)?;
    let payload = action.payload.as_ref().ok_or_else(|| GenerationError::Render {
        artifact: "controllers".to_string(),
        detail: format!("unmarshal requested for payload-less action '{}'", action.name),
    })?;
    Ok(Fn::new(name)
        .doc(format!(
            "Decode the request body into the {} {} action payload.",
            action.name, resource.name
        ))
        .private()
        .param(Param::new("raw", "&trestle_runtime::Decoded"))
        .returns(format!(
            "Result<{}, trestle_runtime::Error>",
            rust_type(payload)
        ))
        .body_line("raw.decode()"))
}

#[cfg(test)]
mod tests {
    use trestle_design::{ApiDefinition, link};

    use super::*;

    #[test]
    fn test_init_service_present_for_empty_api() {
        let api = ApiDefinition {
            name: "test".to_string(),
            ..ApiDefinition::default()
        };
        let linked = link(&api).unwrap();
        let mut names = Names::new("app");
        let code = ControllersFile.render(&linked, &mut names).unwrap();
        assert!(code.contains("pub fn init_service(service: &mut trestle_runtime::Service) {"));
        assert!(code.contains("trestle_runtime::codec::json::JsonCodec::new()"));
    }
}

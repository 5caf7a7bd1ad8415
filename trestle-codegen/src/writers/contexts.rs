//! The contexts artifact: one context type per action.
//!
//! A context aggregates the action's merged params, headers, and payload
//! with typed fields, a constructor that coerces and validates the raw
//! request values, and one response sender per non-protocol-switch
//! response.

use std::collections::BTreeSet;

use trestle_core::to_pascal_case;
use trestle_design::{
    AttributeDefinition, AttributeType, LinkedAction, LinkedApi, Primitive, ResponseDefinition,
};

use crate::ast::{Field, Fn, Impl, Param, Struct};
use crate::error::GenerationError;
use crate::naming::{Names, safe_field};
use crate::rust_file::{RustFile, Use};

use super::{Artifact, default_expr, field_type, header, literal, rust_type};

/// Writer for `contexts.rs`.
pub struct ContextsFile;

impl Artifact for ContextsFile {
    fn file_name(&self) -> &'static str {
        "contexts.rs"
    }

    fn render(&self, api: &LinkedApi, names: &mut Names) -> Result<String, GenerationError> {
        let mut file = RustFile::new();
        let mut media_uses = BTreeSet::new();

        let mut chunks = Vec::new();
        for resource in api.resources.values() {
            for action in resource.actions.values() {
                let ctx_name = names.context(&action.name, &resource.name)?;
                chunks.push(context_struct(&ctx_name, &resource.name, action)?.build());
                chunks.push(context_impl(&ctx_name, action, api, &mut media_uses)?.build());
            }
        }

        if !media_uses.is_empty() {
            file = file.use_stmt(Use::new("super::media_types").symbols(media_uses));
        }
        for chunk in chunks {
            file = file.add(chunk);
        }
        Ok(file.render_with_header(&header(api, "application contexts")))
    }
}

fn context_struct(
    ctx_name: &str,
    resource: &str,
    action: &LinkedAction,
) -> Result<Struct, GenerationError> {
    let mut s = Struct::new(ctx_name)
        .doc(format!(
            "Context for the {} action of the {resource} resource.",
            action.name
        ))
        .derive("Debug");

    let mut seen = BTreeSet::new();
    for (source, attr) in [("params", &action.params), ("headers", &action.headers)] {
        let Some(object) = attr.as_ref().and_then(|a| a.ty.as_object()) else {
            continue;
        };
        for (name, field_attr) in object {
            let ident = safe_field(name);
            if !seen.insert(ident.clone()) {
                return Err(GenerationError::InvalidShape {
                    entity: format!("{source} of action '{}' of resource '{resource}'", action.name),
                    reason: format!("field '{name}' derives the duplicate identifier '{ident}'"),
                });
            }
            let mut field = Field::new(ident, field_type(field_attr, attr_required(attr, name)));
            if let Some(doc) = &field_attr.description {
                field = field.doc(doc.clone());
            }
            s = s.field(field);
        }
    }

    if let Some(payload) = &action.payload {
        s = s.field(
            Field::new("payload", format!("Option<{}>", rust_type(payload)))
                .doc("Decoded request payload; assigned by the controller."),
        );
    }

    Ok(s)
}

fn attr_required(attr: &Option<AttributeDefinition>, field: &str) -> bool {
    attr.as_ref().is_some_and(|a| a.is_required(field))
}

fn context_impl(
    ctx_name: &str,
    action: &LinkedAction,
    api: &LinkedApi,
    media_uses: &mut BTreeSet<String>,
) -> Result<Impl, GenerationError> {
    let mut block = Impl::new(ctx_name).method(constructor(action)?);
    for response in action.success_responses() {
        block = block.method(responder(action, response, api, media_uses)?);
    }
    Ok(block)
}

/// Build the `new` constructor: extract every field, collecting all
/// violations rather than stopping at the first.
fn constructor(action: &LinkedAction) -> Result<Fn, GenerationError> {
    let mut lines = vec!["let mut errors = trestle_runtime::ValidationErrors::new();".to_string()];
    let mut field_idents = Vec::new();

    for (accessor, attr) in [("param", &action.params), ("header", &action.headers)] {
        let Some(object) = attr.as_ref().and_then(|a| a.ty.as_object()) else {
            continue;
        };
        for (name, field_attr) in object {
            let ident = safe_field(name);
            if field_idents.contains(&ident) {
                continue;
            }
            let required = attr_required(attr, name);
            extract_field(&mut lines, accessor, name, &ident, field_attr, required, action)?;
            emit_validations(&mut lines, name, &ident, field_attr, required);
            field_idents.push(ident);
        }
    }

    lines.push("if !errors.is_empty() {".to_string());
    lines.push("    return Err(errors);".to_string());
    lines.push("}".to_string());
    lines.push("Ok(Self {".to_string());
    for ident in &field_idents {
        lines.push(format!("    {ident},"));
    }
    if action.payload.is_some() {
        lines.push("    payload: None,".to_string());
    }
    lines.push("})".to_string());

    Ok(Fn::new("new")
        .doc("Extract and validate the request values; every violation is collected before failing.")
        .param(Param::new("req", "&trestle_runtime::Request"))
        .returns("Result<Self, trestle_runtime::ValidationErrors>")
        .body(lines.join("\n")))
}

/// Coercion details for a parsed (non-string) primitive.
fn parse_rule(primitive: Primitive) -> Option<(&'static str, &'static str, &'static str)> {
    match primitive {
        Primitive::String => None,
        Primitive::Integer => Some(("raw.parse::<i64>()", "0", "integer")),
        Primitive::Float => Some(("raw.parse::<f64>()", "0.0", "float")),
        Primitive::Boolean => Some(("raw.parse::<bool>()", "false", "boolean")),
        Primitive::DateTime => Some((
            "trestle_runtime::types::DateTime::parse(raw)",
            "trestle_runtime::types::DateTime::zero()",
            "RFC 3339 date-time",
        )),
        Primitive::Uuid => Some((
            "trestle_runtime::types::Uuid::parse(raw)",
            "trestle_runtime::types::Uuid::nil()",
            "UUID",
        )),
    }
}

fn extract_field(
    lines: &mut Vec<String>,
    accessor: &str,
    raw_name: &str,
    ident: &str,
    attr: &AttributeDefinition,
    required: bool,
    action: &LinkedAction,
) -> Result<(), GenerationError> {
    let name_lit = literal(raw_name);
    let get = format!("req.{accessor}({name_lit})");

    match &attr.ty {
        AttributeType::Primitive(Primitive::String) => {
            let default = attr
                .default_value
                .as_ref()
                .and_then(|v| default_expr(Primitive::String, v));
            match (required, default) {
                (_, Some(default)) => {
                    lines.push(format!("let {ident} = match {get} {{"));
                    lines.push("    Some(raw) => raw.to_string(),".to_string());
                    lines.push(format!("    None => {default},"));
                    lines.push("};".to_string());
                }
                (true, None) => {
                    lines.push(format!("let {ident} = match {get} {{"));
                    lines.push("    Some(raw) => raw.to_string(),".to_string());
                    lines.push("    None => {".to_string());
                    lines.push(format!("        errors.missing_{accessor}({name_lit});"));
                    lines.push("        String::new()".to_string());
                    lines.push("    }".to_string());
                    lines.push("};".to_string());
                }
                (false, None) => {
                    lines.push(format!("let {ident} = {get}.map(|raw| raw.to_string());"));
                }
            }
        }
        AttributeType::Primitive(primitive) => {
            // parse_rule covers every non-string primitive.
            let (parse, zero, kind) = parse_rule(*primitive).ok_or_else(|| {
                GenerationError::Render {
                    artifact: "contexts".to_string(),
                    detail: format!("no parse rule for primitive {primitive:?}"),
                }
            })?;
            let default = attr
                .default_value
                .as_ref()
                .and_then(|v| default_expr(*primitive, v));
            let concrete = required || default.is_some();
            let (ok_value, err_value) = if concrete {
                ("value".to_string(), zero.to_string())
            } else {
                ("Some(value)".to_string(), "None".to_string())
            };
            lines.push(format!("let {ident} = match {get} {{"));
            lines.push(format!("    Some(raw) => match {parse} {{"));
            lines.push(format!("        Ok(value) => {ok_value},"));
            lines.push("        Err(_) => {".to_string());
            lines.push(format!(
                "            errors.invalid_{accessor}({name_lit}, {});",
                literal(kind)
            ));
            lines.push(format!("            {err_value}"));
            lines.push("        }".to_string());
            lines.push("    },".to_string());
            match (default, required) {
                (Some(default), _) => lines.push(format!("    None => {default},")),
                (None, true) => {
                    lines.push("    None => {".to_string());
                    lines.push(format!("        errors.missing_{accessor}({name_lit});"));
                    lines.push(format!("        {zero}"));
                    lines.push("    }".to_string());
                }
                (None, false) => lines.push("    None => None,".to_string()),
            }
            lines.push("};".to_string());
        }
        AttributeType::Array(element)
            if matches!(element.ty, AttributeType::Primitive(Primitive::String)) =>
        {
            // Multi-value params arrive as one comma-separated raw value.
            let collect = "raw.split(',').map(|item| item.trim().to_string()).collect()";
            lines.push(format!("let {ident} = match {get} {{"));
            if required {
                lines.push(format!("    Some(raw) => {collect},"));
                lines.push("    None => {".to_string());
                lines.push(format!("        errors.missing_{accessor}({name_lit});"));
                lines.push("        Vec::new()".to_string());
                lines.push("    }".to_string());
            } else {
                lines.push(format!("    Some(raw) => Some({collect}),"));
                lines.push("    None => None,".to_string());
            }
            lines.push("};".to_string());
        }
        _ => {
            return Err(GenerationError::InvalidShape {
                entity: format!("{accessor} '{raw_name}' of action '{}'", action.name),
                reason: "request values must be primitives or arrays of strings".to_string(),
            });
        }
    }
    Ok(())
}

/// Emit rule checks against the runtime validation helpers.
fn emit_validations(
    lines: &mut Vec<String>,
    raw_name: &str,
    ident: &str,
    attr: &AttributeDefinition,
    required: bool,
) {
    let AttributeType::Primitive(primitive) = &attr.ty else {
        return;
    };
    let rules = &attr.validation;
    let name_lit = literal(raw_name);
    let concrete = required || attr.default_value.is_some();

    let mut checks = Vec::new();
    if matches!(primitive, Primitive::String) {
        let value = if concrete { format!("&{ident}") } else { "value".to_string() };
        if let Some(min) = rules.min_length {
            checks.push(format!(
                "trestle_runtime::validate::min_length({name_lit}, {value}, {min}, &mut errors);"
            ));
        }
        if let Some(max) = rules.max_length {
            checks.push(format!(
                "trestle_runtime::validate::max_length({name_lit}, {value}, {max}, &mut errors);"
            ));
        }
        if let Some(pattern) = &rules.pattern {
            checks.push(format!(
                "trestle_runtime::validate::pattern({name_lit}, {value}, {}, &mut errors);",
                literal(pattern)
            ));
        }
        let allowed: Vec<String> = rules
            .enum_values
            .iter()
            .filter_map(|v| v.as_str().map(literal))
            .collect();
        if !allowed.is_empty() {
            checks.push(format!(
                "trestle_runtime::validate::one_of({name_lit}, {value}, &[{}], &mut errors);",
                allowed.join(", ")
            ));
        }
    }
    if matches!(primitive, Primitive::Integer | Primitive::Float) {
        let value = match (primitive, concrete) {
            (Primitive::Integer, true) => format!("{ident} as f64"),
            (Primitive::Integer, false) => "*value as f64".to_string(),
            (_, true) => ident.to_string(),
            (_, false) => "*value".to_string(),
        };
        if let Some(min) = rules.minimum {
            checks.push(format!(
                "trestle_runtime::validate::minimum({name_lit}, {value}, {min:?}, &mut errors);"
            ));
        }
        if let Some(max) = rules.maximum {
            checks.push(format!(
                "trestle_runtime::validate::maximum({name_lit}, {value}, {max:?}, &mut errors);"
            ));
        }
    }
    if checks.is_empty() {
        return;
    }
    if concrete {
        lines.extend(checks);
    } else {
        lines.push(format!("if let Some(ref value) = {ident} {{"));
        for check in checks {
            lines.push(format!("    {check}"));
        }
        lines.push("}".to_string());
    }
}

/// Build one response sender.
fn responder(
    action: &LinkedAction,
    response: &ResponseDefinition,
    api: &LinkedApi,
    media_uses: &mut BTreeSet<String>,
) -> Result<Fn, GenerationError> {
    let fn_name = safe_field(&response.name);
    let status = response.status;

    let mut f = Fn::new(fn_name)
        .param(Param::new("&self", ""))
        .param(Param::new("resp", "&mut trestle_runtime::Response"))
        .returns("trestle_runtime::Outcome");

    match &response.media_type {
        Some(identifier) => {
            let media_type = api.media_type(identifier).ok_or_else(|| {
                // The linker resolves every reference before writers run.
                GenerationError::Render {
                    artifact: "contexts".to_string(),
                    detail: format!(
                        "unresolved media type '{identifier}' on response '{}' of action '{}'",
                        response.name, action.name
                    ),
                }
            })?;
            f = f.doc(format!(
                "Send a {status} '{}' response with the '{identifier}' media type.",
                response.name
            ));
            f = f.body_line(format!(
                "resp.set_header(\"Content-Type\", {});",
                literal(identifier)
            ));
            if media_type.is_builtin() {
                f = f
                    .param(Param::new("body", "&str"))
                    .body_line(format!("resp.send_text({status}, body)"));
            } else {
                let type_name = to_pascal_case(&media_type.name);
                media_uses.insert(type_name.clone());
                f = f
                    .param(Param::new("body", format!("&{type_name}")))
                    .body_line(format!("resp.send({status}, body)"));
            }
        }
        None => {
            f = f
                .doc(format!("Send an empty {status} '{}' response.", response.name))
                .body_line(format!("resp.send_empty({status})"));
        }
    }

    Ok(f)
}

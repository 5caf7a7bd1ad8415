//! The media types artifact: one data structure per non-built-in media
//! type, plus projection structs for named views.

use std::collections::BTreeSet;

use trestle_design::{AttributeDefinition, AttributeType, LinkedApi, MediaTypeDefinition};

use crate::ast::{Field, Fn, Impl, Param, Struct};
use crate::code_builder::CodeBuilder;
use crate::error::GenerationError;
use crate::naming::{Names, safe_field};
use crate::rust_file::{RustFile, Use};

use super::{Artifact, field_type, header, literal, rust_type};

/// Writer for `media_types.rs`.
pub struct MediaTypesFile;

impl Artifact for MediaTypesFile {
    fn file_name(&self) -> &'static str {
        "media_types.rs"
    }

    fn render(&self, api: &LinkedApi, names: &mut Names) -> Result<String, GenerationError> {
        let mut file = RustFile::new();
        let mut chunks = Vec::new();
        let mut any_struct = false;
        let mut user_type_uses = BTreeSet::new();

        for media_type in api.media_types.values() {
            if media_type.is_builtin() {
                continue;
            }
            match &media_type.attribute.ty {
                AttributeType::Object(_) => {
                    any_struct = true;
                    chunks.push(media_struct(media_type, api, names, &mut user_type_uses)?);
                }
                AttributeType::Array(element) => {
                    collect_user_types(element, api, &mut user_type_uses);
                    chunks.push(media_alias(media_type, names, element)?);
                }
                // Scalar and map shapes have no marshaling code to generate.
                _ => continue,
            }
        }

        if any_struct {
            file = file.use_stmt(Use::new("serde").symbols(["Deserialize", "Serialize"]));
        }
        if !user_type_uses.is_empty() {
            file = file.use_stmt(Use::new("super::user_types").symbols(user_type_uses));
        }
        for chunk in chunks {
            file = file.add(chunk);
        }
        Ok(file.render_with_header(&header(api, "application media types")))
    }
}

/// Record user types referenced by an attribute so the file can import them.
fn collect_user_types(attr: &AttributeDefinition, api: &LinkedApi, uses: &mut BTreeSet<String>) {
    match &attr.ty {
        AttributeType::UserType(name) => {
            if api.user_type(name).is_some() {
                uses.insert(trestle_core::to_pascal_case(name));
            }
        }
        AttributeType::Array(element) | AttributeType::Map(element) => {
            collect_user_types(element, api, uses);
        }
        AttributeType::Object(fields) => {
            for field in fields.values() {
                collect_user_types(field, api, uses);
            }
        }
        AttributeType::Primitive(_) => {}
    }
}

/// Struct + identifier + view projections for an object-shaped media type.
fn media_struct(
    media_type: &MediaTypeDefinition,
    api: &LinkedApi,
    names: &mut Names,
    user_type_uses: &mut BTreeSet<String>,
) -> Result<String, GenerationError> {
    let type_name = names.media_type(&media_type.name, &media_type.identifier)?;
    let Some(fields) = media_type.attribute.ty.as_object() else {
        return Err(GenerationError::Render {
            artifact: "media_types".to_string(),
            detail: format!(
                "media type '{}' lost its object shape",
                media_type.identifier
            ),
        });
    };
    if fields.is_empty() {
        return Err(GenerationError::InvalidShape {
            entity: format!("media type '{}'", media_type.identifier),
            reason: "object shape declares no fields".to_string(),
        });
    }
    collect_user_types(&media_type.attribute, api, user_type_uses);

    let mut builder = CodeBuilder::new();
    builder = data_struct(
        &type_name,
        media_type
            .description
            .clone()
            .unwrap_or_else(|| format!("The '{}' media type.", media_type.identifier)),
        fields,
        &media_type.attribute.validation.required,
        None,
    )
    .render(builder);

    let mut block = Impl::new(&type_name).assoc_const(
        "IDENTIFIER",
        "&'static str",
        literal(&media_type.identifier),
    );

    let mut view_structs = Vec::new();
    for view in &media_type.views {
        if view.name == "default" {
            continue;
        }
        for field in &view.fields {
            if !fields.contains_key(field) {
                return Err(GenerationError::InvalidShape {
                    entity: format!(
                        "view '{}' of media type '{}'",
                        view.name, media_type.identifier
                    ),
                    reason: format!("projects unknown field '{field}'"),
                });
            }
        }
        let view_name = names.view(&media_type.name, &view.name, &media_type.identifier)?;
        view_structs.push(data_struct(
            &view_name,
            format!(
                "The '{}' view of the '{}' media type.",
                view.name, media_type.identifier
            ),
            fields,
            &media_type.attribute.validation.required,
            Some(&view.fields),
        ));

        let assignments = view
            .fields
            .iter()
            .map(|field| {
                let ident = safe_field(field);
                format!("    {ident}: self.{ident}.clone(),")
            })
            .collect::<Vec<_>>()
            .join("\n");
        block = block.method(
            Fn::new(safe_field(&view.name))
                .doc(format!("Project this value through the '{}' view.", view.name))
                .param(Param::new("&self", ""))
                .returns(view_name.clone())
                .body(format!("{view_name} {{\n{assignments}\n}}")),
        );
    }

    builder = builder.blank();
    builder = block.render(builder);
    for view_struct in view_structs {
        builder = builder.blank();
        builder = view_struct.render(builder);
    }
    Ok(builder.build())
}

/// Serde-derived data struct for an object shape, optionally projected to
/// a subset of fields.
fn data_struct(
    type_name: &str,
    doc: String,
    fields: &indexmap::IndexMap<String, AttributeDefinition>,
    required: &[String],
    projection: Option<&[String]>,
) -> Struct {
    let mut s = Struct::new(type_name)
        .doc(doc)
        .derive("Debug")
        .derive("Clone")
        .derive("Serialize")
        .derive("Deserialize");

    for (name, field_attr) in fields {
        if let Some(projected) = projection {
            if !projected.contains(name) {
                continue;
            }
        }
        let ident = safe_field(name);
        let mut field = Field::new(
            ident.clone(),
            field_type(field_attr, required.contains(name)),
        );
        if let Some(desc) = &field_attr.description {
            field = field.doc(desc.clone());
        }
        if ident.trim_start_matches("r#") != name {
            field = field.attr(format!("serde(rename = {})", literal(name)));
        }
        s = s.field(field);
    }
    s
}

/// Type alias + identifier constant for an array-shaped media type.
fn media_alias(
    media_type: &MediaTypeDefinition,
    names: &mut Names,
    element: &AttributeDefinition,
) -> Result<String, GenerationError> {
    let type_name = names.media_type(&media_type.name, &media_type.identifier)?;
    let const_name = format!(
        "{}_IDENTIFIER",
        trestle_core::to_snake_case(&media_type.name).to_uppercase()
    );
    let builder = CodeBuilder::new()
        .rust_doc(&format!("The '{}' media type.", media_type.identifier))
        .line(&format!("pub type {type_name} = Vec<{}>;", rust_type(element)))
        .blank()
        .rust_doc(&format!("MIME identifier of [`{type_name}`]."))
        .line(&format!(
            "pub const {const_name}: &str = {};",
            literal(&media_type.identifier)
        ));
    Ok(builder.build())
}

//! The user types artifact: one data structure or type alias per user
//! type.

use trestle_design::{AttributeType, LinkedApi, UserTypeDefinition};

use crate::code_builder::CodeBuilder;
use crate::error::GenerationError;
use crate::naming::{Names, safe_field};
use crate::rust_file::{RustFile, Use};

use super::{Artifact, field_type, header, literal, rust_type};

/// Writer for `user_types.rs`.
pub struct UserTypesFile;

impl Artifact for UserTypesFile {
    fn file_name(&self) -> &'static str {
        "user_types.rs"
    }

    fn render(&self, api: &LinkedApi, names: &mut Names) -> Result<String, GenerationError> {
        let mut file = RustFile::new();
        let mut chunks = Vec::new();
        let mut any_struct = false;

        for user_type in api.user_types.values() {
            let type_name = names.user_type(&user_type.name)?;
            match &user_type.attribute.ty {
                AttributeType::Object(_) => {
                    any_struct = true;
                    chunks.push(user_struct(&type_name, user_type)?);
                }
                _ => chunks.push(user_alias(&type_name, user_type)),
            }
        }

        if any_struct {
            file = file.use_stmt(Use::new("serde").symbols(["Deserialize", "Serialize"]));
        }
        for chunk in chunks {
            file = file.add(chunk);
        }
        Ok(file.render_with_header(&header(api, "application user types")))
    }
}

fn user_struct(type_name: &str, user_type: &UserTypeDefinition) -> Result<String, GenerationError> {
    let Some(fields) = user_type.attribute.ty.as_object() else {
        return Err(GenerationError::Render {
            artifact: "user_types".to_string(),
            detail: format!("user type '{}' lost its object shape", user_type.name),
        });
    };
    if fields.is_empty() {
        return Err(GenerationError::InvalidShape {
            entity: format!("user type '{}'", user_type.name),
            reason: "object shape declares no fields".to_string(),
        });
    }

    let mut s = crate::ast::Struct::new(type_name)
        .doc(
            user_type
                .description
                .clone()
                .unwrap_or_else(|| format!("The {} user type.", user_type.name)),
        )
        .derive("Debug")
        .derive("Clone")
        .derive("Serialize")
        .derive("Deserialize");

    for (name, field_attr) in fields {
        let ident = safe_field(name);
        let mut field = crate::ast::Field::new(
            ident.clone(),
            field_type(field_attr, user_type.attribute.is_required(name)),
        );
        if let Some(desc) = &field_attr.description {
            field = field.doc(desc.clone());
        }
        if ident.trim_start_matches("r#") != name {
            field = field.attr(format!("serde(rename = {})", literal(name)));
        }
        s = s.field(field);
    }
    Ok(s.build())
}

fn user_alias(type_name: &str, user_type: &UserTypeDefinition) -> String {
    let doc = user_type
        .description
        .clone()
        .unwrap_or_else(|| format!("The {} user type.", user_type.name));
    CodeBuilder::new()
        .rust_doc(&doc)
        .line(&format!(
            "pub type {type_name} = {};",
            rust_type(&user_type.attribute)
        ))
        .build()
}

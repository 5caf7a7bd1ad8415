//! Rust struct builder.

use crate::code_builder::CodeBuilder;

/// A field in a generated struct.
#[derive(Debug, Clone)]
pub struct Field {
    pub name: String,
    pub ty: String,
    pub doc: Option<String>,
    pub attrs: Vec<String>,
}

impl Field {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            doc: None,
            attrs: Vec::new(),
        }
    }

    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    pub fn attr(mut self, attr: impl Into<String>) -> Self {
        self.attrs.push(attr.into());
        self
    }
}

/// Builder for generated structs.
#[derive(Debug, Clone)]
pub struct Struct {
    name: String,
    doc: Option<String>,
    derives: Vec<String>,
    fields: Vec<Field>,
}

impl Struct {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            doc: None,
            derives: Vec::new(),
            fields: Vec::new(),
        }
    }

    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    pub fn derive(mut self, derive: impl Into<String>) -> Self {
        self.derives.push(derive.into());
        self
    }

    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    /// Render the struct to a CodeBuilder.
    pub fn render(&self, builder: CodeBuilder) -> CodeBuilder {
        let builder = match &self.doc {
            Some(doc) => builder.rust_doc(doc),
            None => builder,
        };
        let builder = if self.derives.is_empty() {
            builder
        } else {
            builder.line(&format!("#[derive({})]", self.derives.join(", ")))
        };

        if self.fields.is_empty() {
            return builder.line(&format!("pub struct {};", self.name));
        }

        let mut builder = builder.line(&format!("pub struct {} {{", self.name)).indent();
        for field in &self.fields {
            if let Some(doc) = &field.doc {
                builder = builder.rust_doc(doc);
            }
            for attr in &field.attrs {
                builder = builder.line(&format!("#[{attr}]"));
            }
            builder = builder.line(&format!("pub {}: {},", field.name, field.ty));
        }
        builder.dedent().line("}")
    }

    /// Build the struct as a string.
    pub fn build(&self) -> String {
        self.render(CodeBuilder::new()).build()
    }
}

//! Rust trait builder.

use crate::code_builder::CodeBuilder;

use super::Fn;

/// Builder for trait definitions; methods render as signatures only.
#[derive(Debug, Clone)]
pub struct TraitDef {
    name: String,
    doc: Option<String>,
    supertraits: Vec<String>,
    methods: Vec<Fn>,
}

impl TraitDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            doc: None,
            supertraits: Vec::new(),
            methods: Vec::new(),
        }
    }

    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    pub fn supertrait(mut self, name: impl Into<String>) -> Self {
        self.supertraits.push(name.into());
        self
    }

    pub fn method(mut self, method: Fn) -> Self {
        self.methods.push(method);
        self
    }

    /// Render the trait to a CodeBuilder.
    pub fn render(&self, builder: CodeBuilder) -> CodeBuilder {
        let builder = match &self.doc {
            Some(doc) => builder.rust_doc(doc),
            None => builder,
        };
        let header = if self.supertraits.is_empty() {
            format!("pub trait {} {{", self.name)
        } else {
            format!("pub trait {}: {} {{", self.name, self.supertraits.join(" + "))
        };
        let mut builder = builder.line(&header).indent();
        for (i, method) in self.methods.iter().enumerate() {
            if i > 0 {
                builder = builder.blank();
            }
            builder = method.render_declaration(builder);
        }
        builder.dedent().line("}")
    }

    /// Build the trait as a string.
    pub fn build(&self) -> String {
        self.render(CodeBuilder::new()).build()
    }
}

//! Rust impl block builder.

use crate::code_builder::CodeBuilder;

use super::Fn;

/// An associated constant in an impl block.
#[derive(Debug, Clone)]
struct AssocConst {
    name: String,
    ty: String,
    value: String,
}

/// Builder for impl blocks.
#[derive(Debug, Clone)]
pub struct Impl {
    type_name: String,
    trait_name: Option<String>,
    consts: Vec<AssocConst>,
    methods: Vec<Fn>,
}

impl Impl {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            trait_name: None,
            consts: Vec::new(),
            methods: Vec::new(),
        }
    }

    /// Make this an impl block for a trait.
    pub fn for_trait(mut self, trait_name: impl Into<String>) -> Self {
        self.trait_name = Some(trait_name.into());
        self
    }

    /// Add an associated constant.
    pub fn assoc_const(
        mut self,
        name: impl Into<String>,
        ty: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.consts.push(AssocConst {
            name: name.into(),
            ty: ty.into(),
            value: value.into(),
        });
        self
    }

    pub fn method(mut self, method: Fn) -> Self {
        self.methods.push(method);
        self
    }

    /// Render the impl block to a CodeBuilder.
    pub fn render(&self, builder: CodeBuilder) -> CodeBuilder {
        let header = match &self.trait_name {
            Some(trait_name) => format!("impl {} for {} {{", trait_name, self.type_name),
            None => format!("impl {} {{", self.type_name),
        };
        let mut builder = builder.line(&header).indent();

        for (i, c) in self.consts.iter().enumerate() {
            if i > 0 {
                builder = builder.blank();
            }
            builder = builder.line(&format!("pub const {}: {} = {};", c.name, c.ty, c.value));
        }
        for (i, method) in self.methods.iter().enumerate() {
            if i > 0 || !self.consts.is_empty() {
                builder = builder.blank();
            }
            builder = method.render(builder);
        }

        builder.dedent().line("}")
    }

    /// Build the impl block as a string.
    pub fn build(&self) -> String {
        self.render(CodeBuilder::new()).build()
    }
}

//! Rust function builder.

use crate::code_builder::CodeBuilder;

/// A parameter in a generated function.
#[derive(Debug, Clone)]
pub struct Param {
    pub name: String,
    pub ty: String,
}

impl Param {
    /// Create a parameter. An empty type renders just the name, which is
    /// how receivers like `&self` are expressed.
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
        }
    }
}

/// Builder for generated functions and methods.
#[derive(Debug, Clone)]
pub struct Fn {
    name: String,
    doc: Option<String>,
    attrs: Vec<String>,
    is_public: bool,
    generics: Vec<String>,
    params: Vec<Param>,
    return_type: Option<String>,
    where_bounds: Vec<String>,
    body: Vec<String>,
}

impl Fn {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            doc: None,
            attrs: Vec::new(),
            is_public: true,
            generics: Vec::new(),
            params: Vec::new(),
            return_type: None,
            where_bounds: Vec::new(),
            body: Vec::new(),
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

    pub fn private(mut self) -> Self {
        self.is_public = false;
        self
    }

    pub fn generic(mut self, name: impl Into<String>) -> Self {
        self.generics.push(name.into());
        self
    }

    pub fn param(mut self, param: Param) -> Self {
        self.params.push(param);
        self
    }

    pub fn returns(mut self, ty: impl Into<String>) -> Self {
        self.return_type = Some(ty.into());
        self
    }

    /// Add a `where` clause bound.
    pub fn where_bound(mut self, bound: impl Into<String>) -> Self {
        self.where_bounds.push(bound.into());
        self
    }

    /// Add a line to the function body.
    pub fn body_line(mut self, line: impl Into<String>) -> Self {
        self.body.push(line.into());
        self
    }

    /// Add raw body content (can contain multiple lines).
    pub fn body(mut self, content: impl Into<String>) -> Self {
        for line in content.into().lines() {
            self.body.push(line.to_string());
        }
        self
    }

    fn signature(&self) -> String {
        let vis = if self.is_public { "pub " } else { "" };
        let generics = if self.generics.is_empty() {
            String::new()
        } else {
            format!("<{}>", self.generics.join(", "))
        };
        let params = self
            .params
            .iter()
            .map(|p| {
                if p.ty.is_empty() {
                    p.name.clone()
                } else {
                    format!("{}: {}", p.name, p.ty)
                }
            })
            .collect::<Vec<_>>()
            .join(", ");
        match &self.return_type {
            Some(ret) => format!("{vis}fn {}{generics}({params}) -> {ret}", self.name),
            None => format!("{vis}fn {}{generics}({params})", self.name),
        }
    }

    /// Render a signature-only declaration, as in a trait definition.
    pub fn render_declaration(&self, builder: CodeBuilder) -> CodeBuilder {
        let builder = match &self.doc {
            Some(doc) => builder.rust_doc(doc),
            None => builder,
        };
        // Trait declarations drop the visibility qualifier.
        let signature = self.signature();
        let signature = signature.strip_prefix("pub ").unwrap_or(&signature);
        builder.line(&format!("{signature};"))
    }

    /// Render the full function to a CodeBuilder.
    pub fn render(&self, builder: CodeBuilder) -> CodeBuilder {
        let builder = match &self.doc {
            Some(doc) => builder.rust_doc(doc),
            None => builder,
        };
        let builder = self
            .attrs
            .iter()
            .fold(builder, |b, attr| b.line(&format!("#[{attr}]")));

        let signature = self.signature();
        let builder = if self.where_bounds.is_empty() {
            builder.line(&format!("{signature} {{"))
        } else {
            let mut b = builder.line(&signature).line("where").indent();
            for bound in &self.where_bounds {
                b = b.line(&format!("{bound},"));
            }
            b.dedent().line("{")
        };

        let builder = self.body.iter().fold(builder.indent(), |b, line| {
            if line.is_empty() {
                b.blank()
            } else {
                b.line(line)
            }
        });

        builder.dedent().line("}")
    }

    /// Build the function as a string.
    pub fn build(&self) -> String {
        self.render(CodeBuilder::new()).build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_fn() {
        let f = Fn::new("widget_href")
            .param(Param::new("id", "impl std::fmt::Display"))
            .returns("String")
            .body_line("format!(\"/widgets/{}\", id)")
            .build();
        assert!(f.contains("pub fn widget_href(id: impl std::fmt::Display) -> String {"));
        assert!(f.contains("    format!(\"/widgets/{}\", id)"));
    }

    #[test]
    fn test_method_receiver() {
        let f = Fn::new("ok")
            .param(Param::new("&self", ""))
            .param(Param::new("resp", "&mut Response"))
            .build();
        assert!(f.contains("pub fn ok(&self, resp: &mut Response) {"));
    }

    #[test]
    fn test_where_clause() {
        let f = Fn::new("mount")
            .generic("C")
            .param(Param::new("ctrl", "Arc<C>"))
            .where_bound("C: Controller + Send + Sync + 'static")
            .build();
        assert!(f.contains("pub fn mount<C>(ctrl: Arc<C>)\n"));
        assert!(f.contains("where\n    C: Controller + Send + Sync + 'static,\n{"));
    }

    #[test]
    fn test_declaration_drops_visibility() {
        let code = Fn::new("get")
            .param(Param::new("&self", ""))
            .returns("Outcome")
            .render_declaration(CodeBuilder::new())
            .build();
        assert_eq!(code, "fn get(&self) -> Outcome;\n");
    }
}

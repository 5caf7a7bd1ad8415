//! Assembly of generated source files from rendered chunks.

/// A use statement in a generated file.
#[derive(Debug, Clone)]
pub struct Use {
    module: String,
    symbols: Vec<String>,
}

impl Use {
    /// Create a use statement for a module.
    pub fn new(module: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            symbols: Vec::new(),
        }
    }

    /// Add a symbol to import from the module.
    pub fn symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbols.push(symbol.into());
        self
    }

    /// Add multiple symbols to import.
    pub fn symbols(mut self, symbols: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.symbols.extend(symbols.into_iter().map(Into::into));
        self
    }

    fn format(&self) -> String {
        if self.symbols.is_empty() {
            format!("use {};", self.module)
        } else if self.symbols.len() == 1 {
            format!("use {}::{};", self.module, self.symbols[0])
        } else {
            format!("use {}::{{{}}};", self.module, self.symbols.join(", "))
        }
    }
}

/// A generated source file: a header, use statements, and body chunks
/// separated by blank lines.
#[derive(Debug, Clone, Default)]
pub struct RustFile {
    uses: Vec<Use>,
    body: Vec<String>,
}

impl RustFile {
    /// Create an empty file.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a use statement.
    pub fn use_stmt(mut self, use_stmt: Use) -> Self {
        self.uses.push(use_stmt);
        self
    }

    /// Add a pre-rendered body chunk.
    pub fn add(mut self, chunk: impl Into<String>) -> Self {
        let chunk = chunk.into();
        if !chunk.trim().is_empty() {
            self.body.push(chunk);
        }
        self
    }

    /// Whether the file has any uses or body content.
    pub fn is_empty(&self) -> bool {
        self.uses.is_empty() && self.body.is_empty()
    }

    /// Render the file with a header comment.
    pub fn render_with_header(&self, header: &str) -> String {
        let mut out = String::new();
        out.push_str(header.trim_end());
        out.push('\n');
        if !self.uses.is_empty() {
            out.push('\n');
            for use_stmt in &self.uses {
                out.push_str(&use_stmt.format());
                out.push('\n');
            }
        }
        for chunk in &self.body {
            out.push('\n');
            out.push_str(chunk.trim_end());
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_use_formats() {
        assert_eq!(Use::new("serde").format(), "use serde;");
        assert_eq!(Use::new("serde").symbol("Serialize").format(), "use serde::Serialize;");
        assert_eq!(
            Use::new("serde").symbols(["Deserialize", "Serialize"]).format(),
            "use serde::{Deserialize, Serialize};"
        );
    }

    #[test]
    fn test_header_only_file() {
        let file = RustFile::new();
        assert!(file.is_empty());
        assert_eq!(file.render_with_header("// header"), "// header\n");
    }

    #[test]
    fn test_chunks_separated_by_blank_lines() {
        let file = RustFile::new()
            .use_stmt(Use::new("serde").symbol("Serialize"))
            .add("pub struct Foo;\n")
            .add("pub struct Bar;\n");
        let code = file.render_with_header("// header");
        assert_eq!(
            code,
            "// header\n\nuse serde::Serialize;\n\npub struct Foo;\n\npub struct Bar;\n"
        );
    }

    #[test]
    fn test_empty_chunks_are_dropped() {
        let file = RustFile::new().add("").add("\n");
        assert!(file.is_empty());
    }
}

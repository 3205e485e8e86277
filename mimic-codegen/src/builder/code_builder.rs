//! Code builder utility for generating properly indented Go.

use super::Indent;

/// Line-oriented buffer that tracks the current indentation.
///
/// # Example
///
/// ```
/// use mimic_codegen::builder::CodeBuilder;
///
/// let mut b = CodeBuilder::go();
/// b.push_line("func main() {");
/// b.push_indent().push_line("println(\"hello\")");
/// b.push_dedent().push_line("}");
///
/// assert_eq!(b.build(), "func main() {\n\tprintln(\"hello\")\n}\n");
/// ```
#[derive(Debug, Clone)]
pub struct CodeBuilder {
    indent_level: usize,
    indent: Indent,
    buffer: String,
}

impl CodeBuilder {
    /// Create a new CodeBuilder with the specified indentation.
    pub fn new(indent: Indent) -> Self {
        Self {
            indent_level: 0,
            indent,
            buffer: String::new(),
        }
    }

    /// Tab indentation, as `gofmt` writes it.
    pub fn go() -> Self {
        Self::new(Indent::Tab)
    }

    /// Add a line of code with current indentation.
    pub fn push_line(&mut self, s: &str) -> &mut Self {
        if !s.is_empty() {
            self.write_indent();
            self.buffer.push_str(s);
        }
        self.buffer.push('\n');
        self
    }

    /// Add a blank line.
    pub fn push_blank(&mut self) -> &mut Self {
        self.buffer.push('\n');
        self
    }

    /// Add a `//` comment line.
    pub fn push_comment(&mut self, text: &str) -> &mut Self {
        self.write_indent();
        self.buffer.push_str("// ");
        self.buffer.push_str(text);
        self.buffer.push('\n');
        self
    }

    pub fn push_indent(&mut self) -> &mut Self {
        self.indent_level += 1;
        self
    }

    pub fn push_dedent(&mut self) -> &mut Self {
        self.indent_level = self.indent_level.saturating_sub(1);
        self
    }

    /// Consume the builder and return the generated code.
    pub fn build(self) -> String {
        self.buffer
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent_level {
            self.buffer.push_str(self.indent.as_str());
        }
    }
}

impl Default for CodeBuilder {
    fn default() -> Self {
        Self::go()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_block() {
        let mut b = CodeBuilder::go();
        b.push_line("type Mock struct {");
        b.push_indent()
            .push_line("fail func(message string, callerSkip ...int)");
        b.push_dedent().push_line("}");
        assert_eq!(
            b.build(),
            "type Mock struct {\n\tfail func(message string, callerSkip ...int)\n}\n"
        );
    }

    #[test]
    fn test_empty_line_has_no_trailing_indent() {
        let mut b = CodeBuilder::go();
        b.push_indent().push_line("a").push_line("").push_line("b");
        assert_eq!(b.build(), "\ta\n\n\tb\n");
    }

    #[test]
    fn test_comment_is_indented() {
        let mut b = CodeBuilder::new(Indent::Spaces(2));
        b.push_indent().push_comment("nothing to do").push_blank();
        assert_eq!(b.build(), "  // nothing to do\n\n");
    }

    #[test]
    fn test_dedent_saturates() {
        let mut b = CodeBuilder::go();
        b.push_dedent().push_line("x");
        assert_eq!(b.build(), "x\n");
    }
}

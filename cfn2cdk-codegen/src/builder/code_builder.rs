//! Line buffer for generated source files.

use super::Indent;

/// Accumulates generated source line by line at a tracked indentation level.
///
/// ```
/// use cfn2cdk_codegen::builder::{CodeBuilder, Indent};
///
/// let mut builder = CodeBuilder::new(Indent::FOUR);
/// builder
///     .push_line("class AppStack(cdk.Stack):")
///     .push_indent()
///     .push_line("pass");
/// assert_eq!(builder.build(), "class AppStack(cdk.Stack):\n    pass\n");
/// ```
#[derive(Debug, Clone)]
pub struct CodeBuilder {
    indent_level: usize,
    indent: Indent,
    buffer: String,
}

impl CodeBuilder {
    pub fn new(indent: Indent) -> Self {
        Self {
            indent_level: 0,
            indent,
            buffer: String::new(),
        }
    }

    /// Add a line at the current indentation. Empty lines carry no
    /// trailing whitespace.
    pub fn push_line(&mut self, s: &str) -> &mut Self {
        if s.is_empty() {
            return self.push_blank();
        }
        for _ in 0..self.indent_level {
            self.buffer.push_str(self.indent.as_str());
        }
        self.buffer.push_str(s);
        self.buffer.push('\n');
        self
    }

    pub fn push_blank(&mut self) -> &mut Self {
        self.buffer.push('\n');
        self
    }

    /// Append already indented text verbatim.
    pub fn push_raw(&mut self, s: &str) -> &mut Self {
        self.buffer.push_str(s);
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

    /// Add a multi-line fragment at the current indentation.
    ///
    /// `prefix` is prepended to the first line and `suffix` appended to the
    /// last. Lines after the first keep their own relative indentation, as
    /// produced by rendering a value at depth 0.
    pub fn push_multiline(&mut self, prefix: &str, text: &str, suffix: &str) -> &mut Self {
        let mut lines = text.split('\n').peekable();
        let mut first = true;
        while let Some(line) = lines.next() {
            let mut out = String::new();
            if first {
                out.push_str(prefix);
                first = false;
            }
            out.push_str(line);
            if lines.peek().is_none() {
                out.push_str(suffix);
            }
            self.push_line(&out);
        }
        self
    }

    pub fn build(self) -> String {
        self.buffer
    }

    pub fn as_str(&self) -> &str {
        &self.buffer
    }
}

impl Default for CodeBuilder {
    fn default() -> Self {
        Self::new(Indent::default())
    }
}

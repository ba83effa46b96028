//! Output sink with automatic indentation.

/// Text buffer that prefixes every line it starts with the current indent.
#[derive(Debug, Clone)]
pub struct IndentedWriter {
    output: String,
    indent_unit: String,
    indent: usize,
    at_line_start: bool,
}

impl IndentedWriter {
    pub fn new(indent_unit: impl Into<String>) -> Self {
        Self {
            output: String::new(),
            indent_unit: indent_unit.into(),
            indent: 0,
            at_line_start: true,
        }
    }

    /// Write text. Embedded newlines start new lines, which get indented
    /// lazily once something is written on them; blank lines stay empty.
    pub fn write(&mut self, s: &str) {
        let mut lines = s.split('\n');
        if let Some(first) = lines.next() {
            self.write_segment(first);
        }
        for line in lines {
            self.newline();
            self.write_segment(line);
        }
    }

    pub fn writeln(&mut self, s: &str) {
        self.write(s);
        self.newline();
    }

    pub fn newline(&mut self) {
        self.output.push('\n');
        self.at_line_start = true;
    }

    pub fn indent(&mut self) {
        self.indent += 1;
    }

    pub fn dedent(&mut self) {
        self.indent = self.indent.saturating_sub(1);
    }

    pub fn indent_level(&self) -> usize {
        self.indent
    }

    pub fn set_indent_level(&mut self, level: usize) {
        self.indent = level;
    }

    pub fn at_line_start(&self) -> bool {
        self.at_line_start
    }

    pub fn as_str(&self) -> &str {
        &self.output
    }

    pub fn into_string(self) -> String {
        self.output
    }

    fn write_segment(&mut self, segment: &str) {
        if segment.is_empty() {
            return;
        }
        if self.at_line_start {
            self.write_indent();
            self.at_line_start = false;
        }
        self.output.push_str(segment);
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent {
            self.output.push_str(&self.indent_unit);
        }
    }
}

impl Default for IndentedWriter {
    fn default() -> Self {
        Self::new("    ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indents_each_new_line() {
        let mut w = IndentedWriter::new("  ");
        w.writeln("class A {");
        w.indent();
        w.write("int x;\nint y;");
        w.newline();
        w.dedent();
        w.writeln("}");
        assert_eq!(w.into_string(), "class A {\n  int x;\n  int y;\n}\n");
    }

    #[test]
    fn test_blank_lines_are_not_indented() {
        let mut w = IndentedWriter::default();
        w.indent();
        w.writeln("a");
        w.newline();
        w.writeln("b");
        assert_eq!(w.as_str(), "    a\n\n    b\n");
    }

    #[test]
    fn test_dedent_saturates() {
        let mut w = IndentedWriter::default();
        w.dedent();
        assert_eq!(w.indent_level(), 0);
        w.writeln("x");
        assert_eq!(w.as_str(), "x\n");
    }
}

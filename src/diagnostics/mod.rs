//! Diagnostics reported by the external compiler.

mod collector;
mod parser;

pub use collector::DiagnosticCollector;
pub use parser::parse_line;

use colored::Colorize;
use std::fmt;

/// Severity level of a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticLevel {
    Error,
    Warning,
}

impl fmt::Display for DiagnosticLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticLevel::Error => write!(f, "{}", "error".red().bold()),
            DiagnosticLevel::Warning => write!(f, "{}", "warning".yellow().bold()),
        }
    }
}

/// One error or warning line from the compiler
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub file: String,
    /// 1-based, 0 when not reported
    pub line: usize,
    /// 1-based, 0 when not reported
    pub column: usize,
    pub level: DiagnosticLevel,
    /// Compiler-specific code such as `CS0001`, possibly empty
    pub code: String,
    pub message: String,
}

impl Diagnostic {
    pub fn error(file: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            line: 0,
            column: 0,
            level: DiagnosticLevel::Error,
            code: String::new(),
            message: message.into(),
        }
    }

    pub fn warning(file: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: DiagnosticLevel::Warning,
            ..Self::error(file, message)
        }
    }

    pub fn with_position(mut self, line: usize, column: usize) -> Self {
        self.line = line;
        self.column = column;
        self
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = code.into();
        self
    }

    pub fn is_error(&self) -> bool {
        matches!(self.level, DiagnosticLevel::Error)
    }

    pub fn is_warning(&self) -> bool {
        matches!(self.level, DiagnosticLevel::Warning)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // foo.cs(10,5): error CS0001: message
        match (self.line, self.column) {
            (0, _) => write!(f, "{}", self.file.blue())?,
            (line, 0) => write!(f, "{}", format!("{}({line})", self.file).blue())?,
            (line, column) => write!(f, "{}", format!("{}({line},{column})", self.file).blue())?,
        }
        write!(f, ": {}", self.level)?;
        if !self.code.is_empty() {
            write!(f, " {}", self.code.cyan())?;
        }
        write!(f, ": {}", self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        colored::control::set_override(false);
        let diagnostic = Diagnostic::error("foo.cs", "bad thing").with_position(10, 5).with_code("CS0001");
        assert_eq!(diagnostic.to_string(), "foo.cs(10,5): error CS0001: bad thing");

        let diagnostic = Diagnostic::warning("foo.cs", "unused variable").with_position(10, 0);
        assert_eq!(diagnostic.to_string(), "foo.cs(10): warning: unused variable");

        let diagnostic = Diagnostic::error("libfoo.so", "no such library");
        assert_eq!(diagnostic.to_string(), "libfoo.so: error: no such library");
    }
}

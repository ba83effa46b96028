//! Collects compiler output lines and the diagnostics parsed from them.

use super::{parse_line, Diagnostic};

#[derive(Debug, Default)]
pub struct DiagnosticCollector {
    lines: Vec<String>,
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a raw output line, returning the diagnostic parsed from it if any
    pub fn push_line(&mut self, line: impl Into<String>) -> Option<&Diagnostic> {
        let line = line.into();
        let parsed = parse_line(&line);
        self.lines.push(line);
        let diagnostic = parsed?;
        self.diagnostics.push(diagnostic);
        self.diagnostics.last()
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.is_error())
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }

    pub fn warning_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_warning()).count()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Consume and return the raw lines and diagnostics, in output order
    pub fn into_parts(self) -> (Vec<String>, Vec<Diagnostic>) {
        (self.lines, self.diagnostics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collects_in_order() {
        let mut collector = DiagnosticCollector::new();
        assert!(collector.push_line("a.cs(1,1): warning CS0168: unused").is_some());
        assert!(collector.push_line("").is_none());
        assert!(collector.push_line("a.cs(2,3): error CS1002: ; expected").is_some());
        assert!(collector.push_line("Compilation failed").is_none());

        assert!(collector.has_errors());
        assert_eq!(collector.error_count(), 1);
        assert_eq!(collector.warning_count(), 1);
        assert_eq!(collector.lines().len(), 4);

        let (lines, diagnostics) = collector.into_parts();
        assert_eq!(lines[3], "Compilation failed");
        assert_eq!(diagnostics[0].code, "CS0168");
        assert_eq!(diagnostics[1].message, "; expected");
    }
}

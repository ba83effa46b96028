use std::path::{Path, PathBuf};

use crate::diagnostics::Diagnostic;

/// The compiled output
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Artifact {
    InMemory(Vec<u8>),
    Path(PathBuf),
}

impl Artifact {
    pub fn path(&self) -> Option<&Path> {
        match self {
            Artifact::Path(path) => Some(path),
            Artifact::InMemory(_) => None,
        }
    }

    pub fn bytes(&self) -> Option<&[u8]> {
        match self {
            Artifact::InMemory(bytes) => Some(bytes),
            Artifact::Path(_) => None,
        }
    }
}

/// Everything one compiler run reported.
#[derive(Debug, Clone)]
pub struct CompileResult {
    /// `None` when the process was killed by a signal
    pub exit_code: Option<i32>,
    /// Raw stderr lines in order
    pub output: Vec<String>,
    pub diagnostics: Vec<Diagnostic>,
    pub artifact: Artifact,
}

impl CompileResult {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.is_error())
    }

    pub fn crashed(&self) -> bool {
        self.exit_code.is_none()
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }

    pub fn warning_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_warning()).count()
    }

    /// Clean exit and no errors reported
    pub fn succeeded(&self) -> bool {
        self.exit_code == Some(0) && !self.has_errors()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_and_status() {
        let result = CompileResult {
            exit_code: Some(1),
            output: vec![],
            diagnostics: vec![
                Diagnostic::warning("a.cs", "unused").with_position(1, 1),
                Diagnostic::error("a.cs", "missing ;").with_position(2, 9),
                Diagnostic::error("a.cs", "unknown name").with_position(3, 1),
            ],
            artifact: Artifact::Path(PathBuf::from("out.exe")),
        };
        assert!(result.has_errors());
        assert!(!result.crashed());
        assert!(!result.succeeded());
        assert_eq!(result.error_count(), 2);
        assert_eq!(result.warning_count(), 1);
        assert_eq!(result.artifact.path(), Some(Path::new("out.exe")));
        assert_eq!(result.artifact.bytes(), None);

        let killed = CompileResult {
            exit_code: None,
            diagnostics: vec![],
            ..result
        };
        assert!(killed.crashed());
        assert!(!killed.has_errors());
    }
}

//! Options for one compiler invocation.

use std::path::PathBuf;

/// What the compiler should produce
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ArtifactKind {
    #[default]
    Executable,
    Library,
}

impl ArtifactKind {
    pub fn extension(self) -> &'static str {
        match self {
            ArtifactKind::Executable => "exe",
            ArtifactKind::Library => "dll",
        }
    }
}

/// What happens to the scratch directory after a compile
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TempFilePolicy {
    #[default]
    Delete,
    Keep,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompilerOptions {
    /// Artifact path; a temporary name is chosen when unset
    pub output: Option<PathBuf>,
    pub kind: ArtifactKind,
    pub debug: bool,
    pub warnings_as_errors: bool,
    /// Any level turns on all warnings
    pub warning_level: Option<u8>,
    /// Type holding the entry point
    pub entry_type: Option<String>,
    /// Library names or paths, `.dll` suffix optional
    pub references: Vec<String>,
    pub resource: Option<PathBuf>,
    /// csc-style `/option` text, translated to the compiler's flags
    pub extra_flags: Option<String>,
    /// Load the artifact into memory instead of returning its path
    pub in_memory: bool,
    pub temp_files: TempFilePolicy,
    /// Parent of the scratch directory, defaulting to the system temp dir
    pub temp_root: Option<PathBuf>,
}

impl CompilerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn library() -> Self {
        Self {
            kind: ArtifactKind::Library,
            ..Self::default()
        }
    }

    pub fn with_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.output = Some(path.into());
        self
    }

    pub fn with_debug(mut self, enabled: bool) -> Self {
        self.debug = enabled;
        self
    }

    pub fn with_warnings_as_errors(mut self, enabled: bool) -> Self {
        self.warnings_as_errors = enabled;
        self
    }

    pub fn with_warning_level(mut self, level: u8) -> Self {
        self.warning_level = Some(level);
        self
    }

    pub fn with_entry_type(mut self, name: impl Into<String>) -> Self {
        self.entry_type = Some(name.into());
        self
    }

    pub fn with_reference(mut self, name: impl Into<String>) -> Self {
        self.add_references([name.into()]);
        self
    }

    pub fn with_resource(mut self, path: impl Into<PathBuf>) -> Self {
        self.resource = Some(path.into());
        self
    }

    pub fn with_extra_flags(mut self, flags: impl Into<String>) -> Self {
        self.extra_flags = Some(flags.into());
        self
    }

    pub fn in_memory(mut self) -> Self {
        self.in_memory = true;
        self
    }

    pub fn keep_temp_files(mut self) -> Self {
        self.temp_files = TempFilePolicy::Keep;
        self
    }

    pub fn with_temp_root(mut self, path: impl Into<PathBuf>) -> Self {
        self.temp_root = Some(path.into());
        self
    }

    /// Append references not already present, keeping first-seen order.
    pub fn add_references(&mut self, names: impl IntoIterator<Item = String>) {
        for name in names {
            if !self.references.contains(&name) {
                self.references.push(name);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_references_are_deduplicated_in_order() {
        let mut options = CompilerOptions::new().with_reference("System.Xml").with_reference("System");
        options.add_references(["System".to_string(), "Acme.Core".to_string(), "System.Xml".to_string()]);
        assert_eq!(options.references, vec!["System.Xml", "System", "Acme.Core"]);
    }

    #[test]
    fn test_artifact_extensions() {
        assert_eq!(CompilerOptions::new().kind.extension(), "exe");
        assert_eq!(CompilerOptions::library().kind.extension(), "dll");
    }
}

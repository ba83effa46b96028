//! codedom - build C# and Visual Basic programs as trees
//!
//! A tree of namespaces, types, members, statements and expressions is
//! rendered to source text by a per-language backend, and can be handed to
//! an external compiler whose diagnostics come back as structured records.

pub mod tree;
pub mod codegen;
pub mod diagnostics;
pub mod driver;

// Re-export commonly used types
pub use codegen::{CodeGenerator, GeneratorOptions, Language, RenderError};
pub use diagnostics::{Diagnostic, DiagnosticLevel};
pub use driver::{Artifact, CompileResult, Compiler, CompilerOptions, DriverError, Source};
pub use tree::CompileUnit;

//! Compiler driver: renders sources to scratch files, runs the external
//! compiler and collects its diagnostics.

mod command;
mod error;
mod options;
mod result;
mod toolchain;

pub use command::{build_arguments, join_command_line, FlagSet, RESPONSE_FILE_THRESHOLD};
pub use error::{DriverError, Result};
pub use options::{ArtifactKind, CompilerOptions, TempFilePolicy};
pub use result::{Artifact, CompileResult};
pub use toolchain::{Toolchain, COMPILER_ENV, DEFAULT_COMPILER};

use std::env;
use std::fs;
use std::io::{self, BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::process::Stdio;

use tempfile::{TempDir, TempPath};
use tracing::{debug, info};

use crate::codegen::{CodeGenerator, GeneratorOptions, Language};
use crate::diagnostics::DiagnosticCollector;
use crate::tree::CompileUnit;

/// One compilation input
#[derive(Debug, Clone)]
pub enum Source {
    /// Source text in the compiler's language
    Text(String),
    /// Existing file passed to the compiler as is
    File(PathBuf),
    /// Tree rendered with the compiler's backend
    Tree(CompileUnit),
}

/// Drives one external compiler for one language
#[derive(Debug, Clone)]
pub struct Compiler {
    language: Language,
    toolchain: Toolchain,
    flags: FlagSet,
    generator_options: GeneratorOptions,
}

impl Compiler {
    pub fn new(language: Language) -> Self {
        Self {
            language,
            toolchain: Toolchain::from_env(),
            flags: FlagSet::cscc(),
            generator_options: GeneratorOptions::default(),
        }
    }

    pub fn with_toolchain(mut self, toolchain: Toolchain) -> Self {
        self.toolchain = toolchain;
        self
    }

    pub fn with_flags(mut self, flags: FlagSet) -> Self {
        self.flags = flags;
        self
    }

    pub fn with_generator_options(mut self, options: GeneratorOptions) -> Self {
        self.generator_options = options;
        self
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn toolchain(&self) -> &Toolchain {
        &self.toolchain
    }

    /// Compile `sources` into one artifact.
    ///
    /// Problems the compiler reports come back as diagnostics in the result;
    /// the error path is reserved for failures to run it at all. Scratch files
    /// are removed on every path unless the options ask to keep them.
    pub fn compile(&self, options: &CompilerOptions, sources: &[Source]) -> Result<CompileResult> {
        let backend = self.language.backend();
        let extension = backend.file_extension();

        let mut effective = options.clone();
        for source in sources {
            if let Source::Tree(unit) = source {
                effective.add_references(unit.referenced_libraries.iter().cloned());
            }
        }

        let temp_root = effective.temp_root.clone().unwrap_or_else(env::temp_dir);
        let keep = effective.temp_files == TempFilePolicy::Keep;
        let scratch = tempfile::Builder::new()
            .prefix("codedom-")
            .disable_cleanup(keep)
            .tempdir_in(&temp_root)
            .map_err(|source| DriverError::TempFile {
                path: temp_root.clone(),
                source,
            })?;
        debug!(dir = %scratch.path().display(), "created scratch directory");

        let mut files = Vec::with_capacity(sources.len());
        for (index, source) in sources.iter().enumerate() {
            let file = match source {
                Source::File(path) => {
                    fs::File::open(path).map_err(|source| DriverError::ReadSource {
                        path: path.clone(),
                        source,
                    })?;
                    path.clone()
                }
                Source::Text(text) => write_scratch(&scratch, &format!("{index}.{extension}"), text)?,
                Source::Tree(unit) => {
                    let text = CodeGenerator::new(self.language)
                        .with_options(self.generator_options.clone())
                        .generate_compile_unit(unit)?;
                    write_scratch(&scratch, &format!("{index}.{extension}"), &text)?
                }
            };
            files.push(file);
        }

        // A fresh on-disk artifact stays a TempPath, removed on drop, until the compiler has run
        let (output, pending) = match &effective.output {
            Some(path) => (path.clone(), None),
            None => artifact_path(&scratch, &temp_root, &effective)?,
        };
        effective.output = Some(output.clone());

        let mut args = build_arguments(&self.flags, backend.compiler_language(), &effective, &files);
        let line = join_command_line(&args);
        if line.len() > RESPONSE_FILE_THRESHOLD {
            let response = write_scratch(&scratch, "cmdline", &line)?;
            debug!(length = line.len(), path = %response.display(), "using response file");
            args = vec![format!("@{}", response.display())];
        }

        let (exit_code, collector) = self.run(&args)?;

        if let Some(pending) = pending {
            pending.keep().map_err(|e| DriverError::TempFile {
                path: e.path.to_path_buf(),
                source: e.error,
            })?;
        }

        let artifact = match exit_code {
            Some(code) if effective.in_memory && !collector.has_errors() => match fs::read(&output) {
                Ok(bytes) => Artifact::InMemory(bytes),
                Err(e) if code != 0 && e.kind() == io::ErrorKind::NotFound => {
                    debug!(path = %output.display(), "compiler failed without writing an artifact");
                    Artifact::Path(output)
                }
                Err(source) => {
                    return Err(DriverError::ReadArtifact {
                        path: output.clone(),
                        source,
                    })
                }
            },
            _ => Artifact::Path(output),
        };

        if keep {
            info!(dir = %scratch.path().display(), "keeping temporary files");
        } else {
            debug!(dir = %scratch.path().display(), "removing scratch directory");
        }
        drop(scratch);

        let (output, diagnostics) = collector.into_parts();
        Ok(CompileResult {
            exit_code,
            output,
            diagnostics,
            artifact,
        })
    }

    /// Spawn the compiler and drain its stderr into a collector.
    fn run(&self, args: &[String]) -> Result<(Option<i32>, DiagnosticCollector)> {
        let program = self.toolchain.program.display().to_string();
        let mut command = self.toolchain.command();
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());

        info!("Spawning {} with {} arguments", program, args.len());
        let mut child = command.spawn().map_err(|source| DriverError::Spawn {
            program: program.clone(),
            source,
        })?;

        let mut collector = DiagnosticCollector::new();
        if let Some(stderr) = child.stderr.take() {
            if let Err(e) = drain_lines(stderr, &mut collector) {
                let _ = child.kill();
                let _ = child.wait();
                return Err(DriverError::ReadOutput(e));
            }
        }

        let status = child.wait().map_err(DriverError::Wait)?;
        info!(
            exit_code = ?status.code(),
            errors = collector.error_count(),
            warnings = collector.warning_count(),
            "{} finished",
            program
        );
        Ok((status.code(), collector))
    }
}

fn drain_lines(stream: impl Read, collector: &mut DiagnosticCollector) -> io::Result<()> {
    let mut reader = BufReader::new(stream);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            return Ok(());
        }
        let text = String::from_utf8_lossy(&buf);
        let line = text.trim_end_matches(&['\r', '\n'][..]);
        debug!(line, "compiler output");
        collector.push_line(line);
    }
}

fn write_scratch(scratch: &TempDir, name: &str, contents: &str) -> Result<PathBuf> {
    let path = scratch.path().join(name);
    fs::write(&path, contents).map_err(|source| DriverError::TempFile {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}

/// In-memory artifacts live in the scratch directory; on-disk ones get a
/// unique file beside it, returned unkept.
fn artifact_path(scratch: &TempDir, temp_root: &Path, options: &CompilerOptions) -> Result<(PathBuf, Option<TempPath>)> {
    let extension = options.kind.extension();
    if options.in_memory {
        return Ok((scratch.path().join(format!("output.{extension}")), None));
    }
    let pending = tempfile::Builder::new()
        .prefix("codedom-")
        .suffix(&format!(".{extension}"))
        .tempfile_in(temp_root)
        .map_err(|source| DriverError::TempFile {
            path: temp_root.to_path_buf(),
            source,
        })?
        .into_temp_path();
    Ok((pending.to_path_buf(), Some(pending)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_source_file_is_an_error() {
        let root = tempfile::tempdir().expect("tempdir");
        let compiler = Compiler::new(Language::CSharp).with_toolchain(Toolchain::new("true"));
        let options = CompilerOptions::new().with_temp_root(root.path());
        let err = compiler
            .compile(&options, &[Source::File(root.path().join("missing.cs"))])
            .unwrap_err();
        assert!(matches!(err, DriverError::ReadSource { .. }));
        // scratch directory removed on the error path
        assert_eq!(fs::read_dir(root.path()).expect("read_dir").count(), 0);
    }

    #[test]
    fn test_unstartable_compiler_is_an_error() {
        let root = tempfile::tempdir().expect("tempdir");
        let compiler =
            Compiler::new(Language::VisualBasic).with_toolchain(Toolchain::new("/nonexistent/codedom-cscc"));
        let options = CompilerOptions::new().in_memory().with_temp_root(root.path());
        let err = compiler
            .compile(&options, &[Source::Text("Module M\nEnd Module\n".into())])
            .unwrap_err();
        assert!(matches!(err, DriverError::Spawn { .. }));
        assert_eq!(fs::read_dir(root.path()).expect("read_dir").count(), 0);
    }

    #[test]
    fn test_unstartable_compiler_leaves_no_artifact_file() {
        let root = tempfile::tempdir().expect("tempdir");
        let compiler =
            Compiler::new(Language::CSharp).with_toolchain(Toolchain::new("/nonexistent/codedom-cscc"));
        let options = CompilerOptions::new().with_temp_root(root.path());
        let err = compiler
            .compile(&options, &[Source::Text("class A {}\n".into())])
            .unwrap_err();
        assert!(matches!(err, DriverError::Spawn { .. }));
        // neither the scratch directory nor a codedom-*.exe survives
        assert_eq!(fs::read_dir(root.path()).expect("read_dir").count(), 0);
    }

    #[test]
    fn test_drain_lines_trims_line_endings() {
        let mut collector = DiagnosticCollector::new();
        let input: &[u8] = b"a.cs(1,2): error CS1: bad\r\nnote\n\xffb.cs:3: warning: odd";
        drain_lines(input, &mut collector).expect("drain");
        assert_eq!(collector.lines()[0], "a.cs(1,2): error CS1: bad");
        assert_eq!(collector.lines()[1], "note");
        assert_eq!(collector.lines()[2], "\u{fffd}b.cs:3: warning: odd");
        assert_eq!(collector.error_count(), 1);
        assert_eq!(collector.warning_count(), 1);
    }
}

//! codedom CLI
//!
//! Usage: codedom render <tree.json> [--lang vb] [-o out.vb]
//!        codedom compile <input>... [-o out.exe]

use clap::{Args, Parser, Subcommand, ValueEnum};
use codedom::codegen::BracingStyle;
use codedom::driver::{ArtifactKind, Toolchain};
use codedom::tree::validate_identifiers;
use codedom::{Artifact, CodeGenerator, CompileUnit, Compiler, CompilerOptions, GeneratorOptions, Language, Source};
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "codedom")]
#[command(version)]
#[command(about = "Render C# and Visual Basic source from program trees and compile it", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a JSON program tree to source text
    Render(RenderArgs),
    /// Compile trees and source files with the external compiler
    Compile(CompileArgs),
}

#[derive(Args, Debug)]
struct RenderArgs {
    /// Program tree (.json)
    #[arg(value_name = "TREE")]
    input: PathBuf,

    /// Target language
    #[arg(long, value_enum, default_value_t = Lang::Csharp)]
    lang: Lang,

    /// Output file (defaults to stdout)
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Brace placement
    #[arg(long, value_enum, default_value_t = Bracing::Block)]
    bracing: Bracing,

    /// Spaces per indent level, 0 for tabs
    #[arg(long, default_value_t = 4)]
    indent: usize,

    /// Reject identifiers that are not valid in every language
    #[arg(long, default_value_t = false)]
    validate: bool,
}

#[derive(Args, Debug)]
struct CompileArgs {
    /// Program trees (.json) or source files
    #[arg(value_name = "INPUT", required = true)]
    inputs: Vec<PathBuf>,

    /// Source language (defaults to the first source file's extension)
    #[arg(long, value_enum)]
    lang: Option<Lang>,

    /// Output artifact (defaults to a temporary file)
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Build a library instead of an executable
    #[arg(long, default_value_t = false)]
    library: bool,

    /// Emit debug information
    #[arg(short = 'g', default_value_t = false)]
    debug: bool,

    /// Treat warnings as errors
    #[arg(long, default_value_t = false)]
    werror: bool,

    /// Warning level
    #[arg(long, value_name = "LEVEL")]
    warn: Option<u8>,

    /// Type containing the entry point
    #[arg(long = "main", value_name = "TYPE")]
    entry_type: Option<String>,

    /// Referenced library, repeatable
    #[arg(short = 'r', long = "reference", value_name = "LIB")]
    references: Vec<String>,

    /// Resource file to embed
    #[arg(long, value_name = "PATH")]
    resource: Option<PathBuf>,

    /// Extra csc-style options, e.g. "/optimize+ /define:DEBUG"
    #[arg(long, value_name = "TEXT")]
    flags: Option<String>,

    /// Keep the scratch directory
    #[arg(long, default_value_t = false)]
    keep_temp: bool,

    /// Compiler executable (defaults to $CSCC, then cscc)
    #[arg(long, value_name = "PROGRAM")]
    compiler: Option<PathBuf>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Lang {
    Csharp,
    Vb,
}

impl From<Lang> for Language {
    fn from(lang: Lang) -> Self {
        match lang {
            Lang::Csharp => Language::CSharp,
            Lang::Vb => Language::VisualBasic,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Bracing {
    Block,
    C,
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Render(args) => render(args),
        Command::Compile(args) => compile(args),
    }
}

fn fail(message: impl std::fmt::Display) -> ExitCode {
    eprintln!("{}: {}", "error".red().bold(), message);
    ExitCode::FAILURE
}

fn load_tree(path: &Path) -> Result<CompileUnit, String> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("could not read file '{}': {}", path.display(), e))?;
    serde_json::from_str(&text).map_err(|e| format!("invalid tree '{}': {}", path.display(), e))
}

fn render(args: RenderArgs) -> ExitCode {
    let unit = match load_tree(&args.input) {
        Ok(unit) => unit,
        Err(message) => return fail(message),
    };

    if args.validate {
        if let Err(e) = validate_identifiers(&unit) {
            return fail(e);
        }
    }

    let indent = if args.indent == 0 {
        "\t".to_string()
    } else {
        " ".repeat(args.indent)
    };
    let bracing = match args.bracing {
        Bracing::Block => BracingStyle::Block,
        Bracing::C => BracingStyle::C,
    };
    let options = GeneratorOptions::default().with_indent(indent).with_bracing(bracing);

    let text = match CodeGenerator::new(args.lang.into()).with_options(options).generate_compile_unit(&unit) {
        Ok(text) => text,
        Err(e) => return fail(e),
    };

    match &args.output {
        Some(output) => {
            if let Err(e) = std::fs::write(output, &text) {
                return fail(format!("could not write file '{}': {}", output.display(), e));
            }
            eprintln!(
                "{}: {} -> {}",
                "rendered".green().bold(),
                args.input.display(),
                output.display()
            );
        }
        None => print!("{text}"),
    }
    ExitCode::SUCCESS
}

fn is_tree(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

/// `.vb` sources select Visual Basic; anything else is C#.
fn infer_language(inputs: &[PathBuf]) -> Language {
    let first_source = inputs.iter().find(|path| !is_tree(path));
    match first_source.and_then(|path| path.extension()) {
        Some(ext) if ext.eq_ignore_ascii_case("vb") => Language::VisualBasic,
        _ => Language::CSharp,
    }
}

fn compile(args: CompileArgs) -> ExitCode {
    let language = args.lang.map_or_else(|| infer_language(&args.inputs), Language::from);

    let mut sources = Vec::with_capacity(args.inputs.len());
    for input in &args.inputs {
        if is_tree(input) {
            match load_tree(input) {
                Ok(unit) => sources.push(Source::Tree(unit)),
                Err(message) => return fail(message),
            }
        } else {
            sources.push(Source::File(input.clone()));
        }
    }

    let mut options = CompilerOptions::new()
        .with_debug(args.debug)
        .with_warnings_as_errors(args.werror);
    if args.library {
        options.kind = ArtifactKind::Library;
    }
    if let Some(output) = args.output {
        options = options.with_output(output);
    }
    if let Some(level) = args.warn {
        options = options.with_warning_level(level);
    }
    if let Some(entry) = args.entry_type {
        options = options.with_entry_type(entry);
    }
    options.add_references(args.references);
    if let Some(resource) = args.resource {
        options = options.with_resource(resource);
    }
    if let Some(flags) = args.flags {
        options = options.with_extra_flags(flags);
    }
    if args.keep_temp {
        options = options.keep_temp_files();
    }

    let toolchain = args.compiler.map_or_else(Toolchain::from_env, Toolchain::new);
    let compiler = Compiler::new(language).with_toolchain(toolchain);

    let result = match compiler.compile(&options, &sources) {
        Ok(result) => result,
        Err(e) => return fail(e),
    };

    for diagnostic in &result.diagnostics {
        eprintln!("{}", diagnostic);
    }

    if result.crashed() {
        return fail("compiler terminated abnormally");
    }

    let error_count = result.error_count();
    let warning_count = result.warning_count();
    if error_count > 0 || warning_count > 0 {
        eprintln!(
            "\n{}{} generated",
            format!("{} error{}", error_count, if error_count == 1 { "" } else { "s" }).red().bold(),
            if warning_count > 0 {
                format!(", {} warning{}", warning_count, if warning_count == 1 { "" } else { "s" })
            } else {
                String::new()
            }
        );
    }

    if !result.succeeded() {
        if error_count == 0 {
            for line in &result.output {
                eprintln!("{line}");
            }
            return fail(format!("compiler exited with status {}", result.exit_code.unwrap_or(-1)));
        }
        return ExitCode::FAILURE;
    }

    if let Artifact::Path(path) = &result.artifact {
        println!("{}: {}", "compiled".green().bold(), path.display());
    }
    ExitCode::SUCCESS
}

//! Command line construction for the external compiler.

use std::path::PathBuf;

use tracing::debug;

use super::options::{ArtifactKind, CompilerOptions};

/// Command lines longer than this go through a response file.
pub const RESPONSE_FILE_THRESHOLD: usize = 8192;

/// Flag spellings of one compiler family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagSet {
    pub language: &'static str,
    pub output: &'static str,
    pub debug: &'static str,
    pub library: &'static str,
    pub warnings_as_errors: &'static str,
    pub all_warnings: &'static str,
    pub entry_point: &'static str,
    /// Prefix of a library search directory
    pub library_dir: &'static str,
    /// Prefix of a library name
    pub library_name: &'static str,
    pub resources: &'static str,
    pub define: &'static str,
    pub optimize: &'static str,
    pub checked: &'static str,
    pub unchecked: &'static str,
    pub unsafe_code: &'static str,
    pub no_stdlib: &'static str,
}

impl FlagSet {
    /// Portable.NET `cscc`
    pub const fn cscc() -> Self {
        Self {
            language: "-x",
            output: "-o",
            debug: "-g",
            library: "-shared",
            warnings_as_errors: "-Werror",
            all_warnings: "-Wall",
            entry_point: "-e",
            library_dir: "-L",
            library_name: "-l",
            resources: "-fresources=",
            define: "-D",
            optimize: "-O2",
            checked: "-fchecked",
            unchecked: "-funchecked",
            unsafe_code: "-funsafe",
            no_stdlib: "-fnostdlib",
        }
    }
}

impl Default for FlagSet {
    fn default() -> Self {
        Self::cscc()
    }
}

/// Build the argument list for compiling `files` as `language`.
pub fn build_arguments(flags: &FlagSet, language: &str, options: &CompilerOptions, files: &[PathBuf]) -> Vec<String> {
    let mut args = vec![flags.language.to_string(), language.to_string()];
    if let Some(output) = &options.output {
        args.push(flags.output.to_string());
        args.push(output.display().to_string());
    }
    if options.debug {
        args.push(flags.debug.to_string());
    }
    if options.kind == ArtifactKind::Library {
        args.push(flags.library.to_string());
    }
    if options.warnings_as_errors {
        args.push(flags.warnings_as_errors.to_string());
    }
    if options.warning_level.is_some() {
        args.push(flags.all_warnings.to_string());
    }
    if let Some(entry) = &options.entry_type {
        args.push(flags.entry_point.to_string());
        args.push(entry.clone());
    }
    for reference in &options.references {
        args.extend(reference_arguments(flags, reference));
    }
    if let Some(resource) = &options.resource {
        args.push(format!("{}{}", flags.resources, resource.display()));
    }
    if let Some(extra) = &options.extra_flags {
        for option in split_arguments(extra) {
            args.extend(translate_option(flags, &option));
        }
    }
    args.extend(files.iter().map(|file| file.display().to_string()));
    args
}

/// `dir/Name.dll` becomes a search directory plus a library name.
fn reference_arguments(flags: &FlagSet, reference: &str) -> Vec<String> {
    let mut name = reference;
    if name.len() > 4 && name.is_char_boundary(name.len() - 4) && name[name.len() - 4..].eq_ignore_ascii_case(".dll") {
        name = &name[..name.len() - 4];
    }
    match name.rfind(&['/', '\\'][..]) {
        Some(split) => vec![
            format!("{}{}", flags.library_dir, &name[..split]),
            format!("{}{}", flags.library_name, &name[split + 1..]),
        ],
        None => vec![format!("{}{}", flags.library_name, name)],
    }
}

/// Translate one csc-style option. Unknown options are dropped.
fn translate_option(flags: &FlagSet, option: &str) -> Vec<String> {
    let is = |names: &[&str]| names.iter().any(|name| option.eq_ignore_ascii_case(name));
    if is(&["/optimize", "/optimize+", "/o", "/o+"]) {
        vec![flags.optimize.to_string()]
    } else if is(&["/checked", "/checked+"]) {
        vec![flags.checked.to_string()]
    } else if is(&["/checked-"]) {
        vec![flags.unchecked.to_string()]
    } else if is(&["/unsafe", "/unsafe+"]) {
        vec![flags.unsafe_code.to_string()]
    } else if is(&["/nostdlib", "/nostdlib+"]) {
        vec![flags.no_stdlib.to_string()]
    } else if let Some(defines) = strip_prefix_ignore_case(option, "/define:").or_else(|| strip_prefix_ignore_case(option, "/d:")) {
        defines
            .split(&[',', ';'][..])
            .filter(|name| !name.is_empty())
            .map(|name| format!("{}{name}", flags.define))
            .collect()
    } else {
        debug!(option, "ignoring unsupported compiler option");
        Vec::new()
    }
}

fn strip_prefix_ignore_case<'t>(text: &'t str, prefix: &str) -> Option<&'t str> {
    let head = text.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix).then(|| &text[prefix.len()..])
}

/// Split option text on whitespace; double quotes group words.
fn split_arguments(text: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    let mut pending = false;
    for c in text.chars() {
        match c {
            '"' => {
                quoted = !quoted;
                pending = true;
            }
            c if c.is_whitespace() && !quoted => {
                if pending {
                    args.push(std::mem::take(&mut current));
                    pending = false;
                }
            }
            c => {
                current.push(c);
                pending = true;
            }
        }
    }
    if pending {
        args.push(current);
    }
    args
}

/// Space-joined command line, quoting arguments that need it.
pub fn join_command_line(args: &[String]) -> String {
    args.iter()
        .map(|arg| {
            if arg.is_empty() || arg.contains(&[' ', '\t', '"'][..]) {
                format!("\"{}\"", arg.replace('"', "\\\""))
            } else {
                arg.clone()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_full_argument_list() {
        let options = CompilerOptions::library()
            .with_output("out/Acme.dll")
            .with_debug(true)
            .with_warnings_as_errors(true)
            .with_warning_level(4)
            .with_entry_type("Acme.Program")
            .with_reference("System.Xml.dll")
            .with_reference("lib/Acme.Core.DLL")
            .with_reference("C:\\libs\\Native")
            .with_resource("app.res")
            .with_extra_flags("/optimize+ /checked- /unsafe /define:DEBUG;TRACE /d:X,Y /nowarn:1591");
        let args = build_arguments(&FlagSet::cscc(), "csharp", &options, &[PathBuf::from("0.cs")]);
        assert_eq!(
            args,
            vec![
                "-x",
                "csharp",
                "-o",
                "out/Acme.dll",
                "-g",
                "-shared",
                "-Werror",
                "-Wall",
                "-e",
                "Acme.Program",
                "-lSystem.Xml",
                "-Llib",
                "-lAcme.Core",
                "-LC:\\libs",
                "-lNative",
                "-fresources=app.res",
                "-O2",
                "-funchecked",
                "-funsafe",
                "-DDEBUG",
                "-DTRACE",
                "-DX",
                "-DY",
                "0.cs",
            ]
        );
    }

    #[test]
    fn test_executable_has_no_shared_flag() {
        let args = build_arguments(&FlagSet::cscc(), "vb", &CompilerOptions::new(), &[PathBuf::from("a.vb")]);
        assert_eq!(args, vec!["-x", "vb", "a.vb"]);
    }

    #[test]
    fn test_split_arguments() {
        assert_eq!(split_arguments("  /o  \"/define:A B\" /unsafe "), vec!["/o", "/define:A B", "/unsafe"]);
        assert!(split_arguments("").is_empty());
    }

    #[test]
    fn test_join_quotes_when_needed() {
        let args = vec!["-o".to_string(), "my out.exe".to_string(), "a.cs".to_string()];
        assert_eq!(join_command_line(&args), "-o \"my out.exe\" a.cs");
    }
}

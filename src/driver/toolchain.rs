use std::env;
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::Command;

/// Environment variable naming the compiler executable
pub const COMPILER_ENV: &str = "CSCC";
pub const DEFAULT_COMPILER: &str = "cscc";

/// The external compiler program and any arguments placed before the flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolchain {
    pub program: PathBuf,
    pub leading_args: Vec<String>,
}

impl Toolchain {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            leading_args: Vec::new(),
        }
    }

    /// `$CSCC` when set and non-empty, otherwise `cscc` from `PATH`.
    pub fn from_env() -> Self {
        Self::from_override(env::var_os(COMPILER_ENV))
    }

    fn from_override(value: Option<OsString>) -> Self {
        match value {
            Some(program) if !program.is_empty() => Self::new(program),
            _ => Self::new(DEFAULT_COMPILER),
        }
    }

    pub fn with_arg(mut self, arg: impl Into<String>) -> Self {
        self.leading_args.push(arg.into());
        self
    }

    pub(crate) fn command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.leading_args);
        command
    }
}

impl Default for Toolchain {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_override_resolution() {
        assert_eq!(Toolchain::from_override(None).program, PathBuf::from("cscc"));
        assert_eq!(Toolchain::from_override(Some(OsString::new())).program, PathBuf::from("cscc"));
        assert_eq!(
            Toolchain::from_override(Some(OsString::from("/opt/pnet/bin/cscc"))).program,
            PathBuf::from("/opt/pnet/bin/cscc")
        );
    }

    #[test]
    fn test_leading_args_come_first() {
        let toolchain = Toolchain::new("sh").with_arg("fake-cscc.sh");
        let command = toolchain.command();
        assert_eq!(command.get_program(), "sh");
        let args: Vec<_> = command.get_args().collect();
        assert_eq!(args, vec!["fake-cscc.sh"]);
    }
}

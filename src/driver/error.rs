use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::codegen::RenderError;

/// Failures of the driver itself, as opposed to problems the compiler reports
#[derive(Debug, Error)]
pub enum DriverError {
    #[error("failed to render source tree: {0}")]
    Render(#[from] RenderError),

    #[error("could not read source file '{}': {source}", .path.display())]
    ReadSource { path: PathBuf, source: io::Error },

    #[error("could not write temporary file '{}': {source}", .path.display())]
    TempFile { path: PathBuf, source: io::Error },

    #[error("could not start compiler '{program}': {source}")]
    Spawn { program: String, source: io::Error },

    #[error("failed reading compiler output: {0}")]
    ReadOutput(#[source] io::Error),

    #[error("failed waiting for compiler: {0}")]
    Wait(#[source] io::Error),

    #[error("could not read compiled artifact '{}': {source}", .path.display())]
    ReadArtifact { path: PathBuf, source: io::Error },
}

pub type Result<T> = std::result::Result<T, DriverError>;

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MeshError {
    /// Bad grid parameters or a malformed input file
    #[error("Input error: {0}")]
    Input(String),

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A mesh file could not be parsed
    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    /// The written file does not reproduce the generated mesh
    #[error("Verify error: {0}")]
    Verify(String),
}

impl MeshError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> MeshError {
        MeshError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn parse(line: usize, message: impl Into<String>) -> MeshError {
        MeshError::Parse {
            line,
            message: message.into(),
        }
    }
}

use std::path::PathBuf;
use thiserror::Error;

/// Failures while normalising a gallery of splat scenes.
#[derive(Debug, Error)]
pub enum PreprocessError {
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} is not a PLY file")]
    NotPly { path: PathBuf },

    #[error("{path}: only binary_little_endian PLY is supported, found `{format}`")]
    UnsupportedFormat { path: PathBuf, format: String },

    #[error("{path}: malformed header line `{line}`")]
    MalformedHeader { path: PathBuf, line: String },

    #[error("{path}: unsupported property type `{ty}`")]
    UnsupportedPropertyType { path: PathBuf, ty: String },

    #[error("{path}: vertex element is missing x, y or z")]
    MissingPosition { path: PathBuf },

    #[error("{path}: expected {expected} bytes of vertex data, found {found}")]
    TruncatedVertexData {
        path: PathBuf,
        expected: usize,
        found: usize,
    },

    #[error("no PLY scenes found in {0:?}")]
    NoScenes(Vec<PathBuf>),

    #[error("dds error on {path}: {message}")]
    Dds { path: PathBuf, message: String },

    #[error("manifest error: {0}")]
    Manifest(#[from] serde_json::Error),
}

impl PreprocessError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

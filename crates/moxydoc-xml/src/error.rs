use std::path::PathBuf;

use moxydoc_model::TreeError;
use thiserror::Error;

/// Errors raised while reading a Doxygen XML directory.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Xml {
        path: PathBuf,
        #[source]
        source: roxmltree::Error,
    },
    #[error("no index.xml found in {0}")]
    MissingIndex(PathBuf),
    #[error("malformed Doxygen XML in {path}: {message}")]
    Malformed { path: PathBuf, message: String },
    #[error(transparent)]
    Tree(#[from] TreeError),
}

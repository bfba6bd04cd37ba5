use std::path::PathBuf;

use thiserror::Error;

/// Failure to load one of the mapping tables.
///
/// Any of these aborts initialisation: a partially loaded table would
/// silently drop argument links.
#[derive(Debug, Error)]
pub enum MappingError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed XML in {path}: {source}")]
    Xml {
        path: PathBuf,
        #[source]
        source: roxmltree::Error,
    },

    #[error("{path}: <{element}> is missing attribute `{attribute}`")]
    MissingAttribute {
        path: PathBuf,
        element: String,
        attribute: String,
    },
}

pub type MappingResult<T> = Result<T, MappingError>;

use std::path::PathBuf;

use layered_events::AnnotationError;
use layered_frames::MappingError;
use thiserror::Error;

/// Failure to read the number-normalisation rule file.
#[derive(Debug, Error)]
pub enum NumberRuleError {
    #[error("failed to read number rules {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A non-comment line without a `word<TAB>value` pair.
    #[error("{path}:{line}: expected `word<TAB>value`, found {content:?}")]
    Malformed {
        path: PathBuf,
        line: usize,
        content: String,
    },
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Annotation(#[from] AnnotationError),

    #[error(transparent)]
    Mapping(#[from] MappingError),

    #[error(transparent)]
    NumberRules(#[from] NumberRuleError),

    #[error("failed to read config {path}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

pub type PipelineResult<T> = Result<T, PipelineError>;

//! Configuration loading and resolution errors.

use crate::Format;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{format} parse error: {message}")]
    Parse { format: Format, message: String },

    #[error("unknown document format: {0}")]
    UnknownFormat(String),

    #[error("invalid document: {0}")]
    InvalidDocument(String),

    #[error("duplicate definition: {0}")]
    Duplicate(String),

    #[error("Variable {0} is not defined")]
    UndefinedVariable(String),

    #[error("interpolation of {value:?} exceeded {limit} substitutions")]
    InterpolationLimit { value: String, limit: usize },

    #[error("invalid key pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error(transparent)]
    Publish(#[from] flatconf_core::Error),
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::Parse {
            format: Format::Yaml,
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse {
            format: Format::Json,
            message: err.to_string(),
        }
    }
}

impl From<kdl::KdlError> for ConfigError {
    fn from(err: kdl::KdlError) -> Self {
        ConfigError::Parse {
            format: Format::Kdl,
            message: err.to_string(),
        }
    }
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

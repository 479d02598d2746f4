use crate::client::RestClientError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OpenApiError {
    #[error("unknown schema source {0}. Must be one of file, cluster, builtin")]
    Config(String),

    #[error("error reading file at path {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("error fetching schema from cluster: {0}")]
    Network(#[from] RestClientError),

    #[error("invalid {origin}: {source}")]
    Parse {
        origin: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid OpenAPI schema: {0}")]
    Schema(String),

    #[error("No definition named {0} is registered")]
    UnknownDefinition(String),

    #[error("Failed to compile JSON schema for {definition}: {reason}")]
    ValidatorBuild { definition: String, reason: String },

    #[error("Validation failed: {0}")]
    ValidationFailed(String),
}

impl OpenApiError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

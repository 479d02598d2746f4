use crate::error::OpenApiError;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

/// Connection settings for the cluster API server
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_seconds: Option<u64>,
}

impl ClusterConfig {
    pub fn new(server: impl Into<String>) -> Self {
        Self {
            server: Some(server.into()),
            ..Self::default()
        }
    }

    /// Loads cluster settings from a YAML file
    ///
    /// # Errors
    /// Returns error if the file cannot be read or is not valid YAML
    pub fn from_yaml_file(path: &Path) -> Result<Self, OpenApiError> {
        let file = File::open(path).map_err(|e| OpenApiError::io(path, e))?;
        let reader = BufReader::new(file);

        serde_yaml::from_reader(reader).map_err(|e| OpenApiError::Parse {
            origin: format!("cluster config {:?}", path.display().to_string()),
            source: e,
        })
    }

    /// Values set on `overrides` take precedence over `self`
    pub fn with_overrides(self, overrides: ClusterConfig) -> Self {
        Self {
            server: overrides.server.or(self.server),
            token: overrides.token.or(self.token),
            timeout_seconds: overrides.timeout_seconds.or(self.timeout_seconds),
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs)
    }
}

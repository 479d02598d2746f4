use crate::error::OpenApiError;
use std::fmt;
use std::str::FromStr;

pub const SCHEMA_SOURCE_BUILTIN: &str = "builtin";
pub const SCHEMA_SOURCE_FILE: &str = "file";
pub const SCHEMA_SOURCE_CLUSTER: &str = "cluster";

/// Where the active OpenAPI schema comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaSource {
    Builtin,
    File,
    Cluster,
}

impl SchemaSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Builtin => SCHEMA_SOURCE_BUILTIN,
            Self::File => SCHEMA_SOURCE_FILE,
            Self::Cluster => SCHEMA_SOURCE_CLUSTER,
        }
    }
}

impl fmt::Display for SchemaSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SchemaSource {
    type Err = OpenApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            SCHEMA_SOURCE_BUILTIN => Ok(Self::Builtin),
            SCHEMA_SOURCE_FILE => Ok(Self::File),
            SCHEMA_SOURCE_CLUSTER => Ok(Self::Cluster),
            other => Err(OpenApiError::Config(other.to_string())),
        }
    }
}

use crate::client::ClientFactory;
use crate::error::OpenApiError;
use crate::source::SchemaSource;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Path the API server publishes its OpenAPI v2 document under
pub const OPENAPI_V2_PATH: &str = "/openapi/v2";

const ACCEPT_JSON: &str = "application/json";

/// Obtains the raw schema bytes for `source`
///
/// Returns `None` for the built-in source, which needs no loading.
///
/// # Errors
/// Returns `OpenApiError::Io` naming `path` when the file cannot be read, and
/// `OpenApiError::Network` when the cluster fetch fails
pub fn load_schema(
    source: SchemaSource,
    path: &Path,
    factory: &dyn ClientFactory,
) -> Result<Option<Vec<u8>>, OpenApiError> {
    match source {
        SchemaSource::Builtin => Ok(None),
        SchemaSource::File => read_schema_from_disk(path).map(Some),
        SchemaSource::Cluster => fetch_schema_from_cluster(factory).map(Some),
    }
}

/// Fetches the OpenAPI v2 document from the cluster API server
pub fn fetch_schema_from_cluster(factory: &dyn ClientFactory) -> Result<Vec<u8>, OpenApiError> {
    let client = factory.rest_client()?;
    let data = client.get_raw(OPENAPI_V2_PATH, ACCEPT_JSON)?;
    debug!(bytes = data.len(), "fetched OpenAPI schema from cluster");
    Ok(data)
}

/// Reads the whole schema file into memory
pub fn read_schema_from_disk(path: &Path) -> Result<Vec<u8>, OpenApiError> {
    let data = fs::read(path).map_err(|e| OpenApiError::io(path, e))?;
    debug!(path = %path.display(), bytes = data.len(), "read OpenAPI schema from disk");
    Ok(data)
}

pub mod document;
pub mod loader;
pub mod normalizer;
pub mod reference_resolver;

pub use document::{GroupVersionKind, Operation, Parameter, PathItem, ReferenceOr, Response, Schema, Swagger};
pub use loader::{fetch_schema_from_cluster, load_schema, read_schema_from_disk, OPENAPI_V2_PATH};
pub use normalizer::{schema_from_file, schema_from_yaml};
pub use reference_resolver::ResolveReference;

pub mod client;
pub mod config;
pub mod configure;
pub mod error;
pub mod registry;
pub mod source;
pub mod spec;
pub mod validation;

pub use client::{ClientFactory, HttpClientFactory, HttpRestClient, RestClient, RestClientError};
pub use config::ClusterConfig;
pub use configure::{configure_openapi, configure_openapi_schema};
pub use error::OpenApiError;
pub use registry::{SchemaRegistry, AUXILIARY_SCHEMA, BUILTIN_SCHEMA};
pub use source::SchemaSource;
pub use spec::{
    load_schema, schema_from_file, schema_from_yaml, GroupVersionKind, ResolveReference, Schema,
    Swagger,
};
pub use validation::DefinitionValidator;

use crate::client::ClientFactory;
use crate::error::OpenApiError;
use crate::registry::SchemaRegistry;
use crate::source::SchemaSource;
use crate::spec::loader::load_schema;
use std::path::Path;
use tracing::info;

/// Sets the active OpenAPI schema of `registry`
///
/// The schema is fetched from the cluster, read from `path`, or left as the
/// built-in default, depending on `source`. Registration happens through
/// [`configure_openapi_schema`].
///
/// # Errors
/// Returns `OpenApiError::Config` for an unknown source before anything is
/// loaded, and the loader or registry error otherwise
pub fn configure_openapi(
    registry: &mut SchemaRegistry,
    factory: &dyn ClientFactory,
    source: &str,
    path: &Path,
) -> Result<(), OpenApiError> {
    let source: SchemaSource = source.parse()?;

    match load_schema(source, path, factory)? {
        None => {
            info!(%source, "using built-in OpenAPI schema");
            Ok(())
        }
        Some(schema) => {
            info!(%source, bytes = schema.len(), "registering OpenAPI schema");
            configure_openapi_schema(registry, &schema)
        }
    }
}

/// Replaces the built-in schema with `schema` plus the auxiliary schema
///
/// Stops at the first failing merge; whatever was merged before stays.
pub fn configure_openapi_schema(
    registry: &mut SchemaRegistry,
    schema: &[u8],
) -> Result<(), OpenApiError> {
    registry.suppress_builtin();
    registry.merge(schema)?;

    let auxiliary = registry.auxiliary().to_vec();
    registry.merge(&auxiliary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{RestClient, RestClientError};

    struct StaticClient(&'static [u8]);

    impl RestClient for StaticClient {
        fn get_raw(&self, _abs_path: &str, _accept: &str) -> Result<Vec<u8>, RestClientError> {
            Ok(self.0.to_vec())
        }
    }

    struct StaticFactory(&'static [u8]);

    impl ClientFactory for StaticFactory {
        fn rest_client(&self) -> Result<Box<dyn RestClient>, RestClientError> {
            Ok(Box::new(StaticClient(self.0)))
        }
    }

    const CLUSTER_SCHEMA: &[u8] = br#"{
        "swagger": "2.0",
        "paths": {},
        "definitions": {"io.k8s.api.apps.v1.Deployment": {"type": "object"}}
    }"#;

    #[test]
    fn cluster_schema_replaces_builtin() {
        let mut registry = SchemaRegistry::default();

        configure_openapi(&mut registry, &StaticFactory(CLUSTER_SCHEMA), "cluster", Path::new(""))
            .unwrap();

        assert!(!registry.is_builtin_active());
        assert!(registry.definition("io.k8s.api.apps.v1.Deployment").is_some());
        assert!(registry
            .definition("io.k8s.api.kustomize.v1beta1.Kustomization")
            .is_some());
        assert!(registry.definition("io.k8s.api.core.v1.ConfigMap").is_none());
    }

    #[test]
    fn unknown_source_loads_nothing() {
        let mut registry = SchemaRegistry::default();
        let before = registry.clone();

        let err = configure_openapi(&mut registry, &StaticFactory(b""), "disk", Path::new(""))
            .unwrap_err();

        assert!(matches!(err, OpenApiError::Config(_)));
        assert_eq!(registry, before);
    }

    #[test]
    fn invalid_auxiliary_fails_after_user_schema_merged() {
        let mut registry = SchemaRegistry::default().with_auxiliary(b"{}".to_vec());

        let err = configure_openapi_schema(&mut registry, CLUSTER_SCHEMA).unwrap_err();

        assert!(matches!(err, OpenApiError::Schema(_)));
        assert!(!registry.is_builtin_active());
        assert!(registry.definition("io.k8s.api.apps.v1.Deployment").is_some());
    }

    #[test]
    fn invalid_user_schema_leaves_builtin_suppressed() {
        let mut registry = SchemaRegistry::default();

        let err = configure_openapi_schema(&mut registry, b"[]").unwrap_err();

        assert!(matches!(err, OpenApiError::Schema(_)));
        assert!(!registry.is_builtin_active());
        assert!(registry.definition_names().is_empty());
    }
}

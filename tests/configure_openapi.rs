//! End-to-end behaviour of `configure_openapi` for each schema source.

use openapi_schema_source::{
    configure_openapi, schema_from_file, ClientFactory, GroupVersionKind, OpenApiError, RestClient,
    RestClientError, SchemaRegistry,
};
use std::cell::Cell;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

const USER_SCHEMA: &str = r##"{
  "swagger": "2.0",
  "info": {"title": "Example", "version": "v1"},
  "paths": {
    "/apis/example.com/v1/namespaces/{namespace}/widgets": {
      "post": {
        "responses": {"201": {"description": "Created"}},
        "x-kubernetes-group-version-kind": {"group": "example.com", "version": "v1", "kind": "Widget"}
      }
    }
  },
  "definitions": {
    "com.example.v1.Widget": {
      "type": "object",
      "properties": {"spec": {"type": "object"}},
      "x-kubernetes-group-version-kind": [{"group": "example.com", "version": "v1", "kind": "Widget"}]
    }
  }
}"##;

/// Counts how often a client was requested and never hands one out
#[derive(Default)]
struct CountingFactory {
    calls: Cell<usize>,
}

impl ClientFactory for CountingFactory {
    fn rest_client(&self) -> Result<Box<dyn RestClient>, RestClientError> {
        self.calls.set(self.calls.get() + 1);
        Err(RestClientError::NoServer)
    }
}

fn schema_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn builtin_source_leaves_registry_untouched() {
    let mut registry = SchemaRegistry::default();
    let before = registry.clone();
    let factory = CountingFactory::default();

    configure_openapi(&mut registry, &factory, "builtin", Path::new("")).unwrap();

    assert_eq!(registry, before);
    assert!(registry.is_builtin_active());
    assert_eq!(factory.calls.get(), 0);
}

#[test]
fn missing_file_error_names_the_path() {
    let mut registry = SchemaRegistry::default();
    let path = Path::new("/no/such/dir/swagger.json");

    let err = configure_openapi(&mut registry, &CountingFactory::default(), "file", path).unwrap_err();

    assert!(matches!(err, OpenApiError::Io { .. }));
    assert!(err.to_string().contains("/no/such/dir/swagger.json"), "{err}");
    assert!(registry.is_builtin_active());
}

#[test]
fn unknown_source_lists_valid_values() {
    let mut registry = SchemaRegistry::default();
    let factory = CountingFactory::default();

    let err = configure_openapi(&mut registry, &factory, "remote", Path::new("")).unwrap_err();

    let message = err.to_string();
    assert!(message.contains("remote"));
    for valid in ["file", "cluster", "builtin"] {
        assert!(message.contains(valid), "{message}");
    }
    assert_eq!(factory.calls.get(), 0);
}

#[test]
fn file_source_merges_user_and_auxiliary_schemas() {
    let file = schema_file(USER_SCHEMA);
    let mut registry = SchemaRegistry::default();

    configure_openapi(&mut registry, &CountingFactory::default(), "file", file.path()).unwrap();

    assert!(registry.definition("com.example.v1.Widget").is_some());
    assert!(registry
        .definition("io.k8s.api.kustomize.v1beta1.Kustomization")
        .is_some());
    assert!(registry.definition("io.k8s.api.core.v1.ConfigMap").is_none());

    let widget = GroupVersionKind::new("example.com", "v1", "Widget");
    assert_eq!(registry.schema_for_kind(&widget).unwrap().0, "com.example.v1.Widget");
    assert_eq!(registry.is_namespace_scoped(&widget), Some(true));

    let kustomization = GroupVersionKind::new("kustomize.config.k8s.io", "v1beta1", "Kustomization");
    assert!(registry.schema_for_kind(&kustomization).is_some());
}

#[test]
fn configuring_twice_matches_configuring_once() {
    let file = schema_file(USER_SCHEMA);
    let factory = CountingFactory::default();

    let mut once = SchemaRegistry::default();
    configure_openapi(&mut once, &factory, "file", file.path()).unwrap();

    let mut twice = SchemaRegistry::default();
    configure_openapi(&mut twice, &factory, "file", file.path()).unwrap();
    configure_openapi(&mut twice, &factory, "file", file.path()).unwrap();

    assert_eq!(once, twice);

    let mut builtin = SchemaRegistry::default();
    configure_openapi(&mut builtin, &factory, "builtin", Path::new("")).unwrap();
    configure_openapi(&mut builtin, &factory, "builtin", Path::new("")).unwrap();
    assert_eq!(builtin, SchemaRegistry::default());
}

#[test]
fn cluster_failure_is_a_network_error() {
    let mut registry = SchemaRegistry::default();
    let factory = CountingFactory::default();

    let err = configure_openapi(&mut registry, &factory, "cluster", Path::new("")).unwrap_err();

    assert!(matches!(err, OpenApiError::Network(_)));
    assert!(err.to_string().starts_with("error fetching schema from cluster"));
    assert_eq!(factory.calls.get(), 1);
    assert!(registry.is_builtin_active());
}

#[test]
fn yaml_schema_file_round_trips_to_the_same_document() {
    let yaml = r#"
swagger: "2.0"
info:
  title: Example
  version: v1
paths: {}
definitions:
  com.example.v1.Widget:
    type: object
    properties:
      spec:
        type: object
"#;
    let yaml_file = schema_file(yaml);
    let json_file = schema_file(
        r#"{"swagger":"2.0","info":{"title":"Example","version":"v1"},"paths":{},
            "definitions":{"com.example.v1.Widget":{"type":"object","properties":{"spec":{"type":"object"}}}}}"#,
    );

    let from_yaml = schema_from_file(yaml_file.path()).unwrap();
    let from_json = schema_from_file(json_file.path()).unwrap();

    assert_eq!(from_yaml, from_json);
    assert_eq!(from_yaml.info.unwrap().title, "Example");
}

#[test]
fn registered_definitions_validate_documents() {
    let file = schema_file(USER_SCHEMA);
    let mut registry = SchemaRegistry::default();
    configure_openapi(&mut registry, &CountingFactory::default(), "file", file.path()).unwrap();

    let validator = registry.validator("com.example.v1.Widget").unwrap();
    assert!(validator.is_valid(&serde_json::json!({"spec": {}})));
    assert!(validator.validate(&serde_json::json!({"spec": "nope"})).is_err());
}

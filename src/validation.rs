use crate::error::OpenApiError;
use indexmap::IndexMap;
use jsonschema::{Registry, Resource, Validator};
use serde_json::Value;

/// Base URI the merged definitions are registered under, so in-schema
/// `#/definitions/...` references resolve against them
pub const DEFINITIONS_BASE_URI: &str = "urn:openapi:v2";

/// Builds a JSON Schema registry holding every definition as `#/definitions/<name>`
pub fn build_registry(definitions: &IndexMap<String, Value>) -> Result<Registry, OpenApiError> {
    let wrapped = serde_json::json!({ "definitions": definitions });

    let resource = Resource::from_contents(wrapped).map_err(|e| OpenApiError::ValidatorBuild {
        definition: "definitions".to_string(),
        reason: format!("Failed to create resource: {}", e),
    })?;

    Registry::try_new(DEFINITIONS_BASE_URI, resource).map_err(|e| OpenApiError::ValidatorBuild {
        definition: "definitions".to_string(),
        reason: format!("Failed to create registry: {}", e),
    })
}

/// Builds a JSON Schema validator for one definition of the registry
///
/// The validator's root only points into the registry, so references made
/// from inside the definition resolve against the merged definitions.
pub fn build_validator(registry: &Registry, definition: &str) -> Result<Validator, OpenApiError> {
    let pointer = definition.replace('~', "~0").replace('/', "~1");
    let root = serde_json::json!({
        "$ref": format!("{}#/definitions/{}", DEFINITIONS_BASE_URI, pointer)
    });

    jsonschema::options()
        .with_registry(registry.clone())
        .build(&root)
        .map_err(|e| OpenApiError::ValidatorBuild {
            definition: definition.to_string(),
            reason: e.to_string(),
        })
}

/// Formats instance path from JSON Schema validation error
pub fn format_instance_location(instance_path: &str, prefix: &str) -> String {
    if instance_path.is_empty() {
        prefix.to_string()
    } else {
        format!("{}{}", prefix, instance_path)
    }
}

/// Checks documents against one registered definition
pub struct DefinitionValidator {
    name: String,
    validator: Validator,
}

impl DefinitionValidator {
    pub(crate) fn new(name: &str, registry: &Registry) -> Result<Self, OpenApiError> {
        Ok(Self {
            name: name.to_string(),
            validator: build_validator(registry, name)?,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_valid(&self, instance: &Value) -> bool {
        self.validator.is_valid(instance)
    }

    /// Validates `instance`, reporting every violation with its location
    pub fn validate(&self, instance: &Value) -> Result<(), OpenApiError> {
        if self.validator.is_valid(instance) {
            return Ok(());
        }

        let violations: Vec<String> = self
            .validator
            .iter_errors(instance)
            .map(|e| {
                let location = format_instance_location(&e.instance_path.to_string(), "document");
                format!("[{}] at {} - {}", self.name, location, e)
            })
            .collect();

        Err(OpenApiError::ValidationFailed(violations.join("; ")))
    }
}

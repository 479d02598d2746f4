use crate::error::OpenApiError;
use crate::spec::document::{Parameter, ReferenceOr, Response, Schema, Swagger};
use indexmap::IndexMap;

pub const DEFINITIONS_PREFIX: &str = "#/definitions/";
pub const PARAMETERS_PREFIX: &str = "#/parameters/";
pub const RESPONSES_PREFIX: &str = "#/responses/";

/// Resolves document-level `$ref` to the shared objects of a Swagger document
///
/// Handles references like:
/// - `$ref: "#/parameters/namespace"`
/// - `$ref: "#/responses/NotFound"`
///
/// References inside schemas (`#/definitions/...`) are left to
/// [`resolve_definition`] or the JSON Schema registry used for validation.
pub trait ResolveReference<T> {
    fn resolve<'a>(&'a self, doc: &'a Swagger) -> Result<&'a T, OpenApiError>;
}

/// Strips `prefix` from `reference` and looks the remainder up in `map`
fn resolve_logic<'a, T>(
    reference: &str,
    prefix: &str,
    map: &'a IndexMap<String, T>,
) -> Result<&'a T, OpenApiError> {
    let name = reference.strip_prefix(prefix).ok_or_else(|| {
        OpenApiError::Schema(format!(
            "Invalid reference: {}. Expected prefix: {}",
            reference, prefix
        ))
    })?;

    map.get(name)
        .ok_or_else(|| OpenApiError::Schema(format!("Reference not found: {}", reference)))
}

impl ResolveReference<Parameter> for ReferenceOr<Parameter> {
    fn resolve<'a>(&'a self, doc: &'a Swagger) -> Result<&'a Parameter, OpenApiError> {
        match self {
            ReferenceOr::Item(item) => Ok(item),
            ReferenceOr::Reference { reference } => {
                resolve_logic(reference, PARAMETERS_PREFIX, &doc.parameters)
            }
        }
    }
}

impl ResolveReference<Response> for ReferenceOr<Response> {
    fn resolve<'a>(&'a self, doc: &'a Swagger) -> Result<&'a Response, OpenApiError> {
        match self {
            ReferenceOr::Item(item) => Ok(item),
            ReferenceOr::Reference { reference } => {
                resolve_logic(reference, RESPONSES_PREFIX, &doc.responses)
            }
        }
    }
}

/// Resolves a `#/definitions/<name>` reference against `definitions`
pub fn resolve_definition<'a>(
    reference: &str,
    definitions: &'a IndexMap<String, Schema>,
) -> Result<&'a Schema, OpenApiError> {
    resolve_logic(reference, DEFINITIONS_PREFIX, definitions)
}

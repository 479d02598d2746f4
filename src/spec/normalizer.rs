use crate::error::OpenApiError;
use crate::spec::document::Swagger;
use serde::Deserialize;
use serde_json::{Map, Number, Value};
use serde_yaml::Value as YamlValue;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Load and parse an OpenAPI v2 definition from a YAML (or JSON) file
///
/// The whole first document is used as the OpenAPI object.
///
/// # Errors
/// Returns error if the file cannot be read, is not YAML, or does not
/// describe a valid OpenAPI v2 object
pub fn schema_from_file(path: &Path) -> Result<Swagger, OpenApiError> {
    let bytes = fs::read(path).map_err(|e| OpenApiError::io(path, e))?;
    schema_from_yaml(&bytes, Some(path))
}

/// Normalize a YAML document into a structured OpenAPI v2 object
///
/// The document goes YAML tree → YAML text → generic value → JSON → typed,
/// so the final decode only ever sees JSON-compatible shapes.
pub fn schema_from_yaml(bytes: &[u8], origin: Option<&Path>) -> Result<Swagger, OpenApiError> {
    let tree = parse_document(bytes, origin)?;

    let text = serde_yaml::to_string(&tree)
        .map_err(|e| OpenApiError::Schema(format!("failed to re-encode YAML document: {}", e)))?;

    let generic: YamlValue = serde_yaml::from_str(&text)
        .map_err(|e| OpenApiError::Schema(format!("failed to decode YAML document: {}", e)))?;

    let json = serde_json::to_vec(&yaml_to_json(generic)?)
        .map_err(|e| OpenApiError::Schema(format!("failed to encode JSON: {}", e)))?;
    debug!(bytes = json.len(), "normalized OpenAPI document to JSON");

    Swagger::from_json_slice(&json)
}

/// Parses the first YAML document of `bytes`; later documents are ignored
fn parse_document(bytes: &[u8], origin: Option<&Path>) -> Result<YamlValue, OpenApiError> {
    let Some(document) = serde_yaml::Deserializer::from_slice(bytes).next() else {
        return Ok(YamlValue::Null);
    };

    YamlValue::deserialize(document).map_err(|e| OpenApiError::Parse {
        origin: match origin {
            Some(path) => format!("file {:?}", path.display().to_string()),
            None => "YAML document".to_string(),
        },
        source: e,
    })
}

/// Converts a generic YAML value into its JSON equivalent
///
/// Scalar mapping keys are stringified and tags are dropped. Keys that are
/// themselves collections and non-finite floats have no JSON form.
pub fn yaml_to_json(value: YamlValue) -> Result<Value, OpenApiError> {
    Ok(match value {
        YamlValue::Null => Value::Null,
        YamlValue::Bool(b) => Value::Bool(b),
        YamlValue::Number(n) => Value::Number(yaml_number_to_json(&n)?),
        YamlValue::String(s) => Value::String(s),
        YamlValue::Sequence(items) => Value::Array(
            items
                .into_iter()
                .map(yaml_to_json)
                .collect::<Result<Vec<_>, _>>()?,
        ),
        YamlValue::Mapping(mapping) => {
            let mut object = Map::with_capacity(mapping.len());
            for (key, value) in mapping {
                object.insert(yaml_key_to_string(key)?, yaml_to_json(value)?);
            }
            Value::Object(object)
        }
        YamlValue::Tagged(tagged) => yaml_to_json(tagged.value)?,
    })
}

fn yaml_number_to_json(n: &serde_yaml::Number) -> Result<Number, OpenApiError> {
    if let Some(i) = n.as_i64() {
        Ok(Number::from(i))
    } else if let Some(u) = n.as_u64() {
        Ok(Number::from(u))
    } else {
        n.as_f64()
            .and_then(Number::from_f64)
            .ok_or_else(|| OpenApiError::Schema(format!("number {} has no JSON representation", n)))
    }
}

fn yaml_key_to_string(key: YamlValue) -> Result<String, OpenApiError> {
    match key {
        YamlValue::String(s) => Ok(s),
        YamlValue::Bool(b) => Ok(b.to_string()),
        YamlValue::Number(n) => Ok(n.to_string()),
        YamlValue::Null => Ok("null".to_string()),
        YamlValue::Tagged(tagged) => yaml_key_to_string(tagged.value),
        YamlValue::Sequence(_) | YamlValue::Mapping(_) => Err(OpenApiError::Schema(
            "mapping keys must be scalars to convert to JSON".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn minimal_document_normalizes() {
        let doc = schema_from_yaml(br#"{"swagger":"2.0","paths":{}}"#, None).unwrap();
        assert_eq!(doc.swagger, "2.0");
        assert!(doc.paths.is_empty());
    }

    #[test]
    fn malformed_yaml_is_a_parse_error() {
        let err = schema_from_yaml(b"{\"swagger\": \"2.0\"", None).unwrap_err();
        assert!(matches!(err, OpenApiError::Parse { .. }), "{err}");
    }

    #[test]
    fn only_the_first_document_is_used() {
        let doc = schema_from_yaml(b"swagger: '2.0'\npaths: {}\n---\na: 1\n", None).unwrap();
        assert_eq!(doc.swagger, "2.0");
        assert!(doc.extensions.is_empty());
    }

    #[test]
    fn scalar_document_is_a_schema_error() {
        let err = schema_from_yaml(b"42", None).unwrap_err();
        assert!(matches!(err, OpenApiError::Schema(_)), "{err}");
    }

    #[test]
    fn yaml_only_constructs_are_accepted() {
        let yaml = br##"
# comments are fine
swagger: "2.0"
info: &info
  title: demo
  version: "1"
x-copy: *info
paths:
  /items:
    get:
      responses:
        200:
          description: OK
          schema:
            $ref: "#/definitions/Item"
definitions:
  Item:
    type: object
    required: [name]
    properties:
      name:
        type: string
        description: >
          folded
          text
"##;
        let doc = schema_from_yaml(yaml, None).unwrap();

        let get = doc.paths["/items"].get.as_ref().unwrap();
        assert!(get.responses.contains_key("200"));
        assert_eq!(doc.extensions["x-copy"]["title"], "demo");
        let name = &doc.definitions["Item"].properties["name"];
        assert_eq!(name.description.as_deref(), Some("folded text\n"));
    }

    #[test]
    fn collection_keys_are_rejected() {
        let err = yaml_to_json(serde_yaml::from_str("? [a, b]\n: 1\n").unwrap()).unwrap_err();
        assert!(matches!(err, OpenApiError::Schema(_)));
    }

    #[test]
    fn non_finite_numbers_are_rejected() {
        let err = yaml_to_json(serde_yaml::from_str("x: .inf").unwrap()).unwrap_err();
        assert!(err.to_string().contains("JSON"));
    }

    #[test]
    fn file_parse_error_names_the_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "paths: [").unwrap();

        let err = schema_from_file(file.path()).unwrap_err();
        assert!(matches!(err, OpenApiError::Parse { .. }));
        assert!(err.to_string().contains(&file.path().display().to_string()));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = schema_from_file(Path::new("/definitely/not/here.yaml")).unwrap_err();
        assert!(matches!(err, OpenApiError::Io { .. }));
        assert!(err.to_string().contains("/definitely/not/here.yaml"));
    }
}

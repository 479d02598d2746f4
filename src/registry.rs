//! In-memory registry of the active OpenAPI schema.
//!
//! The registry replaces process-global state: the hosting application owns
//! one `SchemaRegistry` and hands it by reference to everything that needs
//! type information. It starts out answering from the built-in schema; once
//! a schema from another source is configured the built-in schema is
//! suppressed for good and lookups only see merged documents.

use crate::error::OpenApiError;
use crate::spec::document::{GroupVersionKind, PathItem, Schema, Swagger};
use crate::spec::reference_resolver::resolve_definition;
use crate::validation::{build_registry, DefinitionValidator};
use indexmap::IndexMap;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Built-in default schema shipped with the crate
pub const BUILTIN_SCHEMA: &[u8] = include_bytes!("../assets/builtin/swagger.json");

/// Companion schema merged after every configured schema
pub const AUXILIARY_SCHEMA: &[u8] = include_bytes!("../assets/kustomizationapi/swagger.json");

const NAMESPACED_PATH_SEGMENT: &str = "/namespaces/{namespace}/";

/// Definitions, paths and the kind index built from merged documents
#[derive(Debug, Clone, Default, PartialEq)]
struct SchemaSet {
    definitions: IndexMap<String, Schema>,
    paths: IndexMap<String, PathItem>,
    kinds: BTreeMap<GroupVersionKind, String>,
    namespaced: BTreeMap<GroupVersionKind, bool>,
}

impl SchemaSet {
    fn merge(&mut self, doc: Swagger) {
        for (path, item) in doc.paths {
            for (_, operation) in item.iter() {
                if let Some(gvk) = operation.group_version_kind() {
                    let namespaced = path.contains(NAMESPACED_PATH_SEGMENT);
                    let entry = self.namespaced.entry(gvk).or_insert(namespaced);
                    *entry |= namespaced;
                }
            }
            self.paths.insert(path, item);
        }

        for (name, schema) in doc.definitions {
            for gvk in schema.group_version_kinds() {
                self.kinds.insert(gvk, name.clone());
            }
            match self.definitions.get(&name) {
                Some(existing) if *existing != schema => {
                    warn!(definition = %name, "replacing previously registered definition");
                }
                _ => {}
            }
            self.definitions.insert(name, schema);
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SchemaRegistry {
    builtin: SchemaSet,
    builtin_active: bool,
    active: SchemaSet,
    auxiliary: Vec<u8>,
}

impl Default for SchemaRegistry {
    /// Registry backed by the bundled built-in and auxiliary schemas
    fn default() -> Self {
        Self::new(BUILTIN_SCHEMA).expect("bundled built-in schema is a valid OpenAPI v2 document")
    }
}

impl SchemaRegistry {
    /// Creates a registry whose default state answers from `builtin`
    pub fn new(builtin: &[u8]) -> Result<Self, OpenApiError> {
        let mut set = SchemaSet::default();
        set.merge(Swagger::from_json_slice(builtin)?);

        Ok(Self {
            builtin: set,
            builtin_active: true,
            active: SchemaSet::default(),
            auxiliary: AUXILIARY_SCHEMA.to_vec(),
        })
    }

    /// Creates a registry with no built-in schema at all
    pub fn empty() -> Self {
        Self {
            builtin: SchemaSet::default(),
            builtin_active: true,
            active: SchemaSet::default(),
            auxiliary: AUXILIARY_SCHEMA.to_vec(),
        }
    }

    /// Replaces the schema merged after every configured schema
    pub fn with_auxiliary(mut self, auxiliary: impl Into<Vec<u8>>) -> Self {
        self.auxiliary = auxiliary.into();
        self
    }

    pub fn auxiliary(&self) -> &[u8] {
        &self.auxiliary
    }

    /// Stops consulting the built-in schema
    pub fn suppress_builtin(&mut self) {
        if self.builtin_active {
            debug!("suppressing built-in OpenAPI schema");
        }
        self.builtin_active = false;
    }

    pub fn is_builtin_active(&self) -> bool {
        self.builtin_active
    }

    /// Decodes a JSON OpenAPI v2 document and adds it to the active schema
    ///
    /// # Errors
    /// Returns `OpenApiError::Schema` if `raw` is not a valid document; the
    /// registry is left unchanged in that case
    pub fn merge(&mut self, raw: &[u8]) -> Result<(), OpenApiError> {
        let doc = Swagger::from_json_slice(raw)?;
        debug!(
            definitions = doc.definitions.len(),
            paths = doc.paths.len(),
            "merging OpenAPI schema"
        );
        self.merge_document(doc);
        Ok(())
    }

    /// Adds an already decoded document to the active schema
    pub fn merge_document(&mut self, doc: Swagger) {
        self.active.merge(doc);
    }

    fn sets(&self) -> impl Iterator<Item = &SchemaSet> {
        std::iter::once(&self.active).chain(self.builtin_active.then_some(&self.builtin))
    }

    pub fn definition(&self, name: &str) -> Option<&Schema> {
        self.sets().find_map(|set| set.definitions.get(name))
    }

    /// Resolves a `#/definitions/<name>` reference
    pub fn resolve_ref(&self, reference: &str) -> Result<&Schema, OpenApiError> {
        let mut last_err = None;
        for set in self.sets() {
            match resolve_definition(reference, &set.definitions) {
                Ok(schema) => return Ok(schema),
                Err(e) => last_err = Some(e),
            }
        }
        Err(last_err.unwrap_or_else(|| OpenApiError::UnknownDefinition(reference.to_string())))
    }

    pub fn path(&self, template: &str) -> Option<&PathItem> {
        self.sets().find_map(|set| set.paths.get(template))
    }

    /// Names of every definition currently visible, sorted
    pub fn definition_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .sets()
            .flat_map(|set| set.definitions.keys().map(String::as_str))
            .collect();
        names.sort_unstable();
        names.dedup();
        names
    }

    /// Finds the definition declared for a resource type
    pub fn schema_for_kind(&self, gvk: &GroupVersionKind) -> Option<(&str, &Schema)> {
        self.sets().find_map(|set| {
            let name = set.kinds.get(gvk)?;
            set.definitions.get(name).map(|schema| (name.as_str(), schema))
        })
    }

    /// Whether a resource type lives in namespaces, if any path tells
    pub fn is_namespace_scoped(&self, gvk: &GroupVersionKind) -> Option<bool> {
        self.sets().find_map(|set| set.namespaced.get(gvk).copied())
    }

    /// Compiles a validator for the named definition
    pub fn validator(&self, name: &str) -> Result<DefinitionValidator, OpenApiError> {
        if self.definition(name).is_none() {
            return Err(OpenApiError::UnknownDefinition(name.to_string()));
        }

        let mut definitions: IndexMap<String, Value> = IndexMap::new();
        // Active definitions shadow built-in ones, so insert them last.
        let sets: Vec<&SchemaSet> = self.sets().collect();
        for set in sets.into_iter().rev() {
            for (def_name, schema) in &set.definitions {
                let value = serde_json::to_value(schema).map_err(|e| {
                    OpenApiError::Schema(format!("Failed to convert {} to JSON: {}", def_name, e))
                })?;
                definitions.insert(def_name.clone(), value);
            }
        }

        let registry = build_registry(&definitions)?;
        DefinitionValidator::new(name, &registry)
    }
}

//! Schema registry - declarative field requirements per document type
//!
//! Schemas are authored once at construction time and never mutated
//! afterwards. Each mapper/validator instance owns its own registry, so
//! tests can build custom registries without touching shared state.

use std::collections::HashMap;
use thiserror::Error;

/// Required/optional field names for one section of a document
#[derive(Debug, Clone, Default)]
pub struct SectionSchema {
    required: Vec<String>,
    optional: Vec<String>,
}

impl SectionSchema {
    pub fn new(required: &[&str], optional: &[&str]) -> Self {
        Self {
            required: required.iter().map(|s| s.to_string()).collect(),
            optional: optional.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Required field names, in declaration order
    pub fn required(&self) -> &[String] {
        &self.required
    }

    /// Optional field names, in declaration order
    pub fn optional(&self) -> &[String] {
        &self.optional
    }
}

/// Field requirements for one document type
#[derive(Debug, Clone, Default)]
pub struct DocumentSchema {
    /// Top-level sections that must be present (e.g. metadata, data)
    required_sections: Vec<String>,

    /// Nested schema for the metadata section
    metadata: Option<SectionSchema>,

    /// Nested schema for the visualization section (required fields apply
    /// only when the section itself is present)
    visualization: Option<SectionSchema>,

    /// Flat field schema for documents without nested sections
    fields: Option<SectionSchema>,
}

impl DocumentSchema {
    /// Schema for a structured document with metadata/visualization/data
    pub fn structured(
        required_sections: &[&str],
        metadata: SectionSchema,
        visualization: SectionSchema,
    ) -> Self {
        Self {
            required_sections: required_sections.iter().map(|s| s.to_string()).collect(),
            metadata: Some(metadata),
            visualization: Some(visualization),
            fields: None,
        }
    }

    /// Schema for a flat document (fields directly under the root)
    pub fn flat(fields: SectionSchema) -> Self {
        Self {
            required_sections: Vec::new(),
            metadata: None,
            visualization: None,
            fields: Some(fields),
        }
    }

    pub fn required_sections(&self) -> &[String] {
        &self.required_sections
    }

    pub fn metadata(&self) -> Option<&SectionSchema> {
        self.metadata.as_ref()
    }

    pub fn visualization(&self) -> Option<&SectionSchema> {
        self.visualization.as_ref()
    }

    pub fn fields(&self) -> Option<&SectionSchema> {
        self.fields.as_ref()
    }
}

/// Errors raised by schema lookup
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("no schema registered for type: '{0}'")]
    NotFound(String),
}

/// Lookup table of document schemas by type name
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    schemas: HashMap<String, DocumentSchema>,
}

impl SchemaRegistry {
    /// Create an empty registry (useful for tests with custom schemas)
    pub fn empty() -> Self {
        Self {
            schemas: HashMap::new(),
        }
    }

    /// Create a registry with the two built-in schemas: dataset, category
    pub fn builtin() -> Self {
        let mut registry = Self::empty();

        registry.register(
            "dataset",
            DocumentSchema::structured(
                &["metadata", "data"],
                SectionSchema::new(
                    &[
                        "title",
                        "description",
                        "category",
                        "source",
                        "updated",
                        "license",
                    ],
                    &["tags", "contact", "frequency"],
                ),
                SectionSchema::new(&["type"], &["config", "template"]),
            ),
        );

        registry.register(
            "category",
            DocumentSchema::flat(SectionSchema::new(
                &["name", "description"],
                &["icon", "color", "parent"],
            )),
        );

        registry
    }

    /// Register a schema under the given type name
    pub fn register(&mut self, type_name: &str, schema: DocumentSchema) {
        self.schemas.insert(type_name.to_string(), schema);
    }

    /// Look up the schema for a document type
    pub fn get(&self, type_name: &str) -> Result<&DocumentSchema, SchemaError> {
        self.schemas
            .get(type_name)
            .ok_or_else(|| SchemaError::NotFound(type_name.to_string()))
    }

    /// Whether a schema is registered for the given type
    pub fn contains(&self, type_name: &str) -> bool {
        self.schemas.contains_key(type_name)
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

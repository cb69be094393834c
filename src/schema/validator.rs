//! Post-mapping validation against the schema registry
//!
//! Hard violations abort with a ValidationError; soft violations
//! accumulate as warnings and never stop processing.

use miette::Diagnostic;
use thiserror::Error;

use crate::model::{Category, Dataset};
use crate::schema::registry::{SchemaError, SchemaRegistry};

/// Categories the portal recognizes. Others are accepted with a warning.
pub const KNOWN_CATEGORIES: &[&str] = &[
    "Demografia",
    "Economia",
    "Educacion",
    "Finanzas",
    "Transporte",
    "Medio Ambiente",
    "Cultura",
    "Deportes",
    "Salud",
    "Seguridad",
];

/// Licenses the portal recommends. Others are accepted with a warning.
pub const KNOWN_LICENSES: &[&str] = &[
    "CC BY 4.0",
    "CC BY-SA 4.0",
    "CC0 1.0",
    "ODbL",
    "Public Domain",
];

/// A hard schema violation
#[derive(Debug, Error, Diagnostic)]
pub enum ValidationError {
    #[error("missing required section: {0}")]
    #[diagnostic(code(plaza::validate::missing_section))]
    MissingSection(String),

    #[error("missing required metadata field: {0}")]
    #[diagnostic(
        code(plaza::validate::missing_field),
        help("required metadata fields must be present and non-blank")
    )]
    MissingMetadataField(String),

    #[error("missing required field: {0}")]
    #[diagnostic(code(plaza::validate::missing_field))]
    MissingField(String),

    #[error("data section cannot be empty")]
    #[diagnostic(code(plaza::validate::empty_data))]
    EmptyData,

    #[error(transparent)]
    #[diagnostic(code(plaza::validate::unknown_schema))]
    UnknownSchema(#[from] SchemaError),
}

/// A soft schema violation - flagged, never fatal
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// metadata.category outside the known set
    UnknownCategory(String),
    /// metadata.license outside the recommended set
    UnknownLicense(String),
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Warning::UnknownCategory(value) => {
                write!(f, "category '{}' is not in the standard list", value)
            }
            Warning::UnknownLicense(value) => {
                write!(f, "license '{}' is not in the recommended list", value)
            }
        }
    }
}

/// Validator over the mapped model
pub struct Validator {
    registry: SchemaRegistry,
}

impl Validator {
    /// Create a validator with its own copy of the registry
    pub fn new(registry: &SchemaRegistry) -> Self {
        Self {
            registry: registry.clone(),
        }
    }

    /// Validate a mapped dataset. Returns accumulated warnings, or the
    /// first hard violation.
    pub fn validate_dataset(&self, dataset: &Dataset) -> Result<Vec<Warning>, ValidationError> {
        let schema = self.registry.get("dataset")?;

        for section in schema.required_sections() {
            // metadata and visualization presence is structural in the
            // typed model; data can still be null if built by hand
            if section == "data" && dataset.data.is_null() {
                return Err(ValidationError::MissingSection(section.clone()));
            }
        }

        if let Some(metadata_schema) = schema.metadata() {
            for field in metadata_schema.required() {
                if self.metadata_field_blank(dataset, field) {
                    return Err(ValidationError::MissingMetadataField(field.clone()));
                }
            }
        }

        if dataset
            .data
            .as_array()
            .is_some_and(|records| records.is_empty())
        {
            return Err(ValidationError::EmptyData);
        }

        let mut warnings = Vec::new();

        if !KNOWN_CATEGORIES.contains(&dataset.metadata.category.as_str()) {
            warnings.push(Warning::UnknownCategory(dataset.metadata.category.clone()));
        }

        if !KNOWN_LICENSES.contains(&dataset.metadata.license.as_str()) {
            warnings.push(Warning::UnknownLicense(dataset.metadata.license.clone()));
        }

        Ok(warnings)
    }

    /// Validate a mapped category
    pub fn validate_category(&self, category: &Category) -> Result<Vec<Warning>, ValidationError> {
        let schema = self.registry.get("category")?;

        if let Some(fields) = schema.fields() {
            for field in fields.required() {
                let value = match field.as_str() {
                    "name" => Some(category.name.as_str()),
                    "description" => Some(category.description.as_str()),
                    _ => None,
                };
                if value.is_some_and(|v| v.trim().is_empty()) {
                    return Err(ValidationError::MissingField(field.clone()));
                }
            }
        }

        Ok(Vec::new())
    }

    /// Whether a required metadata field is blank after trimming.
    /// `updated` is a typed date and cannot be blank.
    fn metadata_field_blank(&self, dataset: &Dataset, field: &str) -> bool {
        let value = match field {
            "title" => &dataset.metadata.title,
            "description" => &dataset.metadata.description,
            "category" => &dataset.metadata.category,
            "source" => &dataset.metadata.source,
            "license" => &dataset.metadata.license,
            _ => return false,
        };
        value.trim().is_empty()
    }
}

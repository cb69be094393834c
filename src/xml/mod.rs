//! XML mapping layer - document text to model and back

pub mod coerce;
pub mod csv;
pub mod parser;
pub mod starter;
pub mod writer;

pub use parser::{Parsed, XmlMapper};
pub use starter::starter_template;
pub use writer::{category_to_xml, dataset_to_xml, escape_xml};

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

use crate::schema::registry::SchemaError;
use crate::schema::validator::ValidationError;

/// Errors raised while mapping XML text to the document model
#[derive(Debug, Error, Diagnostic)]
pub enum ParseError {
    #[error("malformed XML: {message}")]
    #[diagnostic(code(plaza::xml::malformed))]
    MalformedXml {
        message: String,

        #[source_code]
        src: NamedSource<String>,

        #[label("syntax error here")]
        span: SourceSpan,
    },

    #[error("unknown schema type: {0}")]
    #[diagnostic(code(plaza::xml::unknown_schema_type))]
    UnknownSchemaType(String),

    #[error("missing required section: {0}")]
    #[diagnostic(code(plaza::xml::missing_section))]
    MissingSection(String),

    #[error("missing required metadata field: {0}")]
    #[diagnostic(code(plaza::xml::missing_field))]
    MissingMetadataField(String),

    #[error("missing required field: {0}")]
    #[diagnostic(code(plaza::xml::missing_field))]
    MissingField(String),

    #[error("invalid date format in updated field: '{0}' (expected YYYY-MM-DD)")]
    #[diagnostic(
        code(plaza::xml::invalid_date),
        help("the date must match YYYY-MM-DD and denote a real calendar day")
    )]
    InvalidDate(String),

    #[error("missing required visualization type")]
    #[diagnostic(code(plaza::xml::missing_viz_type))]
    MissingVisualizationType,

    #[error("invalid visualization type: {0}")]
    #[diagnostic(
        code(plaza::xml::invalid_viz_type),
        help("valid types: bar, line, pie, doughnut, scatter, area, map, table, heatmap")
    )]
    InvalidVisualizationType(String),

    #[error("invalid JSON data format")]
    #[diagnostic(code(plaza::xml::invalid_json))]
    InvalidJsonData(#[source] serde_json::Error),

    #[error("CSV must have header and at least one data row")]
    #[diagnostic(code(plaza::xml::csv_too_short))]
    CsvTooShort,

    #[error("row {row} has {got} values but expected {expected}")]
    #[diagnostic(code(plaza::xml::csv_row_shape))]
    CsvRowShape {
        row: usize,
        got: usize,
        expected: usize,
    },

    #[error("no valid data format found (use json, csv, record, or item elements)")]
    #[diagnostic(code(plaza::xml::no_data_format))]
    NoDataFormat,

    #[error(transparent)]
    #[diagnostic(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    #[diagnostic(code(plaza::xml::schema))]
    Schema(#[from] SchemaError),
}

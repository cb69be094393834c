//! Dataset entity type - the parse target for dataset XML documents

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::core::identity::{DocumentId, DocumentKind};

/// Visualization type drawn from the portal's fixed enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    Bar,
    Line,
    Pie,
    Doughnut,
    Scatter,
    Area,
    Map,
    Table,
    Heatmap,
}

impl ChartType {
    /// Get all valid chart types
    pub fn all() -> &'static [ChartType] {
        &[
            ChartType::Bar,
            ChartType::Line,
            ChartType::Pie,
            ChartType::Doughnut,
            ChartType::Scatter,
            ChartType::Area,
            ChartType::Map,
            ChartType::Table,
            ChartType::Heatmap,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ChartType::Bar => "bar",
            ChartType::Line => "line",
            ChartType::Pie => "pie",
            ChartType::Doughnut => "doughnut",
            ChartType::Scatter => "scatter",
            ChartType::Area => "area",
            ChartType::Map => "map",
            ChartType::Table => "table",
            ChartType::Heatmap => "heatmap",
        }
    }
}

impl std::fmt::Display for ChartType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ChartType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bar" => Ok(ChartType::Bar),
            "line" => Ok(ChartType::Line),
            "pie" => Ok(ChartType::Pie),
            "doughnut" => Ok(ChartType::Doughnut),
            "scatter" => Ok(ChartType::Scatter),
            "area" => Ok(ChartType::Area),
            "map" => Ok(ChartType::Map),
            "table" => Ok(ChartType::Table),
            "heatmap" => Ok(ChartType::Heatmap),
            _ => Err(format!("Unknown chart type: {}", s)),
        }
    }
}

/// Descriptive metadata for a dataset
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metadata {
    /// Dataset title
    pub title: String,

    /// Long-form description
    pub description: String,

    /// Thematic category (soft-validated against the known set)
    pub category: String,

    /// Data source / publishing office
    pub source: String,

    /// Last update date (strict YYYY-MM-DD)
    pub updated: NaiveDate,

    /// Publication license (soft-validated against the known set)
    pub license: String,

    /// Free-form tags
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    /// Contact address for the dataset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,

    /// Update frequency
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<String>,
}

/// Chart configuration attached to a dataset
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Visualization {
    /// Chart type
    #[serde(rename = "type")]
    pub chart_type: ChartType,

    /// Open key/value chart options (scalars or embedded JSON structures)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub config: BTreeMap<String, Value>,

    /// Page template reference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
}

/// A dataset document: metadata, optional visualization, and payload data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dataset {
    /// Unique identifier, generated at parse time
    pub id: DocumentId,

    /// Descriptive metadata
    pub metadata: Metadata,

    /// Optional chart configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visualization: Option<Visualization>,

    /// Payload data: a sequence of records or a single structured object.
    /// Never null and never an empty sequence after a successful parse.
    pub data: Value,
}

impl Dataset {
    /// Create a dataset with a freshly generated id
    pub fn new(metadata: Metadata, visualization: Option<Visualization>, data: Value) -> Self {
        Self {
            id: DocumentId::new(DocumentKind::Dataset),
            metadata,
            visualization,
            data,
        }
    }

    /// Number of records, when the payload is a sequence
    pub fn record_count(&self) -> Option<usize> {
        self.data.as_array().map(Vec::len)
    }
}

//! Document model types

pub mod category;
pub mod dataset;

pub use category::Category;
pub use dataset::{ChartType, Dataset, Metadata, Visualization};

use serde::Serialize;

/// A parsed document of either built-in type
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Document {
    Dataset(Dataset),
    Category(Category),
}

impl Document {
    /// Dataset accessor, when this document is a dataset
    pub fn as_dataset(&self) -> Option<&Dataset> {
        match self {
            Document::Dataset(ds) => Some(ds),
            Document::Category(_) => None,
        }
    }

    /// Category accessor, when this document is a category
    pub fn as_category(&self) -> Option<&Category> {
        match self {
            Document::Category(cat) => Some(cat),
            Document::Dataset(_) => None,
        }
    }
}

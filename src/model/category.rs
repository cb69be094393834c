//! Category entity type

use serde::{Deserialize, Serialize};

use crate::core::identity::{DocumentId, DocumentKind};

/// A thematic category grouping datasets
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    /// Unique identifier, generated at parse time
    pub id: DocumentId,

    /// Display name
    pub name: String,

    /// Long-form description
    pub description: String,

    /// Icon (emoji or glyph reference)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,

    /// Accent color (hex)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    /// Parent category name, for nested taxonomies
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
}

impl Category {
    /// Create a category with a freshly generated id
    pub fn new(name: String, description: String) -> Self {
        Self {
            id: DocumentId::new(DocumentKind::Category),
            name,
            description,
            icon: None,
            color: None,
            parent: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_roundtrip() {
        let mut cat = Category::new("Transporte".to_string(), "Movilidad urbana".to_string());
        cat.icon = Some("🚌".to_string());

        let text = serde_json::to_string(&cat).unwrap();
        let parsed: Category = serde_json::from_str(&text).unwrap();

        assert_eq!(cat.id, parsed.id);
        assert_eq!(parsed.name, "Transporte");
        assert_eq!(parsed.icon.as_deref(), Some("🚌"));
        assert!(parsed.parent.is_none());
    }

    #[test]
    fn test_category_optional_fields_skipped() {
        let cat = Category::new("Salud".to_string(), "Sanidad".to_string());
        let text = serde_json::to_string(&cat).unwrap();
        assert!(!text.contains("icon"));
        assert!(!text.contains("parent"));
    }
}

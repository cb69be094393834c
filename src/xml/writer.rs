//! Model-to-XML serializer
//!
//! The inverse mapping. Field order is deterministic: metadata fields in
//! declaration order, then visualization (type, config, template), then
//! the data payload. Data is always normalized to an embedded json block
//! regardless of how the source document expressed it, so round-trips
//! hold at the model level rather than the text level.

use serde_json::Value;

use crate::model::{Category, Dataset};

/// Escape XML reserved characters in free text
pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

fn push_field(xml: &mut String, indent: &str, tag: &str, value: &str) {
    xml.push_str(indent);
    xml.push('<');
    xml.push_str(tag);
    xml.push('>');
    xml.push_str(&escape_xml(value));
    xml.push_str("</");
    xml.push_str(tag);
    xml.push_str(">\n");
}

/// Serialize a dataset to XML text
pub fn dataset_to_xml(dataset: &Dataset) -> String {
    let mut xml = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<dataset>\n");

    xml.push_str("  <metadata>\n");
    let meta = &dataset.metadata;
    push_field(&mut xml, "    ", "title", &meta.title);
    push_field(&mut xml, "    ", "description", &meta.description);
    push_field(&mut xml, "    ", "category", &meta.category);
    push_field(&mut xml, "    ", "source", &meta.source);
    push_field(
        &mut xml,
        "    ",
        "updated",
        &meta.updated.format("%Y-%m-%d").to_string(),
    );
    push_field(&mut xml, "    ", "license", &meta.license);
    if !meta.tags.is_empty() {
        push_field(&mut xml, "    ", "tags", &meta.tags.join(", "));
    }
    if let Some(contact) = &meta.contact {
        push_field(&mut xml, "    ", "contact", contact);
    }
    if let Some(frequency) = &meta.frequency {
        push_field(&mut xml, "    ", "frequency", frequency);
    }
    xml.push_str("  </metadata>\n");

    if let Some(viz) = &dataset.visualization {
        xml.push_str("  <visualization>\n");
        push_field(&mut xml, "    ", "type", viz.chart_type.as_str());

        if !viz.config.is_empty() {
            xml.push_str("    <config>\n");
            for (key, value) in &viz.config {
                match value {
                    // structured values are re-serialized as embedded JSON
                    Value::Object(_) | Value::Array(_) => {
                        xml.push_str("      <");
                        xml.push_str(key);
                        xml.push('>');
                        xml.push_str(&value.to_string());
                        xml.push_str("</");
                        xml.push_str(key);
                        xml.push_str(">\n");
                    }
                    Value::String(text) => push_field(&mut xml, "      ", key, text),
                    other => push_field(&mut xml, "      ", key, &other.to_string()),
                }
            }
            xml.push_str("    </config>\n");
        }

        if let Some(template) = &viz.template {
            push_field(&mut xml, "    ", "template", template);
        }
        xml.push_str("  </visualization>\n");
    }

    xml.push_str("  <data>\n    <json>\n");
    xml.push_str(&serde_json::to_string_pretty(&dataset.data).unwrap_or_else(|_| "null".into()));
    xml.push_str("\n    </json>\n  </data>\n");

    xml.push_str("</dataset>");
    xml
}

/// Serialize a category to XML text
pub fn category_to_xml(category: &Category) -> String {
    let mut xml = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<category>\n");

    push_field(&mut xml, "  ", "name", &category.name);
    push_field(&mut xml, "  ", "description", &category.description);
    if let Some(icon) = &category.icon {
        push_field(&mut xml, "  ", "icon", icon);
    }
    if let Some(color) = &category.color {
        push_field(&mut xml, "  ", "color", color);
    }
    if let Some(parent) = &category.parent {
        push_field(&mut xml, "  ", "parent", parent);
    }

    xml.push_str("</category>");
    xml
}

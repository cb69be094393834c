//! XML-to-model mapper
//!
//! Walks a parsed XML tree and produces the typed document model,
//! consulting the schema registry for field requirements and applying the
//! shared coercion rules to leaf text. Each mapper owns its registry;
//! parsing holds no state across calls.

use chrono::NaiveDate;
use miette::NamedSource;
use roxmltree::{Document as XmlDocument, Node};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::collections::HashMap;

use crate::model::{Category, ChartType, Dataset, Document, Metadata, Visualization};
use crate::schema::registry::{SchemaRegistry, SectionSchema};
use crate::schema::validator::{Validator, Warning};
use crate::xml::{coerce, csv, ParseError};

/// A successfully mapped model plus the soft violations found on the way
#[derive(Debug)]
pub struct Parsed<T> {
    pub model: T,
    pub warnings: Vec<Warning>,
}

impl<T> Parsed<T> {
    fn new(model: T, warnings: Vec<Warning>) -> Self {
        Self { model, warnings }
    }
}

/// Maps XML document text to the in-memory model
pub struct XmlMapper {
    registry: SchemaRegistry,
    validator: Validator,
}

impl XmlMapper {
    /// Create a mapper owning the given registry
    pub fn new(registry: SchemaRegistry) -> Self {
        let validator = Validator::new(&registry);
        Self {
            registry,
            validator,
        }
    }

    /// Parse a document, dispatching on the schema type name
    pub fn parse(&self, xml: &str, type_name: &str) -> Result<Parsed<Document>, ParseError> {
        match type_name {
            "dataset" => {
                let parsed = self.parse_dataset(xml)?;
                Ok(Parsed::new(Document::Dataset(parsed.model), parsed.warnings))
            }
            "category" => {
                let parsed = self.parse_category(xml)?;
                Ok(Parsed::new(
                    Document::Category(parsed.model),
                    parsed.warnings,
                ))
            }
            other => Err(ParseError::UnknownSchemaType(other.to_string())),
        }
    }

    /// Parse a dataset document
    pub fn parse_dataset(&self, xml: &str) -> Result<Parsed<Dataset>, ParseError> {
        let doc = parse_tree(xml)?;
        let root = doc.root_element();
        let schema = self.registry.get("dataset")?;

        let metadata_el = first_child_element(root, "metadata")
            .ok_or_else(|| ParseError::MissingSection("metadata".to_string()))?;
        let metadata = extract_metadata(metadata_el, schema.metadata())?;

        let visualization = first_child_element(root, "visualization")
            .map(extract_visualization)
            .transpose()?;

        let data_el = first_child_element(root, "data")
            .ok_or_else(|| ParseError::MissingSection("data".to_string()))?;
        let data = extract_data(data_el)?;

        let dataset = Dataset::new(metadata, visualization, data);
        let warnings = self.validator.validate_dataset(&dataset)?;

        Ok(Parsed::new(dataset, warnings))
    }

    /// Parse a category document
    pub fn parse_category(&self, xml: &str) -> Result<Parsed<Category>, ParseError> {
        let doc = parse_tree(xml)?;
        let root = doc.root_element();
        let schema = self.registry.get("category")?;

        let mut fields = HashMap::new();
        if let Some(field_schema) = schema.fields() {
            for name in field_schema.required() {
                let el = first_child_element(root, name)
                    .ok_or_else(|| ParseError::MissingField(name.clone()))?;
                fields.insert(name.clone(), text_content(el));
            }
            for name in field_schema.optional() {
                if let Some(el) = first_child_element(root, name) {
                    fields.insert(name.clone(), text_content(el));
                }
            }
        }

        let mut category = Category::new(
            fields.remove("name").unwrap_or_default(),
            fields.remove("description").unwrap_or_default(),
        );
        category.icon = fields.remove("icon");
        category.color = fields.remove("color");
        category.parent = fields.remove("parent");

        let warnings = self.validator.validate_category(&category)?;
        Ok(Parsed::new(category, warnings))
    }

    /// The registry this mapper was built with
    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }
}

impl Default for XmlMapper {
    fn default() -> Self {
        Self::new(SchemaRegistry::builtin())
    }
}

/// Parse text into an XML tree, converting syntax errors into a
/// diagnostic with the offending span
fn parse_tree(xml: &str) -> Result<XmlDocument<'_>, ParseError> {
    XmlDocument::parse(xml).map_err(|e| {
        let pos = e.pos();
        let offset = offset_from_pos(xml, pos.row, pos.col);
        ParseError::MalformedXml {
            message: e.to_string(),
            src: NamedSource::new("document.xml", xml.to_string()),
            span: (offset, usize::from(!xml.is_empty())).into(),
        }
    })
}

/// Byte offset of a 1-based row/col position in the source text
fn offset_from_pos(text: &str, row: u32, col: u32) -> usize {
    let mut offset = 0usize;
    for (index, line) in text.split('\n').enumerate() {
        if index + 1 == row as usize {
            let col_offset = (col as usize).saturating_sub(1).min(line.len());
            return (offset + col_offset).min(text.len().saturating_sub(1));
        }
        offset += line.len() + 1;
    }
    text.len().saturating_sub(1)
}

fn first_child_element<'a, 'input>(
    node: Node<'a, 'input>,
    tag: &str,
) -> Option<Node<'a, 'input>> {
    node.children()
        .find(|child| child.is_element() && child.tag_name().name() == tag)
}

fn child_elements<'a, 'input>(
    node: Node<'a, 'input>,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a
where
    'input: 'a,
{
    node.children().filter(|child| child.is_element())
}

/// Concatenated text of all descendant text nodes (DOM textContent)
fn text_content(node: Node<'_, '_>) -> String {
    let mut out = String::new();
    for descendant in node.descendants() {
        if descendant.is_text() {
            if let Some(text) = descendant.text() {
                out.push_str(text);
            }
        }
    }
    out.trim().to_string()
}

fn extract_metadata(
    metadata_el: Node<'_, '_>,
    schema: Option<&SectionSchema>,
) -> Result<Metadata, ParseError> {
    let mut fields: HashMap<String, String> = HashMap::new();
    let mut tags: Vec<String> = Vec::new();

    if let Some(schema) = schema {
        for name in schema.required() {
            let el = first_child_element(metadata_el, name)
                .ok_or_else(|| ParseError::MissingMetadataField(name.clone()))?;
            fields.insert(name.clone(), text_content(el));
        }
        for name in schema.optional() {
            if let Some(el) = first_child_element(metadata_el, name) {
                let text = text_content(el);
                if name == "tags" {
                    tags = text.split(',').map(|t| t.trim().to_string()).collect();
                } else {
                    fields.insert(name.clone(), text);
                }
            }
        }
    }

    let updated_raw = fields.remove("updated").unwrap_or_default();
    let updated = parse_strict_date(&updated_raw)?;

    Ok(Metadata {
        title: fields.remove("title").unwrap_or_default(),
        description: fields.remove("description").unwrap_or_default(),
        category: fields.remove("category").unwrap_or_default(),
        source: fields.remove("source").unwrap_or_default(),
        updated,
        license: fields.remove("license").unwrap_or_default(),
        tags,
        contact: fields.remove("contact"),
        frequency: fields.remove("frequency"),
    })
}

/// Strict YYYY-MM-DD validation: the lexical shape must match and the
/// date must denote a real calendar day (2025-02-30 is rejected, not
/// normalized).
fn parse_strict_date(raw: &str) -> Result<NaiveDate, ParseError> {
    if !is_date_shaped(raw) {
        return Err(ParseError::InvalidDate(raw.to_string()));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| ParseError::InvalidDate(raw.to_string()))
}

fn is_date_shaped(raw: &str) -> bool {
    let bytes = raw.as_bytes();
    bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| matches!(i, 4 | 7) || b.is_ascii_digit())
}

fn extract_visualization(viz_el: Node<'_, '_>) -> Result<Visualization, ParseError> {
    let type_el = first_child_element(viz_el, "type")
        .ok_or(ParseError::MissingVisualizationType)?;
    let type_text = text_content(type_el);
    let chart_type: ChartType = type_text
        .parse()
        .map_err(|_| ParseError::InvalidVisualizationType(type_text.clone()))?;

    let mut config = BTreeMap::new();
    if let Some(config_el) = first_child_element(viz_el, "config") {
        for entry in child_elements(config_el) {
            let key = entry.tag_name().name().to_string();
            config.insert(key, coerce::config_value(&text_content(entry)));
        }
    }

    let template = first_child_element(viz_el, "template").map(text_content);

    Ok(Visualization {
        chart_type,
        config,
        template,
    })
}

/// Extract the data payload. Strategies are tried in a fixed order and
/// the first matching one wins: json, csv, record elements, item
/// elements.
fn extract_data(data_el: Node<'_, '_>) -> Result<Value, ParseError> {
    if let Some(json_el) = first_child_element(data_el, "json") {
        return serde_json::from_str(&text_content(json_el)).map_err(ParseError::InvalidJsonData);
    }

    if let Some(csv_el) = first_child_element(data_el, "csv") {
        return csv::parse(&text_content(csv_el));
    }

    let records: Vec<Node<'_, '_>> = child_elements(data_el)
        .filter(|el| el.tag_name().name() == "record")
        .collect();
    if !records.is_empty() {
        return Ok(extract_records(&records));
    }

    let items: Vec<Node<'_, '_>> = child_elements(data_el)
        .filter(|el| el.tag_name().name() == "item")
        .collect();
    if !items.is_empty() {
        return Ok(extract_items(&items));
    }

    Err(ParseError::NoDataFormat)
}

fn extract_records(records: &[Node<'_, '_>]) -> Value {
    let rows = records
        .iter()
        .map(|record| {
            let mut row = Map::new();
            for field in child_elements(*record) {
                let key = field.tag_name().name().to_string();
                row.insert(key, coerce::scalar(&text_content(field)));
            }
            Value::Object(row)
        })
        .collect();
    Value::Array(rows)
}

fn extract_items(items: &[Node<'_, '_>]) -> Value {
    let entries = items
        .iter()
        .map(|item| {
            let key = item.attribute("key").or_else(|| item.attribute("name"));
            let value = coerce::scalar(&text_content(*item));
            match key {
                Some(key) => {
                    let mut entry = Map::new();
                    entry.insert(key.to_string(), value);
                    Value::Object(entry)
                }
                None => value,
            }
        })
        .collect();
    Value::Array(entries)
}

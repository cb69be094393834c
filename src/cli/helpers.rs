//! Shared helpers for CLI commands

use miette::Result;
use std::fs;
use std::path::Path;

use crate::core::DocumentKind;
use crate::model::Document;
use crate::xml::{Parsed, XmlMapper};

/// Sniff the document kind from the XML root element, skipping the
/// declaration and any comments before it
pub fn detect_kind(xml: &str) -> Option<DocumentKind> {
    let mut rest = xml;
    while let Some(start) = rest.find('<') {
        let after = &rest[start + 1..];
        if after.starts_with('?') || after.starts_with('!') {
            let skip = after.find('>')?;
            rest = &after[skip + 1..];
            continue;
        }
        let name: String = after
            .chars()
            .take_while(|c| c.is_alphanumeric() || *c == '_' || *c == '-')
            .collect();
        return DocumentKind::from_root_tag(&name);
    }
    None
}

/// Read an XML file, sniff its type, and parse it into a document model
pub fn load_document(path: &Path) -> Result<Parsed<Document>> {
    let content = fs::read_to_string(path)
        .map_err(|e| miette::miette!("Failed to read {}: {}", path.display(), e))?;

    let kind = detect_kind(&content).ok_or_else(|| {
        miette::miette!(
            "{}: unknown document type (expected a <dataset> or <category> root element)",
            path.display()
        )
    })?;

    let mapper = XmlMapper::default();
    Ok(mapper.parse(&content, kind.schema_name())?)
}

/// Write command output to a file, or to stdout when no path is given
pub fn write_output(output: Option<&Path>, content: &str) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(path, content)
                .map_err(|e| miette::miette!("Failed to write {}: {}", path.display(), e))?;
            Ok(())
        }
        None => {
            println!("{}", content);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_kind_skips_prolog() {
        let xml = "<?xml version=\"1.0\"?>\n<!-- notes -->\n<dataset></dataset>";
        assert_eq!(detect_kind(xml), Some(DocumentKind::Dataset));
    }

    #[test]
    fn test_detect_kind_category() {
        assert_eq!(detect_kind("<category/>"), Some(DocumentKind::Category));
    }

    #[test]
    fn test_detect_kind_unknown_root() {
        assert_eq!(detect_kind("<report/>"), None);
        assert_eq!(detect_kind("no xml here"), None);
    }
}

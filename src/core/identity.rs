//! Document identity system using type-prefixed ULIDs

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use ulid::Ulid;

/// Document type prefixes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DocumentKind {
    /// A dataset document (metadata + visualization + data)
    Dataset,
    /// A category document
    Category,
}

impl DocumentKind {
    /// Get the string representation of the prefix
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Dataset => "DS",
            DocumentKind::Category => "CAT",
        }
    }

    /// Get all document kinds
    pub fn all() -> &'static [DocumentKind] {
        &[DocumentKind::Dataset, DocumentKind::Category]
    }

    /// The schema type name used when dispatching a parse
    pub fn schema_name(&self) -> &'static str {
        match self {
            DocumentKind::Dataset => "dataset",
            DocumentKind::Category => "category",
        }
    }

    /// Determine the document kind from an XML root element tag
    pub fn from_root_tag(tag: &str) -> Option<Self> {
        match tag {
            "dataset" => Some(DocumentKind::Dataset),
            "category" => Some(DocumentKind::Category),
            _ => None,
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DocumentKind {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "DS" => Ok(DocumentKind::Dataset),
            "CAT" => Ok(DocumentKind::Category),
            _ => Err(IdParseError::InvalidPrefix(s.to_string())),
        }
    }
}

/// A unique document identifier combining a type prefix and ULID
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentId {
    kind: DocumentKind,
    ulid: Ulid,
}

impl DocumentId {
    /// Create a new DocumentId with the given kind
    pub fn new(kind: DocumentKind) -> Self {
        Self {
            kind,
            ulid: Ulid::new(),
        }
    }

    /// Create a DocumentId from a kind and existing ULID
    pub fn from_parts(kind: DocumentKind, ulid: Ulid) -> Self {
        Self { kind, ulid }
    }

    /// Get the document kind
    pub fn kind(&self) -> DocumentKind {
        self.kind
    }

    /// Get the ULID component
    pub fn ulid(&self) -> Ulid {
        self.ulid
    }

    /// Parse a DocumentId from a string
    pub fn parse(s: &str) -> Result<Self, IdParseError> {
        s.parse()
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.kind, self.ulid)
    }
}

impl FromStr for DocumentId {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind_str, ulid_str) = s
            .split_once('-')
            .ok_or_else(|| IdParseError::MissingDelimiter(s.to_string()))?;

        let kind = kind_str.parse()?;
        let ulid = Ulid::from_string(ulid_str)
            .map_err(|e| IdParseError::InvalidUlid(ulid_str.to_string(), e.to_string()))?;

        Ok(Self { kind, ulid })
    }
}

impl Serialize for DocumentId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for DocumentId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Errors that can occur when parsing document IDs
#[derive(Debug, Error)]
pub enum IdParseError {
    #[error("invalid document prefix: '{0}' (valid: DS, CAT)")]
    InvalidPrefix(String),

    #[error("missing '-' delimiter in document ID: '{0}'")]
    MissingDelimiter(String),

    #[error("invalid ULID '{0}': {1}")]
    InvalidUlid(String, String),
}

//! Core module - fundamental types and utilities

pub mod identity;

pub use identity::{DocumentId, DocumentKind, IdParseError};

//! Plaza: municipal open-data XML toolkit
//!
//! Parses, validates, and serializes the XML documents that describe an
//! open-data catalog: datasets (metadata, optional chart configuration,
//! and a data payload) and categories. Also ships the portal's companion
//! pieces as pure computations: a small template engine and a chart
//! configuration builder.

pub mod chart;
pub mod cli;
pub mod core;
pub mod model;
pub mod schema;
pub mod template;
pub mod xml;

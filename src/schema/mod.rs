//! Schema system - registries and post-mapping validation

pub mod registry;
pub mod validator;

pub use registry::{DocumentSchema, SchemaError, SchemaRegistry, SectionSchema};
pub use validator::{ValidationError, Validator, Warning, KNOWN_CATEGORIES, KNOWN_LICENSES};

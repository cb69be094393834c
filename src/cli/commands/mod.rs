//! Command implementations

pub mod chart;
pub mod convert;
pub mod render;
pub mod template;
pub mod validate;

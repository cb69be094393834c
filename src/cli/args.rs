//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand};

use crate::cli::commands::{
    chart::ChartArgs, convert::ConvertArgs, render::RenderArgs, template::TemplateArgs,
    validate::ValidateArgs,
};

#[derive(Parser)]
#[command(name = "plaza")]
#[command(author, version, about = "Plaza Open Data Toolkit")]
#[command(
    long_about = "Tools for the municipal open data portal: validate XML dataset and category documents, convert them to JSON, build chart configurations, and render HTML templates."
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate XML documents against the built-in schemas
    Validate(ValidateArgs),

    /// Convert an XML document to JSON, or re-emit it as normalized XML
    Convert(ConvertArgs),

    /// Build a chart configuration from a dataset document
    Chart(ChartArgs),

    /// Render an HTML template against a dataset document
    Render(RenderArgs),

    /// Print a starter XML template for a document type
    Template(TemplateArgs),
}

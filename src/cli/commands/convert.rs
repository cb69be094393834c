//! `plaza convert` command - Convert documents between XML and JSON

use clap::ValueEnum;
use console::style;
use miette::Result;
use std::path::PathBuf;

use crate::cli::helpers::{load_document, write_output};
use crate::model::Document;
use crate::xml::{category_to_xml, dataset_to_xml};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ConvertFormat {
    /// Emit the document model as pretty-printed JSON
    Json,
    /// Re-emit the document as normalized XML
    Xml,
}

#[derive(clap::Args, Debug)]
pub struct ConvertArgs {
    /// XML document to convert
    pub input: PathBuf,

    /// Output format
    #[arg(long, short = 'f', value_enum, default_value_t = ConvertFormat::Json)]
    pub format: ConvertFormat,

    /// Output file (default: stdout)
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

pub fn run(args: ConvertArgs) -> Result<()> {
    let parsed = load_document(&args.input)?;

    for warning in &parsed.warnings {
        eprintln!("{} {}", style("!").yellow(), warning);
    }

    let text = match args.format {
        ConvertFormat::Json => serde_json::to_string_pretty(&parsed.model)
            .map_err(|e| miette::miette!("Failed to serialize document: {}", e))?,
        ConvertFormat::Xml => match &parsed.model {
            Document::Dataset(dataset) => dataset_to_xml(dataset),
            Document::Category(category) => category_to_xml(category),
        },
    };

    write_output(args.output.as_deref(), &text)
}

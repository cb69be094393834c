//! `plaza chart` command - Build a chart configuration from a dataset

use console::style;
use miette::Result;
use std::path::PathBuf;

use crate::chart::build_chart_config;
use crate::cli::helpers::{load_document, write_output};

#[derive(clap::Args, Debug)]
pub struct ChartArgs {
    /// Dataset XML document
    pub input: PathBuf,

    /// Output file (default: stdout)
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

pub fn run(args: ChartArgs) -> Result<()> {
    let parsed = load_document(&args.input)?;

    for warning in &parsed.warnings {
        eprintln!("{} {}", style("!").yellow(), warning);
    }

    let dataset = parsed.model.as_dataset().ok_or_else(|| {
        miette::miette!("{} is not a dataset document", args.input.display())
    })?;

    let chart = build_chart_config(dataset)?;
    let text = serde_json::to_string_pretty(&chart)
        .map_err(|e| miette::miette!("Failed to serialize chart config: {}", e))?;

    write_output(args.output.as_deref(), &text)
}

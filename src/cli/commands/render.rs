//! `plaza render` command - Render an HTML template against a dataset

use console::style;
use miette::Result;
use std::fs;
use std::path::PathBuf;

use crate::cli::helpers::{load_document, write_output};
use crate::template::render_str;

#[derive(clap::Args, Debug)]
pub struct RenderArgs {
    /// Template file with {{...}} placeholders
    pub template: PathBuf,

    /// Dataset XML document providing the rendering context
    pub input: PathBuf,

    /// Output file (default: stdout)
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

pub fn run(args: RenderArgs) -> Result<()> {
    let source = fs::read_to_string(&args.template)
        .map_err(|e| miette::miette!("Failed to read {}: {}", args.template.display(), e))?;

    let parsed = load_document(&args.input)?;

    for warning in &parsed.warnings {
        eprintln!("{} {}", style("!").yellow(), warning);
    }

    let context = serde_json::to_value(&parsed.model)
        .map_err(|e| miette::miette!("Failed to build template context: {}", e))?;

    let html = render_str(&source, &context)?;
    write_output(args.output.as_deref(), &html)
}

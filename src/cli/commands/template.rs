//! `plaza template` command - Print a starter XML template

use miette::Result;

use crate::core::DocumentKind;
use crate::xml::starter_template;

#[derive(clap::Args, Debug)]
pub struct TemplateArgs {
    /// Document type (dataset or category)
    #[arg(default_value = "dataset")]
    pub doc_type: String,
}

pub fn run(args: TemplateArgs) -> Result<()> {
    let kind = DocumentKind::from_root_tag(&args.doc_type).ok_or_else(|| {
        miette::miette!(
            "unknown document type: '{}' (expected dataset or category)",
            args.doc_type
        )
    })?;

    println!("{}", starter_template(kind));
    Ok(())
}

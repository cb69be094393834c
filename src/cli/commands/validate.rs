//! `plaza validate` command - Validate XML documents against schemas

use console::style;
use miette::Result;
use std::path::PathBuf;
use walkdir::WalkDir;

use crate::cli::helpers::detect_kind;
use crate::core::DocumentKind;
use crate::xml::XmlMapper;

#[derive(clap::Args, Debug)]
pub struct ValidateArgs {
    /// Paths to validate (default: current directory)
    #[arg()]
    pub paths: Vec<PathBuf>,

    /// Strict mode - warnings become errors
    #[arg(long)]
    pub strict: bool,

    /// Specific document type to validate (dataset or category)
    #[arg(long, short = 't')]
    pub doc_type: Option<String>,

    /// Continue validation after first error
    #[arg(long)]
    pub keep_going: bool,

    /// Show summary only, don't show individual errors
    #[arg(long)]
    pub summary: bool,
}

/// Validation statistics
#[derive(Default)]
struct ValidationStats {
    files_checked: usize,
    files_passed: usize,
    files_failed: usize,
    total_errors: usize,
    total_warnings: usize,
}

pub fn run(args: ValidateArgs) -> Result<()> {
    let mapper = XmlMapper::default();

    let kind_filter: Option<DocumentKind> = match args.doc_type.as_deref() {
        None => None,
        Some(name) => Some(DocumentKind::from_root_tag(name).ok_or_else(|| {
            miette::miette!("unknown document type: '{}' (expected dataset or category)", name)
        })?),
    };

    let files_to_validate = if args.paths.is_empty() {
        expand_paths(&[PathBuf::from(".")])
    } else {
        expand_paths(&args.paths)
    };

    let mut stats = ValidationStats::default();
    let mut had_error = false;

    println!(
        "{} Validating {} file(s)...\n",
        style("→").blue(),
        files_to_validate.len()
    );

    for path in &files_to_validate {
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                stats.files_checked += 1;
                stats.files_failed += 1;
                stats.total_errors += 1;
                had_error = true;
                if !args.summary {
                    println!("{} {} - {}", style("✗").red(), path.display(), e);
                }
                if !args.keep_going {
                    break;
                }
                continue;
            }
        };

        let kind = match detect_kind(&content) {
            Some(k) => k,
            None => {
                if !args.summary {
                    println!(
                        "{} {} - unknown document type (skipped)",
                        style("?").yellow(),
                        path.display()
                    );
                }
                continue;
            }
        };

        if let Some(filter) = kind_filter {
            if kind != filter {
                continue;
            }
        }

        stats.files_checked += 1;

        match mapper.parse(&content, kind.schema_name()) {
            Ok(parsed) if parsed.warnings.is_empty() => {
                stats.files_passed += 1;
                if !args.summary {
                    println!("{} {}", style("✓").green(), path.display());
                }
            }
            Ok(parsed) => {
                stats.total_warnings += parsed.warnings.len();
                if !args.summary {
                    println!(
                        "{} {} - {} warning(s)",
                        style("!").yellow(),
                        path.display(),
                        parsed.warnings.len()
                    );
                    for warning in &parsed.warnings {
                        println!("    {}", style(warning).yellow());
                    }
                }
                if args.strict {
                    stats.files_failed += 1;
                    had_error = true;
                } else {
                    stats.files_passed += 1;
                }
            }
            Err(e) => {
                stats.files_failed += 1;
                stats.total_errors += 1;
                had_error = true;

                if !args.summary {
                    println!("{} {}", style("✗").red(), path.display());
                    let report = miette::Report::new(e);
                    println!("{:?}", report);
                }

                if !args.keep_going {
                    break;
                }
            }
        }
    }

    println!();
    println!("{}", style("─".repeat(60)).dim());
    println!("{}", style("Validation Summary").bold());
    println!("{}", style("─".repeat(60)).dim());
    println!("  Files checked:  {}", style(stats.files_checked).cyan());
    println!("  Files passed:   {}", style(stats.files_passed).green());
    println!("  Files failed:   {}", style(stats.files_failed).red());
    println!("  Total errors:   {}", style(stats.total_errors).red());

    if stats.total_warnings > 0 {
        println!("  Total warnings: {}", style(stats.total_warnings).yellow());
    }

    println!();

    if had_error {
        if stats.files_failed == 1 {
            Err(miette::miette!("Validation failed: 1 file has errors"))
        } else {
            Err(miette::miette!(
                "Validation failed: {} files have errors",
                stats.files_failed
            ))
        }
    } else {
        println!("{} All files passed validation!", style("✓").green().bold());
        Ok(())
    }
}

/// Expand paths - if a directory is given, find all .xml files in it
fn expand_paths(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_dir() {
            for entry in WalkDir::new(path)
                .into_iter()
                .filter_entry(|e| {
                    let name = e.file_name().to_string_lossy();
                    !name.starts_with('.') || e.depth() == 0
                })
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_file())
            {
                if entry.path().extension().is_some_and(|ext| ext == "xml") {
                    files.push(entry.path().to_path_buf());
                }
            }
        } else if path.exists() {
            files.push(path.clone());
        }
    }

    files.sort();
    files
}

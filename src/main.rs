use clap::Parser;
use miette::Result;
use plaza::cli::{Cli, Commands};

fn main() -> Result<()> {
    // Reset SIGPIPE to default behavior (terminate silently) for proper Unix piping.
    // Without this, piping to `head`, `grep -q`, etc. causes a panic on broken pipe.
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }

    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate(args) => plaza::cli::commands::validate::run(args),
        Commands::Convert(args) => plaza::cli::commands::convert::run(args),
        Commands::Chart(args) => plaza::cli::commands::chart::run(args),
        Commands::Render(args) => plaza::cli::commands::render::run(args),
        Commands::Template(args) => plaza::cli::commands::template::run(args),
    }
}

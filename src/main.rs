use clap::Parser;
use dfo::cli::Cli;
use miette::Result;

fn main() -> Result<()> {
    // Reset SIGPIPE to default behavior (terminate silently) for proper Unix piping.
    // Without this, `dfo -o - ... | head` panics on broken pipe.
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

    if let Some(shell) = cli.completions {
        return dfo::cli::completions::run(shell);
    }

    dfo::cli::logging::init(cli.global.verbose, cli.global.quiet);
    dfo::cli::run::run(cli)
}

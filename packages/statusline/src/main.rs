//! Statusline prints a one-line summary of a git repository for prompts and status bars.

use clap::{ArgAction, Parser};
use color_eyre::Result;
use statusline::{config::Config, input, render, repo};
use tracing::{instrument, level_filters::LevelFilter};
use tracing_error::ErrorLayer;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const VERSION: &str = concat!(
    env!("STATUSLINE_VERSION"),
    " (built: ",
    env!("STATUSLINE_BUILD"),
    ")"
);

/// Print the project, branch, and ahead/behind state of a git repository.
///
/// A JSON object with a `cwd` field may be piped on stdin to choose the
/// directory; otherwise the current directory is used.
#[derive(Parser)]
#[command(author, version = VERSION, about, disable_version_flag = true)]
struct Cli {
    /// Print version.
    #[arg(short = 'v', long, action = ArgAction::Version)]
    #[allow(dead_code)]
    version: Option<bool>,

    #[command(flatten)]
    config: Config,
}

#[instrument]
fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    // The status line is whatever we print to stdout, so logs go to stderr
    // and are off unless requested with `STATUSLINE_LOG` directives.
    //
    // Examples:
    // - `STATUSLINE_LOG=debug` to see every git invocation and why it failed
    // - `STATUSLINE_LOG=trace` to also see the spawned commands
    tracing_subscriber::registry()
        .with(ErrorLayer::default())
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_level(true)
                .with_file(true)
                .with_line_number(true)
                .with_target(true)
                .pretty(),
        )
        .with(
            EnvFilter::builder()
                .with_env_var("STATUSLINE_LOG")
                .with_default_directive(LevelFilter::ERROR.into())
                .from_env_lossy(),
        )
        .init();

    let cwd = input::resolve_cwd();
    let info = repo::collect(&cwd, &cli.config.options());
    println!("{}", render::render(&info, &cli.config.style()));

    Ok(())
}

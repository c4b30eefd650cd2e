use clap::Parser;

mod commands;
mod settings;

#[derive(Parser, Debug)]
#[command(
    name = "drover",
    version,
    about = "Database automation with progress that fits its terminal"
)]
struct Cli {
    #[command(subcommand)]
    command: commands::Command,

    #[command(flatten)]
    progress: settings::ProgressArgs,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    quiet: bool,
}

/// Exit code raised when the operation was cancelled (Ctrl-C).
const EXIT_CANCELLED: i32 = 130;

/// Classify an error into an exit code.
///
/// Exit codes:
///   0   — success
///   1   — general/unknown error
///   2   — configuration error
///   130 — cancelled by the operator
fn classify_exit_code(err: &anyhow::Error) -> i32 {
    if err.is::<commands::Cancelled>() {
        return EXIT_CANCELLED;
    }
    let msg = format!("{err:#}");
    let lower = msg.to_lowercase();

    if lower.contains("config") || lower.contains("output format") {
        2
    } else {
        1
    }
}

fn main() {
    let cli = Cli::parse();

    // Logs go to stderr: stdout carries the command result.
    let filter = match (cli.quiet, cli.verbose) {
        (true, _) => "error",
        (_, 0) => "warn",
        (_, 1) => "info",
        (_, 2) => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .init();

    let config = match cli.progress.resolve() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e:#}");
            std::process::exit(classify_exit_code(&e));
        }
    };

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Error: Failed to create runtime: {e}");
            std::process::exit(1);
        }
    };

    match runtime.block_on(commands::run(cli.command, &config)) {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            eprintln!("Error: {e:#}");
            std::process::exit(classify_exit_code(&e));
        }
    }
}

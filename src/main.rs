use std::process;

use gradle_facts::cli::{Args, Command};
use tracing_subscriber::EnvFilter;

fn init_logging(args: &Args) {
    let default_level = if args.verbose {
        "gradle_facts=debug"
    } else if args.quiet {
        "error"
    } else {
        "warn"
    };

    // Logs go to stderr; stdout carries the results.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();
}

fn main() {
    let args = Args::parse_args();
    init_logging(&args);

    let command = Command::from_args(args);
    process::exit(command.run());
}

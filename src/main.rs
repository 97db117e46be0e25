//! Entry point for the `ssts` terminal client.
use clap::Parser;
use ssts::cli::{self, Cli};
use ssts::logging;

fn main() {
    let cli = Cli::parse();
    let logs = logging::LogOptions::for_cli(cli.log_level())
        .and_then(|options| logging::init(&options));
    if let Err(err) = logs {
        eprintln!("Logging disabled: {err}");
    }
    if let Err(err) = cli::run(cli) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

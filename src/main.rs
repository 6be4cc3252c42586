//! CLI entry point for order-N Markov texture synthesis

use clap::Parser;
use markovtex::io::cli::{Cli, CommandRunner};

fn main() -> markovtex::Result<()> {
    let cli = Cli::parse();
    let default_filter = if cli.quiet { "warn" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let mut runner = CommandRunner::new(cli);
    runner.run()
}

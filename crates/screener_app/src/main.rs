mod cli;
mod render;
mod runner;

use clap::Parser;

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();
    client_logging::initialize(args.log_level());
    runner::run(args)
}

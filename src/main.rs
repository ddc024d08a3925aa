use clap::Parser;
use sortfiles::config::Cli;
use sortfiles::{logging, Config};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_logger(cli.verbose);

    // Convert CLI args to Config - this validates immediately
    let config = Config::try_from(cli)?;

    sortfiles::commands::organize::run(config)?;

    Ok(())
}

use anyhow::Result;
use clap::Parser;
use log::LevelFilter;

mod cli_bin;

use cli_bin::args::{Cli, Commands};
use cli_bin::commands;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut logger =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if cli.verbose {
        logger.filter_level(LevelFilter::Debug);
    } else if cli.quiet {
        logger.filter_level(LevelFilter::Error);
    }
    logger.init();

    let config = commands::load_config(&cli.settings)?;

    match cli.command {
        Commands::Flatten(args) => commands::flatten_command(&config, args).await,
        Commands::Arguments(args) => commands::arguments_command(&config, args).await,
        Commands::Command(args) => commands::command_command(&config, args).await,
        Commands::Check(args) => commands::check_command(args),
        Commands::Options(args) => commands::options_command(args),
    }
}

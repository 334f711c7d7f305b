//! shelfsort CLI
//!
//! Fetches a Discogs collection and writes it out in physical shelf order.

mod cli_types;
mod commands;
mod error;
mod logging;
mod spinner;

use clap::Parser;
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use cli_types::{Cli, Commands, ConfigAction};
use error::CliError;

fn dispatch(cli: Cli) -> Result<(), CliError> {
    let Cli {
        token,
        user_agent,
        quiet,
        command,
        ..
    } = cli;
    match command {
        Commands::Sort(args) => commands::sort::run_sort(args, token, user_agent, quiet),
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::run_config_show(token, user_agent),
            ConfigAction::Path => commands::config::run_config_path(),
            ConfigAction::Test => commands::config::run_config_test(token, user_agent, quiet),
        },
    }
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.quiet, cli.verbose, cli.logfile.as_deref()) {
        eprintln!("{}", e);
        std::process::exit(e.exit_code());
    }

    if let Err(e) = dispatch(cli) {
        log::error!(
            "{} {}",
            "\u{2718}".if_supports_color(Stdout, |t| t.red()),
            e,
        );
        if let Some(hint) = e.hint() {
            log::warn!("  {}", hint);
        }
        std::process::exit(e.exit_code());
    }
}

mod cmd;
mod config;
mod output;

use anyhow::Result;
use clap::Parser;
use utils::version;

use crate::config::Cli;
use crate::config::Commands;

/// Sets up global panic hooks.
fn setup_global_hooks() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        default_hook(panic_info);
        tracing::error!("Thread panicked: {}", panic_info);
    }));
}

fn main() -> Result<()> {
    setup_global_hooks();

    let cli = Cli::parse();
    utils::logging::init(cli.probe.verbose);
    tracing::debug!("gpu-info {}", &**version::VERSION);

    match cli.command {
        Commands::Memory => cmd::memory(&cli.probe),
        Commands::Devices => cmd::devices(&cli.probe),
        Commands::Version => cmd::version(&cli.probe),
        Commands::Locate => cmd::locate(&cli.probe),
    }
}

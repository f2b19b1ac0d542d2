//! provides logging helpers

use tracing_subscriber::filter::{self};
use tracing_subscriber::fmt::layer;
use tracing_subscriber::prelude::*;
use tracing_subscriber::registry;

/// initiate the global tracing subscriber
///
/// `RUST_LOG` wins over the default level picked from `verbose`.
pub fn init(verbose: bool) {
    let env_filter = filter::EnvFilter::builder()
        .with_default_directive(default_level(verbose).into())
        .from_env_lossy();

    let fmt_layer = layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_filter(env_filter);

    registry().with(fmt_layer).init();
}

fn default_level(verbose: bool) -> filter::LevelFilter {
    if verbose {
        filter::LevelFilter::DEBUG
    } else {
        filter::LevelFilter::INFO
    }
}

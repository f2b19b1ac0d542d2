use std::path::PathBuf;

use clap::Args;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use utils::version;

/// Report installed and free VRAM of AMD GPUs through ROCm SMI
#[derive(Parser)]
#[command(about, long_about, version = &**version::VERSION)]
pub struct Cli {
    #[command(flatten)]
    pub probe: ProbeArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print total and free VRAM summed over all devices
    Memory,
    /// Print VRAM usage of each device
    Devices,
    /// Print the ROCm SMI library version
    Version,
    /// Show which ROCm SMI library would be loaded
    Locate,
}

#[derive(Args, Debug, Clone)]
pub struct ProbeArgs {
    /// Path to librocm_smi64.so. Searched for under ROCM_PATH, /opt/rocm*
    /// and the system library directories when omitted
    #[arg(long, env = "ROCM_SMI_LIB_PATH", global = true)]
    pub lib_path: Option<PathBuf>,

    /// Log per-device details while probing
    #[arg(short, long, env = "GPU_INFO_VERBOSE", global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    pub output: OutputFormat,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

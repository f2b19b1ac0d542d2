use std::path::PathBuf;

use thiserror::Error;

use crate::status::RsmiStatus;

#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("unable to load {} library to query for Radeon GPUs: {source}", .path.display())]
    Load {
        path: PathBuf,
        source: libloading::Error,
    },

    #[error("symbol lookup for {symbol} failed: {reason}")]
    Symbol { symbol: String, reason: String },

    #[error("rocm vram init failure: {0}")]
    BackendInit(RsmiStatus),

    #[error("backend not initialized")]
    NotInitialized,

    #[error("unable to get device count: {0}")]
    DeviceCount(RsmiStatus),

    #[error("rocm total mem lookup failure on device {device}: {status}")]
    TotalMemory { device: u32, status: RsmiStatus },

    #[error("rocm usage mem lookup failure on device {device}: {status}")]
    UsedMemory { device: u32, status: RsmiStatus },

    #[error("unexpected response on version lookup {0}")]
    Version(RsmiStatus),

    #[error("no ROCm SMI library found, searched: {}", .searched.join(", "))]
    LibraryNotFound { searched: Vec<String> },
}

impl ProbeError {
    /// Vendor status code carried by the error, if any.
    pub fn status(&self) -> Option<RsmiStatus> {
        match self {
            Self::BackendInit(status) | Self::DeviceCount(status) | Self::Version(status) => {
                Some(*status)
            }
            Self::TotalMemory { status, .. } | Self::UsedMemory { status, .. } => Some(*status),
            _ => None,
        }
    }
}

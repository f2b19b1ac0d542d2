//! Installed and free VRAM of AMD GPUs, read through ROCm SMI.
//!
//! `librocm_smi64.so` is opened at runtime, so the crate builds and runs on
//! hosts without ROCm; on such hosts initialization simply fails with a
//! descriptive [`ProbeError`].
//!
//! ```no_run
//! let (handle, err) = vram_probe::initialize("/opt/rocm/lib/librocm_smi64.so", false);
//! if let Some(err) = err {
//!     eprintln!("no ROCm GPUs: {err}");
//! }
//! let info = handle.query_memory();
//! println!("{} devices, {} of {} bytes free", info.device_count, info.free, info.total);
//! ```

mod backend;
pub mod discovery;
mod error;
mod handle;
mod loader;
mod memory;
#[cfg(test)]
mod mock;
mod rocm;
mod status;
pub mod symbols;
mod version;

pub use backend::DeviceProperty;
pub use backend::MemoryKind;
pub use backend::VramBackend;
pub use error::ProbeError;
pub use handle::initialize;
pub use handle::BackendHandle;
pub use loader::DynamicLibrary;
pub use memory::DeviceMemory;
pub use memory::MemoryInfo;
pub use rocm::RocmSmi;
pub use status::RsmiStatus;
pub use symbols::RsmiFunctions;
pub use symbols::SymbolSource;
pub use version::VersionInfo;
pub use version::VersionResult;

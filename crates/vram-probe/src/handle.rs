use std::path::Path;

use crate::backend::VramBackend;
use crate::error::ProbeError;
use crate::memory;
use crate::memory::DeviceMemory;
use crate::memory::MemoryInfo;
use crate::rocm::RocmSmi;
use crate::version::VersionInfo;
use crate::version::VersionResult;

/// A monitoring session the queries run against.
///
/// A handle is either bound to a fully initialized backend or unbound.
/// Queries on an unbound handle never reach the vendor library and report
/// [`ProbeError::NotInitialized`].
///
/// Handles are not synchronized; callers sharing one across threads must
/// serialize access themselves.
pub struct BackendHandle<B: VramBackend = RocmSmi> {
    backend: Option<B>,
    verbose: bool,
}

impl BackendHandle<RocmSmi> {
    /// Loads the library at `path` and initializes it.
    pub fn open(path: impl AsRef<Path>, verbose: bool) -> Result<Self, ProbeError> {
        let path = path.as_ref();
        let backend = RocmSmi::load(path)?;
        tracing::info!(path = %path.display(), "ROCm SMI backend ready");
        Ok(Self::bound(backend, verbose))
    }
}

impl<B: VramBackend> BackendHandle<B> {
    pub fn unbound(verbose: bool) -> Self {
        Self {
            backend: None,
            verbose,
        }
    }

    pub fn bound(backend: B, verbose: bool) -> Self {
        Self {
            backend: Some(backend),
            verbose,
        }
    }

    pub fn is_bound(&self) -> bool {
        self.backend.is_some()
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }

    pub fn backend(&self) -> Option<&B> {
        self.backend.as_ref()
    }

    fn require_backend(&self) -> Result<&B, ProbeError> {
        self.backend.as_ref().ok_or(ProbeError::NotInitialized)
    }

    /// Sums total and free VRAM over every device.
    pub fn query_memory(&self) -> MemoryInfo {
        match self.require_backend() {
            Ok(backend) => memory::query_memory(backend, self.verbose),
            Err(err) => MemoryInfo::failed(0, &err),
        }
    }

    /// Per-device VRAM figures, all or nothing.
    pub fn query_devices(&self) -> Result<Vec<DeviceMemory>, ProbeError> {
        memory::query_devices(self.require_backend()?, self.verbose)
    }

    /// Major version of the backend, in the shape reported to collaborators.
    pub fn query_version(&self) -> VersionResult {
        VersionResult::from(self.query_version_info())
    }

    pub fn query_version_info(&self) -> Result<VersionInfo, ProbeError> {
        self.require_backend()?
            .version()
            .map_err(ProbeError::Version)
    }

    /// Shuts the backend down and drops it, leaving the handle unbound.
    /// Releasing an unbound handle does nothing.
    pub fn release(&mut self) {
        if let Some(mut backend) = self.backend.take() {
            backend.shutdown();
            tracing::debug!("backend released");
        }
    }
}

/// Loads and initializes the library at `path`.
///
/// Always returns a handle; on failure it is unbound and the error says why.
pub fn initialize(path: impl AsRef<Path>, verbose: bool) -> (BackendHandle, Option<ProbeError>) {
    match BackendHandle::open(path, verbose) {
        Ok(handle) => (handle, None),
        Err(err) => {
            tracing::debug!("backend initialization failed: {err}");
            (BackendHandle::unbound(verbose), Some(err))
        }
    }
}

//! [`VramBackend`] implemented on top of a runtime-loaded ROCm SMI library.

use core::ffi;
use std::ffi::CStr;
use std::path::Path;

use crate::backend::DeviceProperty;
use crate::backend::MemoryKind;
use crate::backend::VramBackend;
use crate::error::ProbeError;
use crate::loader::DynamicLibrary;
use crate::status::RsmiStatus;
use crate::symbols::rsmi_version_t;
use crate::symbols::RsmiFunctions;
use crate::symbols::SymbolSource;
use crate::symbols::RSMI_INIT_FLAGS_DEFAULT;
use crate::version::VersionInfo;

/// Capacity handed to the string getters, excluding the terminating NUL.
const DESCRIPTION_LEN: usize = 256;

/// An initialized ROCm SMI session.
///
/// Owns the symbol source so the bound entry points never outlive the
/// library they came from. Dropping the value shuts the session down and
/// unloads the library.
pub struct RocmSmi<S: SymbolSource = DynamicLibrary> {
    source: S,
    functions: RsmiFunctions,
    active: bool,
}

impl RocmSmi<DynamicLibrary> {
    /// Opens the library at `path`, binds every entry point and runs
    /// `rsmi_init`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ProbeError> {
        let library = DynamicLibrary::open(path)?;
        Self::from_source(library)
    }
}

impl<S: SymbolSource> RocmSmi<S> {
    /// Binds and initializes an already opened source. The source is closed
    /// before any error is returned.
    pub fn from_source(mut source: S) -> Result<Self, ProbeError> {
        let functions = match RsmiFunctions::bind(&source) {
            Ok(functions) => functions,
            Err(err) => {
                source.close();
                return Err(err);
            }
        };

        let status = unsafe { (functions.init)(RSMI_INIT_FLAGS_DEFAULT) };
        if !status.is_success() {
            source.close();
            return Err(ProbeError::BackendInit(status));
        }

        tracing::debug!("ROCm SMI initialized");
        Ok(Self {
            source,
            functions,
            active: true,
        })
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}

fn read_string(fetch: impl FnOnce(*mut ffi::c_char) -> RsmiStatus) -> Result<String, RsmiStatus> {
    let mut buf = [0u8; DESCRIPTION_LEN + 1];
    fetch(buf.as_mut_ptr().cast()).into_result()?;
    // the last byte is never handed out, so a terminator always exists
    Ok(CStr::from_bytes_until_nul(&buf)
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default())
}

impl<S: SymbolSource> VramBackend for RocmSmi<S> {
    fn device_count(&self) -> Result<u32, RsmiStatus> {
        let mut count = 0u32;
        unsafe { (self.functions.num_monitor_devices)(&mut count) }.into_result()?;
        Ok(count)
    }

    fn device_id(&self, index: u32) -> Result<u16, RsmiStatus> {
        let mut id = 0u16;
        unsafe { (self.functions.dev_id_get)(index, &mut id) }.into_result()?;
        Ok(id)
    }

    fn describe(&self, index: u32, property: DeviceProperty) -> Result<String, RsmiStatus> {
        let f = &self.functions;
        let len = DESCRIPTION_LEN;
        let len32 = DESCRIPTION_LEN as u32;
        read_string(|buf| unsafe {
            match property {
                DeviceProperty::Name => (f.dev_name_get)(index, buf, len),
                DeviceProperty::Brand => (f.dev_brand_get)(index, buf, len32),
                DeviceProperty::Vendor => (f.dev_vendor_name_get)(index, buf, len),
                DeviceProperty::VramVendor => (f.dev_vram_vendor_get)(index, buf, len32),
                DeviceProperty::SerialNumber => (f.dev_serial_number_get)(index, buf, len32),
                DeviceProperty::SubsystemName => (f.dev_subsystem_name_get)(index, buf, len),
                DeviceProperty::VbiosVersion => (f.dev_vbios_version_get)(index, buf, len32),
            }
        })
    }

    fn total_memory(&self, index: u32, kind: MemoryKind) -> Result<u64, RsmiStatus> {
        let mut total = 0u64;
        unsafe { (self.functions.memory_total_get)(index, kind.as_raw(), &mut total) }
            .into_result()?;
        Ok(total)
    }

    fn used_memory(&self, index: u32, kind: MemoryKind) -> Result<u64, RsmiStatus> {
        let mut used = 0u64;
        unsafe { (self.functions.memory_usage_get)(index, kind.as_raw(), &mut used) }
            .into_result()?;
        Ok(used)
    }

    fn version(&self) -> Result<VersionInfo, RsmiStatus> {
        let mut raw = rsmi_version_t {
            major: 0,
            minor: 0,
            patch: 0,
            build: core::ptr::null(),
        };
        unsafe { (self.functions.version_get)(&mut raw) }.into_result()?;

        let build = if raw.build.is_null() {
            String::new()
        } else {
            // owned by the library, valid while it stays loaded
            unsafe { CStr::from_ptr(raw.build) }
                .to_string_lossy()
                .into_owned()
        };
        Ok(VersionInfo {
            major: raw.major,
            minor: raw.minor,
            patch: raw.patch,
            build,
        })
    }

    fn shutdown(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;

        let status = unsafe { (self.functions.shut_down)() };
        if !status.is_success() {
            tracing::warn!("rsmi_shut_down failed: {status}");
        }
        self.source.close();
    }
}

impl<S: SymbolSource> Drop for RocmSmi<S> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

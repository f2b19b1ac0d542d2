use derive_more::Display;

use crate::status::RsmiStatus;
use crate::symbols::rsmi_memory_type_t;
use crate::symbols::symbol_name;
use crate::version::VersionInfo;

/// Memory pool a usage query is about.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Display)]
pub enum MemoryKind {
    #[display("VRAM")]
    Vram,
    #[display("visible VRAM")]
    VisibleVram,
    #[display("GTT")]
    Gtt,
}

impl MemoryKind {
    pub(crate) fn as_raw(self) -> rsmi_memory_type_t {
        match self {
            Self::Vram => rsmi_memory_type_t::RSMI_MEM_TYPE_VRAM,
            Self::VisibleVram => rsmi_memory_type_t::RSMI_MEM_TYPE_VIS_VRAM,
            Self::Gtt => rsmi_memory_type_t::RSMI_MEM_TYPE_GTT,
        }
    }
}

/// Descriptive per-device strings reported in verbose mode.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Display)]
pub enum DeviceProperty {
    #[display("device name")]
    Name,
    #[display("brand")]
    Brand,
    #[display("vendor")]
    Vendor,
    #[display("VRAM vendor")]
    VramVendor,
    #[display("S/N")]
    SerialNumber,
    #[display("subsystem name")]
    SubsystemName,
    #[display("vbios version")]
    VbiosVersion,
}

impl DeviceProperty {
    pub const ALL: [DeviceProperty; 7] = [
        Self::Name,
        Self::Brand,
        Self::Vendor,
        Self::VramVendor,
        Self::SerialNumber,
        Self::SubsystemName,
        Self::VbiosVersion,
    ];

    /// Entry point answering this property.
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Name => symbol_name::dev_name_get,
            Self::Brand => symbol_name::dev_brand_get,
            Self::Vendor => symbol_name::dev_vendor_name_get,
            Self::VramVendor => symbol_name::dev_vram_vendor_get,
            Self::SerialNumber => symbol_name::dev_serial_number_get,
            Self::SubsystemName => symbol_name::dev_subsystem_name_get,
            Self::VbiosVersion => symbol_name::dev_vbios_version_get,
        }
    }
}

/// The capabilities the VRAM queries need from a vendor monitoring library.
///
/// Device indices are `0..device_count()`. Every call reports failures as the
/// vendor status code.
pub trait VramBackend {
    fn device_count(&self) -> Result<u32, RsmiStatus>;

    fn device_id(&self, index: u32) -> Result<u16, RsmiStatus>;

    fn describe(&self, index: u32, property: DeviceProperty) -> Result<String, RsmiStatus>;

    fn total_memory(&self, index: u32, kind: MemoryKind) -> Result<u64, RsmiStatus>;

    fn used_memory(&self, index: u32, kind: MemoryKind) -> Result<u64, RsmiStatus>;

    fn version(&self) -> Result<VersionInfo, RsmiStatus>;

    /// Ends the vendor session. Called at most once per backend by
    /// [`crate::BackendHandle::release`].
    fn shutdown(&mut self);
}

impl<T: VramBackend + ?Sized> VramBackend for Box<T> {
    fn device_count(&self) -> Result<u32, RsmiStatus> {
        (**self).device_count()
    }

    fn device_id(&self, index: u32) -> Result<u16, RsmiStatus> {
        (**self).device_id(index)
    }

    fn describe(&self, index: u32, property: DeviceProperty) -> Result<String, RsmiStatus> {
        (**self).describe(index, property)
    }

    fn total_memory(&self, index: u32, kind: MemoryKind) -> Result<u64, RsmiStatus> {
        (**self).total_memory(index, kind)
    }

    fn used_memory(&self, index: u32, kind: MemoryKind) -> Result<u64, RsmiStatus> {
        (**self).used_memory(index, kind)
    }

    fn version(&self) -> Result<VersionInfo, RsmiStatus> {
        (**self).version()
    }

    fn shutdown(&mut self) {
        (**self).shutdown()
    }
}

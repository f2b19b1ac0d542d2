use core::ffi;
use std::fmt;

/// Result code returned by every ROCm SMI entry point (`rsmi_status_t`).
#[repr(transparent)]
#[derive(Debug, Copy, Clone, Hash, PartialEq, Eq)]
pub struct RsmiStatus(pub ffi::c_uint);

impl RsmiStatus {
    pub const SUCCESS: RsmiStatus = RsmiStatus(0);
    pub const INVALID_ARGS: RsmiStatus = RsmiStatus(1);
    pub const NOT_SUPPORTED: RsmiStatus = RsmiStatus(2);
    pub const FILE_ERROR: RsmiStatus = RsmiStatus(3);
    pub const PERMISSION: RsmiStatus = RsmiStatus(4);
    pub const OUT_OF_RESOURCES: RsmiStatus = RsmiStatus(5);
    pub const INTERNAL_EXCEPTION: RsmiStatus = RsmiStatus(6);
    pub const INPUT_OUT_OF_BOUNDS: RsmiStatus = RsmiStatus(7);
    pub const INIT_ERROR: RsmiStatus = RsmiStatus(8);
    pub const NOT_YET_IMPLEMENTED: RsmiStatus = RsmiStatus(9);
    pub const NOT_FOUND: RsmiStatus = RsmiStatus(10);
    pub const INSUFFICIENT_SIZE: RsmiStatus = RsmiStatus(11);
    pub const INTERRUPT: RsmiStatus = RsmiStatus(12);
    pub const UNEXPECTED_SIZE: RsmiStatus = RsmiStatus(13);
    pub const NO_DATA: RsmiStatus = RsmiStatus(14);
    pub const UNEXPECTED_DATA: RsmiStatus = RsmiStatus(15);
    pub const BUSY: RsmiStatus = RsmiStatus(16);
    pub const REFCOUNT_OVERFLOW: RsmiStatus = RsmiStatus(17);
    pub const UNKNOWN_ERROR: RsmiStatus = RsmiStatus(0xFFFF_FFFF);

    pub const fn is_success(self) -> bool {
        self.0 == Self::SUCCESS.0
    }

    /// Converts the status into a `Result`, keeping the failing code.
    pub fn into_result(self) -> Result<(), RsmiStatus> {
        if self.is_success() {
            Ok(())
        } else {
            Err(self)
        }
    }

    /// Symbolic name as spelled in `rocm_smi.h`.
    pub fn name(self) -> &'static str {
        match self {
            Self::SUCCESS => "RSMI_STATUS_SUCCESS",
            Self::INVALID_ARGS => "RSMI_STATUS_INVALID_ARGS",
            Self::NOT_SUPPORTED => "RSMI_STATUS_NOT_SUPPORTED",
            Self::FILE_ERROR => "RSMI_STATUS_FILE_ERROR",
            Self::PERMISSION => "RSMI_STATUS_PERMISSION",
            Self::OUT_OF_RESOURCES => "RSMI_STATUS_OUT_OF_RESOURCES",
            Self::INTERNAL_EXCEPTION => "RSMI_STATUS_INTERNAL_EXCEPTION",
            Self::INPUT_OUT_OF_BOUNDS => "RSMI_STATUS_INPUT_OUT_OF_BOUNDS",
            Self::INIT_ERROR => "RSMI_STATUS_INIT_ERROR",
            Self::NOT_YET_IMPLEMENTED => "RSMI_STATUS_NOT_YET_IMPLEMENTED",
            Self::NOT_FOUND => "RSMI_STATUS_NOT_FOUND",
            Self::INSUFFICIENT_SIZE => "RSMI_STATUS_INSUFFICIENT_SIZE",
            Self::INTERRUPT => "RSMI_STATUS_INTERRUPT",
            Self::UNEXPECTED_SIZE => "RSMI_STATUS_UNEXPECTED_SIZE",
            Self::NO_DATA => "RSMI_STATUS_NO_DATA",
            Self::UNEXPECTED_DATA => "RSMI_STATUS_UNEXPECTED_DATA",
            Self::BUSY => "RSMI_STATUS_BUSY",
            Self::REFCOUNT_OVERFLOW => "RSMI_STATUS_REFCOUNT_OVERFLOW",
            Self::UNKNOWN_ERROR => "RSMI_STATUS_UNKNOWN_ERROR",
            _ => "RSMI_STATUS_UNRECOGNIZED",
        }
    }
}

// Callers grep logs for the numeric code, so Display stays numeric.
impl fmt::Display for RsmiStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

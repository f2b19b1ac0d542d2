//! ROCm SMI entry points resolved at runtime.
//!
//! The table is declared once in [`rsmi_functions!`]; both the ordered
//! symbol list and the binder are generated from that declaration, so adding
//! an entry point is a one-line change.

use core::ffi;

use crate::error::ProbeError;
use crate::status::RsmiStatus;

/// Flags passed to `rsmi_init`; zero selects the default device set.
pub const RSMI_INIT_FLAGS_DEFAULT: u64 = 0;

#[allow(
    non_camel_case_types,
    reason = "FFI types must match ROCm SMI API naming conventions"
)]
mod ffi_types {
    use super::*;

    /// `rsmi_memory_type_t`
    #[repr(transparent)]
    #[derive(Debug, Copy, Clone, Hash, PartialEq, Eq)]
    pub struct rsmi_memory_type_t(pub ffi::c_uint);

    impl rsmi_memory_type_t {
        pub const RSMI_MEM_TYPE_VRAM: rsmi_memory_type_t = rsmi_memory_type_t(0);
        pub const RSMI_MEM_TYPE_VIS_VRAM: rsmi_memory_type_t = rsmi_memory_type_t(1);
        pub const RSMI_MEM_TYPE_GTT: rsmi_memory_type_t = rsmi_memory_type_t(2);
    }

    /// `rsmi_version_t`
    #[repr(C)]
    #[derive(Debug, Copy, Clone)]
    pub struct rsmi_version_t {
        pub major: u32,
        pub minor: u32,
        pub patch: u32,
        pub build: *const ffi::c_char,
    }
}

pub use ffi_types::*;

/// Something exported symbols can be looked up in.
///
/// [`crate::DynamicLibrary`] is the production implementation; tests provide
/// in-process tables of `extern "C"` functions.
pub trait SymbolSource {
    /// Resolves `name` to a value of type `T`.
    ///
    /// # Safety
    ///
    /// `T` must be a function pointer type matching the signature of the
    /// exported symbol.
    unsafe fn resolve<T: Copy>(&self, name: &str) -> Result<T, ProbeError>;

    /// Unloads the source. Calling it more than once is a no-op.
    fn close(&mut self);
}

macro_rules! rsmi_functions {
    ($( $field:ident => $symbol:literal : fn($($arg:ty),*); )*) => {
        /// Typed entry points of one loaded ROCm SMI instance.
        #[derive(Clone, Copy)]
        pub struct RsmiFunctions {
            $(pub(crate) $field: unsafe extern "C" fn($($arg),*) -> RsmiStatus,)*
        }

        /// Exported name of each entry point, keyed by its field.
        #[allow(non_upper_case_globals, reason = "named after the table fields")]
        pub(crate) mod symbol_name {
            $(pub(crate) const $field: &str = $symbol;)*
        }

        impl RsmiFunctions {
            /// Every required symbol, in binding order.
            pub const SYMBOLS: &'static [&'static str] = &[$($symbol),*];

            /// Resolves every entry point in declaration order, stopping at
            /// the first one that is missing.
            pub fn bind<S: SymbolSource + ?Sized>(source: &S) -> Result<Self, ProbeError> {
                Ok(Self {
                    $($field: unsafe {
                        source.resolve::<unsafe extern "C" fn($($arg),*) -> RsmiStatus>(
                            symbol_name::$field,
                        )?
                    },)*
                })
            }
        }
    };
}

rsmi_functions! {
    init => "rsmi_init": fn(u64);
    shut_down => "rsmi_shut_down": fn();
    memory_total_get => "rsmi_dev_memory_total_get": fn(u32, rsmi_memory_type_t, *mut u64);
    memory_usage_get => "rsmi_dev_memory_usage_get": fn(u32, rsmi_memory_type_t, *mut u64);
    version_get => "rsmi_version_get": fn(*mut rsmi_version_t);
    num_monitor_devices => "rsmi_num_monitor_devices": fn(*mut u32);
    dev_id_get => "rsmi_dev_id_get": fn(u32, *mut u16);
    dev_name_get => "rsmi_dev_name_get": fn(u32, *mut ffi::c_char, usize);
    dev_brand_get => "rsmi_dev_brand_get": fn(u32, *mut ffi::c_char, u32);
    dev_vendor_name_get => "rsmi_dev_vendor_name_get": fn(u32, *mut ffi::c_char, usize);
    dev_vram_vendor_get => "rsmi_dev_vram_vendor_get": fn(u32, *mut ffi::c_char, u32);
    dev_serial_number_get => "rsmi_dev_serial_number_get": fn(u32, *mut ffi::c_char, u32);
    dev_subsystem_name_get => "rsmi_dev_subsystem_name_get": fn(u32, *mut ffi::c_char, usize);
    dev_vbios_version_get => "rsmi_dev_vbios_version_get": fn(u32, *mut ffi::c_char, u32);
}

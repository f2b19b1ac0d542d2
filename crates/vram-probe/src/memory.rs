//! Device enumeration and VRAM aggregation.

use serde::Serialize;

use crate::backend::DeviceProperty;
use crate::backend::MemoryKind;
use crate::backend::VramBackend;
use crate::error::ProbeError;

/// Point-in-time VRAM totals summed over every device on the host.
///
/// When `error` is set the counters must not be trusted; `total` and `free`
/// are zero in that case.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MemoryInfo {
    pub device_count: u32,
    pub total: u64,
    pub free: u64,
    pub error: Option<String>,
}

impl MemoryInfo {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    pub(crate) fn failed(device_count: u32, err: &ProbeError) -> Self {
        Self {
            device_count,
            total: 0,
            free: 0,
            error: Some(err.to_string()),
        }
    }

    fn from_devices(device_count: u32, devices: &[DeviceMemory]) -> Self {
        devices.iter().fold(
            Self {
                device_count,
                ..Self::default()
            },
            |mut info, device| {
                info.total = info.total.saturating_add(device.total);
                info.free = info.free.saturating_add(device.free);
                info
            },
        )
    }
}

/// VRAM figures of a single device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeviceMemory {
    pub index: u32,
    /// PCI device id, when the backend could report it.
    pub id: Option<u16>,
    pub total: u64,
    pub used: u64,
    pub free: u64,
}

pub(crate) fn query_memory<B: VramBackend + ?Sized>(backend: &B, verbose: bool) -> MemoryInfo {
    let count = match device_count(backend, verbose) {
        Ok(count) => count,
        Err(err) => return MemoryInfo::failed(0, &err),
    };

    match collect_devices(backend, count, verbose, verbose) {
        Ok(devices) => MemoryInfo::from_devices(count, &devices),
        Err(err) => MemoryInfo::failed(count, &err),
    }
}

pub(crate) fn query_devices<B: VramBackend + ?Sized>(
    backend: &B,
    verbose: bool,
) -> Result<Vec<DeviceMemory>, ProbeError> {
    let count = device_count(backend, verbose)?;
    collect_devices(backend, count, verbose, true)
}

fn device_count<B: VramBackend + ?Sized>(backend: &B, verbose: bool) -> Result<u32, ProbeError> {
    let count = backend.device_count().map_err(ProbeError::DeviceCount)?;
    if verbose {
        tracing::info!("discovered {count} ROCm GPU devices");
    }
    Ok(count)
}

// All or nothing: the first failing device aborts the whole walk.
fn collect_devices<B: VramBackend + ?Sized>(
    backend: &B,
    count: u32,
    verbose: bool,
    with_id: bool,
) -> Result<Vec<DeviceMemory>, ProbeError> {
    (0..count)
        .map(|index| probe_device(backend, index, verbose, with_id))
        .collect()
}

// A quiet aggregation touches nothing but the two memory getters per device.
fn probe_device<B: VramBackend + ?Sized>(
    backend: &B,
    index: u32,
    verbose: bool,
    with_id: bool,
) -> Result<DeviceMemory, ProbeError> {
    let id = if with_id {
        device_id(backend, index)
    } else {
        None
    };

    if verbose {
        report_device_details(backend, index, id);
    }

    let total = backend
        .total_memory(index, MemoryKind::Vram)
        .map_err(|status| ProbeError::TotalMemory {
            device: index,
            status,
        })?;
    let used = backend
        .used_memory(index, MemoryKind::Vram)
        .map_err(|status| ProbeError::UsedMemory {
            device: index,
            status,
        })?;

    let free = total.checked_sub(used).unwrap_or_else(|| {
        tracing::warn!(
            device = index,
            total,
            used,
            "used VRAM exceeds total, reporting no free memory"
        );
        0
    });

    if verbose {
        tracing::info!("[{index}] ROCm totalMem {total}");
        tracing::info!("[{index}] ROCm usedMem {used}");
    }

    Ok(DeviceMemory {
        index,
        id,
        total,
        used,
        free,
    })
}

fn device_id<B: VramBackend + ?Sized>(backend: &B, index: u32) -> Option<u16> {
    match backend.device_id(index) {
        Ok(id) => Some(id),
        Err(status) => {
            tracing::debug!("[{index}] rsmi_dev_id_get failed: {status}");
            None
        }
    }
}

/// Logs whatever descriptive strings the backend can provide. Failures are
/// only logged.
fn report_device_details<B: VramBackend + ?Sized>(backend: &B, index: u32, id: Option<u16>) {
    if let Some(id) = id {
        tracing::info!("[{index}] ROCm device id: {id:#06x}");
    }

    for property in DeviceProperty::ALL {
        match backend.describe(index, property) {
            Ok(value) => tracing::info!("[{index}] ROCm {property}: {value}"),
            Err(status) => tracing::debug!("[{index}] {} failed: {status}", property.symbol()),
        }
    }
}

#[cfg(test)]
mod tests {
    use similar_asserts::assert_eq;
    use test_log::test;

    use super::*;
    use crate::mock::MockBackend;
    use crate::status::RsmiStatus;

    #[test]
    fn sums_two_devices() {
        let backend = MockBackend::with_devices(&[(1000, 100), (2000, 200)]);
        assert_eq!(
            query_memory(&backend, false),
            MemoryInfo {
                device_count: 2,
                total: 3000,
                free: 2700,
                error: None,
            }
        );
    }

    #[test]
    fn quiet_query_only_reads_memory() {
        let backend = MockBackend::with_devices(&[(1000, 100), (2000, 200), (4000, 400)]);
        let info = query_memory(&backend, false);
        assert_eq!(info.total, 7000);
        // device count, then total and used per device
        assert_eq!(backend.calls(), 1 + 2 * 3);
        assert_eq!(backend.describe_calls(), 0);
    }

    #[test]
    fn no_devices_is_not_an_error() {
        let backend = MockBackend::with_devices(&[]);
        assert_eq!(query_memory(&backend, true), MemoryInfo::default());
    }

    #[test]
    fn device_count_failure_reports_code() {
        let backend = MockBackend::with_devices(&[(1000, 100)])
            .fail_device_count(RsmiStatus::PERMISSION);
        let info = query_memory(&backend, false);
        assert_eq!(info.device_count, 0);
        assert_eq!(info.total, 0);
        assert_eq!(info.error.as_deref(), Some("unable to get device count: 4"));
    }

    #[test]
    fn total_memory_failure_discards_partial_sums() {
        let backend = MockBackend::with_devices(&[(1000, 100), (2000, 200), (4000, 0)])
            .fail_total_memory(1, RsmiStatus::NOT_SUPPORTED);
        let info = query_memory(&backend, false);
        assert_eq!(
            info,
            MemoryInfo {
                device_count: 3,
                total: 0,
                free: 0,
                error: Some("rocm total mem lookup failure on device 1: 2".to_string()),
            }
        );
        // device 2 is never touched once device 1 failed
        assert!(!backend.memory_queried(2));
    }

    #[test]
    fn used_memory_failure_discards_partial_sums() {
        let backend = MockBackend::with_devices(&[(1000, 100), (2000, 200)])
            .fail_used_memory(0, RsmiStatus::FILE_ERROR);
        let info = query_memory(&backend, false);
        assert_eq!(info.total, 0);
        assert_eq!(info.free, 0);
        assert_eq!(
            info.error.as_deref(),
            Some("rocm usage mem lookup failure on device 0: 3")
        );
    }

    #[test]
    fn descriptive_failures_do_not_change_result() {
        let healthy = MockBackend::with_devices(&[(1000, 100), (2000, 200)]);
        let broken = MockBackend::with_devices(&[(1000, 100), (2000, 200)])
            .fail_descriptions(&DeviceProperty::ALL)
            .fail_device_id();

        let expected = query_memory(&healthy, true);
        assert_eq!(query_memory(&broken, true), expected);
        assert_eq!(query_memory(&broken, false), expected);
        assert_eq!(broken.describe_calls(), 2 * DeviceProperty::ALL.len());
    }

    #[test]
    fn descriptions_only_requested_when_verbose() {
        let backend = MockBackend::with_devices(&[(1000, 100)]);
        query_memory(&backend, false);
        assert_eq!(backend.describe_calls(), 0);
        query_memory(&backend, true);
        assert_eq!(backend.describe_calls(), DeviceProperty::ALL.len());
    }

    #[test]
    fn used_above_total_clamps_free_to_zero() {
        let backend = MockBackend::with_devices(&[(1000, 1500), (2000, 500)]);
        let info = query_memory(&backend, false);
        assert_eq!(info.total, 3000);
        assert_eq!(info.free, 1500);
        assert!(info.is_ok());
    }

    #[test]
    fn sums_saturate_instead_of_wrapping() {
        let backend = MockBackend::with_devices(&[(u64::MAX, 0), (10, 0)]);
        let info = query_memory(&backend, false);
        assert_eq!(info.total, u64::MAX);
        assert_eq!(info.free, u64::MAX);
    }

    #[test]
    fn per_device_snapshot_matches_aggregate() {
        let backend = MockBackend::with_devices(&[(1000, 100), (2000, 200)]);
        let devices = query_devices(&backend, false).expect("should list devices");
        assert_eq!(
            devices,
            vec![
                DeviceMemory {
                    index: 0,
                    id: Some(0x7400),
                    total: 1000,
                    used: 100,
                    free: 900,
                },
                DeviceMemory {
                    index: 1,
                    id: Some(0x7401),
                    total: 2000,
                    used: 200,
                    free: 1800,
                },
            ]
        );
    }

    #[test]
    fn per_device_snapshot_propagates_failure() {
        let backend = MockBackend::with_devices(&[(1000, 100), (2000, 200)])
            .fail_used_memory(1, RsmiStatus::BUSY);
        let err = query_devices(&backend, false).expect_err("second device fails");
        assert_eq!(err.status(), Some(RsmiStatus::BUSY));
    }
}

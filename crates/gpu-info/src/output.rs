//! Rendering of probe results for the terminal.

use std::fmt::Write;

use anyhow::Result;
use serde::Serialize;
use vram_probe::DeviceMemory;
use vram_probe::MemoryInfo;

use crate::config::OutputFormat;

pub fn render<T: Serialize + ?Sized>(
    format: OutputFormat,
    value: &T,
    text: impl FnOnce(&T) -> String,
) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Text => Ok(text(value)),
    }
}

pub fn memory_text(info: &MemoryInfo) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "devices: {}", info.device_count);
    let _ = writeln!(out, "total:   {}", human_bytes(info.total));
    let _ = write!(out, "free:    {}", human_bytes(info.free));
    if let Some(err) = &info.error {
        let _ = write!(out, "\nerror:   {err}");
    }
    out
}

pub fn devices_text(devices: &[DeviceMemory]) -> String {
    let mut out = format!(
        "{:<6} {:<8} {:>12} {:>12} {:>12}",
        "INDEX", "ID", "TOTAL", "USED", "FREE"
    );
    for device in devices {
        let id = device
            .id
            .map(|id| format!("{id:#06x}"))
            .unwrap_or_else(|| "-".to_string());
        let _ = write!(
            out,
            "\n{:<6} {:<8} {:>12} {:>12} {:>12}",
            device.index,
            id,
            human_bytes(device.total),
            human_bytes(device.used),
            human_bytes(device.free)
        );
    }
    out
}

/// Formats a byte count with binary units, e.g. `1.5 GiB`.
pub fn human_bytes(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KiB", "MiB", "GiB", "TiB"];

    if bytes < 1024 {
        return format!("{bytes} B");
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.1} {}", UNITS[unit])
}

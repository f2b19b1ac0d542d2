use std::path::PathBuf;

use anyhow::anyhow;
use anyhow::Context;
use anyhow::Result;
use serde::Serialize;
use vram_probe::discovery;
use vram_probe::BackendHandle;

use crate::config::ProbeArgs;
use crate::output;

pub fn memory(args: &ProbeArgs) -> Result<()> {
    let mut handle = open_handle(args)?;
    let info = handle.query_memory();
    handle.release();

    println!("{}", output::render(args.output, &info, output::memory_text)?);
    match info.error {
        Some(err) => Err(anyhow!(err).context("VRAM query failed")),
        None => Ok(()),
    }
}

pub fn devices(args: &ProbeArgs) -> Result<()> {
    let mut handle = open_handle(args)?;
    let devices = handle.query_devices();
    handle.release();

    let devices = devices.context("VRAM query failed")?;
    println!(
        "{}",
        output::render(args.output, devices.as_slice(), output::devices_text)?
    );
    Ok(())
}

pub fn version(args: &ProbeArgs) -> Result<()> {
    let mut handle = open_handle(args)?;
    let info = handle
        .query_version_info()
        .context("version query failed")?;
    handle.release();

    println!("{}", output::render(args.output, &info, |info| info.to_string())?);
    Ok(())
}

#[derive(Serialize)]
struct LocateReport {
    selected: Option<PathBuf>,
    candidates: Vec<PathBuf>,
    searched: Vec<String>,
}

pub fn locate(args: &ProbeArgs) -> Result<()> {
    let candidates = discovery::candidate_paths();
    let report = LocateReport {
        selected: args
            .lib_path
            .clone()
            .or_else(|| candidates.first().cloned()),
        candidates,
        searched: discovery::search_patterns(),
    };

    println!(
        "{}",
        output::render(args.output, &report, |report| match &report.selected {
            Some(path) => path.display().to_string(),
            None => format!(
                "no ROCm SMI library found, searched: {}",
                report.searched.join(", ")
            ),
        })?
    );
    Ok(())
}

fn library_path(args: &ProbeArgs) -> Result<PathBuf> {
    match &args.lib_path {
        Some(path) => Ok(path.clone()),
        None => Ok(discovery::locate_library()?),
    }
}

fn open_handle(args: &ProbeArgs) -> Result<BackendHandle> {
    let path = library_path(args)?;
    tracing::debug!(path = %path.display(), "opening ROCm SMI");
    BackendHandle::open(&path, args.verbose)
        .with_context(|| format!("failed to initialize ROCm SMI from {}", path.display()))
}

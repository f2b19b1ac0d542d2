//! Locating `librocm_smi64.so` on the host.

use std::path::Path;
use std::path::PathBuf;

use glob::Pattern;

use crate::error::ProbeError;

/// Explicit library path; skips the search entirely when set.
pub const LIB_PATH_ENV: &str = "ROCM_SMI_LIB_PATH";
/// ROCm install root searched before the system directories.
pub const ROCM_PATH_ENV: &str = "ROCM_PATH";

pub const LIBRARY_NAME: &str = "librocm_smi64.so";

const SYSTEM_DIRS: &[&str] = &[
    "/opt/rocm/lib",
    "/opt/rocm*/lib",
    "/usr/lib64",
    "/usr/lib/x86_64-linux-gnu",
    "/usr/lib",
];

/// Glob patterns searched for the library, most specific first.
pub fn search_patterns() -> Vec<String> {
    let rocm_root = std::env::var_os(ROCM_PATH_ENV).map(PathBuf::from);
    patterns_for(rocm_root.as_deref())
}

fn patterns_for(rocm_root: Option<&Path>) -> Vec<String> {
    let mut patterns = Vec::with_capacity(SYSTEM_DIRS.len() + 1);
    if let Some(root) = rocm_root {
        let dir = Pattern::escape(&root.join("lib").to_string_lossy());
        patterns.push(library_pattern(&dir));
    }
    patterns.extend(SYSTEM_DIRS.iter().map(|dir| library_pattern(dir)));
    patterns
}

fn library_pattern(dir_pattern: &str) -> String {
    format!("{}/{LIBRARY_NAME}*", dir_pattern.trim_end_matches('/'))
}

/// Every existing library file matching `patterns`, in pattern order and
/// without duplicates.
pub fn matching_files(patterns: &[String]) -> Vec<PathBuf> {
    let mut found: Vec<PathBuf> = Vec::new();
    for pattern in patterns {
        let paths = match glob::glob(pattern) {
            Ok(paths) => paths,
            Err(err) => {
                tracing::debug!("skipping invalid pattern {pattern}: {err}");
                continue;
            }
        };
        for path in paths.flatten() {
            if path.is_file() && !found.contains(&path) {
                found.push(path);
            }
        }
    }
    found
}

/// Candidate library paths in the order they should be tried.
pub fn candidate_paths() -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    if let Some(path) = std::env::var_os(LIB_PATH_ENV) {
        candidates.push(PathBuf::from(path));
    }
    candidates.extend(matching_files(&search_patterns()));
    candidates
}

/// Picks the library to load: the explicit override if set, otherwise the
/// first file found by the search.
pub fn locate_library() -> Result<PathBuf, ProbeError> {
    if let Some(path) = std::env::var_os(LIB_PATH_ENV) {
        tracing::debug!("using {LIB_PATH_ENV}={}", Path::new(&path).display());
        return Ok(PathBuf::from(path));
    }
    locate_in(&search_patterns())
}

fn locate_in(patterns: &[String]) -> Result<PathBuf, ProbeError> {
    match matching_files(patterns).into_iter().next() {
        Some(path) => {
            tracing::info!(path = %path.display(), "found ROCm SMI library");
            Ok(path)
        }
        None => Err(ProbeError::LibraryNotFound {
            searched: patterns.to_vec(),
        }),
    }
}

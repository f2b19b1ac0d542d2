use std::fmt;

use serde::Serialize;

use crate::error::ProbeError;

/// Library version as reported by `rsmi_version_get`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionInfo {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
    pub build: String,
}

impl fmt::Display for VersionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if !self.build.is_empty() {
            write!(f, " ({})", self.build)?;
        }
        Ok(())
    }
}

/// Outcome of a version query.
///
/// `status` is [`VersionResult::SUCCESS`] with the major version in
/// `version`, or [`VersionResult::FAILURE`] with an error message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionResult {
    pub status: i32,
    pub version: String,
}

impl VersionResult {
    pub const SUCCESS: i32 = 0;
    pub const FAILURE: i32 = 1;

    pub fn is_ok(&self) -> bool {
        self.status == Self::SUCCESS
    }
}

impl From<Result<VersionInfo, ProbeError>> for VersionResult {
    fn from(result: Result<VersionInfo, ProbeError>) -> Self {
        match result {
            Ok(info) => Self {
                status: Self::SUCCESS,
                version: info.major.to_string(),
            },
            Err(err) => Self {
                status: Self::FAILURE,
                version: err.to_string(),
            },
        }
    }
}

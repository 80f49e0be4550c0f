use std::fmt;
use std::num::TryFromIntError;
use std::str::FromStr;

use crate::error::{Result, VersionGeneratorError};

/// The base version a build is computed from.
///
/// `major` and `minor` are carried into the version name as-is; `patch_offset`
/// is added to the generator's version code to form the patch component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationData {
    pub major: u32,
    pub minor: u32,
    pub patch_offset: i64,
}

impl GenerationData {
    /// Creates a new GenerationData with the specified components.
    ///
    /// # Arguments
    /// * `major` - Major version number
    /// * `minor` - Minor version number
    /// * `patch_offset` - Added to the version code to form the patch number
    pub fn new(major: u32, minor: u32, patch_offset: i64) -> Self {
        GenerationData {
            major,
            minor,
            patch_offset,
        }
    }

    /// Returns a copy with `extra` added to the patch offset.
    pub fn with_added_patch_offset(self, extra: i64) -> Result<Self> {
        let patch_offset = checked_sum(&[self.patch_offset, extra], "patch offset")?;
        Ok(GenerationData {
            patch_offset,
            ..self
        })
    }
}

/// Parses a base version from a `major.minor.patch` string.
///
/// The patch component becomes the patch offset. Pre-release and build
/// metadata are rejected since they cannot be carried into a version name.
///
/// # Example
/// ```ignore
/// let data: GenerationData = "1.2.23".parse()?;
/// assert_eq!(data, GenerationData::new(1, 2, 23));
/// ```
impl FromStr for GenerationData {
    type Err = VersionGeneratorError;

    fn from_str(s: &str) -> Result<Self> {
        let parsed = semver::Version::parse(s.trim().trim_start_matches(['v', 'V']))
            .map_err(|e| {
                VersionGeneratorError::config(format!("Invalid base version '{}': {}", s, e))
            })?;

        if !parsed.pre.is_empty() || !parsed.build.is_empty() {
            return Err(VersionGeneratorError::config(format!(
                "Base version '{}' must not carry pre-release or build metadata",
                s
            )));
        }

        let too_large = |_: TryFromIntError| {
            VersionGeneratorError::config(format!("Base version '{}' is out of range", s))
        };
        Ok(GenerationData::new(
            u32::try_from(parsed.major).map_err(too_large)?,
            u32::try_from(parsed.minor).map_err(too_large)?,
            i64::try_from(parsed.patch).map_err(too_large)?,
        ))
    }
}

/// The computed build version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionData {
    pub version_code: i64,
    pub version_name: String,
}

impl VersionData {
    pub fn new(version_code: i64, version_name: impl Into<String>) -> Self {
        VersionData {
            version_code,
            version_name: version_name.into(),
        }
    }
}

impl fmt::Display for VersionData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.version_name, self.version_code)
    }
}

/// Formats a version name as `major.minor.(version_code + patch_offset)`.
pub fn format_version_name(data: &GenerationData, version_code: i64) -> Result<String> {
    let patch = checked_sum(&[version_code, data.patch_offset], "patch number")?;
    Ok(format!("{}.{}.{}", data.major, data.minor, patch))
}

/// Adds `terms` without wrapping; `what` names the result in the error.
pub fn checked_sum(terms: &[i64], what: &str) -> Result<i64> {
    terms
        .iter()
        .try_fold(0i64, |acc, term| acc.checked_add(*term))
        .ok_or_else(|| {
            let terms: Vec<String> = terms.iter().map(i64::to_string).collect();
            VersionGeneratorError::out_of_range(format!("{} {}", what, terms.join(" + ")))
        })
}

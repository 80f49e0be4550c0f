//! Version generator strategies
//!
//! A generator turns one environment signal (git history, a CI build number)
//! into a version code, and derives the version name from that code:
//!
//! ```text
//! version_name = "{major}.{minor}.{version_code + patch_offset}"
//! ```
//!
//! Callers must check [VersionGenerator::is_valid_for_environment] before
//! calling [VersionGenerator::generate]; [crate::selector::GeneratorSelector]
//! does this for a whole priority list.

pub mod env;
pub mod git;

pub use env::{CiProvider, EnvBuildVersionGenerator};
pub use git::GitBuildVersionGenerator;

use crate::error::Result;
use crate::version::{format_version_name, GenerationData, VersionData};

/// Fixed adjustments a generator applies on top of its signal.
///
/// `build_number` shifts the version code (and therefore the name).
/// `patch_number` shifts only the patch component of the name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Offsets {
    pub build_number: i64,
    pub patch_number: i64,
}

impl Offsets {
    pub fn new(build_number: i64, patch_number: i64) -> Self {
        Offsets {
            build_number,
            patch_number,
        }
    }
}

/// Strategy for deriving a build version from the current environment
pub trait VersionGenerator: Send + Sync {
    /// Identifies the strategy in logs and errors
    fn name(&self) -> &str;

    /// Whether this generator's signal is present and usable here.
    ///
    /// Never fails; any internal problem answers `false`.
    fn is_valid_for_environment(&self) -> bool;

    /// Compute the version code. May spawn processes.
    fn version_code(&self, data: &GenerationData) -> Result<i64>;

    /// Compute the version name from the version code.
    fn version_name(&self, data: &GenerationData) -> Result<String> {
        let version_code = self.version_code(data)?;
        format_version_name(data, version_code)
    }

    /// Compute code and name together.
    fn generate(&self, data: &GenerationData) -> Result<VersionData> {
        Ok(VersionData::new(
            self.version_code(data)?,
            self.version_name(data)?,
        ))
    }
}

impl<G: VersionGenerator + ?Sized> VersionGenerator for Box<G> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn is_valid_for_environment(&self) -> bool {
        (**self).is_valid_for_environment()
    }

    fn version_code(&self, data: &GenerationData) -> Result<i64> {
        (**self).version_code(data)
    }

    fn version_name(&self, data: &GenerationData) -> Result<String> {
        (**self).version_name(data)
    }

    fn generate(&self, data: &GenerationData) -> Result<VersionData> {
        (**self).generate(data)
    }
}

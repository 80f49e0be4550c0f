use log::debug;

use crate::error::Result;
use crate::generators::{Offsets, VersionGenerator};
use crate::process::{ProcessOutput, SystemProcessRunner};
use crate::version::{checked_sum, format_version_name, GenerationData};

pub const GIT_GENERATOR_NAME: &str = "GitVersionBuilder";

const REV_COUNT_COMMAND: &str = "git rev-list --count HEAD --all";
const TAG_LIST_COMMAND: &str = "git tag";

/// Derives the version code from git history.
///
/// The code is `commit count + tag count + build number offset`. Valid only
/// when the repository has at least one commit.
pub struct GitBuildVersionGenerator<P: ProcessOutput = SystemProcessRunner> {
    runner: P,
    offsets: Offsets,
}

impl<P: ProcessOutput> GitBuildVersionGenerator<P> {
    pub fn new(runner: P, build_number_offset: i64, patch_number_offset: i64) -> Self {
        GitBuildVersionGenerator {
            runner,
            offsets: Offsets::new(build_number_offset, patch_number_offset),
        }
    }

    /// Total commit count, or -1 when git gave nothing usable.
    fn history_size(&self) -> i64 {
        let output = self.runner.run_command_for_output(REV_COUNT_COMMAND);
        match output.trim().parse::<i64>() {
            Ok(count) => count,
            Err(e) => {
                debug!("Cannot read commit count from '{}': {}", output, e);
                -1
            }
        }
    }

    /// Number of tags. No output at all means zero tags.
    fn tag_count(&self) -> i64 {
        let output = self.runner.run_command_for_output(TAG_LIST_COMMAND);
        output.lines().filter(|line| !line.trim().is_empty()).count() as i64
    }
}

impl<P: ProcessOutput> VersionGenerator for GitBuildVersionGenerator<P> {
    fn name(&self) -> &str {
        GIT_GENERATOR_NAME
    }

    fn is_valid_for_environment(&self) -> bool {
        let history_size = self.history_size();
        debug!("{}: git history size is {}", GIT_GENERATOR_NAME, history_size);
        history_size > 0
    }

    fn version_code(&self, _data: &GenerationData) -> Result<i64> {
        checked_sum(
            &[
                self.history_size(),
                self.tag_count(),
                self.offsets.build_number,
            ],
            "version code",
        )
    }

    fn version_name(&self, data: &GenerationData) -> Result<String> {
        let patched = data.with_added_patch_offset(self.offsets.patch_number)?;
        let version_code = self.version_code(&patched)?;
        format_version_name(&patched, version_code)
    }
}

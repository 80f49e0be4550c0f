use std::env;

use log::debug;

use crate::error::{Result, VersionGeneratorError};
use crate::generators::{Offsets, VersionGenerator};
use crate::version::{checked_sum, format_version_name, GenerationData};

/// CI services that publish a build number through an environment variable
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CiProvider {
    CircleCi,
    Shippable,
    TravisCi,
    GitHubActions,
    /// Any other variable holding an integer build number
    Custom(String),
}

impl CiProvider {
    /// The environment variable carrying the build number
    pub fn variable(&self) -> &str {
        match self {
            CiProvider::CircleCi => "CIRCLE_BUILD_NUM",
            CiProvider::Shippable => "BUILD_NUMBER",
            CiProvider::TravisCi => "TRAVIS_BUILD_NUMBER",
            CiProvider::GitHubActions => "GITHUB_RUN_NUMBER",
            CiProvider::Custom(variable) => variable,
        }
    }

    /// Generator name used in logs and errors
    pub fn generator_name(&self) -> String {
        match self {
            CiProvider::CircleCi => "CircleCiVersionBuilder".to_string(),
            CiProvider::Shippable => "ShippableVersionBuilder".to_string(),
            CiProvider::TravisCi => "TravisCiVersionBuilder".to_string(),
            CiProvider::GitHubActions => "GitHubActionsVersionBuilder".to_string(),
            CiProvider::Custom(variable) => format!("EnvVersionBuilder({})", variable),
        }
    }
}

/// Derives the version code from a CI build number variable.
///
/// Valid when the variable is set and non-empty. A value that is present but
/// not an integer is a configuration error, not a reason to fall through to
/// the next generator.
#[derive(Debug, Clone)]
pub struct EnvBuildVersionGenerator {
    provider: CiProvider,
    name: String,
    offsets: Offsets,
}

impl EnvBuildVersionGenerator {
    pub fn new(provider: CiProvider, build_number_offset: i64, patch_number_offset: i64) -> Self {
        EnvBuildVersionGenerator {
            name: provider.generator_name(),
            provider,
            offsets: Offsets::new(build_number_offset, patch_number_offset),
        }
    }

    pub fn circle_ci() -> Self {
        Self::new(CiProvider::CircleCi, 0, 0)
    }

    pub fn shippable() -> Self {
        Self::new(CiProvider::Shippable, 0, 0)
    }

    /// Generator reading an arbitrary variable
    pub fn from_variable(variable: impl Into<String>) -> Self {
        Self::new(CiProvider::Custom(variable.into()), 0, 0)
    }

    fn build_number(&self) -> Result<i64> {
        let variable = self.provider.variable();
        let value = match env::var(variable) {
            Ok(value) if !value.is_empty() => value,
            Ok(_) | Err(env::VarError::NotPresent) => {
                return Err(VersionGeneratorError::missing_variable(variable));
            }
            Err(env::VarError::NotUnicode(_)) => {
                return Err(VersionGeneratorError::config(format!(
                    "{} is not valid unicode",
                    variable
                )));
            }
        };

        value
            .trim()
            .parse::<i64>()
            .map_err(|source| VersionGeneratorError::InvalidBuildNumber {
                variable: variable.to_string(),
                value: value.clone(),
                source,
            })
    }
}

impl VersionGenerator for EnvBuildVersionGenerator {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_valid_for_environment(&self) -> bool {
        let variable = self.provider.variable();
        let present = env::var_os(variable).is_some_and(|value| !value.is_empty());
        debug!("{}: {} present = {}", self.name, variable, present);
        present
    }

    fn version_code(&self, _data: &GenerationData) -> Result<i64> {
        checked_sum(
            &[self.build_number()?, self.offsets.build_number],
            "version code",
        )
    }

    fn version_name(&self, data: &GenerationData) -> Result<String> {
        let patched = data.with_added_patch_offset(self.offsets.patch_number)?;
        let version_code = self.version_code(&patched)?;
        format_version_name(&patched, version_code)
    }
}

#[cfg(test)]
mod tests {
    use serial_test::serial;

    use super::*;
    use crate::version::VersionData;

    const VAR: &str = "VERSION_GENERATOR_UNIT_TEST_BUILD";

    #[test]
    fn test_provider_variables() {
        assert_eq!(CiProvider::CircleCi.variable(), "CIRCLE_BUILD_NUM");
        assert_eq!(CiProvider::Shippable.variable(), "BUILD_NUMBER");
        assert_eq!(CiProvider::TravisCi.variable(), "TRAVIS_BUILD_NUMBER");
        assert_eq!(CiProvider::GitHubActions.variable(), "GITHUB_RUN_NUMBER");
        assert_eq!(CiProvider::Custom("X".to_string()).variable(), "X");
    }

    #[test]
    fn test_generator_names() {
        assert_eq!(
            EnvBuildVersionGenerator::circle_ci().name(),
            "CircleCiVersionBuilder"
        );
        assert_eq!(
            EnvBuildVersionGenerator::from_variable("MY_BUILD").name(),
            "EnvVersionBuilder(MY_BUILD)"
        );
    }

    #[test]
    #[serial]
    fn test_unset_and_empty_are_invalid() {
        let generator = EnvBuildVersionGenerator::from_variable(VAR);

        env::remove_var(VAR);
        assert!(!generator.is_valid_for_environment());

        env::set_var(VAR, "");
        assert!(!generator.is_valid_for_environment());

        env::set_var(VAR, "17");
        assert!(generator.is_valid_for_environment());

        env::remove_var(VAR);
    }

    #[test]
    #[serial]
    fn test_value_is_trimmed() {
        env::set_var(VAR, " 17\n");
        let generator = EnvBuildVersionGenerator::from_variable(VAR);
        let data = GenerationData::new(0, 3, 0);
        assert_eq!(
            generator.generate(&data).unwrap(),
            VersionData::new(17, "0.3.17")
        );
        env::remove_var(VAR);
    }

    #[test]
    #[serial]
    fn test_non_numeric_value_is_an_error() {
        env::set_var(VAR, "build-17");
        let generator = EnvBuildVersionGenerator::from_variable(VAR);
        assert!(generator.is_valid_for_environment());

        let err = generator
            .generate(&GenerationData::new(1, 0, 0))
            .unwrap_err();
        assert!(matches!(
            err,
            VersionGeneratorError::InvalidBuildNumber { ref value, .. } if value == "build-17"
        ));
        env::remove_var(VAR);
    }

    #[test]
    #[serial]
    fn test_build_number_overflow_is_an_error() {
        env::set_var(VAR, i64::MAX.to_string());

        let offset = EnvBuildVersionGenerator::new(CiProvider::Custom(VAR.to_string()), 1, 0);
        assert!(offset.is_valid_for_environment());
        assert!(matches!(
            offset.generate(&GenerationData::new(1, 2, 0)),
            Err(VersionGeneratorError::OutOfRange(_))
        ));

        // the code fits, the patch number does not
        let plain = EnvBuildVersionGenerator::from_variable(VAR);
        assert_eq!(
            plain
                .version_code(&GenerationData::new(1, 2, 23))
                .unwrap(),
            i64::MAX
        );
        assert!(matches!(
            plain.generate(&GenerationData::new(1, 2, 23)),
            Err(VersionGeneratorError::OutOfRange(_))
        ));

        let patched = EnvBuildVersionGenerator::new(CiProvider::Custom(VAR.to_string()), 0, 1);
        assert!(matches!(
            patched.version_name(&GenerationData::new(1, 2, i64::MAX)),
            Err(VersionGeneratorError::OutOfRange(_))
        ));

        env::remove_var(VAR);
    }

    #[test]
    #[serial]
    fn test_variable_removed_after_probe() {
        env::set_var(VAR, "5");
        let generator = EnvBuildVersionGenerator::from_variable(VAR);
        assert!(generator.is_valid_for_environment());

        env::remove_var(VAR);
        let err = generator
            .version_code(&GenerationData::new(1, 0, 0))
            .unwrap_err();
        assert!(matches!(err, VersionGeneratorError::MissingVariable { .. }));
    }
}

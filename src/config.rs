use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, VersionGeneratorError};
use crate::generators::{
    CiProvider, EnvBuildVersionGenerator, GitBuildVersionGenerator, VersionGenerator,
};
use crate::process::SystemProcessRunner;
use crate::selector::GeneratorSelector;
use crate::version::GenerationData;

/// File name looked up in the current directory and the user config directory.
pub const CONFIG_FILE_NAME: &str = "versiongen.toml";

/// Represents the complete configuration for version-generator.
///
/// Contains the base version, git settings, and the generator list in priority order.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub version: BaseVersionConfig,

    #[serde(default)]
    pub git: GitConfig,

    #[serde(default = "default_generators")]
    pub generators: Vec<GeneratorConfig>,
}

/// The project's base version.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct BaseVersionConfig {
    #[serde(default = "default_major")]
    pub major: u32,

    #[serde(default)]
    pub minor: u32,

    #[serde(default)]
    pub patch_offset: i64,
}

fn default_major() -> u32 {
    1
}

impl Default for BaseVersionConfig {
    fn default() -> Self {
        BaseVersionConfig {
            major: default_major(),
            minor: 0,
            patch_offset: 0,
        }
    }
}

/// Where git commands are run.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct GitConfig {
    #[serde(default = "default_repo_path")]
    pub repo_path: PathBuf,
}

fn default_repo_path() -> PathBuf {
    PathBuf::from(".")
}

impl Default for GitConfig {
    fn default() -> Self {
        GitConfig {
            repo_path: default_repo_path(),
        }
    }
}

/// One entry of the generator priority list.
///
/// `kind` is one of `circle-ci`, `shippable`, `travis-ci`, `github-actions`,
/// `env` (requires `variable`) or `git`.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct GeneratorConfig {
    pub kind: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variable: Option<String>,

    #[serde(default)]
    pub build_number_offset: i64,

    #[serde(default)]
    pub patch_number_offset: i64,
}

impl GeneratorConfig {
    pub fn new(kind: impl Into<String>) -> Self {
        GeneratorConfig {
            kind: kind.into(),
            variable: None,
            build_number_offset: 0,
            patch_number_offset: 0,
        }
    }

    /// Instantiate the generator this entry describes.
    ///
    /// `repo_path` is the working directory for the git generator.
    pub fn build(&self, repo_path: &Path) -> Result<Box<dyn VersionGenerator>> {
        let provider = match self.kind.as_str() {
            "git" => {
                self.reject_variable()?;
                return Ok(Box::new(GitBuildVersionGenerator::new(
                    SystemProcessRunner::in_dir(repo_path),
                    self.build_number_offset,
                    self.patch_number_offset,
                )));
            }
            "circle-ci" => CiProvider::CircleCi,
            "shippable" => CiProvider::Shippable,
            "travis-ci" => CiProvider::TravisCi,
            "github-actions" => CiProvider::GitHubActions,
            "env" => match self.variable.as_deref().map(str::trim) {
                Some(variable) if !variable.is_empty() => CiProvider::Custom(variable.to_string()),
                _ => {
                    return Err(VersionGeneratorError::config(
                        "generator kind \"env\" requires a non-empty `variable`",
                    ))
                }
            },
            other => {
                return Err(VersionGeneratorError::config(format!(
                    "unknown generator kind '{}'",
                    other
                )))
            }
        };

        if !matches!(provider, CiProvider::Custom(_)) {
            self.reject_variable()?;
        }

        Ok(Box::new(EnvBuildVersionGenerator::new(
            provider,
            self.build_number_offset,
            self.patch_number_offset,
        )))
    }

    fn reject_variable(&self) -> Result<()> {
        match self.variable {
            Some(_) => Err(VersionGeneratorError::config(format!(
                "`variable` is only allowed for generator kind \"env\", not '{}'",
                self.kind
            ))),
            None => Ok(()),
        }
    }
}

/// Returns the default priority list: CI build numbers first, git history last.
fn default_generators() -> Vec<GeneratorConfig> {
    ["circle-ci", "shippable", "travis-ci", "github-actions", "git"]
        .into_iter()
        .map(GeneratorConfig::new)
        .collect()
}

impl Default for Config {
    fn default() -> Self {
        Config {
            version: BaseVersionConfig::default(),
            git: GitConfig::default(),
            generators: default_generators(),
        }
    }
}

impl Config {
    /// The base version as generator input
    pub fn generation_data(&self) -> GenerationData {
        GenerationData::new(
            self.version.major,
            self.version.minor,
            self.version.patch_offset,
        )
    }

    /// Override the base version
    pub fn set_generation_data(&mut self, data: GenerationData) {
        self.version = BaseVersionConfig {
            major: data.major,
            minor: data.minor,
            patch_offset: data.patch_offset,
        };
    }

    /// Build the selector for the configured generator list.
    ///
    /// # Errors
    /// * `Config` - If the list is empty or an entry is invalid
    pub fn build_selector(&self) -> Result<GeneratorSelector> {
        if self.generators.is_empty() {
            return Err(VersionGeneratorError::config("no generators configured"));
        }

        let mut selector = GeneratorSelector::new();
        for generator in &self.generators {
            selector.push(generator.build(&self.git.repo_path)?);
        }
        Ok(selector)
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `versiongen.toml` in current directory
/// 3. `versiongen.toml` in user config directory
/// 4. Default configuration if no file found
///
/// # Arguments
/// * `config_path` - Optional path to custom configuration file
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&Path>) -> Result<Config> {
    let local_path = Path::new(".").join(CONFIG_FILE_NAME);

    let config_str = if let Some(path) = config_path {
        fs::read_to_string(path)?
    } else if local_path.exists() {
        fs::read_to_string(local_path)?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            fs::read_to_string(config_path)?
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    let config: Config = toml::from_str(&config_str)?;
    Ok(config)
}

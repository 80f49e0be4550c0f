pub mod config;
pub mod error;
pub mod generators;
pub mod process;
pub mod selector;
pub mod ui;
pub mod version;

pub use error::{Result, VersionGeneratorError};
pub use generators::{
    CiProvider, EnvBuildVersionGenerator, GitBuildVersionGenerator, VersionGenerator,
};
pub use selector::GeneratorSelector;
pub use version::{GenerationData, VersionData};

//! Ordered fallback across version generators.

use log::{debug, info};

use crate::error::{Result, VersionGeneratorError};
use crate::generators::{
    CiProvider, EnvBuildVersionGenerator, GitBuildVersionGenerator, VersionGenerator,
};
use crate::process::ProcessOutput;
use crate::version::{GenerationData, VersionData};

/// Holds generators in priority order and runs the first applicable one.
#[derive(Default)]
pub struct GeneratorSelector {
    generators: Vec<Box<dyn VersionGenerator>>,
}

impl GeneratorSelector {
    /// Create an empty selector
    pub fn new() -> Self {
        Self::default()
    }

    /// The default priority: CI build numbers first, git history last.
    ///
    /// CircleCI, Shippable, Travis CI, GitHub Actions, then git.
    pub fn with_default_priority<P: ProcessOutput + 'static>(runner: P) -> Self {
        Self::new()
            .with_generator(EnvBuildVersionGenerator::new(CiProvider::CircleCi, 0, 0))
            .with_generator(EnvBuildVersionGenerator::new(CiProvider::Shippable, 0, 0))
            .with_generator(EnvBuildVersionGenerator::new(CiProvider::TravisCi, 0, 0))
            .with_generator(EnvBuildVersionGenerator::new(CiProvider::GitHubActions, 0, 0))
            .with_generator(GitBuildVersionGenerator::new(runner, 0, 0))
    }

    /// Append a generator at the lowest priority
    pub fn with_generator(mut self, generator: impl VersionGenerator + 'static) -> Self {
        self.push(Box::new(generator));
        self
    }

    /// Append a boxed generator at the lowest priority
    pub fn push(&mut self, generator: Box<dyn VersionGenerator>) {
        self.generators.push(generator);
    }

    /// Generator names in priority order
    pub fn names(&self) -> Vec<String> {
        self.generators
            .iter()
            .map(|generator| generator.name().to_string())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.generators.is_empty()
    }

    /// First generator whose validity probe passes
    pub fn select(&self) -> Result<&dyn VersionGenerator> {
        for generator in &self.generators {
            if generator.is_valid_for_environment() {
                info!("Using version generator {}", generator.name());
                return Ok(generator.as_ref());
            }
            debug!("Skipping {}: not valid for this environment", generator.name());
        }

        Err(VersionGeneratorError::NoApplicableGenerator {
            tried: self.names(),
        })
    }

    /// Run the first applicable generator.
    ///
    /// # Errors
    /// * `NoApplicableGenerator` when no probe passes
    /// * whatever the chosen generator's compute step reports
    pub fn select_and_generate(&self, data: &GenerationData) -> Result<VersionData> {
        self.select()?.generate(data)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;

    struct StubGenerator {
        name: &'static str,
        valid: bool,
        code: i64,
        generated: Arc<AtomicUsize>,
    }

    impl StubGenerator {
        fn new(name: &'static str, valid: bool, code: i64) -> Self {
            StubGenerator {
                name,
                valid,
                code,
                generated: Arc::new(AtomicUsize::new(0)),
            }
        }
    }

    impl VersionGenerator for StubGenerator {
        fn name(&self) -> &str {
            self.name
        }

        fn is_valid_for_environment(&self) -> bool {
            self.valid
        }

        fn version_code(&self, _data: &GenerationData) -> Result<i64> {
            self.generated.fetch_add(1, Ordering::SeqCst);
            Ok(self.code)
        }
    }

    #[test]
    fn test_first_valid_generator_wins() {
        let selector = GeneratorSelector::new()
            .with_generator(StubGenerator::new("a", false, 1))
            .with_generator(StubGenerator::new("b", true, 2))
            .with_generator(StubGenerator::new("c", true, 3));

        let version = selector
            .select_and_generate(&GenerationData::new(1, 0, 0))
            .unwrap();
        assert_eq!(version, VersionData::new(2, "1.0.2"));
    }

    #[test]
    fn test_invalid_generators_are_never_computed() {
        let skipped = StubGenerator::new("skipped", false, 1);
        let counter = Arc::clone(&skipped.generated);
        let selector = GeneratorSelector::new()
            .with_generator(skipped)
            .with_generator(StubGenerator::new("used", true, 2));

        selector
            .select_and_generate(&GenerationData::new(1, 0, 0))
            .unwrap();
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_no_applicable_generator() {
        let selector = GeneratorSelector::new()
            .with_generator(StubGenerator::new("a", false, 1))
            .with_generator(StubGenerator::new("b", false, 2));

        match selector.select_and_generate(&GenerationData::new(1, 0, 0)) {
            Err(VersionGeneratorError::NoApplicableGenerator { tried }) => {
                assert_eq!(tried, vec!["a".to_string(), "b".to_string()]);
            }
            other => panic!("expected NoApplicableGenerator, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_selector_fails() {
        let selector = GeneratorSelector::new();
        assert!(selector.is_empty());
        assert!(matches!(
            selector.select_and_generate(&GenerationData::new(1, 0, 0)),
            Err(VersionGeneratorError::NoApplicableGenerator { .. })
        ));
    }

    #[test]
    fn test_default_priority_order() {
        let selector =
            GeneratorSelector::with_default_priority(crate::process::MockProcessRunner::new());
        assert_eq!(
            selector.names(),
            vec![
                "CircleCiVersionBuilder".to_string(),
                "ShippableVersionBuilder".to_string(),
                "TravisCiVersionBuilder".to_string(),
                "GitHubActionsVersionBuilder".to_string(),
                "GitVersionBuilder".to_string(),
            ]
        );
    }
}

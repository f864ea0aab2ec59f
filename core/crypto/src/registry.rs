//! Registry for resolving random generators by name.

use std::collections::HashMap;

use primkit_common::{Error, Result};

use crate::random::{ProviderRandom, Random, RandomSource, SystemRandomGenerator};

/// Factory function type for creating generators.
pub type RandomFactory = Box<dyn Fn() -> Box<dyn Random> + Send + Sync>;

/// Registry of random generator factories.
///
/// Lets configuration name a generator (see [`RandomSource`]) and have it
/// resolved at runtime, including generators registered by the caller.
pub struct RandomRegistry {
    factories: HashMap<String, RandomFactory>,
}

impl RandomRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Register a generator factory.
    ///
    /// # Errors
    /// - `IllegalParameter` if `name` is already registered
    pub fn register(&mut self, name: impl Into<String>, factory: RandomFactory) -> Result<()> {
        let name = name.into();
        if self.factories.contains_key(&name) {
            return Err(Error::IllegalParameter);
        }
        self.factories.insert(name, factory);
        Ok(())
    }

    /// Create the generator registered under `name`.
    pub fn resolve(&self, name: &str) -> Option<Box<dyn Random>> {
        self.factories.get(name).map(|factory| factory())
    }

    /// Create the generator for a configured source.
    pub fn resolve_source(&self, source: RandomSource) -> Option<Box<dyn Random>> {
        self.resolve(source.name())
    }

    /// Get list of registered generator names.
    pub fn providers(&self) -> Vec<String> {
        self.factories.keys().cloned().collect()
    }

    /// Check if a generator is registered.
    pub fn has_provider(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }
}

impl Default for RandomRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Create a registry holding the provider CSPRNG and the OS source.
pub fn create_default_registry() -> RandomRegistry {
    let mut registry = RandomRegistry::new();
    registry.factories.insert(
        RandomSource::Provider.name().to_string(),
        Box::new(|| -> Box<dyn Random> { Box::new(ProviderRandom::new()) }),
    );
    registry.factories.insert(
        RandomSource::System.name().to_string(),
        Box::new(|| -> Box<dyn Random> { Box::new(SystemRandomGenerator::new()) }),
    );
    registry
}

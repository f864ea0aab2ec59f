//! Secure random byte generation.
//!
//! Two generators share the [`Random`] trait: [`ProviderRandom`] draws from
//! the primitive provider's CSPRNG and [`SystemRandomGenerator`] from the
//! operating system. Their failure codes live in different status spaces.

use serde::{Deserialize, Serialize};
use tracing::warn;

use primkit_common::{Error, Result};

use crate::negotiate::fixed_output_checked;
use crate::provider::{default_provider, default_system_random, PrimitiveProvider, SystemRandom};

/// A generator of cryptographically secure random bytes.
pub trait Random: Send + Sync {
    /// Return exactly `bytes` random bytes.
    fn generate(&self, bytes: usize) -> Result<Vec<u8>>;
}

/// Random bytes from the primitive provider's CSPRNG.
#[derive(Clone, Copy)]
pub struct ProviderRandom<'a> {
    provider: &'a dyn PrimitiveProvider,
}

impl ProviderRandom<'static> {
    /// Generator backed by the default provider.
    pub fn new() -> Self {
        Self::with_provider(default_provider())
    }
}

impl<'a> ProviderRandom<'a> {
    /// Generator backed by `provider`.
    ///
    /// # Postconditions
    /// - Failures are classified in the provider status space
    pub fn with_provider(provider: &'a dyn PrimitiveProvider) -> Self {
        Self { provider }
    }
}

impl Default for ProviderRandom<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl Random for ProviderRandom<'_> {
    fn generate(&self, bytes: usize) -> Result<Vec<u8>> {
        fixed_output_checked(bytes, |output| self.provider.random_bytes(output)).inspect_err(
            |err| warn!(provider = self.provider.name(), %err, "random generation failed"),
        )
    }
}

/// Random bytes from the operating system.
#[derive(Clone, Copy)]
pub struct SystemRandomGenerator<'a> {
    source: &'a dyn SystemRandom,
}

impl SystemRandomGenerator<'static> {
    /// Generator backed by the default OS source.
    pub fn new() -> Self {
        Self::with_source(default_system_random())
    }
}

impl<'a> SystemRandomGenerator<'a> {
    /// Generator backed by `source`.
    ///
    /// # Postconditions
    /// - Failures surface as [`Error::UnknownStatus`] with the source's code
    pub fn with_source(source: &'a dyn SystemRandom) -> Self {
        Self { source }
    }
}

impl Default for SystemRandomGenerator<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl Random for SystemRandomGenerator<'_> {
    fn generate(&self, bytes: usize) -> Result<Vec<u8>> {
        let mut output = vec![0u8; bytes];
        match Error::classify_os(self.source.copy_bytes(&mut output)) {
            None => Ok(output),
            Some(err) => {
                warn!(%err, "system random source failed");
                Err(err)
            }
        }
    }
}

/// Serializable choice of random generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RandomSource {
    /// The primitive provider's CSPRNG.
    #[default]
    Provider,
    /// The operating system's random source.
    System,
}

impl RandomSource {
    /// Registry name of this source.
    pub fn name(self) -> &'static str {
        match self {
            RandomSource::Provider => "provider",
            RandomSource::System => "system",
        }
    }

    /// Generator for this source, using the default provider and OS source.
    pub fn generator(self) -> Box<dyn Random> {
        match self {
            RandomSource::Provider => Box::new(ProviderRandom::new()),
            RandomSource::System => Box::new(SystemRandomGenerator::new()),
        }
    }
}

//! Password-based key derivation with PBKDF2.
//!
//! [`KeyDerivation::derive`] stretches a password into key material;
//! [`KeyDerivation::calibrate`] measures how many rounds fit in a time
//! budget on the current machine. [`KdfParams`] bundles a PRF, a round
//! count and an output length into a serializable configuration.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use primkit_common::{Error, Result};

use crate::algorithm::{KeyDerivation, PseudoRandomAlgorithm};
use crate::negotiate::fixed_output_checked;
use crate::provider::{default_provider, native, PrimitiveProvider};

impl KeyDerivation {
    /// Number of rounds that take roughly `delay_ms` milliseconds for the
    /// given input sizes, measured with the default provider.
    ///
    /// # Errors
    /// - `UnspecifiedError` if the provider cannot calibrate these sizes
    pub fn calibrate(
        self,
        password_len: usize,
        salt_len: usize,
        derived_key_len: usize,
        delay_ms: u32,
    ) -> Result<u32> {
        self.calibrate_with(default_provider(), password_len, salt_len, derived_key_len, delay_ms)
    }

    /// Calibrate the round count with an explicit provider.
    ///
    /// # Postconditions
    /// - Returns a round count in `1..u32::MAX`
    /// - The count is a measurement and varies between machines and runs
    ///
    /// # Errors
    /// - `UnspecifiedError` if the provider returns its failure sentinel
    pub fn calibrate_with(
        self,
        provider: &dyn PrimitiveProvider,
        password_len: usize,
        salt_len: usize,
        derived_key_len: usize,
        delay_ms: u32,
    ) -> Result<u32> {
        let rounds = provider.calibrate_pbkdf(
            self.native_id(),
            password_len,
            salt_len,
            self.prf().descriptor().native_id,
            derived_key_len,
            delay_ms,
        );

        if rounds == native::CALIBRATION_FAILED {
            warn!(
                provider = provider.name(),
                salt_len,
                derived_key_len,
                delay_ms,
                "PBKDF calibration failed"
            );
            return Err(Error::UnspecifiedError);
        }

        debug!(rounds, delay_ms, "PBKDF calibrated");
        Ok(rounds)
    }

    /// Derive `derived_key_len` bytes from `password` and `salt` with the
    /// default provider.
    ///
    /// # Errors
    /// - `IllegalParameter` if `rounds` or `derived_key_len` is zero
    pub fn derive(
        self,
        password: &[u8],
        salt: &[u8],
        rounds: u32,
        derived_key_len: usize,
    ) -> Result<Vec<u8>> {
        self.derive_with(default_provider(), password, salt, rounds, derived_key_len)
    }

    /// Derive key material with an explicit provider.
    ///
    /// # Preconditions
    /// - `rounds` and `derived_key_len` must be non-zero
    ///
    /// # Postconditions
    /// - Returns exactly `derived_key_len` bytes
    /// - `password` bytes are used as given, without normalization
    ///
    /// # Errors
    /// - `IllegalParameter` if a precondition fails; the provider is not called
    /// - Any error the provider reports, classified by [`Error::classify`]
    pub fn derive_with(
        self,
        provider: &dyn PrimitiveProvider,
        password: &[u8],
        salt: &[u8],
        rounds: u32,
        derived_key_len: usize,
    ) -> Result<Vec<u8>> {
        if rounds == 0 || derived_key_len == 0 {
            return Err(Error::IllegalParameter);
        }

        let algorithm = self.native_id();
        let prf = self.prf().descriptor().native_id;
        fixed_output_checked(derived_key_len, |output| {
            provider.derive_pbkdf(algorithm, prf, password, salt, rounds, output)
        })
    }
}

/// Parameters for PBKDF2 key derivation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KdfParams {
    /// Pseudo-random function.
    pub prf: PseudoRandomAlgorithm,
    /// Number of PRF iterations.
    pub rounds: u32,
    /// Length of the derived key in bytes.
    pub derived_key_length: usize,
}

impl KdfParams {
    /// Parameters suitable for interactive use.
    pub fn interactive() -> Self {
        Self {
            prf: PseudoRandomAlgorithm::HmacSha256,
            rounds: 600_000,
            derived_key_length: 32,
        }
    }

    /// Higher-cost parameters for long-lived secrets.
    pub fn sensitive() -> Self {
        Self {
            prf: PseudoRandomAlgorithm::HmacSha512,
            rounds: 1_000_000,
            derived_key_length: 64,
        }
    }

    /// Parameters whose round count is calibrated to `delay_ms` on this machine.
    ///
    /// # Errors
    /// - `UnspecifiedError` if calibration fails
    pub fn calibrated(
        prf: PseudoRandomAlgorithm,
        password_len: usize,
        salt_len: usize,
        derived_key_length: usize,
        delay_ms: u32,
    ) -> Result<Self> {
        let rounds = KeyDerivation::Pbkdf2(prf).calibrate(
            password_len,
            salt_len,
            derived_key_length,
            delay_ms,
        )?;
        Ok(Self {
            prf,
            rounds,
            derived_key_length,
        })
    }

    /// The derivation algorithm these parameters drive.
    pub fn algorithm(&self) -> KeyDerivation {
        KeyDerivation::Pbkdf2(self.prf)
    }

    /// Derive a key from `password` and `salt`.
    pub fn derive_key(&self, password: &[u8], salt: &[u8]) -> Result<Vec<u8>> {
        self.algorithm()
            .derive(password, salt, self.rounds, self.derived_key_length)
    }
}

impl Default for KdfParams {
    fn default() -> Self {
        Self::interactive()
    }
}

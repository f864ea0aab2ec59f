//! The boundary with the primitive provider.
//!
//! Every family reaches its primitive through [`PrimitiveProvider`]. The
//! methods keep the shape of a native call: an algorithm identifier, input
//! slices borrowed for the duration of the call, one output slice, and a
//! numeric [`Status`]. Variable-length calls also write the number of bytes
//! produced (or, on `BUFFER_TOO_SMALL`, the number required) to an
//! out-parameter.
//!
//! Providers must be `Send + Sync` and must not keep references to the
//! slices they are handed.

use primkit_common::{Operation, OsStatus, Status};

use crate::software::{OsRandomSource, SoftwareProvider};

/// Provider-specific algorithm identifier.
pub type NativeId = u32;

/// Native identifiers and flags understood by providers.
pub mod native {
    use super::NativeId;

    /// AES, key size selected by the `key_len` argument.
    pub const ALGORITHM_AES: NativeId = 0;
    /// Single DES.
    pub const ALGORITHM_DES: NativeId = 1;
    /// Three-key triple DES.
    pub const ALGORITHM_3DES: NativeId = 2;

    /// Apply PKCS#7 padding on encrypt and strip it on decrypt.
    pub const OPTION_PKCS7_PADDING: u32 = 0x0001;

    /// Digest identifiers.
    pub const DIGEST_MD4: NativeId = 2;
    pub const DIGEST_MD5: NativeId = 3;
    pub const DIGEST_SHA1: NativeId = 8;
    pub const DIGEST_SHA224: NativeId = 9;
    pub const DIGEST_SHA256: NativeId = 10;
    pub const DIGEST_SHA384: NativeId = 11;
    pub const DIGEST_SHA512: NativeId = 12;

    /// HMAC identifiers. The numbering differs from the digest table.
    pub const HMAC_SHA1: NativeId = 0;
    pub const HMAC_SHA256: NativeId = 2;
    pub const HMAC_SHA384: NativeId = 3;
    pub const HMAC_SHA512: NativeId = 4;
    pub const HMAC_SHA224: NativeId = 5;

    /// PBKDF2 key derivation.
    pub const PBKDF2: NativeId = 2;
    /// PBKDF2 pseudo-random function identifiers.
    pub const PRF_HMAC_SHA1: NativeId = 1;
    pub const PRF_HMAC_SHA224: NativeId = 2;
    pub const PRF_HMAC_SHA256: NativeId = 3;
    pub const PRF_HMAC_SHA384: NativeId = 4;
    pub const PRF_HMAC_SHA512: NativeId = 5;

    /// AES key wrap (RFC 3394).
    pub const WRAP_AES: NativeId = 1;

    /// Returned by PBKDF calibration when it cannot produce a round count.
    pub const CALIBRATION_FAILED: u32 = u32::MAX;
}

/// A source of cryptographic primitives.
pub trait PrimitiveProvider: Send + Sync {
    /// Provider name, for diagnostics.
    fn name(&self) -> &str;

    /// Run a block cipher over `input` in CBC mode.
    ///
    /// `key_len` is the key size the caller's algorithm variant requires.
    /// The provider answers `KEY_SIZE_ERROR` if `key` is not exactly that long
    /// or the algorithm has no variant of that size.
    ///
    /// On success `moved` holds the bytes written to `output`. When `output`
    /// is too short the provider returns `BUFFER_TOO_SMALL` and sets `moved`
    /// to the exact size required.
    #[allow(clippy::too_many_arguments)]
    fn crypt(
        &self,
        op: Operation,
        algorithm: NativeId,
        options: u32,
        key: &[u8],
        key_len: usize,
        iv: &[u8],
        input: &[u8],
        output: &mut [u8],
        moved: &mut usize,
    ) -> Status;

    /// Hash `message` into `output`, which holds exactly one digest.
    fn digest(&self, algorithm: NativeId, message: &[u8], output: &mut [u8]);

    /// Compute the HMAC of `message` into `output`, which holds exactly one tag.
    fn hmac(&self, algorithm: NativeId, key: &[u8], message: &[u8], output: &mut [u8]);

    /// Derive `output.len()` bytes from `password` and `salt`.
    fn derive_pbkdf(
        &self,
        algorithm: NativeId,
        prf: NativeId,
        password: &[u8],
        salt: &[u8],
        rounds: u32,
        output: &mut [u8],
    ) -> Status;

    /// Measure how many PRF rounds fit in `msec` milliseconds on this machine.
    ///
    /// Returns [`native::CALIBRATION_FAILED`] when the parameters are outside
    /// what the provider supports.
    fn calibrate_pbkdf(
        &self,
        algorithm: NativeId,
        password_len: usize,
        salt_len: usize,
        prf: NativeId,
        derived_key_len: usize,
        msec: u32,
    ) -> u32;

    /// Wrap `raw_key` under `kek`. `written` receives the wrapped length.
    fn key_wrap(
        &self,
        algorithm: NativeId,
        iv: &[u8],
        kek: &[u8],
        raw_key: &[u8],
        output: &mut [u8],
        written: &mut usize,
    ) -> Status;

    /// Unwrap `wrapped_key` under `kek`. `written` receives the key length.
    fn key_unwrap(
        &self,
        algorithm: NativeId,
        iv: &[u8],
        kek: &[u8],
        wrapped_key: &[u8],
        output: &mut [u8],
        written: &mut usize,
    ) -> Status;

    /// Fill `output` from the provider's CSPRNG.
    fn random_bytes(&self, output: &mut [u8]) -> Status;
}

/// An operating-system secure random source.
///
/// Its status space is separate from [`PrimitiveProvider`]'s.
pub trait SystemRandom: Send + Sync {
    /// Fill `output` with random bytes.
    fn copy_bytes(&self, output: &mut [u8]) -> OsStatus;
}

static DEFAULT_PROVIDER: SoftwareProvider = SoftwareProvider;
static DEFAULT_SYSTEM_RANDOM: OsRandomSource = OsRandomSource;

/// The provider used by the operations that do not take one explicitly.
pub fn default_provider() -> &'static dyn PrimitiveProvider {
    &DEFAULT_PROVIDER
}

/// The OS random source used by [`crate::SystemRandomGenerator::new`].
pub fn default_system_random() -> &'static dyn SystemRandom {
    &DEFAULT_SYSTEM_RANDOM
}

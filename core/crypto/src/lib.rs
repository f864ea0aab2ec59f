//! Cryptographic primitives behind one calling convention.
//!
//! This crate provides:
//! - Block cipher encryption in CBC mode with PKCS#7 padding
//! - Message digests and HMAC
//! - PBKDF2 key derivation and round calibration
//! - AES key wrapping (RFC 3394)
//! - Secure random generation from the provider or the operating system
//!
//! Each family is a method set on its algorithm enum, so the algorithm is
//! chosen once and the call reads the same for every variant:
//!
//! ```no_run
//! use primkit_crypto::{Cipher, Digest};
//!
//! let key = [0u8; 16];
//! let iv = [0u8; 16];
//! let ciphertext = Cipher::Aes128.encrypt(b"attack at dawn", &key, &iv)?;
//! let hash = Digest::Sha256.hash(&ciphertext);
//! # Ok::<(), primkit_common::Error>(())
//! ```
//!
//! The primitives themselves come from a [`PrimitiveProvider`]. The plain
//! methods use [`default_provider`]; the `*_with` forms take one explicitly.
//!
//! # Security Guarantees
//! - Scratch buffers are zeroized when an attempt fails
//! - No plaintext or key material is ever logged
//! - Constant-time comparison for HMAC verification and key unwrap checks

pub mod algorithm;
pub mod cipher;
pub mod digest;
pub mod hmac;
pub mod kdf;
mod negotiate;
pub mod provider;
pub mod random;
pub mod registry;
pub mod software;
pub mod wrap;

#[cfg(test)]
mod testing;

pub use algorithm::{Cipher, Digest, Hmac, KeyDerivation, KeyWrap, PseudoRandomAlgorithm};
pub use kdf::KdfParams;
pub use primkit_common::{Error, Result};
pub use provider::{default_provider, default_system_random, PrimitiveProvider, SystemRandom};
pub use random::{ProviderRandom, Random, RandomSource, SystemRandomGenerator};
pub use registry::{create_default_registry, RandomRegistry};
pub use software::{OsRandomSource, SoftwareProvider};

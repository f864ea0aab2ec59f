//! Algorithm variants and their descriptor tables.
//!
//! Each family is a plain `Copy` enum. The constants a provider call needs
//! (native identifier, key size, block size, digest length) live in static
//! descriptor records looked up by variant.

use serde::{Deserialize, Serialize};

use crate::provider::{native, NativeId};

/// Parameters of a block cipher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CipherDescriptor {
    /// Provider algorithm identifier.
    pub native_id: NativeId,
    /// Required key size in bytes.
    pub key_size: usize,
    /// Block size in bytes; also the IV size.
    pub block_size: usize,
}

/// Parameters of a hash-based algorithm (digest, HMAC or PRF).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DigestDescriptor {
    /// Provider algorithm identifier.
    pub native_id: NativeId,
    /// Output length in bytes.
    pub digest_length: usize,
}

/// Parameters of a key wrapping algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyWrapDescriptor {
    /// Provider algorithm identifier.
    pub native_id: NativeId,
    /// Bytes added by wrapping and removed by unwrapping.
    pub overhead: usize,
    /// Fixed initialization vector.
    pub iv: [u8; 8],
}

/// Block ciphers available for CBC encryption.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Cipher {
    /// Advanced Encryption Standard, 128-bit block, 128-bit key.
    Aes128,
    /// Advanced Encryption Standard, 128-bit block, 192-bit key.
    Aes192,
    /// Advanced Encryption Standard, 128-bit block, 256-bit key.
    Aes256,
    /// Data Encryption Standard.
    Des,
    /// Triple-DES, three keys, EDE configuration.
    TripleDes,
}

const AES128: CipherDescriptor = CipherDescriptor {
    native_id: native::ALGORITHM_AES,
    key_size: 16,
    block_size: 16,
};
const AES192: CipherDescriptor = CipherDescriptor {
    native_id: native::ALGORITHM_AES,
    key_size: 24,
    block_size: 16,
};
const AES256: CipherDescriptor = CipherDescriptor {
    native_id: native::ALGORITHM_AES,
    key_size: 32,
    block_size: 16,
};
const DES: CipherDescriptor = CipherDescriptor {
    native_id: native::ALGORITHM_DES,
    key_size: 8,
    block_size: 8,
};
const TRIPLE_DES: CipherDescriptor = CipherDescriptor {
    native_id: native::ALGORITHM_3DES,
    key_size: 24,
    block_size: 8,
};

impl Cipher {
    /// Every cipher variant.
    pub const ALL: [Cipher; 5] = [
        Cipher::Aes128,
        Cipher::Aes192,
        Cipher::Aes256,
        Cipher::Des,
        Cipher::TripleDes,
    ];

    /// Descriptor record for this cipher.
    pub fn descriptor(self) -> &'static CipherDescriptor {
        match self {
            Cipher::Aes128 => &AES128,
            Cipher::Aes192 => &AES192,
            Cipher::Aes256 => &AES256,
            Cipher::Des => &DES,
            Cipher::TripleDes => &TRIPLE_DES,
        }
    }

    /// The required size of keys for this algorithm.
    ///
    /// Use this to generate random keys or to size PBKDF2 output.
    pub fn key_size(self) -> usize {
        self.descriptor().key_size
    }

    /// The block size in bytes. IVs must have exactly this length.
    pub fn block_size(self) -> usize {
        self.descriptor().block_size
    }
}

/// Unkeyed hash algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Digest {
    /// MD4.
    Md4,
    /// MD5.
    Md5,
    /// SHA-1.
    Sha1,
    /// SHA-224.
    Sha224,
    /// SHA-256.
    Sha256,
    /// SHA-384.
    Sha384,
    /// SHA-512.
    Sha512,
}

const MD4: DigestDescriptor = DigestDescriptor {
    native_id: native::DIGEST_MD4,
    digest_length: 16,
};
const MD5: DigestDescriptor = DigestDescriptor {
    native_id: native::DIGEST_MD5,
    digest_length: 16,
};
const SHA1: DigestDescriptor = DigestDescriptor {
    native_id: native::DIGEST_SHA1,
    digest_length: 20,
};
const SHA224: DigestDescriptor = DigestDescriptor {
    native_id: native::DIGEST_SHA224,
    digest_length: 28,
};
const SHA256: DigestDescriptor = DigestDescriptor {
    native_id: native::DIGEST_SHA256,
    digest_length: 32,
};
const SHA384: DigestDescriptor = DigestDescriptor {
    native_id: native::DIGEST_SHA384,
    digest_length: 48,
};
const SHA512: DigestDescriptor = DigestDescriptor {
    native_id: native::DIGEST_SHA512,
    digest_length: 64,
};

impl Digest {
    /// Every digest variant.
    pub const ALL: [Digest; 7] = [
        Digest::Md4,
        Digest::Md5,
        Digest::Sha1,
        Digest::Sha224,
        Digest::Sha256,
        Digest::Sha384,
        Digest::Sha512,
    ];

    /// Descriptor record for this digest.
    pub fn descriptor(self) -> &'static DigestDescriptor {
        match self {
            Digest::Md4 => &MD4,
            Digest::Md5 => &MD5,
            Digest::Sha1 => &SHA1,
            Digest::Sha224 => &SHA224,
            Digest::Sha256 => &SHA256,
            Digest::Sha384 => &SHA384,
            Digest::Sha512 => &SHA512,
        }
    }

    /// The length of digests produced by the algorithm.
    pub fn digest_length(self) -> usize {
        self.descriptor().digest_length
    }
}

/// HMAC algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Hmac {
    /// HMAC-SHA-1.
    Sha1,
    /// HMAC-SHA-224.
    Sha224,
    /// HMAC-SHA-256.
    Sha256,
    /// HMAC-SHA-384.
    Sha384,
    /// HMAC-SHA-512.
    Sha512,
}

const HMAC_SHA1: DigestDescriptor = DigestDescriptor {
    native_id: native::HMAC_SHA1,
    digest_length: 20,
};
const HMAC_SHA224: DigestDescriptor = DigestDescriptor {
    native_id: native::HMAC_SHA224,
    digest_length: 28,
};
const HMAC_SHA256: DigestDescriptor = DigestDescriptor {
    native_id: native::HMAC_SHA256,
    digest_length: 32,
};
const HMAC_SHA384: DigestDescriptor = DigestDescriptor {
    native_id: native::HMAC_SHA384,
    digest_length: 48,
};
const HMAC_SHA512: DigestDescriptor = DigestDescriptor {
    native_id: native::HMAC_SHA512,
    digest_length: 64,
};

impl Hmac {
    /// Every HMAC variant.
    pub const ALL: [Hmac; 5] = [
        Hmac::Sha1,
        Hmac::Sha224,
        Hmac::Sha256,
        Hmac::Sha384,
        Hmac::Sha512,
    ];

    /// Descriptor record for this HMAC.
    pub fn descriptor(self) -> &'static DigestDescriptor {
        match self {
            Hmac::Sha1 => &HMAC_SHA1,
            Hmac::Sha224 => &HMAC_SHA224,
            Hmac::Sha256 => &HMAC_SHA256,
            Hmac::Sha384 => &HMAC_SHA384,
            Hmac::Sha512 => &HMAC_SHA512,
        }
    }

    /// The underlying hash function.
    pub fn digest(self) -> Digest {
        match self {
            Hmac::Sha1 => Digest::Sha1,
            Hmac::Sha224 => Digest::Sha224,
            Hmac::Sha256 => Digest::Sha256,
            Hmac::Sha384 => Digest::Sha384,
            Hmac::Sha512 => Digest::Sha512,
        }
    }

    /// The length of authentication codes produced by the algorithm.
    pub fn digest_length(self) -> usize {
        self.descriptor().digest_length
    }
}

/// Pseudo-random functions usable by PBKDF2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PseudoRandomAlgorithm {
    /// HMAC-SHA-1.
    HmacSha1,
    /// HMAC-SHA-224.
    HmacSha224,
    /// HMAC-SHA-256.
    HmacSha256,
    /// HMAC-SHA-384.
    HmacSha384,
    /// HMAC-SHA-512.
    HmacSha512,
}

const PRF_SHA1: DigestDescriptor = DigestDescriptor {
    native_id: native::PRF_HMAC_SHA1,
    digest_length: 20,
};
const PRF_SHA224: DigestDescriptor = DigestDescriptor {
    native_id: native::PRF_HMAC_SHA224,
    digest_length: 28,
};
const PRF_SHA256: DigestDescriptor = DigestDescriptor {
    native_id: native::PRF_HMAC_SHA256,
    digest_length: 32,
};
const PRF_SHA384: DigestDescriptor = DigestDescriptor {
    native_id: native::PRF_HMAC_SHA384,
    digest_length: 48,
};
const PRF_SHA512: DigestDescriptor = DigestDescriptor {
    native_id: native::PRF_HMAC_SHA512,
    digest_length: 64,
};

impl PseudoRandomAlgorithm {
    /// Descriptor record for this PRF.
    pub fn descriptor(self) -> &'static DigestDescriptor {
        match self {
            PseudoRandomAlgorithm::HmacSha1 => &PRF_SHA1,
            PseudoRandomAlgorithm::HmacSha224 => &PRF_SHA224,
            PseudoRandomAlgorithm::HmacSha256 => &PRF_SHA256,
            PseudoRandomAlgorithm::HmacSha384 => &PRF_SHA384,
            PseudoRandomAlgorithm::HmacSha512 => &PRF_SHA512,
        }
    }

    /// The HMAC this PRF is built on.
    pub fn hmac(self) -> Hmac {
        match self {
            PseudoRandomAlgorithm::HmacSha1 => Hmac::Sha1,
            PseudoRandomAlgorithm::HmacSha224 => Hmac::Sha224,
            PseudoRandomAlgorithm::HmacSha256 => Hmac::Sha256,
            PseudoRandomAlgorithm::HmacSha384 => Hmac::Sha384,
            PseudoRandomAlgorithm::HmacSha512 => Hmac::Sha512,
        }
    }
}

/// Password-based key derivation algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum KeyDerivation {
    /// PBKDF2 with the given pseudo-random function.
    Pbkdf2(PseudoRandomAlgorithm),
}

impl KeyDerivation {
    /// Provider identifier of the derivation algorithm.
    pub fn native_id(self) -> NativeId {
        match self {
            KeyDerivation::Pbkdf2(_) => native::PBKDF2,
        }
    }

    /// The pseudo-random function driving the derivation.
    pub fn prf(self) -> PseudoRandomAlgorithm {
        match self {
            KeyDerivation::Pbkdf2(prf) => prf,
        }
    }
}

/// Symmetric key wrapping algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum KeyWrap {
    /// AES key wrap (RFC 3394).
    Aes,
}

const WRAP_AES: KeyWrapDescriptor = KeyWrapDescriptor {
    native_id: native::WRAP_AES,
    overhead: 8,
    iv: [0xA6; 8],
};

impl KeyWrap {
    /// Descriptor record for this algorithm.
    pub fn descriptor(self) -> &'static KeyWrapDescriptor {
        match self {
            KeyWrap::Aes => &WRAP_AES,
        }
    }

    /// Size of the blob produced by wrapping `key_len` bytes.
    pub fn wrapped_size(self, key_len: usize) -> usize {
        key_len.saturating_add(self.descriptor().overhead)
    }

    /// Size of the key recovered from a `wrapped_len`-byte blob.
    pub fn unwrapped_size(self, wrapped_len: usize) -> usize {
        wrapped_len.saturating_sub(self.descriptor().overhead)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cipher_table() {
        let sizes: Vec<(usize, usize)> = Cipher::ALL
            .iter()
            .map(|c| (c.key_size(), c.block_size()))
            .collect();
        assert_eq!(sizes, vec![(16, 16), (24, 16), (32, 16), (8, 8), (24, 8)]);
        assert_eq!(Cipher::Aes192.descriptor().native_id, native::ALGORITHM_AES);
        assert_eq!(Cipher::TripleDes.descriptor().native_id, native::ALGORITHM_3DES);
    }

    #[test]
    fn test_digest_lengths() {
        let lengths: Vec<usize> = Digest::ALL.iter().map(|d| d.digest_length()).collect();
        assert_eq!(lengths, vec![16, 16, 20, 28, 32, 48, 64]);
    }

    #[test]
    fn test_hmac_matches_underlying_digest() {
        for hmac in Hmac::ALL {
            assert_eq!(hmac.digest_length(), hmac.digest().digest_length());
        }
    }

    #[test]
    fn test_prf_matches_hmac() {
        let prf = PseudoRandomAlgorithm::HmacSha384;
        assert_eq!(prf.descriptor().digest_length, prf.hmac().digest_length());
        assert_eq!(KeyDerivation::Pbkdf2(prf).prf(), prf);
        assert_eq!(KeyDerivation::Pbkdf2(prf).native_id(), native::PBKDF2);
    }

    #[test]
    fn test_key_wrap_sizes() {
        assert_eq!(KeyWrap::Aes.wrapped_size(16), 24);
        assert_eq!(KeyWrap::Aes.unwrapped_size(40), 32);
        assert_eq!(KeyWrap::Aes.unwrapped_size(4), 0);
        assert_eq!(KeyWrap::Aes.descriptor().iv, [0xA6; 8]);
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&KeyDerivation::Pbkdf2(PseudoRandomAlgorithm::HmacSha256)).unwrap();
        assert_eq!(json, r#"{"pbkdf2":"hmac-sha256"}"#);
        let cipher: Cipher = serde_json::from_str(r#""triple-des""#).unwrap();
        assert_eq!(cipher, Cipher::TripleDes);
    }
}

//! Software primitive provider built on the RustCrypto crates.
//!
//! [`SoftwareProvider`] answers the [`PrimitiveProvider`] call shape with
//! the same status codes a native library returns, including
//! `BUFFER_TOO_SMALL` with the required size written back.
//! [`OsRandomSource`] reads the operating system's generator through
//! `getrandom`.

use std::time::{Duration, Instant};

use aes::cipher::block_padding::{NoPadding, Pkcs7};
use aes::cipher::{
    BlockCipher, BlockDecrypt, BlockDecryptMut, BlockEncrypt, BlockEncryptMut, KeyInit, KeyIvInit,
};
use aes::{Aes128, Aes192, Aes256};
use des::{Des, TdesEde3};
use hmac::{Hmac, Mac};
use md4::Md4;
use md5::Md5;
use rand::RngCore;
use sha1::Sha1;
use sha2::{Sha224, Sha256, Sha384, Sha512};
use subtle::ConstantTimeEq;
use tracing::warn;
use zeroize::{Zeroize, Zeroizing};

use primkit_common::status::{self, OsStatus, Status};
use primkit_common::Operation;

use crate::provider::{native, NativeId, PrimitiveProvider, SystemRandom};

/// Rounds timed by PBKDF calibration before scaling to the target delay.
const CALIBRATION_ROUNDS: u32 = 10_000;

/// Timed trials per calibration; the fastest one is used.
const CALIBRATION_TRIALS: usize = 3;

/// Longest salt accepted by PBKDF calibration.
pub const MAX_CALIBRATION_SALT_LEN: usize = 132;

/// Longest derived key accepted by PBKDF calibration.
pub const MAX_CALIBRATION_KEY_LEN: usize = 1024;

/// RFC 3394 works on 64-bit halves of the AES block.
const SEMIBLOCK: usize = 8;

/// Primitive provider backed by the RustCrypto implementations.
#[derive(Debug, Clone, Copy, Default)]
pub struct SoftwareProvider;

/// Operating-system random source.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsRandomSource;

impl PrimitiveProvider for SoftwareProvider {
    fn name(&self) -> &str {
        "software"
    }

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
    ) -> Status {
        if key.len() != key_len {
            return status::KEY_SIZE_ERROR;
        }

        let padding = options & native::OPTION_PKCS7_PADDING != 0;
        let call = CbcCall {
            op,
            padding,
            key,
            iv,
            input,
        };

        match (algorithm, key_len) {
            (native::ALGORITHM_AES, 16) => call.run::<Aes128>(output, moved),
            (native::ALGORITHM_AES, 24) => call.run::<Aes192>(output, moved),
            (native::ALGORITHM_AES, 32) => call.run::<Aes256>(output, moved),
            (native::ALGORITHM_DES, 8) => call.run::<Des>(output, moved),
            (native::ALGORITHM_3DES, 24) => call.run::<TdesEde3>(output, moved),
            (native::ALGORITHM_AES | native::ALGORITHM_DES | native::ALGORITHM_3DES, _) => {
                status::KEY_SIZE_ERROR
            }
            _ => status::PARAM_ERROR,
        }
    }

    fn digest(&self, algorithm: NativeId, message: &[u8], output: &mut [u8]) {
        match algorithm {
            native::DIGEST_MD4 => digest_into::<Md4>(message, output),
            native::DIGEST_MD5 => digest_into::<Md5>(message, output),
            native::DIGEST_SHA1 => digest_into::<Sha1>(message, output),
            native::DIGEST_SHA224 => digest_into::<Sha224>(message, output),
            native::DIGEST_SHA256 => digest_into::<Sha256>(message, output),
            native::DIGEST_SHA384 => digest_into::<Sha384>(message, output),
            native::DIGEST_SHA512 => digest_into::<Sha512>(message, output),
            other => warn!(algorithm = other, "unsupported digest algorithm"),
        }
    }

    fn hmac(&self, algorithm: NativeId, key: &[u8], message: &[u8], output: &mut [u8]) {
        match algorithm {
            native::HMAC_SHA1 => mac_into::<Hmac<Sha1>>(key, message, output),
            native::HMAC_SHA224 => mac_into::<Hmac<Sha224>>(key, message, output),
            native::HMAC_SHA256 => mac_into::<Hmac<Sha256>>(key, message, output),
            native::HMAC_SHA384 => mac_into::<Hmac<Sha384>>(key, message, output),
            native::HMAC_SHA512 => mac_into::<Hmac<Sha512>>(key, message, output),
            other => warn!(algorithm = other, "unsupported HMAC algorithm"),
        }
    }

    fn derive_pbkdf(
        &self,
        algorithm: NativeId,
        prf: NativeId,
        password: &[u8],
        salt: &[u8],
        rounds: u32,
        output: &mut [u8],
    ) -> Status {
        if algorithm != native::PBKDF2 || rounds == 0 || output.is_empty() {
            return status::PARAM_ERROR;
        }

        let result = match prf {
            native::PRF_HMAC_SHA1 => pbkdf2::pbkdf2::<Hmac<Sha1>>(password, salt, rounds, output),
            native::PRF_HMAC_SHA224 => {
                pbkdf2::pbkdf2::<Hmac<Sha224>>(password, salt, rounds, output)
            }
            native::PRF_HMAC_SHA256 => {
                pbkdf2::pbkdf2::<Hmac<Sha256>>(password, salt, rounds, output)
            }
            native::PRF_HMAC_SHA384 => {
                pbkdf2::pbkdf2::<Hmac<Sha384>>(password, salt, rounds, output)
            }
            native::PRF_HMAC_SHA512 => {
                pbkdf2::pbkdf2::<Hmac<Sha512>>(password, salt, rounds, output)
            }
            _ => return status::PARAM_ERROR,
        };

        match result {
            Ok(()) => status::SUCCESS,
            Err(_) => status::PARAM_ERROR,
        }
    }

    fn calibrate_pbkdf(
        &self,
        algorithm: NativeId,
        password_len: usize,
        salt_len: usize,
        prf: NativeId,
        derived_key_len: usize,
        msec: u32,
    ) -> u32 {
        if algorithm != native::PBKDF2
            || derived_key_len == 0
            || derived_key_len > MAX_CALIBRATION_KEY_LEN
            || msec == 0
            || salt_len == 0
            || salt_len > MAX_CALIBRATION_SALT_LEN
        {
            return native::CALIBRATION_FAILED;
        }

        let password = vec![b'a'; password_len.max(1)];
        let salt: Vec<u8> = (0..salt_len).map(|i| i as u8).collect();
        let mut derived = Zeroizing::new(vec![0u8; derived_key_len]);

        let mut fastest = Duration::MAX;
        for _ in 0..CALIBRATION_TRIALS {
            let started = Instant::now();
            let status = self.derive_pbkdf(
                algorithm,
                prf,
                &password,
                &salt,
                CALIBRATION_ROUNDS,
                derived.as_mut_slice(),
            );
            if status != status::SUCCESS {
                return native::CALIBRATION_FAILED;
            }
            fastest = fastest.min(started.elapsed());
        }

        rounds_for_delay(CALIBRATION_ROUNDS, fastest, msec)
    }

    fn key_wrap(
        &self,
        algorithm: NativeId,
        iv: &[u8],
        kek: &[u8],
        raw_key: &[u8],
        output: &mut [u8],
        written: &mut usize,
    ) -> Status {
        if algorithm != native::WRAP_AES
            || raw_key.len() < 2 * SEMIBLOCK
            || raw_key.len() % SEMIBLOCK != 0
        {
            return status::PARAM_ERROR;
        }
        let (Ok(iv), Some(kek)) = (<[u8; SEMIBLOCK]>::try_from(iv), Kek::new(kek)) else {
            return status::PARAM_ERROR;
        };

        let required = raw_key.len() + SEMIBLOCK;
        if output.len() < required {
            *written = required;
            return status::BUFFER_TOO_SMALL;
        }

        kek.wrap(&iv, raw_key, &mut output[..required]);
        *written = required;
        status::SUCCESS
    }

    fn key_unwrap(
        &self,
        algorithm: NativeId,
        iv: &[u8],
        kek: &[u8],
        wrapped_key: &[u8],
        output: &mut [u8],
        written: &mut usize,
    ) -> Status {
        if algorithm != native::WRAP_AES
            || wrapped_key.len() < 3 * SEMIBLOCK
            || wrapped_key.len() % SEMIBLOCK != 0
        {
            return status::PARAM_ERROR;
        }
        let (Ok(iv), Some(kek)) = (<[u8; SEMIBLOCK]>::try_from(iv), Kek::new(kek)) else {
            return status::PARAM_ERROR;
        };

        let required = wrapped_key.len() - SEMIBLOCK;
        if output.len() < required {
            *written = required;
            return status::BUFFER_TOO_SMALL;
        }

        if !kek.unwrap(&iv, wrapped_key, &mut output[..required]) {
            *written = 0;
            return status::DECODE_ERROR;
        }
        *written = required;
        status::SUCCESS
    }

    fn random_bytes(&self, output: &mut [u8]) -> Status {
        match rand::thread_rng().try_fill_bytes(output) {
            Ok(()) => status::SUCCESS,
            Err(err) => {
                warn!(%err, "CSPRNG failed");
                status::RNG_FAILURE
            }
        }
    }
}

impl SystemRandom for OsRandomSource {
    fn copy_bytes(&self, output: &mut [u8]) -> OsStatus {
        match getrandom::getrandom(output) {
            Ok(()) => status::OS_SUCCESS,
            Err(err) => err
                .raw_os_error()
                .unwrap_or_else(|| err.code().get() as OsStatus),
        }
    }
}

/// Scale a timed trial to the number of rounds that fit in `msec`.
///
/// The result is clamped to `1..CALIBRATION_FAILED` so a real round count is
/// never confused with the failure sentinel.
pub(crate) fn rounds_for_delay(trial_rounds: u32, elapsed: Duration, msec: u32) -> u32 {
    let elapsed_ns = elapsed.as_nanos().max(1);
    let target_ns = u128::from(msec) * 1_000_000;
    let rounds = target_ns * u128::from(trial_rounds) / elapsed_ns;
    rounds.clamp(1, u128::from(native::CALIBRATION_FAILED - 1)) as u32
}

/// Arguments of one CBC call, dispatched over the block cipher type.
struct CbcCall<'a> {
    op: Operation,
    padding: bool,
    key: &'a [u8],
    iv: &'a [u8],
    input: &'a [u8],
}

impl CbcCall<'_> {
    fn run<C>(&self, output: &mut [u8], moved: &mut usize) -> Status
    where
        C: BlockCipher + BlockEncryptMut + BlockDecryptMut + KeyInit,
    {
        let block = C::block_size();
        if self.iv.len() != block {
            return status::PARAM_ERROR;
        }
        let aligned = self.input.len() % block == 0;
        if !aligned && (self.op == Operation::Decrypt || !self.padding) {
            return status::ALIGNMENT_ERROR;
        }

        let required = match self.op {
            Operation::Encrypt if self.padding => (self.input.len() / block + 1) * block,
            _ => self.input.len(),
        };
        if output.len() < required {
            *moved = required;
            return status::BUFFER_TOO_SMALL;
        }

        let result = match self.op {
            Operation::Encrypt => self.encrypt::<C>(output),
            Operation::Decrypt => self.decrypt::<C>(output),
        };
        match result {
            Ok(count) => {
                *moved = count;
                status::SUCCESS
            }
            Err(code) => code,
        }
    }

    fn encrypt<C>(&self, output: &mut [u8]) -> Result<usize, Status>
    where
        C: BlockCipher + BlockEncryptMut + KeyInit,
    {
        let cipher = cbc::Encryptor::<C>::new_from_slices(self.key, self.iv)
            .map_err(|_| status::KEY_SIZE_ERROR)?;
        let written = if self.padding {
            cipher.encrypt_padded_b2b_mut::<Pkcs7>(self.input, output)
        } else {
            cipher.encrypt_padded_b2b_mut::<NoPadding>(self.input, output)
        };
        written
            .map(|ciphertext| ciphertext.len())
            .map_err(|_| status::BUFFER_TOO_SMALL)
    }

    fn decrypt<C>(&self, output: &mut [u8]) -> Result<usize, Status>
    where
        C: BlockCipher + BlockDecryptMut + KeyInit,
    {
        let cipher = cbc::Decryptor::<C>::new_from_slices(self.key, self.iv)
            .map_err(|_| status::KEY_SIZE_ERROR)?;
        let written = if self.padding {
            cipher.decrypt_padded_b2b_mut::<Pkcs7>(self.input, output)
        } else {
            cipher.decrypt_padded_b2b_mut::<NoPadding>(self.input, output)
        };
        match written {
            Ok(plaintext) => Ok(plaintext.len()),
            Err(_) => {
                output.zeroize();
                Err(status::DECODE_ERROR)
            }
        }
    }
}

fn digest_into<D: sha2::Digest>(message: &[u8], output: &mut [u8]) {
    let hash = D::digest(message);
    let count = hash.len().min(output.len());
    output[..count].copy_from_slice(&hash[..count]);
}

fn mac_into<M: Mac + KeyInit>(key: &[u8], message: &[u8], output: &mut [u8]) {
    let Ok(mut mac) = <M as KeyInit>::new_from_slice(key) else {
        warn!("HMAC rejected key");
        return;
    };
    mac.update(message);
    let tag = mac.finalize().into_bytes();
    let count = tag.len().min(output.len());
    output[..count].copy_from_slice(&tag[..count]);
}

/// AES key-encryption key for RFC 3394 wrapping.
enum Kek {
    Aes128(Aes128),
    Aes192(Aes192),
    Aes256(Aes256),
}

impl Kek {
    fn new(key: &[u8]) -> Option<Self> {
        match key.len() {
            16 => Aes128::new_from_slice(key).ok().map(Kek::Aes128),
            24 => Aes192::new_from_slice(key).ok().map(Kek::Aes192),
            32 => Aes256::new_from_slice(key).ok().map(Kek::Aes256),
            _ => None,
        }
    }

    fn encrypt(&self, block: &mut aes::Block) {
        match self {
            Kek::Aes128(cipher) => cipher.encrypt_block(block),
            Kek::Aes192(cipher) => cipher.encrypt_block(block),
            Kek::Aes256(cipher) => cipher.encrypt_block(block),
        }
    }

    fn decrypt(&self, block: &mut aes::Block) {
        match self {
            Kek::Aes128(cipher) => cipher.decrypt_block(block),
            Kek::Aes192(cipher) => cipher.decrypt_block(block),
            Kek::Aes256(cipher) => cipher.decrypt_block(block),
        }
    }

    /// `output` must be exactly `raw_key.len() + SEMIBLOCK` bytes.
    fn wrap(&self, iv: &[u8; SEMIBLOCK], raw_key: &[u8], output: &mut [u8]) {
        let n = raw_key.len() / SEMIBLOCK;
        let (head, registers) = output.split_at_mut(SEMIBLOCK);
        registers.copy_from_slice(raw_key);

        let mut a = *iv;
        let mut block = aes::Block::default();
        for j in 0..6 {
            for (i, r) in registers.chunks_exact_mut(SEMIBLOCK).enumerate() {
                block[..SEMIBLOCK].copy_from_slice(&a);
                block[SEMIBLOCK..].copy_from_slice(r);
                self.encrypt(&mut block);
                a.copy_from_slice(&block[..SEMIBLOCK]);
                xor_step(&mut a, n * j + i + 1);
                r.copy_from_slice(&block[SEMIBLOCK..]);
            }
        }
        head.copy_from_slice(&a);
        block.as_mut_slice().zeroize();
    }

    /// Returns `false` if the recovered IV does not match; `output` is wiped.
    fn unwrap(&self, iv: &[u8; SEMIBLOCK], wrapped_key: &[u8], output: &mut [u8]) -> bool {
        let n = output.len() / SEMIBLOCK;
        let mut a = [0u8; SEMIBLOCK];
        a.copy_from_slice(&wrapped_key[..SEMIBLOCK]);
        output.copy_from_slice(&wrapped_key[SEMIBLOCK..]);

        let mut block = aes::Block::default();
        for j in (0..6).rev() {
            for (i, r) in output.chunks_exact_mut(SEMIBLOCK).enumerate().rev() {
                xor_step(&mut a, n * j + i + 1);
                block[..SEMIBLOCK].copy_from_slice(&a);
                block[SEMIBLOCK..].copy_from_slice(r);
                self.decrypt(&mut block);
                a.copy_from_slice(&block[..SEMIBLOCK]);
                r.copy_from_slice(&block[SEMIBLOCK..]);
            }
        }
        block.as_mut_slice().zeroize();

        let valid: bool = a[..].ct_eq(&iv[..]).into();
        if !valid {
            output.zeroize();
        }
        valid
    }
}

fn xor_step(a: &mut [u8; SEMIBLOCK], t: usize) {
    for (byte, step) in a.iter_mut().zip((t as u64).to_be_bytes()) {
        *byte ^= step;
    }
}

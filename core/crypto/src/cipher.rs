//! Symmetric encryption with a block cipher in CBC mode and PKCS#7 padding.

use primkit_common::{Error, Operation, Result};

use crate::algorithm::Cipher;
use crate::negotiate::negotiate;
use crate::provider::{default_provider, native, PrimitiveProvider};
use crate::random::Random;

impl Cipher {
    /// Encrypt `data` with the default provider.
    ///
    /// # Errors
    /// - `IllegalParameter` if `iv` is not exactly one block long
    /// - `KeySizeError` if the provider rejects the key length
    pub fn encrypt(self, data: &[u8], key: &[u8], iv: &[u8]) -> Result<Vec<u8>> {
        self.encrypt_with(default_provider(), data, key, iv)
    }

    /// Decrypt `data` with the default provider.
    ///
    /// # Errors
    /// - `IllegalParameter` if `iv` is not exactly one block long
    /// - `AlignmentError` if `data` is not a whole number of blocks
    /// - `DecodeError` if the padding is invalid
    pub fn decrypt(self, data: &[u8], key: &[u8], iv: &[u8]) -> Result<Vec<u8>> {
        self.decrypt_with(default_provider(), data, key, iv)
    }

    /// Encrypt `data` with an explicit provider.
    pub fn encrypt_with(
        self,
        provider: &dyn PrimitiveProvider,
        data: &[u8],
        key: &[u8],
        iv: &[u8],
    ) -> Result<Vec<u8>> {
        self.crypt(provider, Operation::Encrypt, data, key, iv)
    }

    /// Decrypt `data` with an explicit provider.
    pub fn decrypt_with(
        self,
        provider: &dyn PrimitiveProvider,
        data: &[u8],
        key: &[u8],
        iv: &[u8],
    ) -> Result<Vec<u8>> {
        self.crypt(provider, Operation::Decrypt, data, key, iv)
    }

    /// Draw a fresh key of [`Cipher::key_size`] bytes.
    pub fn generate_key(self, random: &dyn Random) -> Result<Vec<u8>> {
        random.generate(self.key_size())
    }

    /// Draw a fresh IV of [`Cipher::block_size`] bytes.
    pub fn generate_iv(self, random: &dyn Random) -> Result<Vec<u8>> {
        random.generate(self.block_size())
    }

    fn crypt(
        self,
        provider: &dyn PrimitiveProvider,
        op: Operation,
        data: &[u8],
        key: &[u8],
        iv: &[u8],
    ) -> Result<Vec<u8>> {
        let descriptor = self.descriptor();
        if iv.len() != descriptor.block_size {
            return Err(Error::IllegalParameter);
        }

        // Padding adds at most one block.
        let estimate = data
            .len()
            .checked_add(descriptor.block_size)
            .ok_or(Error::Overflow)?;

        negotiate(estimate, |output, moved| {
            provider.crypt(
                op,
                descriptor.native_id,
                native::OPTION_PKCS7_PADDING,
                key,
                descriptor.key_size,
                iv,
                data,
                output,
                moved,
            )
        })
    }
}

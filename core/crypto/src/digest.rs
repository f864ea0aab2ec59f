//! Message digests.

use crate::algorithm::Digest;
use crate::negotiate::fixed_output;
use crate::provider::{default_provider, PrimitiveProvider};

impl Digest {
    /// Hash `message` with the default provider.
    ///
    /// The result is always [`Digest::digest_length`] bytes.
    pub fn hash(self, message: &[u8]) -> Vec<u8> {
        self.hash_with(default_provider(), message)
    }

    /// Hash `message` with an explicit provider.
    ///
    /// # Postconditions
    /// - Returns exactly [`Digest::digest_length`] bytes
    /// - Equal messages give equal digests
    pub fn hash_with(self, provider: &dyn PrimitiveProvider, message: &[u8]) -> Vec<u8> {
        let descriptor = self.descriptor();
        fixed_output(descriptor.digest_length, |output| {
            provider.digest(descriptor.native_id, message, output)
        })
    }
}

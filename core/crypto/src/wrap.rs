//! Symmetric key wrapping (RFC 3394).

use primkit_common::Result;

use crate::algorithm::KeyWrap;
use crate::negotiate::call_once;
use crate::provider::{default_provider, PrimitiveProvider};

impl KeyWrap {
    /// Wrap `key` under `encryption_key` with the default provider.
    ///
    /// The default RFC 3394 IV is always used.
    ///
    /// # Errors
    /// - `IllegalParameter` if `key` is shorter than 16 bytes or not a
    ///   multiple of 8, or `encryption_key` is not a valid AES key
    pub fn wrap(self, key: &[u8], encryption_key: &[u8]) -> Result<Vec<u8>> {
        self.wrap_with(default_provider(), key, encryption_key)
    }

    /// Recover a key wrapped under `encryption_key`.
    ///
    /// # Errors
    /// - `DecodeError` if the integrity check fails
    pub fn unwrap(self, wrapped_key: &[u8], encryption_key: &[u8]) -> Result<Vec<u8>> {
        self.unwrap_with(default_provider(), wrapped_key, encryption_key)
    }

    /// Wrap `key` with an explicit provider.
    ///
    /// # Preconditions
    /// - `key` is at least 16 bytes and a multiple of 8
    /// - `encryption_key` is 16, 24 or 32 bytes
    ///
    /// # Postconditions
    /// - Returns [`KeyWrap::wrapped_size`] bytes
    ///
    /// # Errors
    /// - `IllegalParameter` if a precondition fails
    pub fn wrap_with(
        self,
        provider: &dyn PrimitiveProvider,
        key: &[u8],
        encryption_key: &[u8],
    ) -> Result<Vec<u8>> {
        let descriptor = self.descriptor();
        call_once(self.wrapped_size(key.len()), |output, written| {
            provider.key_wrap(
                descriptor.native_id,
                &descriptor.iv,
                encryption_key,
                key,
                output,
                written,
            )
        })
    }

    /// Unwrap `wrapped_key` with an explicit provider.
    ///
    /// # Postconditions
    /// - Returns [`KeyWrap::unwrapped_size`] bytes
    /// - No key bytes are returned if the integrity check fails
    ///
    /// # Errors
    /// - `IllegalParameter` if the blob or `encryption_key` has an invalid length
    /// - `DecodeError` if the integrity check fails
    pub fn unwrap_with(
        self,
        provider: &dyn PrimitiveProvider,
        wrapped_key: &[u8],
        encryption_key: &[u8],
    ) -> Result<Vec<u8>> {
        let descriptor = self.descriptor();
        call_once(self.unwrapped_size(wrapped_key.len()), |output, written| {
            provider.key_unwrap(
                descriptor.native_id,
                &descriptor.iv,
                encryption_key,
                wrapped_key,
                output,
                written,
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockProvider;
    use primkit_common::{status, Error};
    use proptest::prelude::*;

    const KEY_128: &str = "00112233445566778899AABBCCDDEEFF";
    const KEK_128: &str = "000102030405060708090A0B0C0D0E0F";
    const KEK_192: &str = "000102030405060708090A0B0C0D0E0F1011121314151617";
    const KEK_256: &str = "000102030405060708090A0B0C0D0E0F101112131415161718191A1B1C1D1E1F";

    fn check_vector(kek: &str, key: &str, wrapped: &str) {
        let kek = hex::decode(kek).unwrap();
        let key = hex::decode(key).unwrap();
        let wrapped = hex::decode(wrapped).unwrap();

        assert_eq!(KeyWrap::Aes.wrap(&key, &kek).unwrap(), wrapped);
        assert_eq!(KeyWrap::Aes.unwrap(&wrapped, &kek).unwrap(), key);
    }

    #[test]
    fn test_rfc3394_vectors() {
        check_vector(KEK_128, KEY_128, "1FA68B0A8112B447AEF34BD8FB5A7B829D3E862371D2CFE5");
        check_vector(KEK_192, KEY_128, "96778B25AE6CA435F92B5B97C050AED2468AB8A17AD84E5D");
        check_vector(KEK_256, KEY_128, "64E8C3F9CE0F5BA263E9777905818A2A93C8191E7D6E8AE7");
        check_vector(
            KEK_192,
            "00112233445566778899AABBCCDDEEFF0001020304050607",
            "031D33264E15D33268F24EC260743EDCE1C6C7DDEE725A936BA814915C6762D2",
        );
        check_vector(
            KEK_256,
            "00112233445566778899AABBCCDDEEFF0001020304050607",
            "A8F9BC1612C68B3FF6E6F4FBE30E71E4769C8B80A32CB8958CD5D17D6B254DA1",
        );
        check_vector(
            KEK_256,
            "00112233445566778899AABBCCDDEEFF000102030405060708090A0B0C0D0E0F",
            "28C9F404C4B810F4CBCCB35CFB87F8263F5786E2D80ED326CBC7F0E71A99F43BFB988B9B7A02DD21",
        );
    }

    #[test]
    fn test_tampered_blob_fails() {
        let kek = [7u8; 32];
        let mut wrapped = KeyWrap::Aes.wrap(&[9u8; 32], &kek).unwrap();
        wrapped[12] ^= 0x80;
        assert_eq!(KeyWrap::Aes.unwrap(&wrapped, &kek), Err(Error::DecodeError));
    }

    #[test]
    fn test_wrong_kek_fails() {
        let wrapped = KeyWrap::Aes.wrap(&[9u8; 16], &[7u8; 16]).unwrap();
        assert_eq!(KeyWrap::Aes.unwrap(&wrapped, &[8u8; 16]), Err(Error::DecodeError));
    }

    #[test]
    fn test_invalid_inputs() {
        let kek = [7u8; 16];
        assert_eq!(KeyWrap::Aes.wrap(&[1u8; 8], &kek), Err(Error::IllegalParameter));
        assert_eq!(KeyWrap::Aes.wrap(&[1u8; 20], &kek), Err(Error::IllegalParameter));
        assert_eq!(KeyWrap::Aes.wrap(&[], &kek), Err(Error::IllegalParameter));
        assert_eq!(KeyWrap::Aes.wrap(&[1u8; 16], &[7u8; 20]), Err(Error::IllegalParameter));
        assert_eq!(KeyWrap::Aes.unwrap(&[1u8; 16], &kek), Err(Error::IllegalParameter));
        assert_eq!(KeyWrap::Aes.unwrap(&[1u8; 25], &kek), Err(Error::IllegalParameter));
        assert_eq!(KeyWrap::Aes.unwrap(&[], &kek), Err(Error::IllegalParameter));
    }

    #[test]
    fn test_no_retry_on_buffer_too_small() {
        let provider = MockProvider::requiring(64);
        let result = KeyWrap::Aes.wrap_with(&provider, &[1u8; 16], &[7u8; 16]);
        assert_eq!(result, Err(Error::BufferTooSmall));
        assert_eq!(provider.capacities(), vec![24]);
    }

    #[test]
    fn test_provider_error_classified() {
        let provider = MockProvider::returning(status::UNIMPLEMENTED);
        let result = KeyWrap::Aes.unwrap_with(&provider, &[1u8; 24], &[7u8; 16]);
        assert_eq!(result, Err(Error::Unimplemented));
    }

    proptest! {
        #[test]
        fn test_roundtrip(
            blocks in 2usize..8,
            seed in any::<u8>(),
            kek_len in prop::sample::select(vec![16usize, 24, 32]),
            kek in prop::array::uniform32(any::<u8>()),
        ) {
            let key: Vec<u8> = (0..blocks * 8).map(|i| (i as u8).wrapping_mul(seed)).collect();
            let kek = &kek[..kek_len];

            let wrapped = KeyWrap::Aes.wrap(&key, kek).unwrap();
            prop_assert_eq!(wrapped.len(), key.len() + 8);
            prop_assert_eq!(KeyWrap::Aes.unwrap(&wrapped, kek).unwrap(), key);
        }
    }
}

//! Keyed message authentication.

use subtle::ConstantTimeEq;

use crate::algorithm::Hmac;
use crate::negotiate::fixed_output;
use crate::provider::{default_provider, PrimitiveProvider};

impl Hmac {
    /// Authenticate `message` under `key` with the default provider.
    ///
    /// The tag is always [`Hmac::digest_length`] bytes. Keys of any length are
    /// accepted.
    pub fn authenticate(self, message: &[u8], key: &[u8]) -> Vec<u8> {
        self.authenticate_with(default_provider(), message, key)
    }

    /// Authenticate `message` under `key` with an explicit provider.
    ///
    /// # Postconditions
    /// - Returns exactly [`Hmac::digest_length`] bytes
    /// - The same message and key always give the same tag
    pub fn authenticate_with(
        self,
        provider: &dyn PrimitiveProvider,
        message: &[u8],
        key: &[u8],
    ) -> Vec<u8> {
        let descriptor = self.descriptor();
        fixed_output(descriptor.digest_length, |output| {
            provider.hmac(descriptor.native_id, key, message, output)
        })
    }

    /// Check `tag` against the HMAC of `message` in constant time.
    pub fn verify(self, message: &[u8], key: &[u8], tag: &[u8]) -> bool {
        let expected = self.authenticate(message, key);
        expected.ct_eq(tag).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HI_THERE: &[u8] = b"Hi There";

    fn hex_mac(hmac: Hmac, message: &[u8], key: &[u8]) -> String {
        hex::encode(hmac.authenticate(message, key))
    }

    #[test]
    fn test_rfc4231_case1() {
        let key = [0x0b; 20];
        assert_eq!(
            hex_mac(Hmac::Sha224, HI_THERE, &key),
            "896fb1128abbdf196832107cd49df33f47b4b1169912ba4f53684b22"
        );
        assert_eq!(
            hex_mac(Hmac::Sha256, HI_THERE, &key),
            "b0344c61d8db38535ca8afceaf0bf12b881dc200c9833da726e9376c2e32cff7"
        );
        assert_eq!(
            hex_mac(Hmac::Sha384, HI_THERE, &key),
            "afd03944d84895626b0825f4ab46907f15f9dadbe4101ec682aa034c7cebc59c\
             faea9ea9076ede7f4af152e8b2fa9cb6"
        );
        assert_eq!(
            hex_mac(Hmac::Sha512, HI_THERE, &key),
            "87aa7cdea5ef619d4ff0b4241a1d6cb02379f4e2ce4ec2787ad0b30545e17cde\
             daa833b7d6b8a702038b274eaea3f4e4be9d914eeb61f1702e696c203a126854"
        );
    }

    #[test]
    fn test_rfc2202_sha1() {
        assert_eq!(
            hex_mac(Hmac::Sha1, HI_THERE, &[0x0b; 20]),
            "b617318655057264e28bc0b6fb378c8ef146be00"
        );
        assert_eq!(
            hex_mac(Hmac::Sha1, b"what do ya want for nothing?", b"Jefe"),
            "effcdf6ae5eb2fa2d27416d5f184df9c259a7c79"
        );
    }

    #[test]
    fn test_long_key_is_hashed() {
        // RFC 4231 test case 6: a 131-byte key.
        let key = [0xaa; 131];
        assert_eq!(
            hex_mac(
                Hmac::Sha256,
                b"Test Using Larger Than Block-Size Key - Hash Key First",
                &key
            ),
            "60e431591ee0b67f0d8a26aacbf5b77f8e0bc6213728c5140546040f0ee37f54"
        );
    }

    #[test]
    fn test_tag_lengths() {
        for hmac in Hmac::ALL {
            assert_eq!(hmac.authenticate(b"message", b"key").len(), hmac.digest_length());
            assert_eq!(hmac.authenticate(b"", b"").len(), hmac.digest_length());
        }
    }

    #[test]
    fn test_changes_with_input() {
        for hmac in Hmac::ALL {
            let tag = hmac.authenticate(b"message", b"key");
            assert_eq!(tag, hmac.authenticate(b"message", b"key"));
            assert_ne!(tag, hmac.authenticate(b"messagf", b"key"));
            assert_ne!(tag, hmac.authenticate(b"message", b"kez"));
        }
    }

    #[test]
    fn test_verify() {
        let tag = Hmac::Sha256.authenticate(b"message", b"key");
        assert!(Hmac::Sha256.verify(b"message", b"key", &tag));
        assert!(!Hmac::Sha256.verify(b"message", b"other key", &tag));
        assert!(!Hmac::Sha256.verify(b"message", b"key", &tag[..16]));

        let mut forged = tag.clone();
        forged[0] ^= 1;
        assert!(!Hmac::Sha256.verify(b"message", b"key", &forged));
    }
}

use bitcoin::secp256k1::{self, ecdh::SharedSecret};

use crate::context::Context;
use crate::errors::{Error, Result};
use crate::keys::{PublicKey, SECRET_KEY_SIZE};

/// Computes `sha256(0x02 | parity(y) || x)` of the point `secret * public`.
///
/// The multiplication runs in constant time with respect to `secret`.
pub fn ecdh(_ctx: &Context, public: &PublicKey, secret: &[u8]) -> Result<[u8; 32]> {
    if secret.len() != SECRET_KEY_SIZE {
        return Err(Error::InvalidLength {
            expected: SECRET_KEY_SIZE,
            actual: secret.len(),
        });
    }

    let secret = secp256k1::SecretKey::from_slice(secret).map_err(|_| Error::ScalarInvalid)?;

    Ok(SharedSecret::new(public.inner(), &secret).secret_bytes())
}

#[cfg(test)]
mod tests {
    use once_cell::sync::Lazy;

    use super::*;
    use crate::context::ContextFlags;

    static CTX: Lazy<Context> = Lazy::new(|| Context::new(ContextFlags::BOTH));

    fn scalar(value: u8) -> [u8; 32] {
        let mut bytes = [0u8; 32];
        bytes[31] = value;
        bytes
    }

    #[test]
    fn test_ecdh_vector() {
        let generator: PublicKey =
            "0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798"
                .parse()
                .expect("valid key");

        let secret = ecdh(&CTX, &generator, &scalar(1)).expect("valid scalar");

        assert_eq!(
            hex::encode(secret),
            "0f715baf5d4c2ed329785cef29e562f73488c8a2bb9dbc5700b361d54b9b0554"
        );
    }

    #[test]
    fn test_ecdh_vector_full_width_key() {
        let secret: [u8; 32] =
            hex::decode("2bd806c97f0e00af1a1fc3328fa763a9269723c8db8fac4f93af71db186d6e90")
                .expect("valid hex")
                .try_into()
                .expect("32 bytes");

        let generator: PublicKey =
            "0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798"
                .parse()
                .expect("valid key");
        assert_eq!(
            hex::encode(ecdh(&CTX, &generator, &secret).expect("valid scalar")),
            "9178dcad9b36c30f27da86faaf8a1c5e069d44bf5cd631c8c78ce70e035f93c5"
        );

        // The encoding the public key was parsed from doesn't matter.
        for encoded in [
            "024edfcf9dfe6c0b5c83d1ab3f78d1b39a46ebac6798e08e19761f5ed89ec83c10",
            "044edfcf9dfe6c0b5c83d1ab3f78d1b39a46ebac6798e08e19761f5ed89ec83c10\
             8172c4776865f02047b39cd704135c00c1b00085e0d1b9255405ac7079fa50a2",
        ] {
            let public: PublicKey = encoded.parse().expect("valid key");

            assert_eq!(
                hex::encode(ecdh(&CTX, &public, &secret).expect("valid scalar")),
                "4e06de2520d1fe909bcf244b0a0de57c92bc6e21e28c2cdb108d980ad7d709b6"
            );
        }
    }

    #[test]
    fn test_ecdh_is_symmetric() {
        let two = PublicKey::from_secret_key(&CTX, &scalar(2)).expect("valid");
        let three = PublicKey::from_secret_key(&CTX, &scalar(3)).expect("valid");

        let left = ecdh(&CTX, &two, &scalar(3)).expect("valid scalar");
        let right = ecdh(&CTX, &three, &scalar(2)).expect("valid scalar");

        assert_eq!(left, right);
        assert_eq!(
            hex::encode(left),
            "c7d9ba2fa1496c81be20038e5c608f2fd5d0246d8643783730df6c2bbb855cb2"
        );
    }

    #[test]
    fn test_ecdh_rejects_invalid_scalar() {
        let two = PublicKey::from_secret_key(&CTX, &scalar(2)).expect("valid");

        assert_eq!(ecdh(&CTX, &two, &[0u8; 32]), Err(Error::ScalarInvalid));
        assert_eq!(ecdh(&CTX, &two, &[0xFF; 32]), Err(Error::ScalarInvalid));
        assert_eq!(
            ecdh(&CTX, &two, &[1u8; 16]),
            Err(Error::InvalidLength {
                expected: 32,
                actual: 16
            })
        );
    }
}

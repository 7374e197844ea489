//! Public and private key algebra on top of the secp256k1 engine.

use core::fmt;
use core::ops::Deref;
use core::str::FromStr;

use bitcoin::secp256k1::{self, Scalar};

use crate::context::{Context, ContextFlags};
use crate::errors::{Error, Result};
use crate::util::{scalar_from_bytes, scalar_to_bytes};

pub const SECRET_KEY_SIZE: usize = 32;
pub const COMPRESSED_PUBLIC_KEY_SIZE: usize = 33;
pub const UNCOMPRESSED_PUBLIC_KEY_SIZE: usize = 65;

/// Converts raw tweak bytes, failing if they are not below the group order.
fn tweak_scalar(tweak: &[u8; 32]) -> Result<Scalar> {
    Scalar::from_be_bytes(*tweak).map_err(|_| Error::TweakOutOfRange)
}

/// A point on the curve other than infinity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicKey(secp256k1::PublicKey);

impl Deref for PublicKey {
    type Target = secp256k1::PublicKey;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<secp256k1::PublicKey> for PublicKey {
    fn from(key: secp256k1::PublicKey) -> Self {
        Self(key)
    }
}

impl PublicKey {
    /// Computes `secret * G`.
    pub fn from_secret_key(ctx: &Context, secret: &[u8]) -> Result<Self> {
        ctx.require(ContextFlags::SIGN)?;

        let secret = PrivateKey::from_slice(secret)?;

        Ok(Self(secp256k1::PublicKey::from_secret_key(
            ctx.secp(),
            &secret.0,
        )))
    }

    /// Parses a compressed (`0x02`/`0x03`), uncompressed (`0x04`) or hybrid
    /// (`0x06`/`0x07`) encoding.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != COMPRESSED_PUBLIC_KEY_SIZE && bytes.len() != UNCOMPRESSED_PUBLIC_KEY_SIZE
        {
            return Err(Error::ParseError("public key"));
        }

        secp256k1::PublicKey::from_slice(bytes)
            .map(Self)
            .map_err(|_| Error::ParseError("public key"))
    }

    pub fn serialize(&self) -> [u8; COMPRESSED_PUBLIC_KEY_SIZE] {
        self.0.serialize()
    }

    pub fn serialize_uncompressed(&self) -> [u8; UNCOMPRESSED_PUBLIC_KEY_SIZE] {
        self.0.serialize_uncompressed()
    }

    pub fn serialize_with(&self, compressed: bool) -> Vec<u8> {
        if compressed {
            self.serialize().to_vec()
        } else {
            self.serialize_uncompressed().to_vec()
        }
    }

    /// Computes `self + tweak * G`.
    pub fn tweak_add(&self, ctx: &Context, tweak: &[u8; 32]) -> Result<Self> {
        let tweak = tweak_scalar(tweak)?;

        self.0.add_exp_tweak(ctx.secp(), &tweak).map(Self).map_err(|_| {
            tracing::debug!("Public key tweak resulted in the point at infinity");
            Error::ResultInvalid
        })
    }

    /// Computes `tweak * self`.
    pub fn tweak_mul(&self, ctx: &Context, tweak: &[u8; 32]) -> Result<Self> {
        let tweak = tweak_scalar(tweak)?;

        self.0
            .mul_tweak(ctx.secp(), &tweak)
            .map(Self)
            .map_err(|_| Error::ResultInvalid)
    }

    pub fn negate(&self, ctx: &Context) -> Self {
        Self(self.0.negate(ctx.secp()))
    }

    /// Sums all keys.
    pub fn combine(keys: &[PublicKey]) -> Result<Self> {
        if keys.is_empty() {
            return Err(Error::CombineError);
        }

        let keys: Vec<&secp256k1::PublicKey> = keys.iter().map(|key| &key.0).collect();

        secp256k1::PublicKey::combine_keys(&keys)
            .map(Self)
            .map_err(|_| Error::CombineError)
    }

    pub fn inner(&self) -> &secp256k1::PublicKey {
        &self.0
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.serialize()))
    }
}

impl FromStr for PublicKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(&hex::decode(s)?)
    }
}

/// Scalar in `[1, n - 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrivateKey(secp256k1::SecretKey);

impl Deref for PrivateKey {
    type Target = secp256k1::SecretKey;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<secp256k1::SecretKey> for PrivateKey {
    fn from(key: secp256k1::SecretKey) -> Self {
        Self(key)
    }
}

impl PrivateKey {
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != SECRET_KEY_SIZE {
            return Err(Error::InvalidLength {
                expected: SECRET_KEY_SIZE,
                actual: bytes.len(),
            });
        }

        secp256k1::SecretKey::from_slice(bytes)
            .map(Self)
            .map_err(|_| Error::InvalidPrivateKey)
    }

    pub fn secret_bytes(&self) -> [u8; SECRET_KEY_SIZE] {
        self.0.secret_bytes()
    }

    pub fn public_key(&self, ctx: &Context) -> Result<PublicKey> {
        ctx.require(ContextFlags::SIGN)?;

        Ok(PublicKey(self.0.public_key(ctx.secp())))
    }

    /// Computes `self + tweak mod n`.
    pub fn tweak_add(&self, tweak: &[u8; 32]) -> Result<Self> {
        let tweak = tweak_scalar(tweak)?;

        self.0.add_tweak(&tweak).map(Self).map_err(|_| {
            tracing::debug!("Private key tweak resulted in zero");
            Error::ResultInvalid
        })
    }

    /// Computes `self * tweak mod n`.
    pub fn tweak_mul(&self, tweak: &[u8; 32]) -> Result<Self> {
        let tweak = tweak_scalar(tweak)?;

        self.0
            .mul_tweak(&tweak)
            .map(Self)
            .map_err(|_| Error::ResultInvalid)
    }

    pub fn negate(&self) -> Self {
        Self(self.0.negate())
    }

    /// Sums all keys modulo the group order.
    pub fn combine(keys: &[PrivateKey]) -> Result<Self> {
        if keys.is_empty() {
            return Err(Error::CombineError);
        }

        let mut sum = k256::Scalar::ZERO;
        for key in keys {
            sum += scalar_from_bytes(&key.secret_bytes()).ok_or(Error::InvalidPrivateKey)?;
        }

        if bool::from(sum.is_zero()) {
            return Err(Error::CombineError);
        }

        Self::from_slice(&scalar_to_bytes(&sum))
    }
}

use bitcoin::secp256k1;

use crate::context::ContextFlags;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Raw input of an unexpected size.
    #[error("Invalid length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("Private key is zero or not below the group order")]
    InvalidPrivateKey,

    /// Serialized point or proof is malformed.
    #[error("Failed to parse {0}")]
    ParseError(&'static str),

    #[error("Tweak is not below the group order")]
    TweakOutOfRange,

    /// Tweaking produced the point at infinity (or a zero scalar).
    /// Retry with another tweak.
    #[error("Tweak result is invalid")]
    ResultInvalid,

    #[error("Keys cannot be combined: empty input or sum at infinity")]
    CombineError,

    #[error("Scalar is zero or not below the group order")]
    ScalarInvalid,

    #[error("Failed to derive generator")]
    GenerationFailed,

    /// Blind is out of range or the commitment is the point at infinity.
    /// Retry with a fresh blind.
    #[error("Failed to create commitment")]
    CommitError,

    #[error("Blinding factor is not below the group order")]
    BlindOutOfRange,

    #[error("Count mismatch: {0}")]
    CountMismatch(&'static str),

    #[error("Blinding factor overflows the group order")]
    Overflow,

    /// Range proof could not be produced with the given nonce and blind.
    #[error("Failed to sign range proof: {0}")]
    SignFailure(&'static str),

    #[error("Message of {len} bytes exceeds the {max} bytes the proof can carry")]
    MessageTooLong { len: usize, max: usize },

    #[error("Failed to decode range proof")]
    DecodeError,

    #[error("Failed to rewind range proof")]
    RewindError,

    #[error("Invalid number of inputs: {0}")]
    InvalidInputCount(&'static str),

    #[error("Failed to generate surjection proof: {0}")]
    SurjectionGenerationFailed(&'static str),

    #[error("Context lacks {required} capability")]
    MissingCapability { required: ContextFlags },

    #[error("Invalid hex: {0}")]
    Hex(String),
}

impl From<hex::FromHexError> for Error {
    fn from(err: hex::FromHexError) -> Self {
        Error::Hex(err.to_string())
    }
}

impl From<secp256k1::Error> for Error {
    fn from(err: secp256k1::Error) -> Self {
        match err {
            secp256k1::Error::InvalidSecretKey => Error::InvalidPrivateKey,
            secp256k1::Error::InvalidTweak => Error::ResultInvalid,
            secp256k1::Error::InvalidPublicKeySum => Error::CombineError,
            _ => Error::ParseError("public key"),
        }
    }
}

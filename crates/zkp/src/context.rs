//! Context holding precomputed curve tables and capability flags.

use core::fmt;
use core::ops::BitOr;
use core::str::FromStr;

use bitcoin::secp256k1::{All, Secp256k1};
use once_cell::sync::OnceCell;

use crate::errors::{Error, Result};

/// Capabilities a [`Context`] was created with.
///
/// `SIGN` gates every operation that consumes secret material, `VERIFY`
/// is informational: parsing and verification work with any context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ContextFlags(u8);

impl ContextFlags {
    pub const NONE: Self = Self(0);
    pub const SIGN: Self = Self(1);
    pub const VERIFY: Self = Self(2);
    pub const BOTH: Self = Self(Self::SIGN.0 | Self::VERIFY.0);

    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Drops unknown bits, so the flags are one of the four known sets.
    fn normalize(self) -> Self {
        Self(self.0 & Self::BOTH.0)
    }
}

impl BitOr for ContextFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

impl fmt::Display for ContextFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.normalize() {
            Self::NONE => write!(f, "none"),
            Self::SIGN => write!(f, "sign"),
            Self::VERIFY => write!(f, "verify"),
            _ => write!(f, "both"),
        }
    }
}

impl FromStr for ContextFlags {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(Self::NONE),
            "sign" => Ok(Self::SIGN),
            "verify" => Ok(Self::VERIFY),
            "both" | "sign|verify" => Ok(Self::BOTH),
            _ => Err(Error::ParseError("context flags")),
        }
    }
}

/// Wraps the secp256k1 engine context together with the capabilities the
/// caller asked for.
///
/// Cloning copies the precomputed tables and the current randomization;
/// dropping releases them.
#[derive(Debug, Clone)]
pub struct Context {
    secp: Secp256k1<All>,
    flags: ContextFlags,
}

static SHARED: [OnceCell<Context>; 4] = [
    OnceCell::new(),
    OnceCell::new(),
    OnceCell::new(),
    OnceCell::new(),
];

impl Context {
    pub fn new(flags: ContextFlags) -> Self {
        Self {
            secp: Secp256k1::new(),
            flags: flags.normalize(),
        }
    }

    /// Returns a process-wide context for `flags`, built on first use.
    ///
    /// Shared contexts are never randomized nor dropped, which makes them
    /// a good fit for parse and verify paths.
    pub fn shared(flags: ContextFlags) -> &'static Context {
        let flags = flags.normalize();

        SHARED[flags.0 as usize].get_or_init(|| {
            tracing::debug!(%flags, "Building shared context");

            Context::new(flags)
        })
    }

    pub fn flags(&self) -> ContextFlags {
        self.flags
    }

    pub fn can_sign(&self) -> bool {
        self.flags.contains(ContextFlags::SIGN)
    }

    pub fn can_verify(&self) -> bool {
        self.flags.contains(ContextFlags::VERIFY)
    }

    /// Reseeds the blinding applied to base point multiplications.
    ///
    /// An all-zero seed resets the context to its default, unblinded state.
    /// Requires exclusive access to the context.
    pub fn randomize(&mut self, seed: &[u8; 32]) {
        if seed.iter().all(|b| *b == 0) {
            self.secp = Secp256k1::new();
            return;
        }

        self.secp.seeded_randomize(seed);
    }

    pub(crate) fn secp(&self) -> &Secp256k1<All> {
        &self.secp
    }

    pub(crate) fn require(&self, required: ContextFlags) -> Result<()> {
        if !self.flags.contains(required) {
            return Err(Error::MissingCapability { required });
        }

        Ok(())
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new(ContextFlags::BOTH)
    }
}

//! Ed25519 keypair derivation.
//!
//! A [`KeyPair`] is fully determined by its 32-byte seed. The private key
//! is automatically zeroized on drop via `ed25519-dalek`'s built-in
//! `ZeroizeOnDrop`.

use std::fmt;

use ed25519_dalek::SigningKey;
use nodeid_types::{NodeIdError, Result};
use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::Zeroizing;

/// Width of an Ed25519 seed in bytes.
pub const SEED_LEN: usize = 32;

// ---------------------------------------------------------------------------
// PublicKey
// ---------------------------------------------------------------------------

/// Ed25519 public key (32 bytes).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct PublicKey([u8; 32]);

impl PublicKey {
    /// Fixed byte length of an Ed25519 public key.
    pub const LEN: usize = 32;

    /// Creates a [`PublicKey`] from raw bytes.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Returns the underlying 32-byte array.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

// ---------------------------------------------------------------------------
// KeyPair
// ---------------------------------------------------------------------------

/// Ed25519 keypair.
///
/// The only constructors take (or generate) the seed, so the public half
/// can never disagree with the private half.
pub struct KeyPair {
    signing_key: SigningKey,
}

impl KeyPair {
    /// Generates a new keypair from a fresh OS-random seed.
    ///
    /// # Errors
    ///
    /// Returns [`NodeIdError::RandomSource`] if the OS RNG fails.
    pub fn generate() -> Result<Self> {
        let seed = random_seed(SEED_LEN)?;
        Self::from_seed(&seed)
    }

    /// Reconstructs a keypair deterministically from a 32-byte seed.
    ///
    /// Given the same seed, this always produces the same keypair.
    ///
    /// # Errors
    ///
    /// Returns [`NodeIdError::InvalidSeedLength`] if `seed` is not
    /// exactly [`SEED_LEN`] bytes.
    pub fn from_seed(seed: &[u8]) -> Result<Self> {
        let seed: &[u8; SEED_LEN] = seed.try_into().map_err(|_| NodeIdError::InvalidSeedLength {
            expected: SEED_LEN,
            got: seed.len(),
        })?;

        Ok(Self {
            signing_key: SigningKey::from_bytes(seed),
        })
    }

    /// Returns the public half of this keypair.
    pub fn public_key(&self) -> PublicKey {
        PublicKey(self.signing_key.verifying_key().to_bytes())
    }

    /// Returns the 32-byte seed this keypair was derived from.
    ///
    /// The copy is wiped when the returned wrapper is dropped.
    pub fn seed(&self) -> Zeroizing<[u8; SEED_LEN]> {
        Zeroizing::new(self.signing_key.to_bytes())
    }
}

// KeyPair intentionally does not implement Clone or Debug to prevent
// accidental leakage of the private key in logs or copies.

// ---------------------------------------------------------------------------
// Random source
// ---------------------------------------------------------------------------

/// Returns `n` bytes from the operating system CSPRNG.
///
/// # Errors
///
/// Returns [`NodeIdError::RandomSource`] if the OS RNG fails.
pub fn random_seed(n: usize) -> Result<Zeroizing<Vec<u8>>> {
    let mut buf = Zeroizing::new(vec![0u8; n]);
    OsRng
        .try_fill_bytes(buf.as_mut_slice())
        .map_err(|e| NodeIdError::RandomSource {
            reason: format!("failed to read {n} random bytes: {e}"),
        })?;
    Ok(buf)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

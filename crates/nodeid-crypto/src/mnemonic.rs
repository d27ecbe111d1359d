//! BIP39 mnemonic encoding and decoding.
//!
//! Converts between raw entropy and a checksummed word sequence:
//!
//! 1. **Encoding**: ENT bits of entropy → first ENT/32 bits of
//!    SHA-256(entropy) appended as checksum → (ENT + CS) bits split into
//!    11-bit indices → BIP39 English words.
//! 2. **Decoding**: words → 11-bit indices → entropy + checksum bits →
//!    checksum recomputed and compared.
//!
//! Supported entropy sizes are 128, 160, 192, 224 and 256 bits
//! (12, 15, 18, 21 and 24 words).
//!
//! Reference: <https://github.com/bitcoin/bips/blob/master/bip-0039.mediawiki>

use nodeid_types::{NodeIdError, Result};
use sha2::{Digest, Sha256};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::signing::random_seed;
use crate::wordlist::{index_to_word, word_to_index};

/// Accepted entropy lengths, in bytes.
pub const ENTROPY_LENGTHS: [usize; 5] = [16, 20, 24, 28, 32];

/// Accepted mnemonic lengths, in words.
pub const WORD_COUNTS: [usize; 5] = [12, 15, 18, 21, 24];

// ---------------------------------------------------------------------------
// Mnemonic
// ---------------------------------------------------------------------------

/// A BIP39 mnemonic phrase (space-separated words).
///
/// The inner string is zeroized on drop to prevent sensitive data from
/// lingering in memory.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct Mnemonic(String);

impl Mnemonic {
    /// Returns the mnemonic phrase as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the individual words as a vector of string slices.
    pub fn words(&self) -> Vec<&str> {
        self.0.split_whitespace().collect()
    }

    /// Returns the number of words in the mnemonic.
    pub fn word_count(&self) -> usize {
        self.0.split_whitespace().count()
    }
}

// Mnemonic does not implement Clone/Debug to prevent leakage.

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

/// Generates a new random mnemonic of `word_count` words.
///
/// # Errors
///
/// - [`NodeIdError::InvalidMnemonic`] if `word_count` is not one of
///   [`WORD_COUNTS`].
/// - [`NodeIdError::RandomSource`] if the OS RNG fails.
pub fn generate_mnemonic(word_count: usize) -> Result<Mnemonic> {
    if !WORD_COUNTS.contains(&word_count) {
        return Err(NodeIdError::InvalidMnemonic {
            reason: format!("unsupported word count {word_count}"),
        });
    }

    // words × 11 = ENT + ENT/32  ⇒  ENT = words × 32 / 3 bits.
    let entropy = random_seed(word_count * 4 / 3)?;
    entropy_to_mnemonic(&entropy)
}

/// Converts raw entropy into a BIP39 mnemonic.
///
/// # Errors
///
/// Returns [`NodeIdError::InvalidEntropyLength`] unless the entropy is
/// 16, 20, 24, 28 or 32 bytes long.
pub fn entropy_to_mnemonic(entropy: &[u8]) -> Result<Mnemonic> {
    if !ENTROPY_LENGTHS.contains(&entropy.len()) {
        return Err(NodeIdError::InvalidEntropyLength { len: entropy.len() });
    }

    let entropy_bits = entropy.len() * 8;
    let checksum_bits = entropy_bits / 32;
    let word_count = (entropy_bits + checksum_bits) / 11;

    // At most 8 checksum bits, so the first digest byte is enough.
    let checksum_byte = Sha256::digest(entropy)[0];

    let mut bits = Zeroizing::new(Vec::with_capacity(entropy_bits + checksum_bits));

    for byte in entropy {
        for j in (0..8).rev() {
            bits.push((byte >> j) & 1);
        }
    }

    for j in 0..checksum_bits {
        bits.push((checksum_byte >> (7 - j)) & 1);
    }

    let mut words = Vec::with_capacity(word_count);

    for chunk in bits.chunks(11) {
        let idx = chunk
            .iter()
            .fold(0u16, |acc, bit| (acc << 1) | u16::from(*bit));

        let word = index_to_word(idx).ok_or_else(|| NodeIdError::InvalidMnemonic {
            reason: format!("BIP39 word index {idx} out of range"),
        })?;

        words.push(word);
    }

    Ok(Mnemonic(words.join(" ")))
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

/// Recovers the entropy encoded by a BIP39 mnemonic.
///
/// # Checks performed
///
/// 1. Word count is one of [`WORD_COUNTS`].
/// 2. Every word exists in the BIP39 English wordlist.
/// 3. The trailing checksum bits match SHA-256 of the recovered entropy.
///
/// # Errors
///
/// Returns [`NodeIdError::InvalidMnemonic`] if any check fails.
pub fn mnemonic_to_entropy(words: &str) -> Result<Zeroizing<Vec<u8>>> {
    let word_list: Vec<&str> = words.split_whitespace().collect();

    if !WORD_COUNTS.contains(&word_list.len()) {
        return Err(NodeIdError::InvalidMnemonic {
            reason: format!(
                "mnemonic must be 12, 15, 18, 21 or 24 words, got {}",
                word_list.len()
            ),
        });
    }

    let total_bits = word_list.len() * 11;
    let checksum_bits = total_bits / 33;
    let entropy_bits = total_bits - checksum_bits;

    let mut bits = Zeroizing::new(Vec::with_capacity(total_bits));

    for (position, word) in word_list.iter().enumerate() {
        let idx = word_to_index(word).ok_or_else(|| NodeIdError::InvalidMnemonic {
            reason: format!("word {} is not in the BIP39 wordlist", position + 1),
        })?;

        for j in (0..11).rev() {
            bits.push(((idx >> j) & 1) as u8);
        }
    }

    let mut entropy = Zeroizing::new(vec![0u8; entropy_bits / 8]);
    for (i, bit) in bits[..entropy_bits].iter().enumerate() {
        entropy[i / 8] |= bit << (7 - (i % 8));
    }

    let provided_checksum = bits[entropy_bits..]
        .iter()
        .fold(0u8, |acc, bit| (acc << 1) | bit);

    let expected_checksum = Sha256::digest(entropy.as_slice())[0] >> (8 - checksum_bits);

    if provided_checksum != expected_checksum {
        return Err(NodeIdError::InvalidMnemonic {
            reason: "BIP39 mnemonic checksum mismatch".into(),
        });
    }

    Ok(entropy)
}

/// Validates a BIP39 mnemonic phrase without keeping the entropy.
///
/// # Errors
///
/// Returns [`NodeIdError::InvalidMnemonic`] if the phrase does not decode.
pub fn validate_mnemonic(words: &str) -> Result<()> {
    mnemonic_to_entropy(words).map(|_| ())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

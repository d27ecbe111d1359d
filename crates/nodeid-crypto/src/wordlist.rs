//! BIP39 English wordlist lookups.
//!
//! The list itself comes from the `bip39` crate; this module only adds
//! the index/word conversions the codec needs.

use bip39::Language;

/// Number of words in a BIP39 wordlist (2^11).
pub const WORD_COUNT: usize = 2048;

/// The 2048-word BIP39 English list, sorted.
pub fn wordlist() -> &'static [&'static str; WORD_COUNT] {
    Language::English.word_list()
}

/// Returns the word at `idx`, or `None` if `idx >= 2048`.
pub fn index_to_word(idx: u16) -> Option<&'static str> {
    wordlist().get(usize::from(idx)).copied()
}

/// Returns the 11-bit index of `word`, or `None` if it is not listed.
pub fn word_to_index(word: &str) -> Option<u16> {
    wordlist()
        .binary_search(&word)
        .ok()
        .and_then(|idx| u16::try_from(idx).ok())
}

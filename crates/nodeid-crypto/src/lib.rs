//! Cryptographic primitives for node identity management.
//!
//! This crate is the **sole** location for cryptographic operations.
//! No other crate in the workspace may perform raw crypto directly.
//!
//! # Modules
//!
//! - [`mnemonic`]: BIP39 entropy ⇄ mnemonic codec
//! - [`signing`]: Ed25519 keypair derivation from a 32-byte seed
//! - [`wordlist`]: BIP39 English wordlist lookups

pub mod mnemonic;
pub mod signing;
pub mod wordlist;

//! Node identity persistence.
//!
//! Handles the identity lifecycle:
//!
//! - **Generate** a fresh Ed25519 keypair for a 3Bot id
//! - **Restore** an identity from its 24-word BIP39 mnemonic
//! - **Save** to a versioned, owner read-only seed file
//! - **Load** with strict version checking (obsolete and unknown
//!   formats are rejected, never guessed at)

pub mod identity;
pub mod versioned;

pub use identity::{SeedStore, SeedVersion, UserIdentity};

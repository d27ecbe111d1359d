//! Core shared types for node identity management.
//!
//! This crate defines the error surface, configuration, and event data
//! contracts used across the workspace.

pub mod config;
pub mod events;

use std::path::{Path, PathBuf};

use thiserror::Error;

// ---------------------------------------------------------------------------
// NodeIdError
// ---------------------------------------------------------------------------

/// Central error type for the identity subsystem.
///
/// All crates in the workspace convert their internal errors into variants
/// of this enum. Every variant carries enough context (operation, path or
/// field) to diagnose the failure without consulting logs.
#[derive(Debug, Error)]
pub enum NodeIdError {
    /// Entropy handed to the mnemonic encoder has a non-standard length.
    #[error("invalid entropy length: {len} bytes (expected 16, 20, 24, 28 or 32)")]
    InvalidEntropyLength {
        /// Length of the rejected entropy, in bytes.
        len: usize,
    },

    /// Seed handed to the key deriver does not match the primitive's width.
    #[error("invalid seed length: expected {expected} bytes, got {got}")]
    InvalidSeedLength {
        /// Width required by the key primitive.
        expected: usize,
        /// Width actually supplied.
        got: usize,
    },

    /// Mnemonic has the wrong word count, an unknown word, or a bad checksum.
    #[error("invalid mnemonic: {reason}")]
    InvalidMnemonic {
        /// Human-readable description of the mismatch.
        reason: String,
    },

    /// A file system operation failed.
    #[error("failed to {op} {}: {source}", path.display())]
    Io {
        /// Operation being attempted (e.g. "read", "rename").
        op: &'static str,
        /// Path the operation targeted.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The version header of a container could not be parsed.
    #[error("malformed container: {reason}")]
    MalformedContainer {
        /// Human-readable description of the header problem.
        reason: String,
    },

    /// The container was written in a recognised but retired format.
    #[error(
        "seed file {} uses obsolete format {version}; convert it to the latest format \
         with the identity `convert` command before loading",
        path.display()
    )]
    ObsoleteFormat {
        /// File holding the obsolete container.
        path: PathBuf,
        /// Version tag found in the header.
        version: String,
    },

    /// The container version is not the single supported version.
    #[error("unsupported seed version {version} in {} (expected {expected})", path.display())]
    UnsupportedVersion {
        /// File holding the container.
        path: PathBuf,
        /// Version tag found in the header.
        version: String,
        /// Version this build reads and writes.
        expected: String,
    },

    /// The identity payload could not be structurally encoded or decoded.
    #[error("invalid identity payload: {reason}")]
    InvalidPayload {
        /// Human-readable description of the encoding failure.
        reason: String,
    },

    /// Save was requested on an identity that holds no keypair.
    #[error("identity has no keypair")]
    NoKey,

    /// The operating system random source failed.
    #[error("random source failure: {reason}")]
    RandomSource {
        /// Human-readable description of the RNG failure.
        reason: String,
    },

    /// A configuration value is invalid or missing.
    #[error("config error: {reason}")]
    Config {
        /// Human-readable description of the configuration problem.
        reason: String,
    },
}

impl NodeIdError {
    /// Builds a [`NodeIdError::Io`] for `op` on `path`.
    pub fn io(op: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            op,
            path: path.into(),
            source,
        }
    }

    /// Prefixes the reason of content errors with the file they came from.
    ///
    /// Variants that already carry a path, and variants unrelated to file
    /// content, are returned unchanged.
    pub fn in_file(self, path: &Path) -> Self {
        match self {
            Self::MalformedContainer { reason } => Self::MalformedContainer {
                reason: format!("{}: {reason}", path.display()),
            },
            Self::InvalidMnemonic { reason } => Self::InvalidMnemonic {
                reason: format!("{}: {reason}", path.display()),
            },
            Self::InvalidPayload { reason } => Self::InvalidPayload {
                reason: format!("{}: {reason}", path.display()),
            },
            other => other,
        }
    }
}

// ---------------------------------------------------------------------------
// Result alias
// ---------------------------------------------------------------------------

/// Convenience result type using [`NodeIdError`].
pub type Result<T> = std::result::Result<T, NodeIdError>;

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

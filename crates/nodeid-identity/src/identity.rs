//! Persistent node identity: an Ed25519 keypair bound to a 3Bot id.
//!
//! # Seed file
//!
//! The identity is stored as a versioned container (see
//! [`crate::versioned`]) whose payload is a JSON record:
//!
//! ```text
//! "1.1.0"{"mnemonic":"<24 BIP39 words>","threebotid":<u64>}
//! ```
//!
//! The mnemonic encodes the 32-byte Ed25519 seed directly as BIP39
//! entropy. No passphrase stretching is applied, so the same words always
//! yield the same keypair.
//!
//! # Version policy
//!
//! | Version | Meaning                                        |
//! |---------|------------------------------------------------|
//! | 1.0.0   | Obsolete. Must be converted before loading.    |
//! | 1.1.0   | Current. Read and written by this crate.       |
//! | other   | Unsupported.                                   |

use std::fmt;
use std::path::{Path, PathBuf};

use nodeid_crypto::mnemonic::{entropy_to_mnemonic, mnemonic_to_entropy, Mnemonic};
use nodeid_crypto::signing::{KeyPair, PublicKey};
use nodeid_types::config::{IdentityConfig, DEFAULT_SEED_FILE_MODE};
use nodeid_types::{NodeIdError, Result};
use semver::Version;
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::versioned::{read_versioned_file, write_versioned_file};

// ---------------------------------------------------------------------------
// SeedVersion
// ---------------------------------------------------------------------------

/// Seed file format versions this crate knows about.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum SeedVersion {
    /// `1.0.0`: first format. No longer loadable.
    V1,
    /// `1.1.0`: mnemonic plus 3Bot id as JSON.
    V1_1,
}

impl SeedVersion {
    /// The version written by [`UserIdentity::save`].
    pub const LATEST: SeedVersion = SeedVersion::V1_1;

    const ALL: [SeedVersion; 2] = [SeedVersion::V1, SeedVersion::V1_1];

    /// Semantic version written in the container header.
    pub fn version(self) -> Version {
        match self {
            SeedVersion::V1 => Version::new(1, 0, 0),
            SeedVersion::V1_1 => Version::new(1, 1, 0),
        }
    }

    /// Maps a header version onto a known format, if any.
    pub fn from_version(version: &Version) -> Option<SeedVersion> {
        Self::ALL.into_iter().find(|v| v.version() == *version)
    }
}

impl fmt::Display for SeedVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.version())
    }
}

/// Accepts only the latest format.
fn check_version(path: &Path, version: &Version) -> Result<()> {
    match SeedVersion::from_version(version) {
        Some(SeedVersion::V1_1) => Ok(()),
        Some(SeedVersion::V1) => Err(NodeIdError::ObsoleteFormat {
            path: path.to_path_buf(),
            version: version.to_string(),
        }),
        None => Err(NodeIdError::UnsupportedVersion {
            path: path.to_path_buf(),
            version: version.to_string(),
            expected: SeedVersion::LATEST.to_string(),
        }),
    }
}

// ---------------------------------------------------------------------------
// SeedRecord
// ---------------------------------------------------------------------------

/// JSON payload of a `1.1.0` seed file.
#[derive(Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
struct SeedRecord {
    mnemonic: String,
    #[serde(default)]
    threebotid: u64,
}

// ---------------------------------------------------------------------------
// UserIdentity
// ---------------------------------------------------------------------------

/// A node's Ed25519 keypair together with its 3Bot id.
///
/// The default value holds no key; it exists so callers can build an
/// identity incrementally, but it cannot be saved.
#[derive(Default)]
pub struct UserIdentity {
    threebot_id: u64,
    key: Option<KeyPair>,
}

impl UserIdentity {
    /// Wraps an existing keypair.
    pub fn new(key: KeyPair, threebot_id: u64) -> Self {
        Self {
            threebot_id,
            key: Some(key),
        }
    }

    /// Creates an identity with a freshly generated keypair.
    ///
    /// # Errors
    ///
    /// Returns [`NodeIdError::RandomSource`] if the OS RNG fails.
    pub fn generate(threebot_id: u64) -> Result<Self> {
        Ok(Self::new(KeyPair::generate()?, threebot_id))
    }

    /// Reconstructs an identity from its 24-word mnemonic.
    ///
    /// # Errors
    ///
    /// - [`NodeIdError::InvalidMnemonic`] if the phrase does not decode.
    /// - [`NodeIdError::InvalidSeedLength`] if it decodes to anything
    ///   other than a 32-byte seed.
    pub fn from_mnemonic(mnemonic: &str, threebot_id: u64) -> Result<Self> {
        let seed = mnemonic_to_entropy(mnemonic)?;
        let key = KeyPair::from_seed(&seed)?;
        Ok(Self::new(key, threebot_id))
    }

    pub fn threebot_id(&self) -> u64 {
        self.threebot_id
    }

    /// Returns the keypair.
    ///
    /// # Errors
    ///
    /// Returns [`NodeIdError::NoKey`] for an identity built with
    /// [`Default`].
    pub fn key(&self) -> Result<&KeyPair> {
        self.key.as_ref().ok_or(NodeIdError::NoKey)
    }

    pub fn public_key(&self) -> Option<PublicKey> {
        self.key.as_ref().map(KeyPair::public_key)
    }

    /// Encodes the seed as a 24-word mnemonic.
    ///
    /// # Errors
    ///
    /// Returns [`NodeIdError::NoKey`] if the identity holds no keypair.
    pub fn mnemonic(&self) -> Result<Mnemonic> {
        entropy_to_mnemonic(self.key()?.seed().as_slice())
    }

    /// Loads an identity from a seed file.
    ///
    /// Either a complete identity is returned or an error; nothing is
    /// modified on failure.
    ///
    /// # Errors
    ///
    /// - [`NodeIdError::Io`] if the file cannot be read.
    /// - [`NodeIdError::MalformedContainer`] if the header does not parse.
    /// - [`NodeIdError::ObsoleteFormat`] for a `1.0.0` file.
    /// - [`NodeIdError::UnsupportedVersion`] for any other unknown version.
    /// - [`NodeIdError::InvalidPayload`] if the record is not valid JSON.
    /// - [`NodeIdError::InvalidMnemonic`] or
    ///   [`NodeIdError::InvalidSeedLength`] if the stored words do not
    ///   decode to a 32-byte seed.
    pub fn load(path: &Path) -> Result<Self> {
        tracing::debug!(path = %path.display(), "reading user identity");

        let (version, payload) = read_versioned_file(path)?;
        check_version(path, &version)?;

        let record: SeedRecord =
            serde_json::from_slice(&payload).map_err(|e| NodeIdError::InvalidPayload {
                reason: format!("{}: {e}", path.display()),
            })?;

        let identity = Self::from_mnemonic(&record.mnemonic, record.threebotid)
            .map_err(|e| e.in_file(path))?;

        tracing::debug!(
            path = %path.display(),
            threebot_id = identity.threebot_id,
            "user identity loaded"
        );

        Ok(identity)
    }

    /// Saves the identity to `path` in the latest format, owner read-only.
    ///
    /// # Errors
    ///
    /// - [`NodeIdError::NoKey`] if the identity holds no keypair. Nothing
    ///   is written in that case.
    /// - [`NodeIdError::Io`] if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<()> {
        self.save_with_mode(path, DEFAULT_SEED_FILE_MODE)
    }

    pub(crate) fn save_with_mode(&self, path: &Path, mode: u32) -> Result<()> {
        let key = self.key()?;

        tracing::info!("generating seed mnemonic");
        let mnemonic = entropy_to_mnemonic(key.seed().as_slice())?;

        let record = SeedRecord {
            mnemonic: mnemonic.as_str().to_owned(),
            threebotid: self.threebot_id,
        };
        let payload = Zeroizing::new(serde_json::to_vec(&record).map_err(|e| {
            NodeIdError::InvalidPayload {
                reason: format!("failed to encode identity record: {e}"),
            }
        })?);

        tracing::info!(path = %path.display(), "writing user identity");
        write_versioned_file(path, &SeedVersion::LATEST.version(), &payload, mode)
    }
}

impl fmt::Debug for UserIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserIdentity")
            .field("threebot_id", &self.threebot_id)
            .field("public_key", &self.public_key())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// SeedStore
// ---------------------------------------------------------------------------

/// Seed file location and permissions taken from [`IdentityConfig`].
#[derive(Clone, Debug)]
pub struct SeedStore {
    path: PathBuf,
    mode: u32,
}

impl SeedStore {
    /// # Errors
    ///
    /// Returns [`NodeIdError::Config`] if the configuration is invalid.
    pub fn new(config: &IdentityConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            path: config.seed_path.clone(),
            mode: config.file_mode,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether a seed file is present at the configured path.
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Loads the identity from the configured path.
    pub fn load(&self) -> Result<UserIdentity> {
        UserIdentity::load(&self.path)
    }

    /// Saves `identity` to the configured path with the configured mode.
    pub fn save(&self, identity: &UserIdentity) -> Result<()> {
        identity.save_with_mode(&self.path, self.mode)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

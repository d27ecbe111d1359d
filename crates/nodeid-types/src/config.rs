//! Identity storage configuration with sensible defaults.
//!
//! The seed file location and its permission mode are the only
//! operational parameters. Both can be overridden from a JSON file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{NodeIdError, Result};

/// Default location of the node seed file.
pub const DEFAULT_SEED_PATH: &str = "/var/cache/modules/identityd/seed.txt";

/// Default permission mode of the seed file: owner read-only.
pub const DEFAULT_SEED_FILE_MODE: u32 = 0o400;

/// Identity storage configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IdentityConfig {
    /// Path of the versioned seed file.
    pub seed_path: PathBuf,

    /// Unix permission bits the seed file is created with.
    ///
    /// Must grant owner read and nothing to group or other. The execute
    /// bit is never allowed.
    pub file_mode: u32,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            seed_path: PathBuf::from(DEFAULT_SEED_PATH),
            file_mode: DEFAULT_SEED_FILE_MODE,
        }
    }
}

/// JSON config file format. Missing fields fall back to defaults.
///
/// Example `identity.json`:
/// ```json
/// {
///   "seed_path": "/etc/node/seed.txt",
///   "file_mode": 256
/// }
/// ```
#[derive(Debug, Deserialize)]
struct IdentityConfigFile {
    seed_path: Option<PathBuf>,
    file_mode: Option<u32>,
}

impl IdentityConfig {
    /// Loads configuration from a JSON file and validates it.
    pub fn load(path: &Path) -> Result<Self> {
        let text =
            std::fs::read_to_string(path).map_err(|e| NodeIdError::io("read config", path, e))?;

        let file: IdentityConfigFile =
            serde_json::from_str(&text).map_err(|e| NodeIdError::Config {
                reason: format!("invalid config JSON in {}: {e}", path.display()),
            })?;

        let defaults = Self::default();
        let config = Self {
            seed_path: file.seed_path.unwrap_or(defaults.seed_path),
            file_mode: file.file_mode.unwrap_or(defaults.file_mode),
        };
        config.validate()?;
        Ok(config)
    }

    /// Validates all configuration values.
    pub fn validate(&self) -> Result<()> {
        if self.seed_path.as_os_str().is_empty() {
            return Err(NodeIdError::Config {
                reason: "seed_path must not be empty".into(),
            });
        }

        validate_owner_only_mode(self.file_mode)
    }
}

/// Checks that `mode` is an owner-only, non-executable permission set.
///
/// Seed files carry secret-derived material, so group and other bits,
/// the execute bit and any special bits are all rejected.
pub fn validate_owner_only_mode(mode: u32) -> Result<()> {
    if mode & !0o777 != 0 {
        return Err(NodeIdError::Config {
            reason: format!("file_mode {mode:#o} contains special bits"),
        });
    }
    if mode & 0o077 != 0 {
        return Err(NodeIdError::Config {
            reason: format!("file_mode {mode:#o} grants access to group or other"),
        });
    }
    if mode & 0o100 != 0 {
        return Err(NodeIdError::Config {
            reason: format!("file_mode {mode:#o} sets the execute bit"),
        });
    }
    if mode & 0o400 == 0 {
        return Err(NodeIdError::Config {
            reason: format!("file_mode {mode:#o} does not let the owner read"),
        });
    }
    Ok(())
}

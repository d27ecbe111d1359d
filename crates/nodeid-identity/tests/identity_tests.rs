//! Integration tests for nodeid-identity.
//!
//! Known-answer tests use fixed BIP39 mnemonics; only the save/load
//! round-trip of a freshly generated identity relies on randomness.

use std::fs;
use std::path::Path;

use nodeid_identity::versioned::{encode_container, read_versioned_file};
use nodeid_identity::{SeedStore, SeedVersion, UserIdentity};
use nodeid_types::config::IdentityConfig;
use nodeid_types::NodeIdError;
use semver::Version;

type TestResult = std::result::Result<(), Box<dyn std::error::Error>>;

// ---------------------------------------------------------------------------
// Test constants
// ---------------------------------------------------------------------------

/// BIP39 mnemonic from all-0x7F 256-bit entropy.
const MNEMONIC_7F: &str = "legal winner thank year wave sausage worth useful \
                           legal winner thank year wave sausage worth useful \
                           legal winner thank year wave sausage worth title";

/// BIP39 mnemonic from all-zero 128-bit entropy: valid, but too short
/// for an Ed25519 seed.
const MNEMONIC_128: &str = "abandon abandon abandon abandon abandon abandon \
                            abandon abandon abandon abandon abandon about";

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Writes a container with an arbitrary header and payload, bypassing
/// the identity layer.
fn write_raw(path: &Path, version: &str, payload: &str) -> TestResult {
    let version = Version::parse(version)?;
    fs::write(path, encode_container(&version, payload.as_bytes()))?;
    Ok(())
}

fn record_json(mnemonic: &str, threebotid: u64) -> String {
    format!("{{\"mnemonic\":\"{mnemonic}\",\"threebotid\":{threebotid}}}")
}

// ---------------------------------------------------------------------------
// 1. Save / load
// ---------------------------------------------------------------------------

#[test]
fn fixed_mnemonic_scenario() -> TestResult {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("seed.txt");

    let identity = UserIdentity::from_mnemonic(MNEMONIC_7F, 0)?;
    identity.save(&path)?;

    let data = fs::read(&path)?;
    assert!(data.starts_with(b"\"1.1.0\""));
    assert_eq!(
        data,
        format!("\"1.1.0\"{}", record_json(MNEMONIC_7F, 0)).into_bytes()
    );

    let loaded = UserIdentity::load(&path)?;
    assert_eq!(loaded.public_key(), identity.public_key());
    assert_eq!(loaded.threebot_id(), 0);
    assert_eq!(loaded.mnemonic()?.as_str(), MNEMONIC_7F);
    Ok(())
}

#[test]
fn generated_identity_roundtrips() -> TestResult {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("seed.txt");

    let identity = UserIdentity::generate(4242)?;
    identity.save(&path)?;

    let loaded = UserIdentity::load(&path)?;
    assert_eq!(loaded.public_key(), identity.public_key());
    assert_eq!(loaded.threebot_id(), 4242);
    Ok(())
}

#[test]
fn save_writes_latest_version() -> TestResult {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("seed.txt");

    UserIdentity::generate(1)?.save(&path)?;

    let (version, _) = read_versioned_file(&path)?;
    assert_eq!(version, SeedVersion::LATEST.version());
    Ok(())
}

#[test]
fn resave_over_read_only_file() -> TestResult {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("seed.txt");

    let first = UserIdentity::generate(1)?;
    first.save(&path)?;

    let second = UserIdentity::generate(2)?;
    second.save(&path)?;

    let loaded = UserIdentity::load(&path)?;
    assert_eq!(loaded.public_key(), second.public_key());
    assert_eq!(loaded.threebot_id(), 2);
    Ok(())
}

#[cfg(unix)]
#[test]
fn saved_file_is_owner_read_only() -> TestResult {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir()?;
    let path = dir.path().join("seed.txt");

    UserIdentity::generate(1)?.save(&path)?;

    let mode = fs::metadata(&path)?.permissions().mode() & 0o777;
    assert_eq!(mode & 0o077, 0, "group/other bits set: {mode:#o}");
    assert_eq!(mode, 0o400);
    Ok(())
}

#[test]
fn save_without_key_fails_and_writes_nothing() -> TestResult {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("seed.txt");

    let result = UserIdentity::default().save(&path);
    assert!(matches!(result, Err(NodeIdError::NoKey)));
    assert!(!path.exists());
    Ok(())
}

#[test]
fn failed_save_keeps_previous_file() -> TestResult {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("seed.txt");

    let original = UserIdentity::from_mnemonic(MNEMONIC_7F, 9)?;
    original.save(&path)?;

    let result = UserIdentity::default().save(&path);
    assert!(result.is_err());

    let loaded = UserIdentity::load(&path)?;
    assert_eq!(loaded.public_key(), original.public_key());
    Ok(())
}

#[test]
fn save_into_missing_directory_is_io_error() -> TestResult {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("absent").join("seed.txt");

    let result = UserIdentity::generate(1)?.save(&path);
    assert!(matches!(result, Err(NodeIdError::Io { .. })));
    Ok(())
}

// ---------------------------------------------------------------------------
// 2. Version policy
// ---------------------------------------------------------------------------

#[test]
fn obsolete_version_is_rejected() -> TestResult {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("seed.txt");
    write_raw(&path, "1.0.0", &record_json(MNEMONIC_7F, 0))?;

    match UserIdentity::load(&path) {
        Err(NodeIdError::ObsoleteFormat { path: p, version }) => {
            assert_eq!(p, path);
            assert_eq!(version, "1.0.0");
        }
        other => panic!("expected ObsoleteFormat, got {other:?}"),
    }
    Ok(())
}

#[test]
fn unknown_versions_are_unsupported() -> TestResult {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("seed.txt");

    for tag in ["2.0.0", "1.1.1", "0.9.0", "1.1.0-rc.1"] {
        write_raw(&path, tag, &record_json(MNEMONIC_7F, 0))?;

        match UserIdentity::load(&path) {
            Err(NodeIdError::UnsupportedVersion {
                version, expected, ..
            }) => {
                assert_eq!(version, tag);
                assert_eq!(expected, "1.1.0");
            }
            other => panic!("expected UnsupportedVersion for {tag}, got {other:?}"),
        }
    }
    Ok(())
}

#[test]
fn malformed_headers_are_rejected() -> TestResult {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("seed.txt");

    let bad: [&[u8]; 4] = [
        b"",
        b"garbage",
        br#"{"mnemonic":"x","threebotid":0}"#,
        br#""not-a-version"{}"#,
    ];
    for data in bad {
        fs::write(&path, data)?;
        assert!(
            matches!(
                UserIdentity::load(&path),
                Err(NodeIdError::MalformedContainer { .. })
            ),
            "accepted {:?}",
            String::from_utf8_lossy(data)
        );
    }
    Ok(())
}

#[test]
fn missing_file_is_io_error() -> TestResult {
    let dir = tempfile::tempdir()?;
    let result = UserIdentity::load(&dir.path().join("seed.txt"));
    assert!(matches!(result, Err(NodeIdError::Io { .. })));
    Ok(())
}

// ---------------------------------------------------------------------------
// 3. Payload validation
// ---------------------------------------------------------------------------

#[test]
fn short_mnemonic_is_invalid_seed_length() -> TestResult {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("seed.txt");
    write_raw(&path, "1.1.0", &record_json(MNEMONIC_128, 3))?;

    assert!(matches!(
        UserIdentity::load(&path),
        Err(NodeIdError::InvalidSeedLength {
            expected: 32,
            got: 16
        })
    ));
    Ok(())
}

#[test]
fn bad_checksum_is_invalid_mnemonic() -> TestResult {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("seed.txt");
    let phrase = vec!["abandon"; 24].join(" ");
    write_raw(&path, "1.1.0", &record_json(&phrase, 3))?;

    match UserIdentity::load(&path) {
        Err(NodeIdError::InvalidMnemonic { reason }) => {
            assert!(reason.contains(&path.display().to_string()));
        }
        other => panic!("expected InvalidMnemonic, got {other:?}"),
    }
    Ok(())
}

#[test]
fn non_json_payload_is_invalid_payload() -> TestResult {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("seed.txt");

    for payload in ["not json", "", "{\"threebotid\":1}", "{\"mnemonic\":42}"] {
        write_raw(&path, "1.1.0", payload)?;
        assert!(
            matches!(
                UserIdentity::load(&path),
                Err(NodeIdError::InvalidPayload { .. })
            ),
            "accepted payload {payload:?}"
        );
    }
    Ok(())
}

#[test]
fn payload_may_follow_header_after_whitespace() -> TestResult {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("seed.txt");
    write_raw(&path, "1.1.0", &format!("\n{}", record_json(MNEMONIC_7F, 11)))?;

    let loaded = UserIdentity::load(&path)?;
    assert_eq!(loaded.threebot_id(), 11);
    Ok(())
}

// ---------------------------------------------------------------------------
// 4. SeedStore
// ---------------------------------------------------------------------------

#[test]
fn seed_store_uses_configured_path_and_mode() -> TestResult {
    let dir = tempfile::tempdir()?;
    let config = IdentityConfig {
        seed_path: dir.path().join("seed.txt"),
        file_mode: 0o600,
    };
    let store = SeedStore::new(&config)?;
    assert_eq!(store.path(), config.seed_path.as_path());
    assert!(!store.exists());

    let identity = UserIdentity::generate(77)?;
    store.save(&identity)?;
    assert!(store.exists());

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = fs::metadata(store.path())?.permissions().mode() & 0o777;
        assert_eq!(mode, 0o600);
    }

    let loaded = store.load()?;
    assert_eq!(loaded.public_key(), identity.public_key());
    assert_eq!(loaded.threebot_id(), 77);
    Ok(())
}

#[test]
fn seed_store_rejects_permissive_config() {
    let config = IdentityConfig {
        file_mode: 0o644,
        ..IdentityConfig::default()
    };
    assert!(matches!(
        SeedStore::new(&config),
        Err(NodeIdError::Config { .. })
    ));
}

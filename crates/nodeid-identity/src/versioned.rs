//! Versioned container format: a version header followed by a payload.
//!
//! # Layout
//!
//! ```text
//! "1.1.0"<payload bytes>
//! ```
//!
//! The header is the semantic version encoded as a JSON string literal.
//! A JSON string is self-delimiting, so the payload starts at the byte
//! immediately after the closing quote. No separator and no length
//! prefix are written.
//!
//! The header is parsed **before** the payload is touched; a file whose
//! header does not parse is rejected as [`NodeIdError::MalformedContainer`]
//! without ever looking at the payload.

use std::ffi::OsString;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use nodeid_types::config::validate_owner_only_mode;
use nodeid_types::{NodeIdError, Result};
use semver::Version;
use zeroize::Zeroizing;

// ---------------------------------------------------------------------------
// Encode / decode
// ---------------------------------------------------------------------------

/// Serializes `version` as a JSON string header followed by `payload`.
pub fn encode_container(version: &Version, payload: &[u8]) -> Vec<u8> {
    // Semver text is limited to ASCII alphanumerics and `.-+`, none of
    // which need escaping inside a JSON string.
    let header = format!("\"{version}\"");

    let mut data = Vec::with_capacity(header.len() + payload.len());
    data.extend_from_slice(header.as_bytes());
    data.extend_from_slice(payload);
    data
}

/// Splits a container into its version and the payload that follows it.
///
/// # Errors
///
/// Returns [`NodeIdError::MalformedContainer`] if the data does not start
/// with a JSON string, or the string is not a valid semantic version.
pub fn decode_container(data: &[u8]) -> Result<(Version, &[u8])> {
    let mut stream = serde_json::Deserializer::from_slice(data).into_iter::<String>();

    let tag = match stream.next() {
        Some(Ok(tag)) => tag,
        Some(Err(e)) => {
            return Err(NodeIdError::MalformedContainer {
                reason: format!("unreadable version header: {e}"),
            })
        }
        None => {
            return Err(NodeIdError::MalformedContainer {
                reason: "missing version header".into(),
            })
        }
    };

    let offset = stream.byte_offset();

    let version = Version::parse(&tag).map_err(|e| NodeIdError::MalformedContainer {
        reason: format!("version header {tag:?} is not a semantic version: {e}"),
    })?;

    Ok((version, &data[offset..]))
}

// ---------------------------------------------------------------------------
// Write
// ---------------------------------------------------------------------------

/// Writes a versioned container to `path`, replacing any existing file.
///
/// The container is written to a sibling temporary file created with
/// `mode`, flushed to disk, then renamed over `path`. A crash at any
/// point leaves either the old file or the complete new one. Replacing
/// a read-only file works because only the directory is modified.
///
/// # Errors
///
/// - [`NodeIdError::Config`] if `mode` is not owner-only.
/// - [`NodeIdError::Io`] if the temporary file cannot be created, written
///   or synced, or the rename fails.
pub fn write_versioned_file(
    path: &Path,
    version: &Version,
    payload: &[u8],
    mode: u32,
) -> Result<()> {
    validate_owner_only_mode(mode)?;

    let data = Zeroizing::new(encode_container(version, payload));
    let tmp_path = temp_path(path);

    let result = write_new_file(&tmp_path, &data, mode).and_then(|()| {
        fs::rename(&tmp_path, path).map_err(|e| NodeIdError::io("rename", path, e))
    });

    if result.is_err() {
        let _ = fs::remove_file(&tmp_path);
    }

    result
}

/// Sibling path used while a container is being written.
fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(OsString::from).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

fn write_new_file(path: &Path, data: &[u8], mode: u32) -> Result<()> {
    // Left over from an interrupted write.
    match fs::remove_file(path) {
        Ok(()) => {}
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => return Err(NodeIdError::io("remove stale", path, e)),
    }

    let mut options = OpenOptions::new();
    options.write(true).create_new(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(mode);
    }
    #[cfg(not(unix))]
    let _ = mode;

    let mut file = options
        .open(path)
        .map_err(|e| NodeIdError::io("create", path, e))?;
    file.write_all(data)
        .map_err(|e| NodeIdError::io("write", path, e))?;
    file.sync_all()
        .map_err(|e| NodeIdError::io("sync", path, e))?;

    Ok(())
}

// ---------------------------------------------------------------------------
// Read
// ---------------------------------------------------------------------------

/// Reads a versioned container from `path`.
///
/// Only the header is interpreted; the payload is returned verbatim for
/// the caller to decode once it has accepted the version.
///
/// # Errors
///
/// - [`NodeIdError::Io`] if the file cannot be read.
/// - [`NodeIdError::MalformedContainer`] if the header does not parse.
///   The reason names the file.
pub fn read_versioned_file(path: &Path) -> Result<(Version, Zeroizing<Vec<u8>>)> {
    let data = Zeroizing::new(fs::read(path).map_err(|e| NodeIdError::io("read", path, e))?);

    let (version, payload) = decode_container(&data).map_err(|e| e.in_file(path))?;

    Ok((version, Zeroizing::new(payload.to_vec())))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

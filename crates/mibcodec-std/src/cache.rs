//! Catalogue caching with fingerprint support.
//!
//! Serializes a frozen store for fast startup, so a fleet of collectors
//! can load a pre-compiled catalogue instead of re-parsing MIB trees.
//!
//! # File Format
//!
//! Cache files use the `.mibc` extension by convention:
//!
//! ```text
//! ┌────────────────────────────────────────┐
//! │ Header (variable, ~13 or ~45 bytes)    │
//! │   magic: [u8; 4]        "MIBC"         │
//! │   version: u32          Schema version │
//! │   has_fingerprint: u8   0 or 1         │
//! │   fingerprint: [u8; 32] (if present)   │
//! ├────────────────────────────────────────┤
//! │ Payload (postcard-encoded MibStore)    │
//! └────────────────────────────────────────┘
//! ```

use mibcodec_core::store::MibStore;
use sha2::{Digest, Sha256};
use std::fs;
use std::io;
use std::path::Path;

/// Current schema version. Bump on any breaking change to serialized format.
pub const SCHEMA_VERSION: u32 = 1;

/// Magic bytes identifying a mibcodec cache file.
const MAGIC: [u8; 4] = *b"MIBC";

/// Cache error.
#[derive(Debug)]
pub enum CacheError {
    /// File does not start with expected magic bytes.
    InvalidMagic,
    /// Schema version mismatch.
    VersionMismatch {
        /// Expected version.
        expected: u32,
        /// Found version.
        found: u32,
    },
    /// Fingerprint does not match expected value.
    FingerprintMismatch,
    /// Header is truncated.
    TruncatedHeader,
    /// Postcard deserialization failed.
    DeserializationFailed(postcard::Error),
    /// IO error.
    Io(io::Error),
}

impl std::fmt::Display for CacheError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidMagic => write!(f, "invalid magic bytes (expected MIBC)"),
            Self::VersionMismatch { expected, found } => {
                write!(f, "version mismatch: expected {expected}, found {found}")
            }
            Self::FingerprintMismatch => write!(f, "fingerprint mismatch"),
            Self::TruncatedHeader => write!(f, "truncated header"),
            Self::DeserializationFailed(e) => write!(f, "postcard deserialization failed: {e}"),
            Self::Io(e) => write!(f, "IO error: {e}"),
        }
    }
}

impl std::error::Error for CacheError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::DeserializationFailed(e) => Some(e),
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for CacheError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

/// Compute a fingerprint from MIB file contents.
///
/// The fingerprint includes the schema version so a format change
/// invalidates old caches. Files are sorted by name for determinism.
pub fn compute_fingerprint<S: AsRef<str>>(files: &[(S, &[u8])]) -> [u8; 32] {
    let mut sorted: Vec<_> = files.iter().collect();
    sorted.sort_by_key(|(name, _)| name.as_ref());

    let mut hasher = Sha256::new();
    hasher.update(SCHEMA_VERSION.to_le_bytes());
    for (name, content) in sorted {
        hasher.update(name.as_ref().as_bytes());
        hasher.update(content);
    }

    hasher.finalize().into()
}

/// Serialize a store to cache bytes.
///
/// # Panics
///
/// Panics if postcard serialization fails, which only happens on
/// allocation failure.
#[must_use]
pub fn serialize_store(store: &MibStore, fingerprint: Option<[u8; 32]>) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(64 * 1024);

    bytes.extend_from_slice(&MAGIC);
    bytes.extend_from_slice(&SCHEMA_VERSION.to_le_bytes());

    if let Some(fp) = fingerprint {
        bytes.push(1);
        bytes.extend_from_slice(&fp);
    } else {
        bytes.push(0);
    }

    let payload = postcard::to_allocvec(store).expect("serialization should not fail");
    bytes.extend_from_slice(&payload);

    bytes
}

/// Deserialize a store from cache bytes.
///
/// # Errors
///
/// Returns an error if the magic bytes or schema version do not match,
/// the fingerprint differs (when verification is requested), or the
/// payload does not decode.
pub fn deserialize_store(
    bytes: &[u8],
    expected_fingerprint: Option<&[u8; 32]>,
) -> Result<MibStore, CacheError> {
    // Minimum header size: magic(4) + version(4) + has_fp(1) = 9 bytes
    if bytes.len() < 9 {
        return Err(CacheError::TruncatedHeader);
    }

    if bytes[0..4] != MAGIC {
        return Err(CacheError::InvalidMagic);
    }

    let version = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
    if version != SCHEMA_VERSION {
        return Err(CacheError::VersionMismatch {
            expected: SCHEMA_VERSION,
            found: version,
        });
    }

    let has_fingerprint = bytes[8] != 0;
    let payload_start = if has_fingerprint {
        if bytes.len() < 9 + 32 {
            return Err(CacheError::TruncatedHeader);
        }
        if let Some(expected) = expected_fingerprint {
            let stored = &bytes[9..41];
            if stored != expected {
                return Err(CacheError::FingerprintMismatch);
            }
        }
        9 + 32
    } else {
        if expected_fingerprint.is_some() {
            return Err(CacheError::FingerprintMismatch);
        }
        9
    };

    postcard::from_bytes(&bytes[payload_start..]).map_err(CacheError::DeserializationFailed)
}

/// Get the fingerprint from cache bytes without fully deserializing.
///
/// Returns `None` if the cache has no embedded fingerprint.
///
/// # Errors
///
/// Returns an error if the header is invalid.
pub fn get_fingerprint(bytes: &[u8]) -> Result<Option<[u8; 32]>, CacheError> {
    if bytes.len() < 9 {
        return Err(CacheError::TruncatedHeader);
    }
    if bytes[0..4] != MAGIC {
        return Err(CacheError::InvalidMagic);
    }
    let version = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
    if version != SCHEMA_VERSION {
        return Err(CacheError::VersionMismatch {
            expected: SCHEMA_VERSION,
            found: version,
        });
    }

    if bytes[8] != 0 {
        if bytes.len() < 9 + 32 {
            return Err(CacheError::TruncatedHeader);
        }
        let mut fp = [0u8; 32];
        fp.copy_from_slice(&bytes[9..41]);
        Ok(Some(fp))
    } else {
        Ok(None)
    }
}

// === File-based convenience API ===

/// Save a store to a cache file.
///
/// # Errors
///
/// Returns an IO error if the file cannot be written.
pub fn save_cache<P: AsRef<Path>>(
    store: &MibStore,
    path: P,
    fingerprint: Option<[u8; 32]>,
) -> io::Result<()> {
    let bytes = serialize_store(store, fingerprint);
    fs::write(path, bytes)
}

/// Load a store from a cache file without fingerprint verification.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the cache is invalid.
pub fn load_cache<P: AsRef<Path>>(path: P) -> Result<MibStore, CacheError> {
    let bytes = fs::read(path)?;
    deserialize_store(&bytes, None)
}

/// Load a store from a cache file with fingerprint verification.
///
/// # Errors
///
/// Returns an error if the file cannot be read, the cache is invalid, or
/// the fingerprint does not match.
pub fn load_cache_verified<P: AsRef<Path>>(
    path: P,
    expected_fingerprint: &[u8; 32],
) -> Result<MibStore, CacheError> {
    let bytes = fs::read(path)?;
    deserialize_store(&bytes, Some(expected_fingerprint))
}

/// Check if a cache file exists and has a matching fingerprint.
pub fn is_cache_valid<P: AsRef<Path>>(path: P, expected_fingerprint: &[u8; 32]) -> bool {
    let Ok(bytes) = fs::read(path) else {
        return false;
    };
    match get_fingerprint(&bytes) {
        Ok(Some(fp)) => fp == *expected_fingerprint,
        _ => false,
    }
}

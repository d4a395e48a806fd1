/*!
 * Content fingerprints.
 *
 * A fingerprint is the lowercase hex SHA-256 of a file's raw bytes. It depends on
 * nothing but the bytes: no path, mtime or locale is mixed in.
 */

use sha2::{Digest, Sha256};
use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Hex-encoded SHA-256 digest of some content
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Wrap an already computed digest, as read back from metadata
    pub fn from_hex(hex: impl Into<String>) -> Self {
        Self(hex.into().trim().to_lowercase())
    }

    /// The hex digest
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Fingerprint a byte slice
pub fn fingerprint(content: &[u8]) -> Fingerprint {
    let mut hasher = Sha256::new();
    hasher.update(content);
    Fingerprint(format!("{:x}", hasher.finalize()))
}

/// Fingerprint a file, streaming it in 8 KiB blocks
pub fn fingerprint_file(path: &Path) -> io::Result<Fingerprint> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 8192];

    loop {
        let bytes_read = file.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(Fingerprint(format!("{:x}", hasher.finalize())))
}

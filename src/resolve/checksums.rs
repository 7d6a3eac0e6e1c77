//! Checksum values and checksum manifests
//!
//! A manifest is the `sha256sum` style file many projects attach to a
//! release:
//!
//! ```text
//! e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855  myapp_1.0.0_linux_amd64.tar.gz
//! 9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08 *myapp_1.0.0_darwin_arm64.tar.gz
//! ```

use std::collections::BTreeMap;
use std::fmt;

/// Length of a hex encoded SHA-256 digest.
pub const SHA256_HEX_LEN: usize = 64;

/// A SHA-256 digest as 64 lowercase hex characters.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Sha256(String);

impl Sha256 {
    /// Parse a hex token of any letter case. Returns `None` unless the token
    /// is exactly 64 hex characters.
    pub fn parse(token: &str) -> Option<Self> {
        if token.len() == SHA256_HEX_LEN && token.bytes().all(|b| b.is_ascii_hexdigit()) {
            Some(Self(token.to_ascii_lowercase()))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Sha256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Asset filename to checksum.
///
/// Filenames are matched exactly. Inserting a filename that is already
/// present replaces its checksum (last write wins), both within one manifest
/// and when merging release-note matches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChecksumMap {
    entries: BTreeMap<String, Sha256>,
}

impl ChecksumMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a checksum, stripping the binary-mode `*` marker from the
    /// filename. Returns the checksum it replaced, if any.
    pub fn insert(&mut self, filename: &str, checksum: Sha256) -> Option<Sha256> {
        let filename = filename.strip_prefix('*').unwrap_or(filename);
        self.entries.insert(filename.to_string(), checksum)
    }

    pub fn get(&self, filename: &str) -> Option<&Sha256> {
        self.entries.get(filename)
    }

    pub fn contains(&self, filename: &str) -> bool {
        self.entries.contains_key(filename)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries sorted by filename.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Sha256)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Parse manifest text into a [`ChecksumMap`].
///
/// Each non-blank line must split on whitespace into exactly two tokens, one
/// of which is a 64 character hex digest; anything else is skipped. When both
/// tokens look like digests the first one is taken as the checksum. An empty
/// map means the manifest held nothing usable.
pub fn parse_manifest(text: &str) -> ChecksumMap {
    let mut map = ChecksumMap::new();

    for line in text.lines() {
        let parts: Vec<&str> = line.split_whitespace().collect();
        let [first, second] = parts.as_slice() else {
            continue;
        };

        if let Some(checksum) = Sha256::parse(first) {
            map.insert(second, checksum);
        } else if let Some(checksum) = Sha256::parse(second) {
            map.insert(first, checksum);
        }
    }

    map
}

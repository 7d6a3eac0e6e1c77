//! Checksum recovery from release notes
//!
//! Some projects publish checksums only in the release description, in no
//! fixed layout. Both orientations are scanned:
//!
//! ```text
//! myapp_1.0.0_linux_amd64.tar.gz: e3b0c442...b855
//! e3b0c442...b855  myapp_1.0.0_darwin_arm64.tar.gz
//! ```

use super::checksums::{ChecksumMap, Sha256};
use regex::Regex;
use std::sync::LazyLock;

/// Extensions a filename must end in to be recognized in free text.
pub const NOTE_ASSET_EXTENSIONS: &[&str] = &["tar.gz", "zip", "tar.xz", "exe", "dmg", "deb", "rpm"];

static NAME_THEN_HASH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)([a-z0-9._-]+\.(?:{}))[: \t]+([a-f0-9]{{64}})\b",
        extension_alternation()
    ))
    .expect("name-then-hash pattern")
});

static HASH_THEN_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)\b([a-f0-9]{{64}})[ \t]+\*?([a-z0-9._-]+\.(?:{}))",
        extension_alternation()
    ))
    .expect("hash-then-name pattern")
});

fn extension_alternation() -> String {
    NOTE_ASSET_EXTENSIONS
        .iter()
        .map(|ext| regex::escape(ext))
        .collect::<Vec<_>>()
        .join("|")
}

/// Scan free-form text for `(filename, checksum)` pairs.
///
/// Matches of both orientations are merged, name-then-hash first; a later
/// match for the same filename replaces an earlier one. Best effort: text
/// that matches neither orientation yields an empty map.
pub fn extract_from_notes(text: &str) -> ChecksumMap {
    let mut map = ChecksumMap::new();

    for pattern in [&*NAME_THEN_HASH, &*HASH_THEN_NAME] {
        for caps in pattern.captures_iter(text) {
            let (a, b) = (&caps[1], &caps[2]);
            // Whichever side is the digest, the other is the filename
            if let Some(checksum) = Sha256::parse(a) {
                map.insert(b, checksum);
            } else if let Some(checksum) = Sha256::parse(b) {
                map.insert(a, checksum);
            }
        }
    }

    map
}

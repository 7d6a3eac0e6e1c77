//! Bump Homebrew-style recipes to a GitHub release
//!
//! Given a release reference such as
//! `https://github.com/jetify-com/devbox/releases/tag/0.16.0`, the crate
//! resolves the SHA-256 checksums published with the release and rewrites a
//! recipe so its `version` and every `sha256` match.
//!
//! # Example Recipe
//!
//! ```ruby
//! class Devbox < Formula
//!   version "0.15.0"
//!
//!   on_macos do
//!     url "https://github.com/jetify-com/devbox/releases/download/#{version}/devbox_#{version}_darwin_arm64.tar.gz"
//!     sha256 "..."
//!   end
//! end
//! ```
//!
//! # Checksum Sources
//!
//! Sources are tried in order, stopping at the first one that yields at
//! least one checksum:
//! - `checksums.txt`, `checksums.sha256`, `SHA256SUMS`, `SHA256SUMS.txt`
//! - `<repo>_<version>_checksums.txt`
//! - the first release asset named like a manifest (`*checksum*`,
//!   `*sha256*`, `*sums.txt`)
//! - the release notes, scanned for `name hash` / `hash name` pairs
//!
//! # Patching Strategies
//!
//! - [`Strategy::Positional`] - each `url` line is paired with the `sha256`
//!   line that follows it, before the next `url` line
//! - [`Strategy::Platform`] - checksums are matched by platform suffix
//!   (`darwin_arm64`, `linux_amd64`, ...) of `<app>_<version>_<suffix>.tar.gz`

pub mod core;
mod helpers;
mod patch;
mod resolve;

pub use crate::core::error::{BumpError, FetchError};
pub use crate::core::output;
pub use helpers::fs::{read_recipe, write_recipe_atomic};
pub use helpers::http::{Endpoints, Fetch, HttpClient};
pub use patch::platform::{ARCHIVE_EXTENSION, Platform};
pub use patch::{
    PatchReport, PatchWarning, PatchedRecipe, Policy, RecipePatcher, Strategy, UpdatedChecksum,
};
pub use resolve::checksums::{ChecksumMap, Sha256, parse_manifest};
pub use resolve::notes::extract_from_notes;
pub use resolve::release::{ReleaseReference, ReleaseTarget, parse_release_reference};
pub use resolve::{ChecksumResolver, ChecksumSource, Resolution, resolve_latest};

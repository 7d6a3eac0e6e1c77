//! Release references
//!
//! Parses GitHub release page URLs such as
//! `https://github.com/jetify-com/devbox/releases/tag/0.16.0` into their
//! organization, repository and tag.

use crate::core::error::BumpError;
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

static RELEASE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"github\.com/([^/\s?#]+)/([^/\s?#]+)/releases/(?:tag/([^/\s?#]+)|latest)(?:[/?#]|$)")
        .expect("release URL pattern")
});

/// A concrete release: `organization/repository` at `tag`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseReference {
    pub organization: String,
    pub repository: String,
    /// Tag exactly as published; may or may not carry a leading `v`.
    pub tag: String,
}

impl ReleaseReference {
    pub fn new(
        organization: impl Into<String>,
        repository: impl Into<String>,
        tag: impl Into<String>,
    ) -> Self {
        Self {
            organization: organization.into(),
            repository: repository.into(),
            tag: tag.into(),
        }
    }

    /// Version written into the recipe: the tag without a `v` prefix.
    ///
    /// `v1.2.3` -> `1.2.3`, `0.16.0` -> `0.16.0`, `vnext` -> `vnext`.
    pub fn version(&self) -> &str {
        match self.tag.strip_prefix('v') {
            Some(rest) if rest.starts_with(|c: char| c.is_ascii_digit()) => rest,
            _ => &self.tag,
        }
    }

    /// Whether [`ReleaseReference::version`] parses as semver.
    pub fn is_semver(&self) -> bool {
        semver::Version::parse(self.version()).is_ok()
    }
}

impl fmt::Display for ReleaseReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}@{}", self.organization, self.repository, self.tag)
    }
}

/// What a release URL points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReleaseTarget {
    /// `.../releases/tag/<tag>`
    Tagged(ReleaseReference),
    /// `.../releases/latest`, resolved through the API before use
    Latest {
        organization: String,
        repository: String,
    },
}

/// Parse a GitHub release URL.
///
/// The scheme is optional and anything after the tag (`/`, `?`, `#`) is
/// ignored. No network access happens here.
pub fn parse_release_reference(input: &str) -> Result<ReleaseTarget, BumpError> {
    let input = input.trim();
    let caps = RELEASE_URL
        .captures(input)
        .ok_or_else(|| BumpError::InvalidReferenceFormat(input.to_string()))?;

    let organization = caps[1].to_string();
    let repository = caps[2].to_string();

    Ok(match caps.get(3) {
        Some(tag) => ReleaseTarget::Tagged(ReleaseReference {
            organization,
            repository,
            tag: tag.as_str().to_string(),
        }),
        None => ReleaseTarget::Latest {
            organization,
            repository,
        },
    })
}

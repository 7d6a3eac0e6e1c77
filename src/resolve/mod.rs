//! Checksum resolution for a release
//!
//! Sources are an explicit ordered list. Each one is fetched and parsed into
//! an outcome (found, empty, failed); the resolver walks the list and stops
//! at the first source that yields at least one checksum. Failures are
//! collected along the way and only surface when nothing was found.

pub mod checksums;
pub mod notes;
pub mod release;

use crate::core::error::{BumpError, FetchError};
use crate::core::output;
use crate::helpers::http::{self, Endpoints, Fetch, ReleasePayload};
use checksums::{ChecksumMap, parse_manifest};
use release::ReleaseReference;
use std::fmt;

/// Conventional manifest names, in the order they are tried.
pub const MANIFEST_CANDIDATES: &[&str] = &[
    "checksums.txt",
    "checksums.sha256",
    "SHA256SUMS",
    "SHA256SUMS.txt",
];

/// One place checksums may come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChecksumSource {
    /// Manifest attached to the release under this asset name
    Manifest(String),
    /// First release asset whose name looks like a checksum manifest
    ReleaseAssets,
    /// The release description, scanned for filename/checksum pairs
    ReleaseNotes,
}

impl ChecksumSource {
    /// Default source order for `release`: the conventional manifests, the
    /// goreleaser `<repo>_<version>_checksums.txt`, any manifest-like asset
    /// listed by the releases API, then the release notes.
    pub fn defaults(release: &ReleaseReference) -> Vec<Self> {
        let mut sources: Vec<Self> = MANIFEST_CANDIDATES
            .iter()
            .map(|name| Self::Manifest(name.to_string()))
            .collect();
        sources.push(Self::Manifest(format!(
            "{}_{}_checksums.txt",
            release.repository,
            release.version()
        )));
        sources.push(Self::ReleaseAssets);
        sources.push(Self::ReleaseNotes);
        sources
    }

    /// URL this source is fetched from. For [`ChecksumSource::ReleaseAssets`]
    /// this is the release metadata the asset list is read from.
    pub fn url(&self, endpoints: &Endpoints, release: &ReleaseReference) -> String {
        match self {
            Self::Manifest(name) => endpoints.asset_url(release, name),
            Self::ReleaseAssets | Self::ReleaseNotes => endpoints.release_url(release),
        }
    }
}

impl fmt::Display for ChecksumSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Manifest(name) => write!(f, "manifest {}", name),
            Self::ReleaseAssets => f.write_str("release assets"),
            Self::ReleaseNotes => f.write_str("release notes"),
        }
    }
}

/// Result of trying a single source.
#[derive(Debug)]
enum Outcome {
    /// Checksums and the URL they were read from
    Found(ChecksumMap, String),
    Empty,
    Failed(FetchError),
}

/// Release metadata, fetched on first use and shared by the sources that
/// read it.
type PayloadCache = Option<Result<ReleasePayload, FetchError>>;

/// Checksums resolved for a release and where they came from.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub release: ReleaseReference,
    pub source: ChecksumSource,
    /// URL the checksums were read from
    pub url: String,
    pub checksums: ChecksumMap,
}

/// Walks checksum sources in order for a release.
pub struct ChecksumResolver<'a, F: Fetch + ?Sized> {
    fetcher: &'a F,
    endpoints: &'a Endpoints,
    sources: Option<Vec<ChecksumSource>>,
}

impl<'a, F: Fetch + ?Sized> ChecksumResolver<'a, F> {
    pub fn new(fetcher: &'a F, endpoints: &'a Endpoints) -> Self {
        Self {
            fetcher,
            endpoints,
            sources: None,
        }
    }

    /// Replace the default source order.
    pub fn with_sources(mut self, sources: Vec<ChecksumSource>) -> Self {
        self.sources = Some(sources);
        self
    }

    /// Resolve checksums for `release`.
    ///
    /// Returns the first non-empty source. Otherwise fails with the last
    /// fetch error seen, or [`BumpError::NoChecksumSourceFound`] when every
    /// source was reachable but empty.
    pub fn resolve(&self, release: &ReleaseReference) -> Result<Resolution, BumpError> {
        let sources = match &self.sources {
            Some(sources) => sources.clone(),
            None => ChecksumSource::defaults(release),
        };

        let mut errors: Vec<FetchError> = Vec::new();
        let mut payload: PayloadCache = None;

        for source in sources {
            let url = source.url(self.endpoints, release);
            output::detail(&format!("trying {} ({})", source, url));

            match self.try_source(&source, &url, &mut payload) {
                Outcome::Found(checksums, url) => {
                    return Ok(Resolution {
                        release: release.clone(),
                        source,
                        url,
                        checksums,
                    });
                }
                Outcome::Empty => output::detail(&format!("{} has no checksums", source)),
                Outcome::Failed(err) => {
                    output::detail(&format!("{} failed: {}", source, err));
                    errors.push(err);
                }
            }
        }

        match errors.pop() {
            Some(last) => Err(BumpError::SourceFetchFailure(last)),
            None => Err(BumpError::NoChecksumSourceFound {
                release: release.to_string(),
            }),
        }
    }

    fn try_source(
        &self,
        source: &ChecksumSource,
        url: &str,
        cache: &mut PayloadCache,
    ) -> Outcome {
        let (checksums, read_from) = match source {
            ChecksumSource::Manifest(_) => match self.fetcher.get_text(url) {
                Ok(text) => (parse_manifest(&text), url.to_string()),
                Err(err) => return Outcome::Failed(err),
            },
            ChecksumSource::ReleaseAssets => {
                let payload = match self.payload(url, cache) {
                    Ok(payload) => payload,
                    Err(err) => return Outcome::Failed(err),
                };
                let Some(asset) = payload.checksum_asset() else {
                    return Outcome::Empty;
                };
                output::detail(&format!("found asset {}", asset.name));
                match self.fetcher.get_text(&asset.browser_download_url) {
                    Ok(text) => (parse_manifest(&text), asset.browser_download_url.clone()),
                    Err(err) => return Outcome::Failed(err),
                }
            }
            ChecksumSource::ReleaseNotes => match self.payload(url, cache) {
                Ok(payload) => match &payload.body {
                    Some(body) => (notes::extract_from_notes(body), url.to_string()),
                    None => return Outcome::Empty,
                },
                Err(err) => return Outcome::Failed(err),
            },
        };

        if checksums.is_empty() {
            Outcome::Empty
        } else {
            Outcome::Found(checksums, read_from)
        }
    }

    fn payload<'c>(
        &self,
        url: &str,
        cache: &'c mut PayloadCache,
    ) -> Result<&'c ReleasePayload, FetchError> {
        cache
            .get_or_insert_with(|| http::github_release(self.fetcher, url))
            .as_ref()
            .map_err(Clone::clone)
    }
}

/// Resolve `releases/latest` to a concrete tag through the releases API.
pub fn resolve_latest<F: Fetch + ?Sized>(
    fetcher: &F,
    endpoints: &Endpoints,
    organization: &str,
    repository: &str,
) -> Result<ReleaseReference, BumpError> {
    let url = endpoints.latest_release_url(organization, repository);
    let payload = http::github_release(fetcher, &url)?;

    match payload.tag_name {
        Some(tag) if !tag.trim().is_empty() => Ok(ReleaseReference::new(
            organization,
            repository,
            tag.trim(),
        )),
        _ => Err(BumpError::InvalidReleasePayload {
            url,
            field: "tag_name",
        }),
    }
}

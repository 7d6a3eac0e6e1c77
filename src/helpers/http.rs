//! HTTP access to release downloads and the GitHub releases API
//!
//! Every request is a blocking GET with a fixed deadline. Missing resources
//! (404) map to [`FetchError::NotFound`]; a 403 from the GitHub API means the
//! rate limit was hit and maps to [`FetchError::RateLimited`].

use crate::core::error::FetchError;
use crate::resolve::release::ReleaseReference;
use serde::Deserialize;
use std::sync::OnceLock;
use std::time::Duration;

/// Default HTTP timeout in seconds
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Default base for release asset downloads
pub const GITHUB_DOWNLOAD_BASE: &str = "https://github.com";

/// Default GitHub API base URL
pub const GITHUB_API_BASE: &str = "https://api.github.com";

const GITHUB_API_ACCEPT: &str = "application/vnd.github.v3+json";
const USER_AGENT: &str = concat!("recipe-bump/", env!("CARGO_PKG_VERSION"));

/// Get HTTP timeout from environment variable or use default.
/// Cached, the env var is only read once.
fn default_http_timeout() -> Duration {
    static TIMEOUT: OnceLock<Duration> = OnceLock::new();
    *TIMEOUT.get_or_init(|| {
        let secs = std::env::var("RECIPE_BUMP_HTTP_TIMEOUT")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS);
        // Clamp to reasonable range (5-300 seconds)
        Duration::from_secs(secs.clamp(5, 300))
    })
}

/// Source of remote text.
///
/// The resolver only ever talks to this trait, so tests can count and script
/// every request.
pub trait Fetch {
    /// GET `url` and return the body as text.
    fn get_text(&self, url: &str) -> Result<String, FetchError>;

    /// GET a GitHub API resource. Defaults to [`Fetch::get_text`].
    fn get_api(&self, url: &str) -> Result<String, FetchError> {
        self.get_text(url)
    }
}

/// Blocking HTTP client backed by ureq.
#[derive(Debug, Clone)]
pub struct HttpClient {
    timeout: Duration,
}

impl HttpClient {
    /// Client using `RECIPE_BUMP_HTTP_TIMEOUT` (or 30s) as its deadline.
    pub fn new() -> Self {
        Self::with_timeout(default_http_timeout())
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn get(&self, url: &str, api: bool) -> Result<String, FetchError> {
        let mut request = ureq::get(url)
            .timeout(self.timeout)
            .set("User-Agent", USER_AGENT);
        if api {
            request = request.set("Accept", GITHUB_API_ACCEPT);
        }

        request
            .call()
            .map_err(|e| map_ureq_error(url, e, api))?
            .into_string()
            .map_err(|e| FetchError::Body {
                url: url.to_string(),
                message: e.to_string(),
            })
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl Fetch for HttpClient {
    fn get_text(&self, url: &str) -> Result<String, FetchError> {
        self.get(url, false)
    }

    fn get_api(&self, url: &str) -> Result<String, FetchError> {
        self.get(url, true)
    }
}

fn map_ureq_error(url: &str, err: ureq::Error, api: bool) -> FetchError {
    let url = url.to_string();
    match err {
        ureq::Error::Status(403, _) if api => FetchError::RateLimited { url },
        ureq::Error::Status(404, _) => FetchError::NotFound { url },
        ureq::Error::Status(status, _) => FetchError::Status { url, status },
        // Display of a transport error already includes the URL
        ureq::Error::Transport(transport) => FetchError::Transport {
            message: match transport.message() {
                Some(detail) => format!("{}: {}", transport.kind(), detail),
                None => transport.kind().to_string(),
            },
            url,
        },
    }
}

/// Where release assets and release metadata live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub download_base: String,
    pub api_base: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            download_base: GITHUB_DOWNLOAD_BASE.to_string(),
            api_base: GITHUB_API_BASE.to_string(),
        }
    }
}

impl Endpoints {
    /// Both bases pointing at the same server (mirrors, mock servers).
    pub fn single(base: &str) -> Self {
        Self {
            download_base: base.to_string(),
            api_base: base.to_string(),
        }
    }

    /// Defaults, overridden by `RECIPE_BUMP_DOWNLOAD_BASE` and
    /// `RECIPE_BUMP_API_BASE` when set.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            download_base: std::env::var("RECIPE_BUMP_DOWNLOAD_BASE")
                .unwrap_or(defaults.download_base),
            api_base: std::env::var("RECIPE_BUMP_API_BASE").unwrap_or(defaults.api_base),
        }
    }

    /// `<download_base>/<org>/<repo>/releases/download/<tag>/<name>`
    pub fn asset_url(&self, release: &ReleaseReference, name: &str) -> String {
        format!(
            "{}/{}/{}/releases/download/{}/{}",
            self.download_base.trim_end_matches('/'),
            release.organization,
            release.repository,
            release.tag,
            name
        )
    }

    /// `<api_base>/repos/<org>/<repo>/releases/tags/<tag>`
    pub fn release_url(&self, release: &ReleaseReference) -> String {
        format!(
            "{}/repos/{}/{}/releases/tags/{}",
            self.api_base.trim_end_matches('/'),
            release.organization,
            release.repository,
            release.tag
        )
    }

    /// `<api_base>/repos/<org>/<repo>/releases/latest`
    pub fn latest_release_url(&self, organization: &str, repository: &str) -> String {
        format!(
            "{}/repos/{}/{}/releases/latest",
            self.api_base.trim_end_matches('/'),
            organization,
            repository
        )
    }
}

/// The parts of a GitHub release payload we read.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReleasePayload {
    pub tag_name: Option<String>,
    pub body: Option<String>,
    #[serde(default)]
    pub assets: Vec<ReleaseAsset>,
}

/// A file attached to a release.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReleaseAsset {
    pub name: String,
    pub browser_download_url: String,
}

impl ReleasePayload {
    /// First asset that looks like a checksum manifest: the name contains
    /// `checksum` or `sha256`, or ends in `sums.txt` (case-insensitive).
    pub fn checksum_asset(&self) -> Option<&ReleaseAsset> {
        self.assets.iter().find(|asset| {
            let name = asset.name.to_ascii_lowercase();
            name.contains("checksum") || name.contains("sha256") || name.ends_with("sums.txt")
        })
    }
}

/// Fetch and decode a GitHub release payload.
pub fn github_release<F: Fetch + ?Sized>(
    fetcher: &F,
    url: &str,
) -> Result<ReleasePayload, FetchError> {
    let text = fetcher.get_api(url)?;
    serde_json::from_str(&text).map_err(|e| FetchError::Body {
        url: url.to_string(),
        message: format!("invalid release JSON: {}", e),
    })
}

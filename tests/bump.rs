//! End-to-end tests: resolve checksums from a mock release server and patch
//! a recipe file on disk.

use recipe_bump::{
    BumpError, ChecksumResolver, ChecksumSource, Endpoints, HttpClient, PatchWarning, Policy,
    RecipePatcher, ReleaseReference, ReleaseTarget, Strategy, parse_release_reference,
    read_recipe, resolve_latest, write_recipe_atomic,
};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SHA_DARWIN: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";
const SHA_LINUX: &str = "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9";
const OLD: &str = "0000000000000000000000000000000000000000000000000000000000000000";

const FORMULA: &str = r#"class Devbox < Formula
  desc "Instant, easy, predictable development environments"
  homepage "https://www.jetify.com/devbox"
  version "0.15.0"

  on_macos do
    url "https://github.com/jetify-com/devbox/releases/download/#{version}/devbox_#{version}_darwin_arm64.tar.gz"
    sha256 "0000000000000000000000000000000000000000000000000000000000000000"
  end

  on_linux do
    url "https://github.com/jetify-com/devbox/releases/download/#{version}/devbox_#{version}_linux_amd64.tar.gz"
    sha256 "0000000000000000000000000000000000000000000000000000000000000000"
  end

  def install
    bin.install "devbox"
  end
end
"#;

/// Write the formula into a fresh temp dir and return its path
fn write_formula(dir: &TempDir, content: &str) -> PathBuf {
    let path = dir.path().join("devbox.rb");
    std::fs::write(&path, content).unwrap();
    path
}

fn manifest() -> String {
    format!(
        "{}  devbox_0.16.0_darwin_arm64.tar.gz\n{}  devbox_0.16.0_linux_amd64.tar.gz\n",
        SHA_DARWIN.to_uppercase(),
        SHA_LINUX
    )
}

async fn serve_manifest(server: &MockServer, tag: &str, name: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(format!(
            "/jetify-com/devbox/releases/download/{}/{}",
            tag, name
        )))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

fn tagged(url: &str) -> ReleaseReference {
    match parse_release_reference(url).unwrap() {
        ReleaseTarget::Tagged(release) => release,
        other => panic!("expected tagged release, got {:?}", other),
    }
}

/// Resolve, patch and write, stopping at the first error
fn bump(
    endpoints: &Endpoints,
    release: &ReleaseReference,
    recipe: &Path,
    strategy: Strategy,
    policy: Policy,
) -> Result<recipe_bump::PatchReport, BumpError> {
    let client = HttpClient::new();
    let resolution = ChecksumResolver::new(&client, endpoints).resolve(release)?;
    let original = read_recipe(recipe)?;
    let patched = RecipePatcher::new(release.version(), &resolution.checksums)
        .strategy(strategy)
        .policy(policy)
        .apply(&original)?;
    write_recipe_atomic(recipe, &patched.text)?;
    Ok(patched.report)
}

// =============================================================================
// Positional strategy
// =============================================================================

#[tokio::test]
async fn test_bump_from_checksums_txt() {
    let server = MockServer::start().await;
    serve_manifest(&server, "0.16.0", "checksums.txt", manifest()).await;

    let dir = TempDir::new().unwrap();
    let recipe = write_formula(&dir, FORMULA);
    let release = tagged("https://github.com/jetify-com/devbox/releases/tag/0.16.0");

    let report = bump(
        &Endpoints::single(&server.uri()),
        &release,
        &recipe,
        Strategy::Positional,
        Policy::Strict,
    )
    .unwrap();

    assert_eq!(report.updated_count(), 2);
    assert_eq!(report.version, "0.16.0");

    let expected = FORMULA
        .replacen(r#"version "0.15.0""#, r#"version "0.16.0""#, 1)
        .replacen(OLD, SHA_DARWIN, 1)
        .replacen(OLD, SHA_LINUX, 1);
    assert_eq!(std::fs::read_to_string(&recipe).unwrap(), expected);
}

#[tokio::test]
async fn test_v_prefixed_tag_keeps_download_path() {
    let server = MockServer::start().await;
    serve_manifest(&server, "v0.16.0", "SHA256SUMS", manifest()).await;

    let dir = TempDir::new().unwrap();
    let recipe = write_formula(&dir, FORMULA);
    let release = tagged("github.com/jetify-com/devbox/releases/tag/v0.16.0");

    bump(
        &Endpoints::single(&server.uri()),
        &release,
        &recipe,
        Strategy::Positional,
        Policy::Strict,
    )
    .unwrap();

    let patched = std::fs::read_to_string(&recipe).unwrap();
    assert!(patched.contains(r#"  version "0.16.0""#));
    assert!(!patched.contains(OLD));
}

#[tokio::test]
async fn test_missing_checksum_leaves_file_untouched() {
    let server = MockServer::start().await;
    serve_manifest(
        &server,
        "0.16.0",
        "checksums.txt",
        format!("{}  devbox_0.16.0_darwin_arm64.tar.gz\n", SHA_DARWIN),
    )
    .await;

    let dir = TempDir::new().unwrap();
    let recipe = write_formula(&dir, FORMULA);
    let release = tagged("https://github.com/jetify-com/devbox/releases/tag/0.16.0");

    let err = bump(
        &Endpoints::single(&server.uri()),
        &release,
        &recipe,
        Strategy::Positional,
        Policy::Strict,
    )
    .unwrap_err();

    assert!(matches!(err, BumpError::ChecksumNotFound { .. }));
    assert_eq!(std::fs::read_to_string(&recipe).unwrap(), FORMULA);
}

// =============================================================================
// Platform strategy
// =============================================================================

#[tokio::test]
async fn test_platform_tolerant_partial_update() {
    let server = MockServer::start().await;
    serve_manifest(
        &server,
        "0.16.0",
        "checksums.txt",
        format!("{}  devbox_0.16.0_linux_amd64.tar.gz\n", SHA_LINUX),
    )
    .await;

    let dir = TempDir::new().unwrap();
    let recipe = write_formula(&dir, FORMULA);
    let release = tagged("https://github.com/jetify-com/devbox/releases/tag/0.16.0");

    let report = bump(
        &Endpoints::single(&server.uri()),
        &release,
        &recipe,
        Strategy::Platform {
            app_name: "devbox".to_string(),
        },
        Policy::Tolerant,
    )
    .unwrap();

    assert_eq!(report.updated_count(), 1);
    assert!(matches!(
        report.warnings.as_slice(),
        [PatchWarning::PartialUpdate { .. }]
    ));

    let patched = std::fs::read_to_string(&recipe).unwrap();
    assert!(patched.contains(SHA_LINUX));
    assert!(patched.contains(OLD));
}

// =============================================================================
// Release notes and latest
// =============================================================================

#[tokio::test]
async fn test_release_notes_fallback_end_to_end() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/jetify-com/devbox/releases/tags/0.16.0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "tag_name": "0.16.0",
            "body": format!(
                "### Checksums\n\ndevbox_0.16.0_darwin_arm64.tar.gz: {}\ndevbox_0.16.0_linux_amd64.tar.gz: {}\n",
                SHA_DARWIN, SHA_LINUX
            ),
        })))
        .expect(1)
        .mount(&server)
        .await;

    let endpoints = Endpoints::single(&server.uri());
    let release = tagged("https://github.com/jetify-com/devbox/releases/tag/0.16.0");
    let resolution = ChecksumResolver::new(&HttpClient::new(), &endpoints)
        .resolve(&release)
        .unwrap();

    assert_eq!(resolution.source, ChecksumSource::ReleaseNotes);
    assert_eq!(resolution.checksums.len(), 2);
}

#[tokio::test]
async fn test_no_sources_reports_last_error() {
    let server = MockServer::start().await;

    let endpoints = Endpoints::single(&server.uri());
    let release = tagged("https://github.com/jetify-com/devbox/releases/tag/0.16.0");
    let err = ChecksumResolver::new(&HttpClient::new(), &endpoints)
        .resolve(&release)
        .unwrap_err();

    // Notes are tried last, so their 404 is the error reported
    match err {
        BumpError::SourceFetchFailure(fetch) => {
            assert!(fetch.url().ends_with("/repos/jetify-com/devbox/releases/tags/0.16.0"))
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_latest_release_resolves_tag() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/jetify-com/devbox/releases/latest"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"tag_name": "v0.16.0"})),
        )
        .mount(&server)
        .await;

    let target =
        parse_release_reference("https://github.com/jetify-com/devbox/releases/latest").unwrap();
    let ReleaseTarget::Latest {
        organization,
        repository,
    } = target
    else {
        panic!("expected latest release");
    };

    let release = resolve_latest(
        &HttpClient::new(),
        &Endpoints::single(&server.uri()),
        &organization,
        &repository,
    )
    .unwrap();

    assert_eq!(release.tag, "v0.16.0");
    assert_eq!(release.version(), "0.16.0");
}

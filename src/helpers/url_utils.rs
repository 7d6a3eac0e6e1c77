//! URL helpers for recipe download declarations
//!
//! Provides placeholder expansion and filename extraction for `url "..."`
//! values found in recipes.

/// Interpolation token recipes use for the release version.
pub const VERSION_PLACEHOLDER: &str = "#{version}";

/// Replace every version placeholder in `url` with `version`.
pub fn expand_version(url: &str, version: &str) -> String {
    url.replace(VERSION_PLACEHOLDER, version)
}

/// Extract the asset filename from a download URL.
///
/// The placeholder is expanded first, so the `#` in `#{version}` is never
/// mistaken for a fragment. Query strings and fragments are dropped.
///
/// # Example
/// ```ignore
/// assert_eq!(
///     asset_filename("https://x.dev/#{version}/app_#{version}.zip", "1.0"),
///     "app_1.0.zip"
/// );
/// ```
pub fn asset_filename(url: &str, version: &str) -> String {
    let expanded = expand_version(url, version);

    // Strip query string and fragment
    let clean_url = expanded.split('?').next().unwrap_or(&expanded);
    let clean_url = clean_url.split('#').next().unwrap_or(clean_url);

    clean_url.rsplit('/').next().unwrap_or(clean_url).to_string()
}

//! Recipe documents and the declarations inside them
//!
//! A recipe is handled as a list of lines. Three declarations matter:
//!
//! ```ruby
//! version "0.15.0"
//! url "https://github.com/o/r/releases/download/#{version}/r_#{version}_linux_amd64.tar.gz"
//! sha256 "..."
//! ```
//!
//! [`AssetScanner`] pairs every `url` line with the `sha256` line that
//! follows it. A `sha256` line is only ever paired with the nearest `url`
//! line above it: meeting another `url` first ends the pairing.

use crate::core::error::BumpError;
use crate::helpers::url_utils;
use regex::Regex;
use std::sync::LazyLock;

static URL_DECL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\burl\s+"([^"]+)""#).expect("url declaration pattern"));

static SHA256_DECL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^\s*sha256\s+"([^"]+)""#).expect("sha256 declaration pattern"));

static VERSION_DECL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^\s*version\s+"([^"]+)""#).expect("version declaration pattern"));

/// URL of a `url "..."` declaration on this line.
pub fn url_declaration(line: &str) -> Option<&str> {
    URL_DECL
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

pub fn is_checksum_declaration(line: &str) -> bool {
    SHA256_DECL.is_match(line)
}

pub fn is_version_declaration(line: &str) -> bool {
    VERSION_DECL.is_match(line)
}

/// Replace the quoted value captured by `pattern`, keeping everything else on
/// the line (indentation, trailing comments, line ending) byte for byte.
fn replace_quoted(pattern: &Regex, line: &str, value: &str) -> Option<String> {
    let value_span = pattern.captures(line)?.get(1)?;
    Some(format!(
        "{}{}{}",
        &line[..value_span.start()],
        value,
        &line[value_span.end()..]
    ))
}

/// A recipe held in memory as lines.
///
/// Lines are split on `\n` only, so rendering reproduces `\r\n` endings and
/// the presence or absence of a final newline exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeDocument {
    lines: Vec<String>,
}

impl RecipeDocument {
    pub fn parse(text: &str) -> Self {
        Self {
            lines: text.split('\n').map(str::to_string).collect(),
        }
    }

    pub fn render(&self) -> String {
        self.lines.join("\n")
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Index of the first version declaration.
    pub fn version_line(&self) -> Option<usize> {
        self.lines.iter().position(|l| is_version_declaration(l))
    }

    /// Set the version on line `idx`. Returns false if it is not a version
    /// declaration.
    pub fn set_version(&mut self, idx: usize, version: &str) -> bool {
        self.replace_on(idx, &VERSION_DECL, version)
    }

    /// Set the checksum on line `idx`. Returns false if it is not a sha256
    /// declaration.
    pub fn set_checksum(&mut self, idx: usize, checksum: &str) -> bool {
        self.replace_on(idx, &SHA256_DECL, checksum)
    }

    fn replace_on(&mut self, idx: usize, pattern: &Regex, value: &str) -> bool {
        let Some(line) = self.lines.get_mut(idx) else {
            return false;
        };
        match replace_quoted(pattern, line, value) {
            Some(new_line) => {
                *line = new_line;
                true
            }
            None => false,
        }
    }
}

/// A `url` line paired with its `sha256` line. Line indexes are 0-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetDeclaration {
    pub url_line: usize,
    pub checksum_line: usize,
    /// URL with the version placeholder expanded
    pub url: String,
    pub filename: String,
}

/// A `url` line with no `sha256` line before the next `url` line (or the end
/// of the document).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnpairedUrl {
    pub url_line: usize,
    pub filename: String,
}

impl From<UnpairedUrl> for BumpError {
    fn from(unpaired: UnpairedUrl) -> Self {
        BumpError::MissingChecksumLine {
            filename: unpaired.filename,
            line: unpaired.url_line + 1,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum ScanState<'a> {
    SeekingUrl,
    SeekingSha { url_line: usize, url: &'a str },
}

/// Walks a document yielding each asset declaration in order.
///
/// An unpaired `url` yields an [`UnpairedUrl`] and scanning resumes at the
/// `url` line that ended it, so one missing `sha256` line never shifts the
/// pairing of the declarations after it.
pub struct AssetScanner<'a> {
    lines: &'a [String],
    version: &'a str,
    pos: usize,
}

impl<'a> AssetScanner<'a> {
    pub fn new(document: &'a RecipeDocument, version: &'a str) -> Self {
        Self {
            lines: document.lines(),
            version,
            pos: 0,
        }
    }

    fn unpaired(&self, url_line: usize, url: &str) -> UnpairedUrl {
        UnpairedUrl {
            url_line,
            filename: url_utils::asset_filename(url, self.version),
        }
    }
}

impl<'a> Iterator for AssetScanner<'a> {
    type Item = Result<AssetDeclaration, UnpairedUrl>;

    fn next(&mut self) -> Option<Self::Item> {
        let lines = self.lines;
        let mut state = ScanState::SeekingUrl;

        while self.pos < lines.len() {
            let idx = self.pos;
            let line: &'a str = &lines[idx];
            self.pos += 1;

            match state {
                ScanState::SeekingUrl => {
                    if let Some(url) = url_declaration(line) {
                        state = ScanState::SeekingSha { url_line: idx, url };
                    }
                }
                ScanState::SeekingSha { url_line, url } => {
                    if is_checksum_declaration(line) {
                        return Some(Ok(AssetDeclaration {
                            url_line,
                            checksum_line: idx,
                            url: url_utils::expand_version(url, self.version),
                            filename: url_utils::asset_filename(url, self.version),
                        }));
                    }
                    if url_declaration(line).is_some() {
                        // Leave the next url line for the following call
                        self.pos = idx;
                        return Some(Err(self.unpaired(url_line, url)));
                    }
                }
            }
        }

        match state {
            ScanState::SeekingSha { url_line, url } => Some(Err(self.unpaired(url_line, url))),
            ScanState::SeekingUrl => None,
        }
    }
}

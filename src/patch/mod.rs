//! Recipe patching
//!
//! Rewrites the first `version` declaration and the `sha256` declaration of
//! every asset. Patching happens on an in-memory copy and all edits are
//! collected before any is applied: either the whole document is patched or
//! an error is returned and nothing changes.
//!
//! Two strategies decide which checksum belongs to which `sha256` line:
//!
//! - [`Strategy::Positional`] derives the filename from the `url` line right
//!   above it and requires a checksum for every asset.
//! - [`Strategy::Platform`] looks for the six known platform archives by
//!   name, `<app>_<version>_<os>_<arch>.tar.gz`.

pub mod document;
pub mod platform;

use crate::core::error::BumpError;
use crate::resolve::checksums::{ChecksumMap, Sha256};
use document::{AssetScanner, RecipeDocument};
use platform::Platform;
use std::fmt;

/// How checksum lines are matched to checksums.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Strategy {
    /// Pair each `url` with the `sha256` below it, by the URL's filename
    Positional,
    /// Match `url` lines by platform suffix, by `<app_name>_<version>_<suffix>.tar.gz`
    Platform { app_name: String },
}

/// What to do when the platform strategy has no checksum for a platform the
/// recipe declares.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Policy {
    /// Fail with [`BumpError::ChecksumNotFound`]
    #[default]
    Strict,
    /// Record a [`PatchWarning::PartialUpdate`] and leave that line alone
    Tolerant,
}

/// Non-fatal findings of a patch run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchWarning {
    /// The recipe has no `version "..."` line
    MissingVersionLine,
    /// A declared platform had no checksum; its `sha256` line was not updated
    PartialUpdate { platform: Platform, filename: String },
}

impl fmt::Display for PatchWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingVersionLine => f.write_str("no version declaration found, version not updated"),
            Self::PartialUpdate { platform, filename } => write!(
                f,
                "no SHA256 found for {} ({}), checksum left unchanged",
                filename, platform
            ),
        }
    }
}

/// One rewritten `sha256` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdatedChecksum {
    pub filename: String,
    /// 1-based line number
    pub line: usize,
    pub checksum: Sha256,
}

/// Summary of what a patch run changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatchReport {
    pub version: String,
    /// 1-based line of the rewritten version declaration
    pub version_line: Option<usize>,
    pub updated: Vec<UpdatedChecksum>,
    pub warnings: Vec<PatchWarning>,
}

impl PatchReport {
    pub fn updated_count(&self) -> usize {
        self.updated.len()
    }
}

/// A patched recipe and its report.
#[derive(Debug, Clone)]
pub struct PatchedRecipe {
    pub text: String,
    pub report: PatchReport,
}

/// A single pending `sha256` rewrite.
struct Edit {
    line: usize,
    filename: String,
    checksum: Sha256,
}

/// Patches recipes to one release version and its checksums.
#[derive(Debug, Clone)]
pub struct RecipePatcher<'a> {
    version: &'a str,
    checksums: &'a ChecksumMap,
    strategy: Strategy,
    policy: Policy,
}

impl<'a> RecipePatcher<'a> {
    /// Positional, strict patcher.
    pub fn new(version: &'a str, checksums: &'a ChecksumMap) -> Self {
        Self {
            version,
            checksums,
            strategy: Strategy::Positional,
            policy: Policy::Strict,
        }
    }

    pub fn strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn policy(mut self, policy: Policy) -> Self {
        self.policy = policy;
        self
    }

    /// Patch `text`. The input is never modified; on error no output exists.
    pub fn apply(&self, text: &str) -> Result<PatchedRecipe, BumpError> {
        let mut document = RecipeDocument::parse(text);
        let mut report = PatchReport {
            version: self.version.to_string(),
            ..PatchReport::default()
        };

        let edits = match &self.strategy {
            Strategy::Positional => self.positional_edits(&document)?,
            Strategy::Platform { app_name } => {
                self.platform_edits(&document, app_name, &mut report)?
            }
        };

        match document.version_line() {
            Some(idx) => {
                document.set_version(idx, self.version);
                report.version_line = Some(idx + 1);
            }
            None => report.warnings.push(PatchWarning::MissingVersionLine),
        }

        for edit in edits {
            if document.set_checksum(edit.line, edit.checksum.as_str()) {
                report.updated.push(UpdatedChecksum {
                    filename: edit.filename,
                    line: edit.line + 1,
                    checksum: edit.checksum,
                });
            }
        }

        Ok(PatchedRecipe {
            text: document.render(),
            report,
        })
    }

    /// Every asset must pair with a checksum line and have a checksum.
    /// The first problem in document order aborts.
    fn positional_edits(&self, document: &RecipeDocument) -> Result<Vec<Edit>, BumpError> {
        let mut edits = Vec::new();

        for asset in AssetScanner::new(document, self.version) {
            let asset = asset?;
            let checksum = self.checksums.get(&asset.filename).ok_or_else(|| {
                BumpError::ChecksumNotFound {
                    filename: asset.filename.clone(),
                }
            })?;
            edits.push(Edit {
                line: asset.checksum_line,
                filename: asset.filename,
                checksum: checksum.clone(),
            });
        }

        Ok(edits)
    }

    /// Only platform archives are considered; other `url` lines are left
    /// untouched. Platforms the recipe does not declare are skipped.
    fn platform_edits(
        &self,
        document: &RecipeDocument,
        app_name: &str,
        report: &mut PatchReport,
    ) -> Result<Vec<Edit>, BumpError> {
        let assets: Vec<_> = AssetScanner::new(document, self.version).collect();
        let mut edits = Vec::new();

        for platform in Platform::ALL {
            let mut declared = Vec::new();
            for asset in &assets {
                match asset {
                    Ok(asset) if platform.matches(&asset.filename) => declared.push(asset),
                    Err(unpaired) if platform.matches(&unpaired.filename) => {
                        return Err(unpaired.clone().into());
                    }
                    _ => {}
                }
            }
            if declared.is_empty() {
                continue;
            }

            let filename = platform.asset_filename(app_name, self.version);
            let Some(checksum) = self.checksums.get(&filename) else {
                match self.policy {
                    Policy::Strict => return Err(BumpError::ChecksumNotFound { filename }),
                    Policy::Tolerant => {
                        report
                            .warnings
                            .push(PatchWarning::PartialUpdate { platform, filename });
                        continue;
                    }
                }
            };

            for asset in declared {
                edits.push(Edit {
                    line: asset.checksum_line,
                    filename: filename.clone(),
                    checksum: checksum.clone(),
                });
            }
        }

        Ok(edits)
    }
}
